mod chart;
mod compare;
mod concentric;
mod cycle;
mod funnel;
pub mod geometry;
mod grid;
mod hub_spoke;
mod mindmap;
mod roadmap;
mod sequence;
mod stack;
mod swot;
mod table;
mod text;
pub(crate) mod types;
mod venn;

pub use funnel::funnel_clip;
pub use geometry::{Ellipse, Point, QuadCurve, Rect, VB_H, VB_W};
pub use grid::grid_columns;
pub use types::*;

use chart::compute_chart_layout;
use compare::compute_compare_layout;
use concentric::compute_concentric_layout;
use cycle::compute_cycle_layout;
use funnel::compute_funnel_layout;
use grid::compute_grid_layout;
use hub_spoke::compute_hub_spoke_layout;
use mindmap::compute_mindmap_layout;
use roadmap::compute_roadmap_layout;
use sequence::compute_sequence_layout;
use stack::compute_stack_layout;
use swot::compute_swot_layout;
use table::compute_table_layout;
use text::LabelSpec;
use venn::compute_venn_layout;

use crate::config::LayoutConfig;
use crate::ir::{
    BlockData, ChartContent, ColorOverrides, CompareContent, ConcentricContent, ContentBlock,
    CycleContent, FunnelContent, GridItemContent, HubSpokeContent, ImageBlock, MindmapContent,
    RoadmapContent, SequenceContent, SlideData, SlideStyle, StackContent, SwotContent,
    TableContent, TitleBodyBlock, VennContent,
};
use crate::theme::Theme;

/// Resolved colours and sizes shared by every engine for one diagram.
pub(crate) struct DiagramStyle<'a> {
    pub theme: &'a Theme,
    pub config: &'a LayoutConfig,
    pub text: String,
    pub muted: String,
    palette_name: Option<&'a str>,
}

impl<'a> DiagramStyle<'a> {
    pub fn new(colors: &'a ColorOverrides, theme: &'a Theme, config: &'a LayoutConfig) -> Self {
        let text = colors
            .text_color
            .clone()
            .unwrap_or_else(|| theme.text_primary.clone());
        let muted = if colors.text_color.is_some() {
            text.clone()
        } else {
            theme.text_secondary.clone()
        };
        Self {
            theme,
            config,
            text,
            muted,
            palette_name: colors.color_palette.as_deref(),
        }
    }

    pub fn palette(&self, count: usize) -> Vec<String> {
        self.theme.palette(count, self.palette_name)
    }

    pub fn chart_palette(&self, count: usize) -> Vec<String> {
        self.theme.chart_palette(count, self.palette_name)
    }

    pub fn label_size(&self) -> f32 {
        self.config.label_size
    }

    pub fn caption_size(&self) -> f32 {
        self.config.caption_size
    }

    fn title<'t>(&'t self, text: &'t str) -> LabelSpec<'t> {
        LabelSpec::new(text, self.label_size(), &self.text).bold()
    }

    fn caption<'t>(&'t self, text: &'t str) -> LabelSpec<'t> {
        LabelSpec::new(text, self.caption_size(), &self.muted)
    }

    fn on_fill<'t>(&'t self, text: &'t str, size: f32) -> LabelSpec<'t> {
        LabelSpec::new(text, size, "#FFFFFF")
    }
}

/// Borrowed view of any diagram payload, shared by slides and blocks.
#[derive(Debug, Clone, Copy)]
pub enum DiagramContent<'a> {
    Chart(&'a ChartContent),
    Grid(&'a GridItemContent),
    Sequence(&'a SequenceContent),
    Compare(&'a CompareContent),
    Funnel(&'a FunnelContent),
    Concentric(&'a ConcentricContent),
    HubSpoke(&'a HubSpokeContent),
    Venn(&'a VennContent),
    Cycle(&'a CycleContent),
    Table(&'a TableContent),
    Roadmap(&'a RoadmapContent),
    Swot(&'a SwotContent),
    Mindmap(&'a MindmapContent),
    Stack(&'a StackContent),
}

impl<'a> DiagramContent<'a> {
    pub fn from_slide(slide: &'a SlideData) -> Option<(Self, &'a ColorOverrides)> {
        let content = match slide {
            SlideData::Title(_) | SlideData::KeyPoint(_) | SlideData::BlockSlide(_) => {
                return None;
            }
            SlideData::Chart(s) => DiagramContent::Chart(&s.content),
            SlideData::GridItem(s) => DiagramContent::Grid(&s.content),
            SlideData::Sequence(s) => DiagramContent::Sequence(&s.content),
            SlideData::Compare(s) => DiagramContent::Compare(&s.content),
            SlideData::Funnel(s) => DiagramContent::Funnel(&s.content),
            SlideData::Concentric(s) => DiagramContent::Concentric(&s.content),
            SlideData::HubSpoke(s) => DiagramContent::HubSpoke(&s.content),
            SlideData::Venn(s) => DiagramContent::Venn(&s.content),
            SlideData::Cycle(s) => DiagramContent::Cycle(&s.content),
            SlideData::Table(s) => DiagramContent::Table(&s.content),
            SlideData::Roadmap(s) => DiagramContent::Roadmap(&s.content),
            SlideData::Swot(s) => DiagramContent::Swot(&s.content),
            SlideData::Mindmap(s) => DiagramContent::Mindmap(&s.content),
            SlideData::Stack(s) => DiagramContent::Stack(&s.content),
        };
        Some((content, &slide.style().colors))
    }

    pub fn from_block(block: &'a BlockData) -> Option<(Self, &'a ColorOverrides)> {
        let (content, colors) = match block {
            BlockData::TitleBody(_) | BlockData::Image(_) => return None,
            BlockData::Chart(b) => (DiagramContent::Chart(&b.content), &b.colors),
            BlockData::GridItem(b) => (DiagramContent::Grid(&b.content), &b.colors),
            BlockData::Sequence(b) => (DiagramContent::Sequence(&b.content), &b.colors),
            BlockData::Compare(b) => (DiagramContent::Compare(&b.content), &b.colors),
            BlockData::Funnel(b) => (DiagramContent::Funnel(&b.content), &b.colors),
            BlockData::Concentric(b) => (DiagramContent::Concentric(&b.content), &b.colors),
            BlockData::HubSpoke(b) => (DiagramContent::HubSpoke(&b.content), &b.colors),
            BlockData::Venn(b) => (DiagramContent::Venn(&b.content), &b.colors),
            BlockData::Cycle(b) => (DiagramContent::Cycle(&b.content), &b.colors),
            BlockData::Table(b) => (DiagramContent::Table(&b.content), &b.colors),
            BlockData::Roadmap(b) => (DiagramContent::Roadmap(&b.content), &b.colors),
            BlockData::Swot(b) => (DiagramContent::Swot(&b.content), &b.colors),
            BlockData::Mindmap(b) => (DiagramContent::Mindmap(&b.content), &b.colors),
            BlockData::Stack(b) => (DiagramContent::Stack(&b.content), &b.colors),
        };
        Some((content, colors))
    }
}

/// Runs the engine for one payload. `None` means there is nothing to draw.
pub fn compute_diagram(
    content: DiagramContent<'_>,
    colors: &ColorOverrides,
    theme: &Theme,
    config: &LayoutConfig,
) -> Option<DiagramData> {
    let style = DiagramStyle::new(colors, theme, config);
    let data = match content {
        DiagramContent::Chart(c) => DiagramData::Chart(compute_chart_layout(c, &style)?),
        DiagramContent::Grid(c) => DiagramData::Grid(compute_grid_layout(c, &style)?),
        DiagramContent::Sequence(c) => DiagramData::Sequence(compute_sequence_layout(c, &style)?),
        DiagramContent::Compare(c) => DiagramData::Compare(compute_compare_layout(c, &style)?),
        DiagramContent::Funnel(c) => DiagramData::Funnel(compute_funnel_layout(c, &style)?),
        DiagramContent::Concentric(c) => {
            DiagramData::Concentric(compute_concentric_layout(c, &style)?)
        }
        DiagramContent::HubSpoke(c) => DiagramData::HubSpoke(compute_hub_spoke_layout(c, &style)?),
        DiagramContent::Venn(c) => DiagramData::Venn(compute_venn_layout(c, &style)?),
        DiagramContent::Cycle(c) => DiagramData::Cycle(compute_cycle_layout(c, &style)?),
        DiagramContent::Table(c) => DiagramData::Table(compute_table_layout(c, &style)?),
        DiagramContent::Roadmap(c) => DiagramData::Roadmap(compute_roadmap_layout(c, &style)?),
        DiagramContent::Swot(c) => DiagramData::Swot(compute_swot_layout(c, &style)?),
        DiagramContent::Mindmap(c) => DiagramData::Mindmap(compute_mindmap_layout(c, &style)?),
        DiagramContent::Stack(c) => DiagramData::Stack(compute_stack_layout(c, &style)?),
    };
    Some(data)
}

pub fn compute_slide_diagram(
    slide: &SlideData,
    theme: &Theme,
    config: &LayoutConfig,
) -> Option<DiagramData> {
    let (content, colors) = DiagramContent::from_slide(slide)?;
    compute_diagram(content, colors, theme, config)
}

pub fn compute_block_diagram(
    block: &BlockData,
    theme: &Theme,
    config: &LayoutConfig,
) -> Option<DiagramData> {
    let (content, colors) = DiagramContent::from_block(block)?;
    compute_diagram(content, colors, theme, config)
}

fn title_color<'a>(style: &'a SlideStyle, theme: &'a Theme) -> &'a str {
    style
        .title_color
        .as_deref()
        .or(style.colors.text_color.as_deref())
        .unwrap_or(&theme.text_primary)
}

fn body_color<'a>(style: &'a SlideStyle, theme: &'a Theme) -> &'a str {
    style
        .colors
        .text_color
        .as_deref()
        .unwrap_or(&theme.text_secondary)
}

pub fn compute_layout(slide: &SlideData, theme: &Theme, config: &LayoutConfig) -> Layout {
    let mut layout = Layout {
        kind: slide.kind(),
        width: config.canvas_width,
        height: config.canvas_height,
        background: theme.slide_background.clone(),
        accent_bar: None,
        badge: None,
        texts: Vec::new(),
        diagram: None,
        blocks: Vec::new(),
    };

    match slide {
        SlideData::Title(s) => {
            layout_hero(
                &mut layout,
                &s.title,
                s.subtitle.as_deref(),
                None,
                s.badge.as_deref(),
                &s.style,
                theme,
                config,
            );
        }
        SlideData::KeyPoint(s) => {
            layout_hero(
                &mut layout,
                &s.title,
                s.subtitle.as_deref(),
                s.body.as_deref(),
                None,
                &s.style,
                theme,
                config,
            );
        }
        SlideData::BlockSlide(s) => {
            let area = content_area(config);
            layout.blocks = s
                .blocks
                .iter()
                .map(|block| layout_block(block, area, theme, config))
                .collect();
        }
        _ => {
            let style = slide.style();
            let bottom = layout_header(
                &mut layout.texts,
                slide.title(),
                slide.body(),
                style,
                theme,
                config,
            );
            let frame = Rect::new(
                config.padding,
                bottom + config.header_gap,
                config.canvas_width - 2.0 * config.padding,
                (config.canvas_height - config.padding - bottom - config.header_gap).max(1.0),
            );
            layout.diagram = compute_slide_diagram(slide, theme, config)
                .map(|data| PlacedDiagram { frame, data });
            if layout.diagram.is_none() {
                tracing::debug!(kind = %slide.kind(), "slide has no diagram content");
            }
        }
    }

    layout
}

fn content_area(config: &LayoutConfig) -> Rect {
    Rect::new(
        config.padding,
        config.padding,
        (config.canvas_width - 2.0 * config.padding).max(1.0),
        (config.canvas_height - 2.0 * config.padding).max(1.0),
    )
}

/// Title and body at the top-left; returns the bottom edge of the header.
fn layout_header(
    texts: &mut Vec<Label>,
    title: &str,
    body: Option<&str>,
    style: &SlideStyle,
    theme: &Theme,
    config: &LayoutConfig,
) -> f32 {
    let width = config.canvas_width - 2.0 * config.padding;
    let title_size = style.title_size.unwrap_or(config.title_size);
    let body_size = style.body_size.unwrap_or(config.body_size);
    let mut y = config.padding;

    if !title.trim().is_empty() {
        let label = LabelSpec::new(title, title_size, title_color(style, theme))
            .bold()
            .anchor(TextAnchor::Start)
            .width(width)
            .lines(2)
            .below(config.padding, y, config);
        y += label.text.height;
        texts.push(label);
    }
    if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
        y += 6.0;
        let label = LabelSpec::new(body, body_size, body_color(style, theme))
            .anchor(TextAnchor::Start)
            .width(width)
            .lines(3)
            .below(config.padding, y, config);
        y += label.text.height;
        texts.push(label);
    }
    y
}

#[allow(clippy::too_many_arguments)]
fn layout_hero(
    layout: &mut Layout,
    title: &str,
    subtitle: Option<&str>,
    body: Option<&str>,
    badge: Option<&str>,
    style: &SlideStyle,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let cx = config.canvas_width / 2.0;
    let width = config.canvas_width - 4.0 * config.padding;
    let title_size = style.title_size.unwrap_or(config.hero_title_size);
    let body_size = style.body_size.unwrap_or(config.body_size * 1.25);
    let gap = 16.0;

    let title_label = LabelSpec::new(title, title_size, title_color(style, theme))
        .bold()
        .width(width)
        .lines(3)
        .at(cx, 0.0, config);
    let subtitle_label = subtitle.filter(|s| !s.trim().is_empty()).map(|s| {
        LabelSpec::new(s, body_size, body_color(style, theme))
            .width(width)
            .lines(2)
            .at(cx, 0.0, config)
    });
    let body_label = body.filter(|s| !s.trim().is_empty()).map(|s| {
        LabelSpec::new(s, config.body_size, body_color(style, theme))
            .width(width * 0.85)
            .lines(6)
            .at(cx, 0.0, config)
    });
    let badge_height = if badge.is_some() { 28.0 + gap } else { 0.0 };

    let mut total = badge_height + title_label.text.height + gap + 4.0;
    if let Some(label) = &subtitle_label {
        total += gap + label.text.height;
    }
    if let Some(label) = &body_label {
        total += gap + label.text.height;
    }
    let mut y = ((config.canvas_height - total) / 2.0).max(config.padding);

    if let Some(text) = badge {
        let label = LabelSpec::new(text, config.caption_size, "#FFFFFF")
            .bold()
            .at(cx, y + 14.0, config);
        let w = label.text.width + 28.0;
        layout.badge = Some(BadgeLayout {
            rect: Rect::new(cx - w / 2.0, y, w, 28.0),
            fill: theme.accent_neutral.clone(),
            label,
        });
        y += badge_height;
    }

    let mut title_label = title_label;
    title_label.y = y + title_label.text.height / 2.0;
    y += title_label.text.height + gap;
    layout.texts.push(title_label);

    layout.accent_bar = Some(Rect::new(cx - 24.0, y, 48.0, 4.0));
    y += 4.0;

    for mut label in [subtitle_label, body_label].into_iter().flatten() {
        y += gap;
        label.y = y + label.text.height / 2.0;
        y += label.text.height;
        layout.texts.push(label);
    }
}

fn layout_block(block: &ContentBlock, area: Rect, theme: &Theme, config: &LayoutConfig) -> BlockLayout {
    let rect = area.percent(block.x, block.y, block.width, block.height);
    let mut out = BlockLayout {
        id: block.id.clone(),
        block_type: block.data.type_name(),
        rect,
        texts: Vec::new(),
        image: None,
        diagram: None,
    };
    match &block.data {
        BlockData::TitleBody(data) => layout_text_block(&mut out, data, theme, config),
        BlockData::Image(data) => out.image = Some(layout_image_block(rect, data, theme, config)),
        diagram => {
            out.diagram = compute_block_diagram(diagram, theme, config).map(|data| PlacedDiagram {
                frame: rect.inset(config.block_inset),
                data,
            });
        }
    }
    out
}

fn layout_text_block(
    out: &mut BlockLayout,
    data: &TitleBodyBlock,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let inner = out.rect.inset(config.block_inset);
    let title_color = data
        .title_color
        .as_deref()
        .or(data.text_color.as_deref())
        .unwrap_or(&theme.text_primary);
    let body_color = data.text_color.as_deref().unwrap_or(&theme.text_secondary);
    let mut y = inner.y;
    if !data.title.trim().is_empty() {
        let label = LabelSpec::new(
            &data.title,
            data.title_size.unwrap_or(config.title_size),
            title_color,
        )
        .bold()
        .anchor(TextAnchor::Start)
        .width(inner.width)
        .below(inner.x, y, config);
        y += label.text.height + 6.0;
        out.texts.push(label);
    }
    if let Some(body) = data.body.as_deref().filter(|b| !b.trim().is_empty()) {
        let label = LabelSpec::new(body, data.body_size.unwrap_or(config.body_size), body_color)
            .anchor(TextAnchor::Start)
            .width(inner.width)
            .below(inner.x, y, config);
        out.texts.push(label);
    }
}

fn layout_image_block(rect: Rect, data: &ImageBlock, theme: &Theme, config: &LayoutConfig) -> ImageLayout {
    let inner = rect.inset(config.block_inset);
    let text = data
        .placeholder
        .as_deref()
        .or(data.alt.as_deref())
        .unwrap_or("Image");
    ImageLayout {
        rect: inner,
        src: data.src.clone().filter(|s| !s.trim().is_empty()),
        fit: data.fit.unwrap_or_default(),
        fill: theme.bar_track.clone(),
        placeholder: LabelSpec::new(text, config.caption_size, &theme.text_caption)
            .width(inner.width)
            .at(inner.center().x, inner.center().y, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::create_default_slide;
    use crate::ir::{
        BlockSlide, DiagramSlide, FunnelVariant, KeyPointSlide, SlideKind, TitleSlide,
    };

    fn setup() -> (Theme, LayoutConfig) {
        (Theme::swiss(), LayoutConfig::default())
    }

    #[test]
    fn every_default_slide_lays_out() {
        let (theme, config) = setup();
        for kind in SlideKind::ALL {
            let slide = create_default_slide(kind);
            let layout = compute_layout(&slide, &theme, &config);
            assert_eq!(layout.kind, kind);
            if kind.is_diagram() {
                let placed = layout.diagram.as_ref().unwrap_or_else(|| panic!("{kind} has no diagram"));
                assert!(placed.frame.y > config.padding);
                let (w, h) = placed.data.viewbox();
                assert!(w > 0.0 && h > 0.0, "{kind}");
            }
        }
    }

    #[test]
    fn empty_collections_render_nothing() {
        let (theme, config) = setup();
        let slide = SlideData::Funnel(DiagramSlide::new(
            "Empty",
            None,
            FunnelContent {
                layers: Vec::new(),
                variant: FunnelVariant::Pyramid,
            },
        ));
        let layout = compute_layout(&slide, &theme, &config);
        assert!(layout.diagram.is_none());
        assert_eq!(layout.texts.len(), 1);
    }

    #[test]
    fn title_overrides_resolve_independently() {
        let (theme, config) = setup();
        let mut slide = create_default_slide(SlideKind::Venn);
        let style = slide.style_mut();
        style.title_size = Some(44.0);
        style.colors.text_color = Some("#101010".into());
        let layout = compute_layout(&slide, &theme, &config);
        let title = &layout.texts[0];
        assert_eq!(title.font_size, 44.0);
        assert_eq!(title.color, "#101010");
    }

    #[test]
    fn hero_slides_are_centred() {
        let (theme, config) = setup();
        let slide = SlideData::Title(TitleSlide {
            title: "Quarterly Review".into(),
            subtitle: Some("Q3".into()),
            badge: Some("2026".into()),
            ..TitleSlide::default()
        });
        let layout = compute_layout(&slide, &theme, &config);
        assert!(layout.badge.is_some());
        assert!(layout.texts.iter().all(|t| t.anchor == TextAnchor::Middle));
        assert_eq!(layout.texts.len(), 2);

        let key = SlideData::KeyPoint(KeyPointSlide {
            title: "One idea".into(),
            body: Some("Everything else follows.".into()),
            ..KeyPointSlide::default()
        });
        let layout = compute_layout(&key, &theme, &config);
        assert!(layout.accent_bar.is_some());
        assert_eq!(layout.texts.len(), 2);
    }

    #[test]
    fn blocks_are_placed_by_percentage() {
        let (theme, config) = setup();
        let slide = SlideData::BlockSlide(BlockSlide {
            title: "Blocks".into(),
            blocks: vec![ContentBlock {
                id: "blk-1".into(),
                x: 50.0,
                y: 0.0,
                width: 50.0,
                height: 100.0,
                data: BlockData::Image(ImageBlock::default()),
            }],
            ..BlockSlide::default()
        });
        let layout = compute_layout(&slide, &theme, &config);
        let block = &layout.blocks[0];
        let area = content_area(&config);
        assert!((block.rect.x - (area.x + area.width / 2.0)).abs() < 1e-3);
        assert_eq!(block.block_type, "image");
        assert_eq!(
            block.image.as_ref().map(|i| i.placeholder.text.lines[0].as_str()),
            Some("Image")
        );
    }
}
