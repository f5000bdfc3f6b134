//! Bridges between legacy single-diagram slides and freeform block slides.

use crate::convert::{apply_variant, convert_to_type};
use crate::ir::*;

const HEADER: (f32, f32, f32, f32) = (0.0, 0.0, 100.0, 18.0);
const DIAGRAM: (f32, f32, f32, f32) = (0.0, 20.0, 100.0, 80.0);
const FULL: (f32, f32, f32, f32) = (0.0, 0.0, 100.0, 100.0);

/// Block id allocator owned by an editing session. Ids look like
/// `blk-<session>-<n>` and are unique within one allocator.
#[derive(Debug, Clone)]
pub struct BlockIds {
    session: i64,
    counter: u64,
}

impl BlockIds {
    /// Session seeded from the wall clock in milliseconds.
    pub fn new() -> Self {
        Self::with_seed(chrono::Utc::now().timestamp_millis())
    }

    pub fn with_seed(session: i64) -> Self {
        Self { session, counter: 0 }
    }

    pub fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("blk-{}-{}", self.session, self.counter)
    }

    fn block(&mut self, (x, y, width, height): (f32, f32, f32, f32), data: BlockData) -> ContentBlock {
        ContentBlock {
            id: self.next_id(),
            x,
            y,
            width,
            height,
            data,
        }
    }
}

impl Default for BlockIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-expresses `slide` as a block slide: a header block over a diagram
/// block, or one full-canvas text block when there is no diagram. Block
/// slides pass through unchanged.
pub fn legacy_to_blocks(slide: &SlideData, ids: &mut BlockIds) -> BlockSlide {
    if let SlideData::BlockSlide(block_slide) = slide {
        return block_slide.clone();
    }
    let header = BlockData::TitleBody(TitleBodyBlock {
        title: slide.title().to_string(),
        body: slide.body().or(slide.subtitle()).map(str::to_string),
        ..TitleBodyBlock::default()
    });
    let blocks = match extract_diagram_data(slide) {
        Some(diagram) => vec![ids.block(HEADER, header), ids.block(DIAGRAM, diagram)],
        None => vec![ids.block(FULL, header)],
    };
    BlockSlide {
        title: slide.title().to_string(),
        blocks,
        ..BlockSlide::default()
    }
}

fn diagram<C: Clone>(slide: &DiagramSlide<C>) -> DiagramBlock<C> {
    DiagramBlock::new(slide.content.clone(), slide.style.colors.clone())
}

/// The diagram payload of a legacy slide with only its colour overrides.
/// Header styling stays with the slide, and charts lose `chartHeight`
/// because a block's height comes from its rect.
pub fn extract_diagram_data(slide: &SlideData) -> Option<BlockData> {
    let data = match slide {
        SlideData::Title(_) | SlideData::KeyPoint(_) | SlideData::BlockSlide(_) => return None,
        SlideData::Chart(s) => {
            let mut block = diagram(s);
            block.content.chart_height = None;
            BlockData::Chart(block)
        }
        SlideData::GridItem(s) => BlockData::GridItem(diagram(s)),
        SlideData::Sequence(s) => BlockData::Sequence(diagram(s)),
        SlideData::Compare(s) => BlockData::Compare(diagram(s)),
        SlideData::Funnel(s) => BlockData::Funnel(diagram(s)),
        SlideData::Concentric(s) => BlockData::Concentric(diagram(s)),
        SlideData::HubSpoke(s) => BlockData::HubSpoke(diagram(s)),
        SlideData::Venn(s) => BlockData::Venn(diagram(s)),
        SlideData::Cycle(s) => BlockData::Cycle(diagram(s)),
        SlideData::Table(s) => BlockData::Table(diagram(s)),
        SlideData::Roadmap(s) => BlockData::Roadmap(diagram(s)),
        SlideData::Swot(s) => BlockData::Swot(diagram(s)),
        SlideData::Mindmap(s) => BlockData::Mindmap(diagram(s)),
        SlideData::Stack(s) => BlockData::Stack(diagram(s)),
    };
    Some(data)
}

fn slide<C: Clone>(block: &DiagramBlock<C>, title: &str, body: Option<&str>) -> DiagramSlide<C> {
    let mut slide = DiagramSlide::new(title, body.map(str::to_string), block.content.clone());
    slide.style.colors = block.colors.clone();
    slide
}

/// Wraps a diagram block back into a legacy slide. Text and image blocks
/// have no legacy form.
pub fn block_to_slide(block: &BlockData, title: &str, body: Option<&str>) -> Option<SlideData> {
    let data = match block {
        BlockData::TitleBody(_) | BlockData::Image(_) => return None,
        BlockData::Chart(b) => SlideData::Chart(slide(b, title, body)),
        BlockData::GridItem(b) => SlideData::GridItem(slide(b, title, body)),
        BlockData::Sequence(b) => SlideData::Sequence(slide(b, title, body)),
        BlockData::Compare(b) => SlideData::Compare(slide(b, title, body)),
        BlockData::Funnel(b) => SlideData::Funnel(slide(b, title, body)),
        BlockData::Concentric(b) => SlideData::Concentric(slide(b, title, body)),
        BlockData::HubSpoke(b) => SlideData::HubSpoke(slide(b, title, body)),
        BlockData::Venn(b) => SlideData::Venn(slide(b, title, body)),
        BlockData::Cycle(b) => SlideData::Cycle(slide(b, title, body)),
        BlockData::Table(b) => SlideData::Table(slide(b, title, body)),
        BlockData::Roadmap(b) => SlideData::Roadmap(slide(b, title, body)),
        BlockData::Swot(b) => SlideData::Swot(slide(b, title, body)),
        BlockData::Mindmap(b) => SlideData::Mindmap(slide(b, title, body)),
        BlockData::Stack(b) => SlideData::Stack(slide(b, title, body)),
    };
    Some(data)
}

/// Collapses a block slide to a legacy slide. The header-plus-diagram shape
/// made by [`legacy_to_blocks`] round-trips; anything else becomes a key
/// point built from the first text block.
pub fn blocks_to_legacy(block_slide: &BlockSlide) -> SlideData {
    if let [header, body] = block_slide.blocks.as_slice()
        && let BlockData::TitleBody(text) = &header.data
        && let Some(slide) = block_to_slide(&body.data, &text.title, text.body.as_deref())
    {
        return slide;
    }
    let text = block_slide.blocks.iter().find_map(|b| match &b.data {
        BlockData::TitleBody(text) => Some(text),
        _ => None,
    });
    tracing::debug!(blocks = block_slide.blocks.len(), "block slide collapsed to key point");
    SlideData::KeyPoint(KeyPointSlide {
        title: text
            .map(|t| t.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| block_slide.title.clone()),
        body: text.and_then(|t| t.body.clone()),
        ..KeyPointSlide::default()
    })
}

/// Switches a block's diagram kind, keeping its id, rect and colours. Text
/// blocks convert from their title and body; image blocks are left alone.
/// Targets without a diagram produce a text block.
pub fn convert_block(block: &ContentBlock, kind: SlideKind, variant: Option<&str>) -> ContentBlock {
    let (source, colors) = match &block.data {
        BlockData::Image(_) => return block.clone(),
        BlockData::TitleBody(text) => (
            SlideData::KeyPoint(KeyPointSlide {
                title: text.title.clone(),
                body: text.body.clone(),
                ..KeyPointSlide::default()
            }),
            ColorOverrides::default(),
        ),
        data => match block_to_slide(data, "", None) {
            Some(slide) => (slide, data.colors().cloned().unwrap_or_default()),
            None => return block.clone(),
        },
    };

    let mut converted = convert_to_type(&source, kind, variant);
    *converted.style_mut() = SlideStyle {
        colors,
        ..SlideStyle::default()
    };
    let data = extract_diagram_data(&converted).unwrap_or_else(|| {
        BlockData::TitleBody(TitleBodyBlock {
            title: converted.title().to_string(),
            body: converted.body().or(converted.subtitle()).map(str::to_string),
            ..TitleBodyBlock::default()
        })
    });
    ContentBlock {
        data,
        ..block.clone()
    }
}

/// Sets a diagram block's variant when the registry accepts it.
pub fn apply_block_variant(block: &ContentBlock, variant: &str) -> ContentBlock {
    let Some(slide) = block_to_slide(&block.data, "", None) else {
        return block.clone();
    };
    match extract_diagram_data(&apply_variant(&slide, Some(variant))) {
        Some(data) => ContentBlock {
            data,
            ..block.clone()
        },
        None => block.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::create_default_slide;

    #[test]
    fn ids_are_sequential_per_session() {
        let mut ids = BlockIds::with_seed(7);
        assert_eq!(ids.next_id(), "blk-7-1");
        assert_eq!(ids.next_id(), "blk-7-2");
    }

    #[test]
    fn grid_slide_becomes_header_and_grid_blocks() {
        let items: Vec<GridItem> = ["Speed", "Quality", "Cost"]
            .into_iter()
            .map(|title| GridItem {
                title: title.into(),
                description: Some(format!("{title} notes")),
                ..GridItem::default()
            })
            .collect();
        let grid = SlideData::GridItem(DiagramSlide::new(
            "Priorities",
            Some("This quarter".into()),
            GridItemContent {
                items: items.clone(),
                variant: GridItemVariant::Outline,
                ..GridItemContent::default()
            },
        ));
        let blocks = legacy_to_blocks(&grid, &mut BlockIds::with_seed(3));
        assert_eq!(blocks.blocks.len(), 2);

        let header = &blocks.blocks[0];
        assert_eq!(header.data.type_name(), "title-body");
        assert_eq!((header.x, header.y, header.width, header.height), (0.0, 0.0, 100.0, 18.0));
        let BlockData::TitleBody(text) = &header.data else {
            panic!("expected a title-body header");
        };
        assert_eq!(text.title, "Priorities");
        assert_eq!(text.body.as_deref(), Some("This quarter"));

        let body = &blocks.blocks[1];
        assert_eq!(body.data.type_name(), "grid-item");
        assert_eq!((body.x, body.y, body.width, body.height), (0.0, 20.0, 100.0, 80.0));
        let BlockData::GridItem(block) = &body.data else {
            panic!("expected a grid-item block");
        };
        assert_eq!(block.content.items, items);
        assert_eq!(block.content.variant, GridItemVariant::Outline);

        assert_eq!(blocks_to_legacy(&blocks), grid);
    }

    #[test]
    fn diagram_slides_split_into_header_and_body() {
        let mut venn = create_default_slide(SlideKind::Venn);
        venn.style_mut().colors.color_palette = Some("ocean".into());
        venn.style_mut().title_size = Some(40.0);
        let blocks = legacy_to_blocks(&venn, &mut BlockIds::with_seed(1));
        assert_eq!(blocks.blocks.len(), 2);
        let (header, body) = (&blocks.blocks[0], &blocks.blocks[1]);
        assert_eq!((header.y, header.height), (0.0, 18.0));
        assert_eq!((body.y, body.height), (20.0, 80.0));
        assert_eq!(body.data.colors().and_then(|c| c.color_palette.as_deref()), Some("ocean"));
        assert_ne!(header.id, body.id);
    }

    #[test]
    fn text_slides_fill_the_canvas_with_subtitle_as_body() {
        let title = create_default_slide(SlideKind::Title);
        let blocks = legacy_to_blocks(&title, &mut BlockIds::with_seed(1));
        assert_eq!(blocks.blocks.len(), 1);
        assert_eq!(blocks.blocks[0].height, 100.0);
        let BlockData::TitleBody(text) = &blocks.blocks[0].data else {
            panic!("expected text block");
        };
        assert_eq!(text.body.as_deref(), Some("Add a subtitle here"));
    }

    #[test]
    fn block_slides_pass_through() {
        let slide = create_default_slide(SlideKind::BlockSlide);
        let SlideData::BlockSlide(expected) = &slide else {
            panic!("expected block slide");
        };
        assert_eq!(&legacy_to_blocks(&slide, &mut BlockIds::with_seed(1)), expected);
    }

    #[test]
    fn chart_blocks_drop_their_height() {
        let mut chart = create_default_slide(SlideKind::Chart);
        if let SlideData::Chart(s) = &mut chart {
            s.content.chart_height = Some(300.0);
        }
        let Some(BlockData::Chart(block)) = extract_diagram_data(&chart) else {
            panic!("expected chart block");
        };
        assert_eq!(block.content.chart_height, None);
    }

    #[test]
    fn canonical_shape_round_trips() {
        for kind in SlideKind::ALL.into_iter().filter(|k| k.is_diagram()) {
            let slide = create_default_slide(kind);
            let blocks = legacy_to_blocks(&slide, &mut BlockIds::with_seed(3));
            assert_eq!(blocks_to_legacy(&blocks), slide, "{kind}");
        }
    }

    #[test]
    fn freeform_slides_collapse_to_key_point() {
        let slide = create_default_slide(SlideKind::BlockSlide);
        let SlideData::BlockSlide(blocks) = slide else {
            panic!("expected block slide");
        };
        let legacy = blocks_to_legacy(&blocks);
        assert_eq!(legacy.kind(), SlideKind::KeyPoint);
        assert_eq!(legacy.body(), Some("Add content here"));
    }

    #[test]
    fn converting_a_block_keeps_its_frame() {
        let slide = create_default_slide(SlideKind::Cycle);
        let blocks = legacy_to_blocks(&slide, &mut BlockIds::with_seed(1));
        let block = &blocks.blocks[1];
        let converted = convert_block(block, SlideKind::Funnel, Some("pyramid"));
        assert_eq!(converted.id, block.id);
        assert_eq!(converted.y, block.y);
        let BlockData::Funnel(funnel) = &converted.data else {
            panic!("expected funnel");
        };
        assert_eq!(funnel.content.variant, FunnelVariant::Pyramid);
        assert_eq!(funnel.content.layers.len(), 4);

        let text = convert_block(&blocks.blocks[0], SlideKind::Title, None);
        assert!(matches!(text.data, BlockData::TitleBody(_)));
    }

    #[test]
    fn block_variants_are_validated() {
        let slide = create_default_slide(SlideKind::Stack);
        let blocks = legacy_to_blocks(&slide, &mut BlockIds::with_seed(1));
        let block = &blocks.blocks[1];
        let vertical = apply_block_variant(block, "vertical");
        assert!(matches!(&vertical.data, BlockData::Stack(s) if s.content.variant == StackVariant::Vertical));
        assert_eq!(&apply_block_variant(block, "diagonal"), block);
        assert_eq!(&apply_block_variant(&blocks.blocks[0], "vertical"), &blocks.blocks[0]);
    }
}
