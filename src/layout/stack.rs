use crate::ir::{LabeledItem, StackContent, StackVariant};

use super::geometry::{Point, Rect};
use super::{DiagramStyle, StackLayerLayout, StackLayout, TextAnchor};

const STACK_WIDTH: f32 = 640.0;
const ROW_GAP: f32 = 6.0;
const TAG_WIDTH: f32 = 48.0;
const COLUMN_AREA: f32 = 360.0;
const COLUMN_GAP: f32 = 16.0;
const CARD_HEIGHT: f32 = 56.0;

pub(super) fn compute_stack_layout(
    content: &StackContent,
    style: &DiagramStyle<'_>,
) -> Option<StackLayout> {
    let n = content.layers.len();
    if n == 0 {
        return None;
    }
    let palette = style.palette(n);
    let (layers, width, height) = match content.variant {
        StackVariant::Horizontal => rows(&content.layers, &palette, style),
        StackVariant::Vertical => columns(&content.layers, &palette, style),
        StackVariant::Offset => offset_cards(&content.layers, &palette, style),
    };
    Some(StackLayout {
        width,
        height,
        variant: content.variant,
        layers,
    })
}

fn description(item: &LabeledItem) -> Option<&str> {
    item.description.as_deref().filter(|d| !d.trim().is_empty())
}

fn rows(
    items: &[LabeledItem],
    palette: &[String],
    style: &DiagramStyle<'_>,
) -> (Vec<StackLayerLayout>, f32, f32) {
    let config = style.config;
    let n = items.len();
    let row_h = (280.0 / n as f32).clamp(32.0, 60.0);
    let body_x = TAG_WIDTH + 8.0;
    let body_w = STACK_WIDTH - body_x;

    let layers = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let rect = Rect::new(body_x, i as f32 * (row_h + ROW_GAP), body_w, row_h);
            let mid = rect.center().y;
            let tag_text = format!("L{}", n - i);
            let tag = style
                .caption(&tag_text)
                .bold()
                .at(TAG_WIDTH / 2.0, mid, config);
            let label = style
                .on_fill(&item.label, style.label_size())
                .bold()
                .anchor(TextAnchor::Start)
                .width(body_w * 0.4)
                .lines(1)
                .at(rect.x + 16.0, mid, config);
            let description = description(item).map(|d| {
                style
                    .on_fill(d, style.caption_size())
                    .anchor(TextAnchor::End)
                    .width(body_w * 0.5)
                    .lines(1)
                    .at(rect.right() - 16.0, mid, config)
            });
            StackLayerLayout {
                rect,
                color: palette[i].clone(),
                z_index: 0,
                tag: Some(tag),
                badge: None,
                label,
                description,
            }
        })
        .collect();

    let height = n as f32 * row_h + (n - 1) as f32 * ROW_GAP;
    (layers, STACK_WIDTH, height)
}

fn columns(
    items: &[LabeledItem],
    palette: &[String],
    style: &DiagramStyle<'_>,
) -> (Vec<StackLayerLayout>, f32, f32) {
    let config = style.config;
    let n = items.len();
    let col_w = (600.0 / n as f32).min(120.0);
    let total_w = n as f32 * col_w + (n - 1) as f32 * COLUMN_GAP;
    let start = ((STACK_WIDTH - total_w) / 2.0).max(0.0);

    let layers = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let percent = (90.0 - i as f32 * 60.0 / n as f32).max(20.0);
            let h = COLUMN_AREA * percent / 100.0;
            let x = start + i as f32 * (col_w + COLUMN_GAP);
            let rect = Rect::new(x, COLUMN_AREA - h, col_w, h);
            let label = style
                .on_fill(&item.label, style.caption_size())
                .bold()
                .width(col_w - 8.0)
                .lines(2)
                .below(rect.center().x, rect.y + 10.0, config);
            let description = description(item).map(|d| {
                style
                    .caption(d)
                    .width(col_w + COLUMN_GAP)
                    .lines(3)
                    .below(rect.center().x, COLUMN_AREA + 8.0, config)
            });
            StackLayerLayout {
                rect,
                color: palette[i].clone(),
                z_index: 0,
                tag: None,
                badge: None,
                label,
                description,
            }
        })
        .collect();

    (layers, STACK_WIDTH.max(total_w), COLUMN_AREA + 64.0)
}

fn offset_cards(
    items: &[LabeledItem],
    palette: &[String],
    style: &DiagramStyle<'_>,
) -> (Vec<StackLayerLayout>, f32, f32) {
    let config = style.config;
    let n = items.len();
    let step = (300.0 / n as f32).clamp(24.0, 48.0);

    let layers = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let percent = (100.0 - i as f32 * 35.0 / n as f32).max(60.0);
            let w = STACK_WIDTH * percent / 100.0;
            let rect = Rect::new((STACK_WIDTH - w) / 2.0, i as f32 * step, w, CARD_HEIGHT);
            // Earlier cards sit on top; only the bottom strip of a later card shows.
            let strip_mid = if i == 0 {
                rect.center().y
            } else {
                rect.bottom() - step / 2.0
            };
            let badge_center = Point::new(rect.x + 22.0, strip_mid);
            let number = format!("{}", i + 1);
            let badge_label = style
                .title(&number)
                .at(badge_center.x, badge_center.y, config);
            let label = style
                .on_fill(&item.label, style.label_size())
                .bold()
                .anchor(TextAnchor::Start)
                .width(w * 0.45)
                .lines(1)
                .at(rect.x + 44.0, strip_mid, config);
            let description = description(item).map(|d| {
                style
                    .on_fill(d, style.caption_size())
                    .anchor(TextAnchor::End)
                    .width(w * 0.4)
                    .lines(1)
                    .at(rect.right() - 14.0, strip_mid, config)
            });
            StackLayerLayout {
                rect,
                color: palette[i].clone(),
                z_index: n - i,
                tag: None,
                badge: Some((badge_center, 12.0, badge_label)),
                label,
                description,
            }
        })
        .collect();

    let height = (n - 1) as f32 * step + CARD_HEIGHT;
    (layers, STACK_WIDTH, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::ColorOverrides;
    use crate::theme::Theme;

    fn run(n: usize, variant: StackVariant) -> StackLayout {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = StackContent {
            layers: (0..n)
                .map(|i| LabeledItem::new(format!("Layer {i}"), Some("detail".into())))
                .collect(),
            variant,
        };
        compute_stack_layout(&content, &style).unwrap()
    }

    #[test]
    fn horizontal_rows_are_tagged_from_the_bottom() {
        let layout = run(4, StackVariant::Horizontal);
        assert_eq!(layout.layers[0].rect.height, 60.0);
        assert_eq!(layout.layers[0].tag.as_ref().unwrap().text.lines[0], "L4");
        assert_eq!(layout.layers[3].tag.as_ref().unwrap().text.lines[0], "L1");
        let many = run(10, StackVariant::Horizontal);
        assert_eq!(many.layers[0].rect.height, 32.0);
    }

    #[test]
    fn vertical_columns_step_down() {
        let layout = run(3, StackVariant::Vertical);
        let heights: Vec<_> = layout.layers.iter().map(|l| l.rect.height).collect();
        assert!((heights[0] - COLUMN_AREA * 0.9).abs() < 1e-3);
        assert!((heights[2] - COLUMN_AREA * 0.5).abs() < 1e-3);
        assert!(layout.layers.iter().all(|l| l.rect.width == 120.0));
        assert!(layout.layers.iter().all(|l| (l.rect.bottom() - COLUMN_AREA).abs() < 1e-3));
    }

    #[test]
    fn offset_cards_shrink_and_stack_front_to_back() {
        let layout = run(5, StackVariant::Offset);
        assert_eq!(layout.layers[0].z_index, 5);
        assert_eq!(layout.layers[4].z_index, 1);
        assert_eq!(layout.layers[0].rect.width, STACK_WIDTH);
        assert!((layout.layers[4].rect.width - STACK_WIDTH * 0.72).abs() < 1e-3);
        assert_eq!(layout.layers[1].rect.y, 48.0);
        assert!(layout.layers.iter().all(|l| l.badge.is_some()));
    }

    #[test]
    fn no_layers_draw_nothing() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        for variant in StackVariant::ALL {
            let content = StackContent {
                layers: Vec::new(),
                variant: *variant,
            };
            assert!(compute_stack_layout(&content, &style).is_none());
        }
    }
}
