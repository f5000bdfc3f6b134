use crate::ir::{GridItem, GridItemContent, GridItemVariant};

use super::geometry::{Point, Rect, VB_W, diamond_points};
use super::text::LabelSpec;
use super::{CardMarker, CardShape, DiagramStyle, GridCardLayout, GridLayout, Label, TextAnchor};

const MIN_CARD_HEIGHT: f32 = 96.0;
const SIGNS: [&str; 4] = ["+", "−", "×", "÷"];

/// Column count: explicit override when positive, otherwise by item count.
pub fn grid_columns(n: usize, columns: Option<u32>) -> usize {
    match columns {
        Some(c) if c > 0 => c as usize,
        _ if n <= 3 => n.max(1),
        _ if n <= 6 => 3,
        _ => 4,
    }
}

struct CardText {
    icon: Option<Label>,
    value: Option<Label>,
    title: Label,
    description: Option<Label>,
    height: f32,
}

pub(super) fn compute_grid_layout(
    content: &GridItemContent,
    style: &DiagramStyle<'_>,
) -> Option<GridLayout> {
    let n = content.items.len();
    if n == 0 {
        return None;
    }
    let variant = content.variant;
    let config = style.config;
    let columns = grid_columns(n, content.columns).max(1);
    let rows = n.div_ceil(columns);
    let gap = if variant == GridItemVariant::Joined {
        0.0
    } else {
        content.gap.unwrap_or(config.grid_gap)
    };
    let card_w = (VB_W - gap * (columns as f32 - 1.0)) / columns as f32;
    let pad = config.card_padding;
    let palette = style.palette(n);

    let inset = leading_inset(variant);
    let header = header_space(variant);

    let texts: Vec<CardText> = content
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let on_fill = fills_with_accent(variant, i);
            card_text(item, card_w - 2.0 * pad - inset, on_fill, &palette[i], style)
        })
        .collect();
    let content_h = texts.iter().map(|t| t.height).fold(0.0, f32::max);
    let card_h = (content_h + 2.0 * pad + header).max(MIN_CARD_HEIGHT);
    let height = rows as f32 * card_h + (rows as f32 - 1.0) * gap;

    let cards = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let col = i % columns;
            let row = i / columns;
            let rect = Rect::new(
                col as f32 * (card_w + gap),
                row as f32 * (card_h + gap),
                card_w,
                card_h,
            );
            place_card(i, rect, text, variant, &palette[i], style)
        })
        .collect();

    let joined = (variant == GridItemVariant::Joined).then(|| Rect::new(0.0, 0.0, VB_W, height));

    Some(GridLayout {
        width: VB_W,
        height,
        columns,
        rows,
        cards,
        joined,
    })
}

fn leading_inset(variant: GridItemVariant) -> f32 {
    match variant {
        GridItemVariant::Sideline => 8.0,
        GridItemVariant::Pillar => 40.0,
        _ => 0.0,
    }
}

fn header_space(variant: GridItemVariant) -> f32 {
    match variant {
        GridItemVariant::TopCircle => 40.0,
        GridItemVariant::Labeled => 30.0,
        GridItemVariant::Diamonds | GridItemVariant::Signs => 32.0,
        GridItemVariant::Topline => 4.0,
        _ => 0.0,
    }
}

fn fills_with_accent(variant: GridItemVariant, index: usize) -> bool {
    match variant {
        GridItemVariant::Solid | GridItemVariant::Leaf => true,
        GridItemVariant::Alternating => index % 2 == 0,
        _ => false,
    }
}

fn card_text(
    item: &GridItem,
    width: f32,
    on_fill: bool,
    accent: &str,
    style: &DiagramStyle<'_>,
) -> CardText {
    let config = style.config;
    let title_color = if on_fill { "#FFFFFF" } else { style.text.as_str() };
    let body_color = if on_fill { "#FFFFFF" } else { style.muted.as_str() };
    let mut y = 0.0;

    let icon = item.icon.as_deref().filter(|s| !s.is_empty()).map(|icon| {
        let label = LabelSpec::new(icon, 22.0, title_color)
            .anchor(TextAnchor::Start)
            .below(0.0, y, config);
        y += label.text.height + 4.0;
        label
    });

    let value = item.value.as_deref().filter(|s| !s.is_empty()).map(|value| {
        let color = match (on_fill, item.value_color) {
            (true, _) => "#FFFFFF",
            (false, Some(c)) => style.theme.semantic_color(c),
            (false, None) => accent,
        };
        let label = LabelSpec::new(value, 28.0, color)
            .bold()
            .anchor(TextAnchor::Start)
            .width(width)
            .lines(1)
            .below(0.0, y, config);
        y += label.text.height + 4.0;
        label
    });

    let title = LabelSpec::new(&item.title, style.label_size(), title_color)
        .bold()
        .anchor(TextAnchor::Start)
        .width(width)
        .lines(2)
        .below(0.0, y, config);
    y += title.text.height;

    let description = item
        .description
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|text| {
            y += 6.0;
            let label = LabelSpec::new(text, style.caption_size(), body_color)
                .anchor(TextAnchor::Start)
                .width(width)
                .lines(4)
                .below(0.0, y, config);
            y += label.text.height;
            label
        });

    CardText {
        icon,
        value,
        title,
        description,
        height: y,
    }
}

fn place_card(
    index: usize,
    rect: Rect,
    text: CardText,
    variant: GridItemVariant,
    accent: &str,
    style: &DiagramStyle<'_>,
) -> GridCardLayout {
    let config = style.config;
    let theme = style.theme;
    let pad = config.card_padding;
    let on_fill = fills_with_accent(variant, index);
    let number = format!("{:02}", index + 1);

    let (shape, fill, stroke) = match variant {
        GridItemVariant::Solid => (CardShape::Rounded, accent.to_string(), None),
        GridItemVariant::Leaf => (CardShape::Leaf, accent.to_string(), None),
        GridItemVariant::Outline => (
            CardShape::Rounded,
            theme.card_background.clone(),
            Some(accent.to_string()),
        ),
        GridItemVariant::Joined => (
            CardShape::Square,
            theme.card_background.clone(),
            Some(theme.border.clone()),
        ),
        GridItemVariant::Alternating if on_fill => {
            (CardShape::Rounded, accent.to_string(), None)
        }
        _ => (CardShape::Rounded, theme.card_background.clone(), None),
    };

    let marker = match variant {
        GridItemVariant::Sideline => Some(CardMarker::SideBar(Rect::new(
            rect.x, rect.y, 4.0, rect.height,
        ))),
        GridItemVariant::Topline => Some(CardMarker::TopBar(Rect::new(
            rect.x, rect.y, rect.width, 4.0,
        ))),
        GridItemVariant::TopCircle => {
            let center = Point::new(rect.x + pad + 16.0, rect.y + pad + 16.0);
            Some(CardMarker::NumberCircle {
                center,
                radius: 16.0,
                number: style
                    .on_fill(&number, style.caption_size())
                    .bold()
                    .at(center.x, center.y, config),
            })
        }
        GridItemVariant::Labeled => {
            let tab = Rect::new(rect.x, rect.y, 48.0, 24.0);
            Some(CardMarker::Tab {
                rect: tab,
                label: style
                    .on_fill(&number, style.caption_size())
                    .bold()
                    .at(tab.center().x, tab.center().y, config),
            })
        }
        GridItemVariant::Pillar => Some(CardMarker::Pillar(Rect::new(
            rect.x, rect.y, 32.0, rect.height,
        ))),
        GridItemVariant::Diamonds => Some(CardMarker::Diamond(diamond_points(
            Point::new(rect.x + pad + 10.0, rect.y + pad + 10.0),
            10.0,
            10.0,
        ))),
        GridItemVariant::Signs => {
            let center = Point::new(rect.x + pad + 12.0, rect.y + pad + 12.0);
            Some(CardMarker::Sign {
                center,
                radius: 12.0,
                glyph: style
                    .on_fill(SIGNS[index % SIGNS.len()], 16.0)
                    .bold()
                    .at(center.x, center.y, config),
            })
        }
        _ => None,
    };

    let dx = rect.x + pad + leading_inset(variant);
    let dy = rect.y + pad + header_space(variant);
    let shift = |mut label: Label| {
        label.translate(dx, dy);
        label
    };

    GridCardLayout {
        rect,
        shape,
        radius: config.card_radius,
        fill,
        stroke,
        accent: accent.to_string(),
        marker,
        icon: text.icon.map(shift),
        value: text.value.map(shift),
        title: shift(text.title),
        description: text.description.map(shift),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ColorOverrides, SemanticColor};
    use crate::theme::Theme;

    fn items(n: usize) -> Vec<GridItem> {
        (0..n)
            .map(|i| GridItem {
                title: format!("Item {i}"),
                description: Some("Short description".into()),
                ..GridItem::default()
            })
            .collect()
    }

    #[test]
    fn column_rule_follows_item_count() {
        assert_eq!(grid_columns(2, None), 2);
        assert_eq!(grid_columns(3, None), 3);
        assert_eq!(grid_columns(5, None), 3);
        assert_eq!(grid_columns(6, None), 3);
        assert_eq!(grid_columns(7, None), 4);
        assert_eq!(grid_columns(7, Some(2)), 2);
        assert_eq!(grid_columns(7, Some(0)), 4);
    }

    #[test]
    fn cards_fill_rows_and_do_not_overlap() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = GridItemContent {
            items: items(7),
            ..GridItemContent::default()
        };
        let layout = compute_grid_layout(&content, &style).unwrap();
        assert_eq!((layout.columns, layout.rows), (4, 2));
        for pair in layout.cards.windows(2) {
            if pair[0].rect.y == pair[1].rect.y {
                assert!(pair[0].rect.right() <= pair[1].rect.x);
            }
        }
        assert!(layout.cards.iter().all(|c| c.rect.bottom() <= layout.height + 0.01));
    }

    #[test]
    fn column_override_wider_than_items_keeps_card_width() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = GridItemContent {
            items: items(2),
            columns: Some(4),
            ..GridItemContent::default()
        };
        let layout = compute_grid_layout(&content, &style).unwrap();
        assert_eq!((layout.columns, layout.rows), (4, 1));
        let gap = config.grid_gap;
        let expected = (VB_W - 3.0 * gap) / 4.0;
        assert!((layout.cards[0].rect.width - expected).abs() < 1e-3);
        assert!(layout.cards[1].rect.right() < VB_W / 2.0 + gap);
    }

    #[test]
    fn every_variant_produces_cards() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        for variant in GridItemVariant::ALL {
            let content = GridItemContent {
                items: items(4),
                variant: *variant,
                ..GridItemContent::default()
            };
            let layout = compute_grid_layout(&content, &style).unwrap();
            assert_eq!(layout.cards.len(), 4, "{variant}");
            assert_eq!(layout.joined.is_some(), *variant == GridItemVariant::Joined);
        }
    }

    #[test]
    fn value_colour_maps_to_accents() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = GridItemContent {
            items: vec![GridItem {
                title: "Churn".into(),
                value: Some("-4%".into()),
                value_color: Some(SemanticColor::Negative),
                ..GridItem::default()
            }],
            variant: GridItemVariant::Outline,
            ..GridItemContent::default()
        };
        let layout = compute_grid_layout(&content, &style).unwrap();
        let value = layout.cards[0].value.as_ref().unwrap();
        assert_eq!(value.color, theme.accent_negative);
    }

    #[test]
    fn empty_grid_renders_nothing() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        assert!(compute_grid_layout(&GridItemContent::default(), &style).is_none());
    }
}
