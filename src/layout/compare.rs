use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{CompareContent, CompareMode, CompareSide, LabeledItem, QuadrantItem};

use super::geometry::{Point, Rect, VB_H, VB_W};
use super::text::LabelSpec;
use super::{
    CompareLayout, DiagramStyle, IcebergItemLayout, IcebergLayout, Label, QuadrantLayout,
    QuadrantPointLayout, TextAnchor, VersusColumnLayout, VersusLayout,
};

static AXIS_ARROWS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[→↑↓←…]+$").expect("valid regex"));

pub const QUADRANT_WIDTH: f32 = 820.0;
pub const QUADRANT_HEIGHT: f32 = 520.0;
const QUADRANT_PAD: f32 = 60.0;
const QUADRANT_PLOT_W: f32 = 700.0;
const QUADRANT_PLOT_H: f32 = 400.0;

const VERSUS_GAP: f32 = 32.0;
const VERSUS_MAX_COLUMNS: usize = 4;

pub(super) fn compute_compare_layout(
    content: &CompareContent,
    style: &DiagramStyle<'_>,
) -> Option<CompareLayout> {
    match content.mode {
        CompareMode::Versus => {
            let sides = content.sides.as_deref().unwrap_or_default();
            versus_layout(sides, style).map(CompareLayout::Versus)
        }
        CompareMode::Quadrant => {
            let items = content.quadrant_items.as_deref().unwrap_or_default();
            quadrant_layout(
                items,
                content.x_axis.as_deref(),
                content.y_axis.as_deref(),
                style,
            )
            .map(CompareLayout::Quadrant)
        }
        CompareMode::Iceberg => {
            let visible = content.visible.as_deref().unwrap_or_default();
            let hidden = content.hidden.as_deref().unwrap_or_default();
            iceberg_layout(visible, hidden, style).map(CompareLayout::Iceberg)
        }
    }
}

/// Axis name without trailing arrow glyphs.
pub(super) fn clean_axis_name(name: &str) -> String {
    AXIS_ARROWS.replace(name.trim(), "").trim().to_string()
}

fn versus_layout(sides: &[CompareSide], style: &DiagramStyle<'_>) -> Option<VersusLayout> {
    if sides.len() < 2 {
        return None;
    }
    let config = style.config;
    let pad = config.card_padding;
    let n = sides.len();
    let columns = n.min(VERSUS_MAX_COLUMNS);
    let col_w = (VB_W - (columns as f32 - 1.0) * VERSUS_GAP) / columns as f32;
    let inner_w = col_w - 2.0 * pad;
    let palette = style.palette(n);

    let mut out = Vec::with_capacity(n);
    let mut badges = Vec::new();
    let mut top = 0.0;

    for (row_index, chunk) in sides.chunks(columns).enumerate() {
        let mut built = Vec::with_capacity(chunk.len());
        let mut row_height: f32 = 0.0;
        for (j, side) in chunk.iter().enumerate() {
            let index = row_index * columns + j;
            let x = j as f32 * (col_w + VERSUS_GAP);
            let name = LabelSpec::new(&side.name, style.label_size() * 1.15, &palette[index])
                .bold()
                .anchor(TextAnchor::Start)
                .width(inner_w)
                .lines(2)
                .below(x + pad, top + 6.0 + pad, config);
            let mut y = name.bottom() + 12.0;
            let mut rows = Vec::with_capacity(side.items.len());
            let mut separators = Vec::with_capacity(side.items.len());
            for entry in &side.items {
                separators.push(y);
                y += 10.0;
                let label = style
                    .caption(&entry.label)
                    .anchor(TextAnchor::Start)
                    .width(inner_w * 0.55)
                    .lines(2)
                    .below(x + pad, y, config);
                let value = style
                    .title(&entry.value)
                    .anchor(TextAnchor::End)
                    .width(inner_w * 0.45)
                    .lines(2)
                    .below(x + col_w - pad, y, config);
                y += label.text.height.max(value.text.height) + 10.0;
                rows.push((label, value));
            }
            let height = y + pad - top;
            row_height = row_height.max(height);
            built.push(VersusColumnLayout {
                rect: Rect::new(x, top, col_w, height),
                header_bar: Rect::new(x, top, col_w, 6.0),
                color: palette[index].clone(),
                name,
                rows,
                separators,
            });
        }
        for column in &mut built {
            column.rect.height = row_height;
        }
        for pair in built.windows(2) {
            let cx = (pair[0].rect.right() + pair[1].rect.x) / 2.0;
            badges.push(
                LabelSpec::new("VS", style.caption_size(), &style.theme.text_caption)
                    .bold()
                    .at(cx, top + row_height / 2.0, config),
            );
        }
        out.extend(built);
        top += row_height + VERSUS_GAP;
    }

    Some(VersusLayout {
        width: VB_W,
        height: (top - VERSUS_GAP).max(1.0),
        columns: out,
        badges,
    })
}

/// Maps a 0..=100 coordinate pair into the plot, clamping out-of-range values.
pub(super) fn quadrant_point(x: f64, y: f64) -> Point {
    let x = x.clamp(0.0, 100.0) as f32;
    let y = y.clamp(0.0, 100.0) as f32;
    Point::new(
        QUADRANT_PAD + x / 100.0 * QUADRANT_PLOT_W,
        QUADRANT_PAD + QUADRANT_PLOT_H - y / 100.0 * QUADRANT_PLOT_H,
    )
}

fn quadrant_layout(
    items: &[QuadrantItem],
    x_axis: Option<&str>,
    y_axis: Option<&str>,
    style: &DiagramStyle<'_>,
) -> Option<QuadrantLayout> {
    if items.is_empty() {
        return None;
    }
    let config = style.config;
    let plot = Rect::new(QUADRANT_PAD, QUADRANT_PAD, QUADRANT_PLOT_W, QUADRANT_PLOT_H);
    let (w, h) = (QUADRANT_PLOT_W, QUADRANT_PLOT_H);
    let x_name = x_axis.map(clean_axis_name).unwrap_or_default();
    let y_name = y_axis.map(clean_axis_name).unwrap_or_default();

    let tints = style.palette(4);
    let half_w = w / 2.0;
    let half_h = h / 2.0;
    let quadrants = vec![
        (Rect::new(plot.x + half_w, plot.y, half_w, half_h), tints[0].clone()),
        (Rect::new(plot.x, plot.y, half_w, half_h), tints[1].clone()),
        (Rect::new(plot.x, plot.y + half_h, half_w, half_h), tints[2].clone()),
        (Rect::new(plot.x + half_w, plot.y + half_h, half_w, half_h), tints[3].clone()),
    ];

    let mut quadrant_labels = Vec::new();
    if !x_name.is_empty() && !y_name.is_empty() {
        let corners = [
            ("High", "High", 0.75, 0.15),
            ("Low", "High", 0.25, 0.15),
            ("Low", "Low", 0.25, 0.9),
            ("High", "Low", 0.75, 0.9),
        ];
        for (xd, yd, fx, fy) in corners {
            let text = format!("{xd} {x_name} · {yd} {y_name}");
            quadrant_labels.push(
                LabelSpec::new(&text, style.caption_size(), &style.theme.text_caption)
                    .width(half_w - 24.0)
                    .lines(1)
                    .at(plot.x + fx * w, plot.y + fy * h, config),
            );
        }
    }

    let x_label = (!x_name.is_empty()).then(|| {
        style
            .caption(&x_name)
            .bold()
            .at(plot.center().x, plot.bottom() + 28.0, config)
    });
    let y_label = (!y_name.is_empty()).then(|| {
        style
            .caption(&y_name)
            .bold()
            .anchor(TextAnchor::Start)
            .at(plot.x, plot.y - 24.0, config)
    });

    let colors = style.palette(items.len());
    let points = items
        .iter()
        .zip(colors)
        .map(|(item, color)| {
            let center = quadrant_point(item.x, item.y);
            let flip = center.x > plot.right() - 140.0;
            let (x, anchor) = if flip {
                (center.x - 14.0, TextAnchor::End)
            } else {
                (center.x + 14.0, TextAnchor::Start)
            };
            QuadrantPointLayout {
                center,
                radius: 8.0,
                label: LabelSpec::new(&item.label, style.caption_size(), &style.text)
                    .anchor(anchor)
                    .width(160.0)
                    .lines(2)
                    .at(x, center.y, config),
                color,
            }
        })
        .collect();

    Some(QuadrantLayout {
        width: QUADRANT_WIDTH,
        height: QUADRANT_HEIGHT,
        plot,
        quadrants,
        quadrant_labels,
        x_axis: x_label,
        y_axis: y_label,
        axis_color: style.theme.text_caption.clone(),
        points,
    })
}

fn iceberg_layout(
    visible: &[LabeledItem],
    hidden: &[LabeledItem],
    style: &DiagramStyle<'_>,
) -> Option<IcebergLayout> {
    if visible.is_empty() && hidden.is_empty() {
        return None;
    }
    let config = style.config;
    let visible_weight = visible.len().max(1) as f32;
    let hidden_weight = hidden.len().max(2) as f32;
    let waterline_y = VB_H * visible_weight / (visible_weight + hidden_weight);
    let cx = VB_W * 0.38;

    let tip = vec![
        Point::new(cx, 12.0),
        Point::new(cx + 110.0, waterline_y),
        Point::new(cx - 130.0, waterline_y),
    ];
    let depth = VB_H - waterline_y;
    let body = vec![
        Point::new(cx - 130.0, waterline_y),
        Point::new(cx + 110.0, waterline_y),
        Point::new(cx + 230.0, waterline_y + depth * 0.45),
        Point::new(cx + 120.0, VB_H - 8.0),
        Point::new(cx - 150.0, VB_H - 8.0),
        Point::new(cx - 250.0, waterline_y + depth * 0.5),
    ];

    let column_x = VB_W * 0.72;
    let column_w = VB_W - column_x;
    let visible_items = stack_items(visible, column_x, column_w, 12.0, waterline_y - 8.0, style);
    let hidden_items = stack_items(hidden, column_x, column_w, waterline_y + 16.0, VB_H - 8.0, style);

    let caption = |text: &str, y: f32| -> Label {
        LabelSpec::new(text, style.caption_size(), &style.theme.text_caption)
            .bold()
            .anchor(TextAnchor::Start)
            .at(8.0, y, config)
    };

    let palette = style.palette(2);
    Some(IcebergLayout {
        width: VB_W,
        height: VB_H,
        waterline_y,
        tip,
        body,
        tip_color: palette[0].clone(),
        body_color: palette[1].clone(),
        water_color: "rgba(66,165,245,0.12)".to_string(),
        visible_caption: caption("Visible", waterline_y - 14.0),
        hidden_caption: caption("Hidden", waterline_y + 16.0),
        visible: visible_items,
        hidden: hidden_items,
    })
}

fn stack_items(
    items: &[LabeledItem],
    x: f32,
    width: f32,
    top: f32,
    bottom: f32,
    style: &DiagramStyle<'_>,
) -> Vec<IcebergItemLayout> {
    if items.is_empty() {
        return Vec::new();
    }
    let config = style.config;
    let slot = ((bottom - top) / items.len() as f32).max(1.0);
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let rect = Rect::new(x, top + i as f32 * slot, width, slot);
            let label = style
                .title(&item.label)
                .anchor(TextAnchor::Start)
                .width(width)
                .lines(1)
                .below(x, rect.y + 4.0, config);
            let description = item
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty() && slot > 48.0)
                .map(|d| {
                    style
                        .caption(d)
                        .anchor(TextAnchor::Start)
                        .width(width)
                        .lines(2)
                        .below(x, label.bottom() + 2.0, config)
                });
            IcebergItemLayout {
                rect,
                label,
                description,
            }
        })
        .collect()
}
