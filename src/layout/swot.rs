use crate::ir::SwotContent;

use super::geometry::{Rect, VB_H, VB_W};
use super::{DiagramStyle, SwotLayout, SwotQuadrantLayout, TextAnchor};

const GAP: f32 = 12.0;
const PAD: f32 = 16.0;
const HEADING_BAND: f32 = 44.0;

const HEADINGS: [(&str, &str); 4] = [
    ("Strengths (S)", "↑"),
    ("Weaknesses (W)", "↓"),
    ("Opportunities (O)", "★"),
    ("Threats (T)", "⚠"),
];

pub(super) fn compute_swot_layout(
    content: &SwotContent,
    style: &DiagramStyle<'_>,
) -> Option<SwotLayout> {
    let groups = content.quadrants();
    if groups.iter().all(|items| items.is_empty()) {
        return None;
    }
    let config = style.config;
    let palette = style.palette(4);
    let w = (VB_W - GAP) / 2.0;
    let h = (VB_H - GAP) / 2.0;

    let quadrants = groups
        .iter()
        .zip(HEADINGS)
        .enumerate()
        .map(|(i, (items, (title, glyph)))| {
            let col = (i % 2) as f32;
            let row = (i / 2) as f32;
            let rect = Rect::new(col * (w + GAP), row * (h + GAP), w, h);
            let heading_y = rect.y + HEADING_BAND / 2.0;
            let icon = style
                .on_fill(glyph, style.label_size())
                .at(rect.x + PAD + 10.0, heading_y, config);
            let heading = style
                .on_fill(title, style.label_size())
                .bold()
                .anchor(TextAnchor::Start)
                .width(w - 3.0 * PAD - 20.0)
                .lines(1)
                .at(rect.x + PAD + 28.0, heading_y, config);

            let text_w = w - 2.0 * PAD - 12.0;
            let mut y = rect.y + HEADING_BAND + 10.0;
            let mut labels = Vec::with_capacity(items.len());
            for item in items.iter() {
                let text = match item.description.as_deref().filter(|d| !d.trim().is_empty()) {
                    Some(desc) => format!("• {}: {desc}", item.label),
                    None => format!("• {}", item.label),
                };
                let label = style
                    .caption(&text)
                    .anchor(TextAnchor::Start)
                    .width(text_w)
                    .lines(2)
                    .below(rect.x + PAD, y, config);
                if label.bottom() > rect.bottom() - PAD / 2.0 {
                    tracing::debug!(quadrant = title, "swot items overflow, truncating");
                    break;
                }
                y = label.bottom() + 6.0;
                labels.push(label);
            }

            SwotQuadrantLayout {
                rect,
                color: palette[i].clone(),
                heading,
                icon,
                items: labels,
            }
        })
        .collect();

    Some(SwotLayout {
        width: VB_W,
        height: VB_H,
        quadrants,
    })
}
