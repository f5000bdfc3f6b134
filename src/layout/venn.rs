use crate::ir::{VennContent, VennVariant};

use super::geometry::{Point, VB_H, VB_W, orbit_position};
use super::{DiagramStyle, VennCircleLayout, VennLayout};

const RADIUS: f32 = 155.0;
const LABEL_PUSH: f32 = 45.0;

/// Circle centres for `n` sets around or along `center`.
fn centers(variant: VennVariant, n: usize, center: Point) -> Vec<Point> {
    match variant {
        VennVariant::Linear | VennVariant::LinearFilled => {
            let spacing = 1.35 * RADIUS;
            let start = center.x - spacing * (n as f32 - 1.0) / 2.0;
            (0..n)
                .map(|i| Point::new(start + spacing * i as f32, center.y))
                .collect()
        }
        VennVariant::Classic => match n {
            1 => vec![center],
            2 => vec![
                center.offset(-0.48 * RADIUS, 0.0),
                center.offset(0.48 * RADIUS, 0.0),
            ],
            _ => (0..n)
                .map(|i| orbit_position(center, 0.52 * RADIUS, 0.52 * RADIUS, i, n))
                .collect(),
        },
    }
}

pub(super) fn compute_venn_layout(
    content: &VennContent,
    style: &DiagramStyle<'_>,
) -> Option<VennLayout> {
    let n = content.sets.len();
    if n == 0 {
        return None;
    }
    let config = style.config;
    let linear = content.variant != VennVariant::Classic;
    let width = if linear {
        VB_W.max((n as f32 - 1.0) * 1.35 * RADIUS + 2.0 * RADIUS + 40.0)
    } else {
        VB_W
    };
    let center = Point::new(width / 2.0, VB_H / 2.0);
    let fill_opacity = if content.variant == VennVariant::LinearFilled {
        0.32
    } else {
        0.18
    };
    let palette = style.palette(n);

    let circles = centers(content.variant, n, center)
        .into_iter()
        .zip(&content.sets)
        .enumerate()
        .map(|(i, (c, set))| {
            let anchor = if linear || n == 1 {
                c
            } else {
                let d = c.distance(center).max(f32::EPSILON);
                c.offset((c.x - center.x) / d * LABEL_PUSH, (c.y - center.y) / d * LABEL_PUSH)
            };
            let label = style
                .title(&set.label)
                .width(RADIUS * 1.2)
                .lines(2)
                .at(anchor.x, anchor.y, config);
            let description = set
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(|d| {
                    style
                        .caption(d)
                        .width(RADIUS * 1.1)
                        .lines(2)
                        .below(anchor.x, label.bottom() + 4.0, config)
                });
            VennCircleLayout {
                center: c,
                radius: RADIUS,
                color: palette[i].clone(),
                fill_opacity,
                label,
                description,
            }
        })
        .collect();

    let intersection = content
        .intersection_label
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|text| {
            super::text::LabelSpec::new(text, style.caption_size(), &style.theme.accent_neutral)
                .bold()
                .width(RADIUS * 0.8)
                .lines(2)
                .at(center.x, center.y, config)
        });

    Some(VennLayout {
        width,
        height: VB_H,
        circles,
        intersection,
    })
}
