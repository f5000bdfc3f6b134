use crate::ir::{ConcentricContent, ConcentricVariant};

use super::geometry::{Point, VB_H, VB_W, diamond_points};
use super::{ConcentricLayout, DiagramStyle, RingLayout, RingShape, TextAnchor};

pub(super) fn compute_concentric_layout(
    content: &ConcentricContent,
    style: &DiagramStyle<'_>,
) -> Option<ConcentricLayout> {
    let n = content.rings.len();
    if n == 0 {
        return None;
    }
    let config = style.config;
    let cx = VB_W * 0.4;
    let cy = VB_H / 2.0;
    let center = Point::new(cx, cy);
    let max_r = (cx - 40.0).min(cy - 30.0);
    let min_r = 0.22 * max_r;
    let label_x = cx + max_r + 30.0;
    let label_w = VB_W - label_x;
    let step = (2.0 * max_r - 24.0) / (n.saturating_sub(1)).max(1) as f32;
    let palette = style.palette(n);

    // Item 0 is the innermost ring; paint from the outside in.
    let rings = content
        .rings
        .iter()
        .enumerate()
        .rev()
        .map(|(i, ring)| {
            let t = if n == 1 {
                1.0
            } else {
                i as f32 / (n - 1) as f32
            };
            let radius = min_r + (max_r - min_r) * t;
            let shape = match content.variant {
                ConcentricVariant::Diamond => {
                    RingShape::Diamond(diamond_points(center, radius, radius))
                }
                _ => RingShape::Circle { center, radius },
            };
            let fill_opacity = match content.variant {
                ConcentricVariant::Target => 0.15 + 0.55 * t,
                _ => 0.12,
            };
            let label_y = cy - max_r + 24.0 + i as f32 * step;
            let leader_start = Point::new(
                cx + radius,
                cy - radius * 0.15 + i as f32 * radius * 0.08,
            );
            let leader_end = Point::new(label_x - 8.0, label_y - 2.0);
            let label = style
                .title(&ring.label)
                .anchor(TextAnchor::Start)
                .width(label_w)
                .lines(1)
                .at(label_x, label_y, config);
            let description = ring
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(|d| {
                    style
                        .caption(d)
                        .anchor(TextAnchor::Start)
                        .width(label_w)
                        .lines(2)
                        .below(label_x, label.bottom() + 2.0, config)
                });
            RingLayout {
                shape,
                radius,
                fill: palette[i].clone(),
                fill_opacity,
                stroke: palette[i].clone(),
                leader: (leader_start, leader_end),
                label,
                description,
            }
        })
        .collect();

    Some(ConcentricLayout {
        width: VB_W,
        height: VB_H,
        rings,
        leader_color: style.theme.text_caption.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ColorOverrides, LabeledItem};
    use crate::theme::Theme;

    fn run(n: usize, variant: ConcentricVariant) -> ConcentricLayout {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = ConcentricContent {
            rings: (0..n).map(|i| LabeledItem::new(format!("Ring {i}"), None)).collect(),
            variant,
        };
        compute_concentric_layout(&content, &style).unwrap()
    }

    #[test]
    fn radii_interpolate_from_outer_to_inner() {
        let layout = run(4, ConcentricVariant::Circles);
        let radii: Vec<_> = layout.rings.iter().map(|r| r.radius).collect();
        assert!((radii[0] - 210.0).abs() < 1e-3);
        assert!((radii[3] - 0.22 * 210.0).abs() < 1e-3);
        assert!(radii.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn single_ring_uses_full_radius() {
        let layout = run(1, ConcentricVariant::Target);
        assert!((layout.rings[0].radius - 210.0).abs() < 1e-3);
        assert!((layout.rings[0].fill_opacity - 0.7).abs() < 1e-4);
    }

    #[test]
    fn target_opacity_ramps_with_radius() {
        let layout = run(3, ConcentricVariant::Target);
        let opacities: Vec<_> = layout.rings.iter().map(|r| r.fill_opacity).collect();
        assert!((opacities[0] - 0.7).abs() < 1e-4);
        assert!((opacities[2] - 0.15).abs() < 1e-4);
        let circles = run(3, ConcentricVariant::Circles);
        assert!(circles.rings.iter().all(|r| r.fill_opacity == 0.12));
    }

    #[test]
    fn diamond_variant_emits_vertex_lists() {
        let layout = run(2, ConcentricVariant::Diamond);
        assert!(
            layout
                .rings
                .iter()
                .all(|r| matches!(&r.shape, RingShape::Diamond(points) if points.len() == 4))
        );
    }

    #[test]
    fn labels_form_a_column_right_of_the_rings() {
        let layout = run(3, ConcentricVariant::Circles);
        let x = layout.rings[0].label.x;
        assert!(layout.rings.iter().all(|r| r.label.x == x));
        assert!(layout.rings.windows(2).all(|w| w[0].label.y > w[1].label.y));
        assert!(layout.rings.iter().all(|r| r.leader.1.x < x));
    }

    #[test]
    fn no_rings_draw_nothing() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        for variant in ConcentricVariant::ALL {
            let content = ConcentricContent {
                rings: Vec::new(),
                variant: *variant,
            };
            assert!(compute_concentric_layout(&content, &style).is_none());
        }
    }
}
