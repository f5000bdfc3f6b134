use std::f32::consts::PI;

use crate::ir::{CycleContent, CycleVariant};

use super::geometry::{
    Ellipse, Point, VB_H, VB_W, arc_connectors, node_radius, orbit_position, polar,
    truncate_label,
};
use super::{CycleLayout, CycleNodeLayout, DiagramStyle};

const GEAR_TEETH: usize = 8;

/// Outline of a gear with `GEAR_TEETH` teeth around `center`.
fn gear_points(center: Point, radius: f32) -> Vec<Point> {
    let inner = radius - 3.0;
    let outer = radius + 5.0;
    let half = PI / GEAR_TEETH as f32;
    (0..GEAR_TEETH)
        .flat_map(|tooth| {
            let a0 = 2.0 * half * tooth as f32;
            [
                polar(center, inner, a0),
                polar(center, outer, a0 + 0.4 * half),
                polar(center, outer, a0 + 0.6 * half),
                polar(center, inner, a0 + half),
            ]
        })
        .collect()
}

pub(super) fn compute_cycle_layout(
    content: &CycleContent,
    style: &DiagramStyle<'_>,
) -> Option<CycleLayout> {
    let n = content.steps.len();
    if n == 0 {
        return None;
    }
    let config = style.config;
    let variant = content.variant;
    let center = Point::new(VB_W / 2.0, VB_H / 2.0);

    let (rx, ry, radius) = match variant {
        CycleVariant::Circular => {
            let r = (center.x - 110.0).min(center.y - 70.0);
            (r, r, node_radius(n, 46.0, 3.0, 26.0))
        }
        CycleVariant::Gear => {
            let r = (center.x - 110.0).min(center.y - 70.0);
            (r, r, node_radius(n, 48.0, 3.0, 28.0))
        }
        CycleVariant::Loop => (
            (center.x - 80.0).min(280.0),
            (center.y - 60.0).min(150.0),
            node_radius(n, 38.0, 2.0, 22.0),
        ),
    };
    let max_chars = match variant {
        CycleVariant::Loop => (radius / 4.0).floor() as usize,
        _ => (radius / 5.0).floor() as usize,
    };
    // Teeth stick out past the body, so connectors keep clear of them.
    let clearance = match variant {
        CycleVariant::Gear => radius + 5.0,
        _ => radius,
    };

    let palette = style.palette(n);
    let positions: Vec<Point> = (0..n)
        .map(|i| orbit_position(center, rx, ry, i, n))
        .collect();

    let nodes = positions
        .iter()
        .zip(&content.steps)
        .enumerate()
        .map(|(i, (&pos, step))| {
            let text = truncate_label(&step.label, max_chars.max(1));
            let label = style
                .on_fill(&text, style.caption_size())
                .bold()
                .lines(1)
                .at(pos.x, pos.y, config);
            let description = step
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(|d| {
                    style
                        .caption(d)
                        .width(130.0)
                        .lines(2)
                        .below(pos.x, pos.y + clearance + 6.0, config)
                });
            CycleNodeLayout {
                center: pos,
                radius,
                color: palette[i].clone(),
                gear: (variant == CycleVariant::Gear).then(|| gear_points(pos, radius)),
                label,
                description,
            }
        })
        .collect();

    Some(CycleLayout {
        width: VB_W,
        height: VB_H,
        variant,
        track: (variant == CycleVariant::Loop).then_some(Ellipse { center, rx, ry }),
        nodes,
        connectors: arc_connectors(&positions, center, rx, ry, clearance),
        connector_color: style.theme.text_caption.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ColorOverrides, LabeledItem};
    use crate::theme::Theme;

    fn run(n: usize, variant: CycleVariant) -> Option<CycleLayout> {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = CycleContent {
            steps: (0..n)
                .map(|i| LabeledItem::new(format!("Iteration {i}"), Some("a longer description".into())))
                .collect(),
            variant,
        };
        compute_cycle_layout(&content, &style)
    }

    #[test]
    fn circular_nodes_shrink_with_count() {
        let four = run(4, CycleVariant::Circular).unwrap();
        assert_eq!(four.nodes[0].radius, 34.0);
        let ten = run(10, CycleVariant::Circular).unwrap();
        assert_eq!(ten.nodes[0].radius, 26.0);
        assert_eq!(four.connectors.len(), 4);
        let top = four.nodes[0].center;
        assert!((top.y - 70.0).abs() < 1e-3);
    }

    #[test]
    fn gear_nodes_carry_teeth() {
        let layout = run(4, CycleVariant::Gear).unwrap();
        let gear = layout.nodes[0].gear.as_ref().unwrap();
        assert_eq!(gear.len(), GEAR_TEETH * 4);
        let c = layout.nodes[0].center;
        let max = gear.iter().map(|p| p.distance(c)).fold(0.0, f32::max);
        assert!((max - (layout.nodes[0].radius + 5.0)).abs() < 1e-3);
    }

    #[test]
    fn loop_uses_an_elliptical_track() {
        let layout = run(5, CycleVariant::Loop).unwrap();
        let track = layout.track.unwrap();
        assert_eq!((track.rx, track.ry), (280.0, 150.0));
        assert_eq!(layout.nodes[0].radius, 28.0);
        // floor(28 / 4) = 7 characters, ellipsis included.
        assert_eq!(layout.nodes[0].label.text.lines[0], "Iterat…");
        assert_eq!(
            layout.nodes[0].description.as_ref().unwrap().text.lines[0],
            "a longer description"
        );
    }

    #[test]
    fn single_step_has_no_connectors() {
        let layout = run(1, CycleVariant::Circular).unwrap();
        assert!(layout.connectors.is_empty());
        assert!(run(0, CycleVariant::Gear).is_none());
    }
}
