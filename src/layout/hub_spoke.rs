use crate::ir::{HubSpokeContent, HubSpokeVariant, LabeledItem};

use super::geometry::{Ellipse, Point, VB_H, VB_W, orbit_position, truncate_label};
use super::{DiagramStyle, HaloLayout, HubNodeLayout, HubSpokeLayout, SpokeLinkLayout};

const ORBIT_RX: f32 = 260.0;
const ORBIT_RY: f32 = 185.0;
const CENTER_R: f32 = 56.0;
const SPOKE_R: f32 = 40.0;
const SPOKE_LABEL_CHARS: usize = 6;
const CENTER_LABEL_CHARS: usize = 8;

pub(super) fn compute_hub_spoke_layout(
    content: &HubSpokeContent,
    style: &DiagramStyle<'_>,
) -> Option<HubSpokeLayout> {
    let n = content.spokes.len();
    if n == 0 {
        return None;
    }
    let variant = content.variant;
    let center = Point::new(VB_W / 2.0, VB_H / 2.0);
    let palette = style.palette(n);

    let hub = node(
        &content.center,
        center,
        CENTER_R,
        &style.theme.accent_neutral,
        1.0,
        CENTER_LABEL_CHARS,
        style,
    );

    let mut spokes = Vec::with_capacity(n);
    let mut links = Vec::with_capacity(n);
    for (i, spoke) in content.spokes.iter().enumerate() {
        let pos = orbit_position(center, ORBIT_RX, ORBIT_RY, i, n);
        spokes.push(node(spoke, pos, SPOKE_R, &palette[i], 0.88, SPOKE_LABEL_CHARS, style));
        links.push(link(variant, center, pos, &palette[i], style));
    }

    let track = (variant == HubSpokeVariant::Orbit).then_some(Ellipse {
        center,
        rx: ORBIT_RX,
        ry: ORBIT_RY,
    });
    let halos = if variant == HubSpokeVariant::Solar {
        vec![
            HaloLayout {
                radius: CENTER_R + 20.0,
                opacity: 0.12,
            },
            HaloLayout {
                radius: CENTER_R + 36.0,
                opacity: 0.06,
            },
        ]
    } else {
        Vec::new()
    };

    Some(HubSpokeLayout {
        width: VB_W,
        height: VB_H,
        variant,
        track,
        track_color: style.theme.text_caption.clone(),
        halos,
        links,
        center: hub,
        spokes,
    })
}

fn node(
    item: &LabeledItem,
    center: Point,
    radius: f32,
    fill: &str,
    fill_opacity: f32,
    max_chars: usize,
    style: &DiagramStyle<'_>,
) -> HubNodeLayout {
    let config = style.config;
    let text = truncate_label(&item.label, max_chars);
    let label = style
        .on_fill(&text, style.label_size())
        .bold()
        .lines(1)
        .at(center.x, center.y, config);
    let description = item
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| {
            style
                .caption(d)
                .width(radius * 3.5)
                .lines(2)
                .below(center.x, center.y + radius + 6.0, config)
        });
    HubNodeLayout {
        center,
        radius,
        fill: fill.to_string(),
        fill_opacity,
        label,
        description,
    }
}

fn link(
    variant: HubSpokeVariant,
    center: Point,
    spoke: Point,
    color: &str,
    style: &DiagramStyle<'_>,
) -> SpokeLinkLayout {
    let distance = center.distance(spoke).max(f32::EPSILON);
    let start = center.lerp(spoke, CENTER_R / distance);
    let end = spoke.lerp(center, SPOKE_R / distance);
    match variant {
        HubSpokeVariant::Orbit => SpokeLinkLayout {
            start,
            end,
            control: None,
            color: style.theme.text_caption.clone(),
            opacity: 0.6,
            width: 1.5,
        },
        HubSpokeVariant::Solar => SpokeLinkLayout {
            start,
            end,
            control: None,
            color: color.to_string(),
            opacity: 0.3,
            width: 3.0,
        },
        HubSpokeVariant::Pinwheel => SpokeLinkLayout {
            start: center,
            end,
            control: Some(center.lerp(spoke, 0.3).offset(30.0, -30.0)),
            color: color.to_string(),
            opacity: 0.5,
            width: 2.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::ColorOverrides;
    use crate::theme::Theme;

    fn run(n: usize, variant: HubSpokeVariant) -> Option<HubSpokeLayout> {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = HubSpokeContent {
            center: LabeledItem::new("Platform core", None),
            spokes: (0..n)
                .map(|i| LabeledItem::new(format!("Service {i}"), Some("details".into())))
                .collect(),
            variant,
        };
        compute_hub_spoke_layout(&content, &style)
    }

    #[test]
    fn spokes_sit_on_the_orbit() {
        let layout = run(4, HubSpokeVariant::Orbit).unwrap();
        let top = layout.spokes[0].center;
        assert!((top.x - 400.0).abs() < 1e-3 && (top.y - (240.0 - ORBIT_RY)).abs() < 1e-3);
        let right = layout.spokes[1].center;
        assert!((right.x - (400.0 + ORBIT_RX)).abs() < 1e-3);
        assert!(layout.track.is_some());
        assert!(layout.halos.is_empty());
    }

    #[test]
    fn labels_are_truncated_but_descriptions_are_not() {
        let layout = run(3, HubSpokeVariant::Solar).unwrap();
        assert_eq!(layout.center.label.text.lines[0], "Platfor…");
        assert_eq!(layout.spokes[0].label.text.lines[0], "Servi…");
        assert_eq!(
            layout.spokes[0].description.as_ref().unwrap().text.lines[0],
            "details"
        );
        assert_eq!(layout.halos.len(), 2);
    }

    #[test]
    fn pinwheel_uses_curved_spokes() {
        let layout = run(5, HubSpokeVariant::Pinwheel).unwrap();
        assert!(layout.links.iter().all(|l| l.control.is_some()));
        assert!(layout.track.is_none());
    }

    #[test]
    fn no_spokes_renders_nothing() {
        assert!(run(0, HubSpokeVariant::Orbit).is_none());
    }
}
