use crate::ir::{FunnelContent, FunnelVariant};

use super::geometry::{Point, Rect, VB_W};
use super::{DiagramStyle, FunnelClip, FunnelLayerLayout, FunnelLayout, TextAnchor};

const MAX_INSET: f32 = 30.0;
const MIN_LAYER_HEIGHT: f32 = 48.0;
const LAYER_GAP: f32 = 4.0;

/// Horizontal extents of layer `i` of `n`, in percent of the diagram width.
///
/// Consecutive layers share an edge: the bottom of layer `i` equals the top of
/// layer `i + 1`.
pub fn funnel_clip(variant: FunnelVariant, i: usize, n: usize) -> FunnelClip {
    let n = n.max(1);
    let i = i as f32;
    let nf = n as f32;
    match variant {
        FunnelVariant::Funnel => {
            let top = i / nf * MAX_INSET;
            let bottom = (i + 1.0) / nf * MAX_INSET;
            FunnelClip {
                top_left: top,
                top_right: 100.0 - top,
                bottom_right: 100.0 - bottom,
                bottom_left: bottom,
            }
        }
        FunnelVariant::Pyramid => {
            let top = (nf - i) / nf * MAX_INSET;
            let bottom = (nf - i - 1.0) / nf * MAX_INSET;
            FunnelClip {
                top_left: top,
                top_right: 100.0 - top,
                bottom_right: 100.0 - bottom,
                bottom_left: bottom,
            }
        }
        FunnelVariant::Slope => {
            let span = (nf - 1.0).max(1.0);
            FunnelClip {
                top_left: 0.0,
                top_right: (40.0 + i / span * 60.0).min(100.0),
                bottom_right: (40.0 + (i + 1.0) / span * 60.0).min(100.0),
                bottom_left: 0.0,
            }
        }
    }
}

fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}

pub(super) fn compute_funnel_layout(
    content: &FunnelContent,
    style: &DiagramStyle<'_>,
) -> Option<FunnelLayout> {
    let n = content.layers.len();
    if n == 0 {
        return None;
    }
    let config = style.config;
    let palette = style.palette(n);
    let body_w = VB_W * 0.6;
    let side_x = body_w + 24.0;
    let side_w = VB_W - side_x;

    let mut layers = Vec::with_capacity(n);
    let mut y = 0.0;
    for (i, layer) in content.layers.iter().enumerate() {
        let description = layer
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| {
                style
                    .caption(d)
                    .anchor(TextAnchor::Start)
                    .width(side_w)
                    .lines(3)
                    .at(side_x, 0.0, config)
            });
        let desc_h = description.as_ref().map(|d| d.text.height).unwrap_or(0.0);
        let height = (desc_h + 16.0).max(MIN_LAYER_HEIGHT);
        let rect = Rect::new(0.0, y, body_w, height);
        let clip = funnel_clip(content.variant, i, n);
        let polygon = vec![
            Point::new(rect.x + rect.width * clip.top_left / 100.0, rect.y),
            Point::new(rect.x + rect.width * clip.top_right / 100.0, rect.y),
            Point::new(rect.x + rect.width * clip.bottom_right / 100.0, rect.bottom()),
            Point::new(rect.x + rect.width * clip.bottom_left / 100.0, rect.bottom()),
        ];
        let left = clip.top_left.max(clip.bottom_left);
        let right = clip.top_right.min(clip.bottom_right);
        let mid_x = rect.x + rect.width * (left + right) / 200.0;
        let label_w = (rect.width * (right - left) / 100.0 - 16.0).max(40.0);

        let value = layer.value.map(|v| {
            style
                .on_fill(&format_value(v), style.caption_size())
                .at(mid_x, rect.center().y + 10.0, config)
        });
        let label_y = if value.is_some() {
            rect.center().y - 8.0
        } else {
            rect.center().y
        };
        let label = style
            .on_fill(&layer.label, style.label_size())
            .bold()
            .width(label_w)
            .lines(1)
            .at(mid_x, label_y, config);
        let description = description.map(|mut d| {
            d.y = rect.center().y;
            d
        });

        layers.push(FunnelLayerLayout {
            rect,
            clip,
            polygon,
            color: palette[i].clone(),
            label,
            description,
            value,
        });
        y += height + LAYER_GAP;
    }

    Some(FunnelLayout {
        width: VB_W,
        height: (y - LAYER_GAP).max(1.0),
        layers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ColorOverrides, FunnelLayer};
    use crate::theme::Theme;

    #[test]
    fn consecutive_layers_tile() {
        for variant in FunnelVariant::ALL {
            for n in 1usize..8 {
                for i in 0..n.saturating_sub(1) {
                    let a = funnel_clip(*variant, i, n);
                    let b = funnel_clip(*variant, i + 1, n);
                    assert!((a.bottom_left - b.top_left).abs() < 1e-4, "{variant} {i}/{n}");
                    assert!((a.bottom_right - b.top_right).abs() < 1e-4, "{variant} {i}/{n}");
                }
            }
        }
    }

    #[test]
    fn funnel_narrows_and_pyramid_widens() {
        let first = funnel_clip(FunnelVariant::Funnel, 0, 3);
        assert_eq!(first.top_left, 0.0);
        let last = funnel_clip(FunnelVariant::Funnel, 2, 3);
        assert!((last.bottom_left - 30.0).abs() < 1e-4);

        let apex = funnel_clip(FunnelVariant::Pyramid, 0, 3);
        assert!((apex.top_left - 30.0).abs() < 1e-4);
        let base = funnel_clip(FunnelVariant::Pyramid, 2, 3);
        assert_eq!(base.bottom_left, 0.0);
    }

    #[test]
    fn slope_right_edge_is_clamped() {
        let clip = funnel_clip(FunnelVariant::Slope, 2, 3);
        assert_eq!(clip.top_left, 0.0);
        assert_eq!(clip.top_right, 100.0);
        assert_eq!(clip.bottom_right, 100.0);
        let single = funnel_clip(FunnelVariant::Slope, 0, 1);
        assert_eq!(single.top_right, 40.0);
        assert_eq!(single.bottom_right, 100.0);
    }

    #[test]
    fn layers_stack_with_minimum_height() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        let content = FunnelContent {
            layers: (0..3)
                .map(|i| FunnelLayer {
                    label: format!("Stage {i}"),
                    description: None,
                    value: Some(1000.0 / (i + 1) as f64),
                })
                .collect(),
            variant: FunnelVariant::Funnel,
        };
        let layout = compute_funnel_layout(&content, &style).unwrap();
        assert_eq!(layout.layers.len(), 3);
        for pair in layout.layers.windows(2) {
            assert!((pair[1].rect.y - pair[0].rect.bottom() - LAYER_GAP).abs() < 1e-3);
        }
        assert!(layout.layers.iter().all(|l| l.rect.height >= MIN_LAYER_HEIGHT));
        assert_eq!(layout.layers[0].value.as_ref().unwrap().text.lines[0], "1000");
    }
}
