use crate::ir::{Direction, LabeledItem, SequenceContent, SequenceVariant};

use super::geometry::{Point, Rect, VB_W};
use super::text::LabelSpec;
use super::{
    ConnectorKind, ConnectorLayout, DiagramStyle, Label, SequenceLayout, SequenceStepLayout,
    StepShape, TextAnchor,
};

const CONNECTOR_SIZE: f32 = 24.0;
const ARROW_DEPTH: f32 = 16.0;
const ZIGZAG_OFFSET: f32 = 24.0;
const MARKER_RADIUS: f32 = 8.0;
const MARKER_BAND: f32 = 36.0;
const BADGE_RADIUS: f32 = 14.0;

pub(super) fn connector_kind(variant: SequenceVariant) -> Option<ConnectorKind> {
    match variant {
        SequenceVariant::Pills => Some(ConnectorKind::Dot),
        SequenceVariant::Numbered => Some(ConnectorKind::Dashed),
        SequenceVariant::Timeline | SequenceVariant::Chain | SequenceVariant::Arrows => {
            Some(ConnectorKind::Arrow)
        }
        SequenceVariant::RibbonArrows | SequenceVariant::Zigzag => None,
    }
}

struct StepText {
    label: Label,
    description: Option<Label>,
    height: f32,
}

pub(super) fn compute_sequence_layout(
    content: &SequenceContent,
    style: &DiagramStyle<'_>,
) -> Option<SequenceLayout> {
    let n = content.steps.len();
    if n == 0 {
        return None;
    }
    let variant = content.variant;
    let direction = content.direction.unwrap_or_default();
    let config = style.config;
    let pad = config.card_padding;
    let gap = match variant {
        SequenceVariant::RibbonArrows => 0.0,
        _ => content.gap.unwrap_or(config.sequence_gap),
    };
    let kind = connector_kind(variant);
    let palette = style.palette(n);

    // Distance between consecutive steps along the flow.
    let spacing = match (variant, kind) {
        (SequenceVariant::RibbonArrows, _) => -ARROW_DEPTH / 2.0,
        (_, Some(_)) => 2.0 * gap + CONNECTOR_SIZE,
        (_, None) => gap,
    };
    let on_fill = matches!(
        variant,
        SequenceVariant::Arrows | SequenceVariant::Pills | SequenceVariant::RibbonArrows
    );
    let centred = direction == Direction::Horizontal || variant == SequenceVariant::Pills;
    let badge_space = if variant == SequenceVariant::Numbered {
        2.0 * BADGE_RADIUS + 8.0
    } else {
        0.0
    };
    let marker = variant == SequenceVariant::Timeline;

    let (main_total, text_width) = match direction {
        Direction::Horizontal => {
            let step_w = (VB_W - (n as f32 - 1.0) * spacing) / n as f32;
            let inset = if variant == SequenceVariant::RibbonArrows {
                ARROW_DEPTH * 2.0
            } else {
                2.0 * pad
            };
            (step_w, (step_w - inset).max(24.0))
        }
        Direction::Vertical => {
            let lead = if marker { MARKER_BAND + 12.0 } else { 2.0 * pad };
            (0.0, VB_W - lead)
        }
    };

    let texts: Vec<StepText> = content
        .steps
        .iter()
        .map(|step| step_text(step, text_width, on_fill, centred, style))
        .collect();

    let min_cross = match variant {
        SequenceVariant::Pills => 48.0,
        SequenceVariant::Timeline => 32.0,
        _ => 72.0,
    };
    let vertical_pad = if marker { 0.0 } else { pad };
    let content_h = texts.iter().map(|t| t.height).fold(0.0, f32::max);
    let card_cross = (content_h + 2.0 * vertical_pad + badge_space).max(min_cross);
    let zigzag = variant == SequenceVariant::Zigzag;

    let mut steps = Vec::with_capacity(n);
    let mut rects = Vec::with_capacity(n);
    let (width, height);

    match direction {
        Direction::Horizontal => {
            let step_w = main_total;
            let top = if marker { MARKER_BAND } else { 0.0 };
            for i in 0..n {
                let offset = if zigzag && i % 2 == 1 { ZIGZAG_OFFSET } else { 0.0 };
                rects.push(Rect::new(
                    i as f32 * (step_w + spacing),
                    top + offset,
                    step_w,
                    card_cross,
                ));
            }
            width = VB_W;
            height = top + card_cross + if zigzag && n > 1 { ZIGZAG_OFFSET } else { 0.0 };
        }
        Direction::Vertical => {
            let lead = if marker { MARKER_BAND } else { 0.0 };
            let mut y = 0.0;
            for (i, text) in texts.iter().enumerate() {
                let offset = if zigzag && i % 2 == 1 { ZIGZAG_OFFSET } else { 0.0 };
                let cross = if marker {
                    text.height.max(min_cross)
                } else {
                    (text.height + 2.0 * pad + badge_space).max(min_cross)
                };
                let w = VB_W - lead - if zigzag { ZIGZAG_OFFSET } else { 0.0 };
                rects.push(Rect::new(lead + offset, y, w, cross));
                y += cross + spacing;
            }
            width = VB_W;
            height = (y - spacing).max(1.0);
        }
    }

    for (i, (text, rect)) in texts.into_iter().zip(rects.iter().copied()).enumerate() {
        let color = &palette[i];
        let shape = step_shape(variant, direction, rect, i, n, style);
        let (fill, stroke) = match variant {
            SequenceVariant::Arrows | SequenceVariant::Pills | SequenceVariant::RibbonArrows => {
                (color.clone(), None)
            }
            SequenceVariant::Timeline => (color.clone(), None),
            SequenceVariant::Chain | SequenceVariant::Zigzag => {
                (style.theme.card_background.clone(), Some(color.clone()))
            }
            SequenceVariant::Numbered => (style.theme.card_background.clone(), None),
        };
        let badge = (variant == SequenceVariant::Numbered).then(|| {
            let number = (i + 1).to_string();
            style
                .on_fill(&number, style.caption_size())
                .bold()
                .at(
                    rect.x + pad + BADGE_RADIUS,
                    rect.y + pad + BADGE_RADIUS,
                    config,
                )
        });

        let (dx, dy) = text_origin(variant, direction, rect, &text, pad, badge_space, centred);
        let shift = |mut label: Label| {
            label.translate(dx, dy);
            label
        };
        steps.push(SequenceStepLayout {
            rect,
            shape,
            fill,
            stroke,
            badge,
            label: shift(text.label),
            description: text.description.map(shift),
        });
    }

    let connector_color = style.theme.text_caption.clone();
    let connectors = match kind {
        Some(kind) => rects
            .windows(2)
            .map(|pair| connector_between(pair[0], pair[1], direction, gap, marker))
            .map(|(from, to)| ConnectorLayout {
                from,
                to,
                kind,
                color: connector_color.clone(),
            })
            .collect(),
        None => Vec::new(),
    };

    let track = marker.then(|| match direction {
        Direction::Horizontal => (
            Point::new(0.0, MARKER_BAND / 2.0),
            Point::new(width, MARKER_BAND / 2.0),
        ),
        Direction::Vertical => (
            Point::new(MARKER_BAND / 2.0, 0.0),
            Point::new(MARKER_BAND / 2.0, height),
        ),
    });

    Some(SequenceLayout {
        width,
        height,
        variant,
        direction,
        track,
        steps,
        connectors,
    })
}

fn step_text(
    step: &LabeledItem,
    width: f32,
    on_fill: bool,
    centred: bool,
    style: &DiagramStyle<'_>,
) -> StepText {
    let config = style.config;
    let anchor = if centred {
        TextAnchor::Middle
    } else {
        TextAnchor::Start
    };
    let (title_color, body_color) = if on_fill {
        ("#FFFFFF", "#FFFFFF")
    } else {
        (style.text.as_str(), style.muted.as_str())
    };
    let label = LabelSpec::new(&step.label, style.label_size(), title_color)
        .bold()
        .anchor(anchor)
        .width(width)
        .lines(2)
        .below(0.0, 0.0, config);
    let mut height = label.text.height;
    let description = step
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| {
            let label = LabelSpec::new(d, style.caption_size(), body_color)
                .anchor(anchor)
                .width(width)
                .lines(3)
                .below(0.0, height + 4.0, config);
            height += 4.0 + label.text.height;
            label
        });
    StepText {
        label,
        description,
        height,
    }
}

fn step_shape(
    variant: SequenceVariant,
    direction: Direction,
    rect: Rect,
    index: usize,
    n: usize,
    style: &DiagramStyle<'_>,
) -> StepShape {
    match variant {
        SequenceVariant::Pills => StepShape::Pill,
        SequenceVariant::RibbonArrows => StepShape::Chevron(chevron(rect, index, n, direction)),
        SequenceVariant::Timeline => {
            let center = match direction {
                Direction::Horizontal => Point::new(rect.center().x, MARKER_BAND / 2.0),
                Direction::Vertical => Point::new(MARKER_BAND / 2.0, rect.center().y),
            };
            StepShape::Marker {
                center,
                radius: MARKER_RADIUS,
            }
        }
        _ => StepShape::Card {
            radius: style.config.card_radius,
        },
    }
}

/// Chevron outline for ribbon steps: the first has a flat tail, the last a
/// flat head, and a single step is a plain rectangle.
pub(super) fn chevron(rect: Rect, index: usize, n: usize, direction: Direction) -> Vec<Point> {
    let d = ARROW_DEPTH;
    let first = index == 0;
    let last = index + 1 == n;
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    let mut points = Vec::with_capacity(6);
    match direction {
        Direction::Horizontal => {
            let cy = y + h / 2.0;
            points.push(Point::new(x, y));
            if last {
                points.push(Point::new(x + w, y));
                points.push(Point::new(x + w, y + h));
            } else {
                points.push(Point::new(x + w - d, y));
                points.push(Point::new(x + w, cy));
                points.push(Point::new(x + w - d, y + h));
            }
            points.push(Point::new(x, y + h));
            if !first {
                points.push(Point::new(x + d, cy));
            }
        }
        Direction::Vertical => {
            let cx = x + w / 2.0;
            points.push(Point::new(x, y));
            if !first {
                points.push(Point::new(cx, y + d));
            }
            points.push(Point::new(x + w, y));
            if last {
                points.push(Point::new(x + w, y + h));
                points.push(Point::new(x, y + h));
            } else {
                points.push(Point::new(x + w, y + h - d));
                points.push(Point::new(cx, y + h));
                points.push(Point::new(x, y + h - d));
            }
        }
    }
    points
}

fn text_origin(
    variant: SequenceVariant,
    direction: Direction,
    rect: Rect,
    text: &StepText,
    pad: f32,
    badge_space: f32,
    centred: bool,
) -> (f32, f32) {
    if variant == SequenceVariant::Timeline {
        return match direction {
            Direction::Horizontal => (rect.center().x, rect.y),
            Direction::Vertical => (rect.x + 12.0, rect.center().y - text.height / 2.0),
        };
    }
    let x = if centred {
        rect.center().x
    } else {
        rect.x + pad
    };
    let top = if badge_space > 0.0 {
        rect.y + pad + badge_space
    } else {
        rect.y + (rect.height - text.height) / 2.0
    };
    (x, top)
}

fn connector_between(
    a: Rect,
    b: Rect,
    direction: Direction,
    gap: f32,
    marker: bool,
) -> (Point, Point) {
    match direction {
        Direction::Horizontal => {
            let y = if marker {
                MARKER_BAND / 2.0
            } else {
                (a.center().y + b.center().y) / 2.0
            };
            let start = a.right() + gap;
            (Point::new(start, y), Point::new(start + CONNECTOR_SIZE, y))
        }
        Direction::Vertical => {
            let x = if marker {
                MARKER_BAND / 2.0
            } else {
                (a.center().x + b.center().x) / 2.0
            };
            let start = a.bottom() + gap;
            (Point::new(x, start), Point::new(x, start + CONNECTOR_SIZE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::ColorOverrides;
    use crate::theme::Theme;

    fn content(n: usize, variant: SequenceVariant, direction: Direction) -> SequenceContent {
        SequenceContent {
            steps: (0..n)
                .map(|i| LabeledItem::new(format!("Step {}", i + 1), Some("detail".into())))
                .collect(),
            variant,
            direction: Some(direction),
            gap: None,
        }
    }

    fn run(content: &SequenceContent) -> SequenceLayout {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        compute_sequence_layout(content, &style).unwrap()
    }

    #[test]
    fn connectors_only_for_flow_variants() {
        for variant in SequenceVariant::ALL {
            let layout = run(&content(4, *variant, Direction::Horizontal));
            let expected = if connector_kind(*variant).is_some() { 3 } else { 0 };
            assert_eq!(layout.connectors.len(), expected, "{variant}");
        }
    }

    #[test]
    fn connector_kinds_match_variant() {
        assert_eq!(connector_kind(SequenceVariant::Pills), Some(ConnectorKind::Dot));
        assert_eq!(
            connector_kind(SequenceVariant::Numbered),
            Some(ConnectorKind::Dashed)
        );
        assert_eq!(connector_kind(SequenceVariant::Chain), Some(ConnectorKind::Arrow));
        assert_eq!(connector_kind(SequenceVariant::Zigzag), None);
    }

    #[test]
    fn ribbon_chevrons_overlap_and_shape_ends() {
        let layout = run(&content(3, SequenceVariant::RibbonArrows, Direction::Horizontal));
        let rects: Vec<_> = layout.steps.iter().map(|s| s.rect).collect();
        assert!(rects[0].right() > rects[1].x);
        assert!((rects[2].right() - VB_W).abs() < 0.01);
        let counts: Vec<_> = layout
            .steps
            .iter()
            .map(|s| match &s.shape {
                StepShape::Chevron(points) => points.len(),
                _ => 0,
            })
            .collect();
        assert_eq!(counts, vec![5, 6, 5]);
    }

    #[test]
    fn zigzag_alternates_offset() {
        let layout = run(&content(4, SequenceVariant::Zigzag, Direction::Horizontal));
        let ys: Vec<_> = layout.steps.iter().map(|s| s.rect.y).collect();
        assert_eq!(ys[0], ys[2]);
        assert_eq!(ys[1] - ys[0], ZIGZAG_OFFSET);
    }

    #[test]
    fn vertical_steps_stack_downwards() {
        let layout = run(&content(3, SequenceVariant::Chain, Direction::Vertical));
        for pair in layout.steps.windows(2) {
            assert!(pair[0].rect.bottom() < pair[1].rect.y);
        }
        let c = &layout.connectors[0];
        assert_eq!(c.from.x, c.to.x);
    }

    #[test]
    fn timeline_places_markers_on_track() {
        let layout = run(&content(3, SequenceVariant::Timeline, Direction::Horizontal));
        let (start, end) = layout.track.unwrap();
        assert_eq!(start.y, end.y);
        for step in &layout.steps {
            match step.shape {
                StepShape::Marker { center, .. } => assert_eq!(center.y, start.y),
                _ => panic!("timeline step should be a marker"),
            }
        }
    }

    #[test]
    fn no_steps_draw_nothing() {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        for variant in SequenceVariant::ALL {
            for direction in [Direction::Horizontal, Direction::Vertical] {
                assert!(compute_sequence_layout(&content(0, *variant, direction), &style).is_none());
            }
        }
    }
}
