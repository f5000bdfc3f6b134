use crate::ir::{RoadmapContent, RoadmapPhase, RoadmapStatus, RoadmapVariant};

use super::geometry::{Point, Rect, VB_H, VB_W};
use super::{DiagramStyle, RoadmapLayout, RoadmapPhaseLayout, RoadmapTaskLayout, TextAnchor};

const TRACK_Y: f32 = 56.0;
const SPINE_X: f32 = 40.0;
const TASK_GAP: f32 = 8.0;
const COLUMN_GAP: f32 = 12.0;

fn status_color(status: RoadmapStatus, phase_color: &str, style: &DiagramStyle<'_>) -> String {
    match status {
        RoadmapStatus::Done => style.theme.accent_positive.clone(),
        RoadmapStatus::Active => phase_color.to_string(),
        RoadmapStatus::Pending => style.theme.text_caption.clone(),
    }
}

/// Task rows stacked downward from `top`, marker at `x`.
fn task_rows(
    phase: &RoadmapPhase,
    color: &str,
    x: f32,
    top: f32,
    width: f32,
    style: &DiagramStyle<'_>,
) -> Vec<RoadmapTaskLayout> {
    let config = style.config;
    let mut y = top;
    phase
        .items
        .iter()
        .map(|task| {
            let label = style
                .caption(&task.label)
                .anchor(TextAnchor::Start)
                .width(width - 18.0)
                .lines(2)
                .below(x + 12.0, y, config);
            let marker = Point::new(x + 4.0, y + style.caption_size() * config.line_height / 2.0);
            y = label.bottom() + TASK_GAP;
            RoadmapTaskLayout {
                marker,
                status: task.status,
                color: status_color(task.status, color, style),
                label,
            }
        })
        .collect()
}

fn tasks_bottom(tasks: &[RoadmapTaskLayout], fallback: f32) -> f32 {
    tasks.iter().map(|t| t.label.bottom()).fold(fallback, f32::max)
}

pub(super) fn compute_roadmap_layout(
    content: &RoadmapContent,
    style: &DiagramStyle<'_>,
) -> Option<RoadmapLayout> {
    let n = content.phases.len();
    if n == 0 {
        return None;
    }
    let palette = style.palette(n);
    let layout = match content.variant {
        RoadmapVariant::Horizontal => horizontal(content, &palette, style),
        RoadmapVariant::Vertical => vertical(content, &palette, style),
        RoadmapVariant::Milestone => milestone(content, &palette, style),
    };
    Some(layout)
}

fn horizontal(content: &RoadmapContent, palette: &[String], style: &DiagramStyle<'_>) -> RoadmapLayout {
    let config = style.config;
    let n = content.phases.len();
    let col_w = VB_W / n as f32;
    let mut height: f32 = 200.0;

    let phases = content
        .phases
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            let x = i as f32 * col_w;
            let marker = Point::new(x + col_w / 2.0, TRACK_Y);
            let label = style
                .title(&phase.label)
                .width(col_w - COLUMN_GAP)
                .lines(1)
                .at(marker.x, TRACK_Y - 30.0, config);
            let card_x = x + COLUMN_GAP / 2.0;
            let card_w = col_w - COLUMN_GAP;
            let tasks = task_rows(phase, &palette[i], card_x + 10.0, TRACK_Y + 40.0, card_w - 20.0, style);
            let bottom = tasks_bottom(&tasks, TRACK_Y + 56.0) + 12.0;
            height = height.max(bottom);
            RoadmapPhaseLayout {
                rect: Rect::new(card_x, TRACK_Y + 28.0, card_w, bottom - TRACK_Y - 28.0),
                marker,
                diamond: false,
                color: palette[i].clone(),
                label,
                tasks,
            }
        })
        .collect();

    RoadmapLayout {
        width: VB_W,
        height,
        variant: RoadmapVariant::Horizontal,
        track: (Point::new(0.0, TRACK_Y), Point::new(VB_W, TRACK_Y)),
        track_color: style.theme.text_caption.clone(),
        phases,
    }
}

fn vertical(content: &RoadmapContent, palette: &[String], style: &DiagramStyle<'_>) -> RoadmapLayout {
    let config = style.config;
    let body_x = SPINE_X + 28.0;
    let body_w = VB_W - body_x;
    let mut y = 12.0;

    let phases = content
        .phases
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            let top = y;
            let label = style
                .title(&phase.label)
                .anchor(TextAnchor::Start)
                .width(body_w)
                .lines(1)
                .below(body_x, top, config);
            let marker = Point::new(SPINE_X, label.y);
            let tasks = task_rows(phase, &palette[i], body_x + 8.0, label.bottom() + 8.0, body_w - 8.0, style);
            let bottom = tasks_bottom(&tasks, label.bottom());
            y = bottom + 24.0;
            RoadmapPhaseLayout {
                rect: Rect::new(body_x - 8.0, top - 6.0, body_w + 8.0, bottom - top + 12.0),
                marker,
                diamond: false,
                color: palette[i].clone(),
                label,
                tasks,
            }
        })
        .collect::<Vec<_>>();

    let height = (y - 12.0).max(120.0);
    RoadmapLayout {
        width: VB_W,
        height,
        variant: RoadmapVariant::Vertical,
        track: (Point::new(SPINE_X, 0.0), Point::new(SPINE_X, height)),
        track_color: style.theme.text_caption.clone(),
        phases,
    }
}

/// Diamonds on a centre line; labels and tasks alternate above and below.
fn milestone(content: &RoadmapContent, palette: &[String], style: &DiagramStyle<'_>) -> RoadmapLayout {
    let config = style.config;
    let n = content.phases.len();
    let col_w = VB_W / n as f32;
    let track_y = VB_H / 2.0;

    let phases = content
        .phases
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            let marker = Point::new((i as f32 + 0.5) * col_w, track_y);
            let above = i % 2 == 0;
            let x = i as f32 * col_w + COLUMN_GAP / 2.0;
            let w = col_w - COLUMN_GAP;
            let mut label = style
                .title(&phase.label)
                .width(w)
                .lines(2)
                .below(marker.x, 0.0, config);
            let mut tasks = task_rows(phase, &palette[i], x, label.bottom() + 6.0, w, style);
            let block_h = tasks_bottom(&tasks, label.bottom());
            let top = if above {
                track_y - 24.0 - block_h
            } else {
                track_y + 24.0
            };
            label.translate(0.0, top);
            for task in &mut tasks {
                task.marker = task.marker.offset(0.0, top);
                task.label.translate(0.0, top);
            }
            RoadmapPhaseLayout {
                rect: Rect::new(x, top, w, block_h),
                marker,
                diamond: true,
                color: palette[i].clone(),
                label,
                tasks,
            }
        })
        .collect();

    RoadmapLayout {
        width: VB_W,
        height: VB_H,
        variant: RoadmapVariant::Milestone,
        track: (Point::new(0.0, track_y), Point::new(VB_W, track_y)),
        track_color: style.theme.text_caption.clone(),
        phases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ColorOverrides, RoadmapTask};
    use crate::theme::Theme;

    fn content(variant: RoadmapVariant) -> RoadmapContent {
        let task = |label: &str, status| RoadmapTask {
            label: label.into(),
            status,
        };
        RoadmapContent {
            phases: vec![
                RoadmapPhase {
                    label: "Q1".into(),
                    items: vec![task("Research", RoadmapStatus::Done), task("Design", RoadmapStatus::Active)],
                },
                RoadmapPhase {
                    label: "Q2".into(),
                    items: vec![task("Build", RoadmapStatus::Pending)],
                },
                RoadmapPhase {
                    label: "Q3".into(),
                    items: Vec::new(),
                },
            ],
            variant,
        }
    }

    fn run(content: &RoadmapContent) -> Option<RoadmapLayout> {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        compute_roadmap_layout(content, &style)
    }

    #[test]
    fn status_colours_follow_the_theme() {
        let theme = Theme::swiss();
        let layout = run(&content(RoadmapVariant::Horizontal)).unwrap();
        let q1 = &layout.phases[0];
        assert_eq!(q1.tasks[0].color, theme.accent_positive);
        assert_eq!(q1.tasks[1].color, q1.color);
        assert_eq!(layout.phases[1].tasks[0].color, theme.text_caption);
    }

    #[test]
    fn horizontal_phases_sit_on_the_track() {
        let layout = run(&content(RoadmapVariant::Horizontal)).unwrap();
        assert!(layout.phases.iter().all(|p| p.marker.y == TRACK_Y && !p.diamond));
        assert!(layout.phases.windows(2).all(|w| w[0].marker.x < w[1].marker.x));
    }

    #[test]
    fn vertical_phases_flow_down_the_spine() {
        let layout = run(&content(RoadmapVariant::Vertical)).unwrap();
        assert!(layout.phases.iter().all(|p| p.marker.x == SPINE_X));
        assert!(layout.phases.windows(2).all(|w| w[0].rect.bottom() < w[1].rect.y));
        assert!(layout.track.1.y >= layout.phases[2].rect.bottom() - 1.0);
    }

    #[test]
    fn milestones_alternate_around_the_line() {
        let layout = run(&content(RoadmapVariant::Milestone)).unwrap();
        let track_y = layout.track.0.y;
        assert!(layout.phases.iter().all(|p| p.diamond));
        assert!(layout.phases[0].rect.bottom() < track_y);
        assert!(layout.phases[1].rect.y > track_y);
        assert!(layout.phases[2].rect.bottom() < track_y);
        let task = &layout.phases[0].tasks[0];
        assert!(task.label.y < track_y);
    }

    #[test]
    fn no_phases_renders_nothing() {
        assert!(run(&RoadmapContent::default()).is_none());
    }
}
