use std::f32::consts::{PI, TAU};

use crate::ir::{ChartContent, ChartType, TreeNode};

use super::super::geometry::{Point, polar};
use super::super::text::LabelSpec;
use super::super::{ChartLayout, ChartMark, DiagramStyle, Label, TextAnchor};
use super::{Canvas, Margins, format_number, percent};

const DONUT_HOLE: f64 = 0.55;
const GAUGE_SWEEP: f32 = 0.75 * PI;
const RADAR_LEVELS: usize = 4;
const SUNBURST_DEPTH: usize = 3;

/// `innerRadius` arrives either as a percentage (`40`) or a fraction (`0.4`).
fn hole_fraction(content: &ChartContent) -> f32 {
    let raw = match content.chart_type {
        ChartType::Donut => content.inner_radius.unwrap_or(DONUT_HOLE),
        _ => content.inner_radius.unwrap_or(0.0),
    };
    let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
    fraction.clamp(0.0, 0.9) as f32
}

fn anchor_for(point: Point, center: Point) -> TextAnchor {
    if (point.x - center.x).abs() < 4.0 {
        TextAnchor::Middle
    } else if point.x > center.x {
        TextAnchor::Start
    } else {
        TextAnchor::End
    }
}

/// Pie, donut and rose. Angles run clockwise from twelve o'clock; a rose
/// keeps equal sectors and scales each radius by its value.
pub(super) fn pie(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let slices: Vec<_> = content
        .slices
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|s| s.value > 0.0)
        .collect();
    if slices.is_empty() {
        return None;
    }
    let total: f64 = slices.iter().map(|s| s.value).sum();
    let max = slices.iter().map(|s| s.value).fold(0.0, f64::max);
    let palette = style.chart_palette(slices.len());
    let mut canvas = Canvas::new(style, content.chart_type, height, Margins::OPEN, true);
    let plot = canvas.plot;
    let center = plot.center();
    let radius = (plot.width.min(plot.height) / 2.0 - 28.0).max(20.0);
    let inner = radius * hole_fraction(content);
    let rose = content.chart_type == ChartType::Rose;

    let mut start = 0.0f32;
    for (i, slice) in slices.iter().enumerate() {
        let (sweep, outer) = if rose {
            let scale = 0.3 + 0.7 * (slice.value / max) as f32;
            (TAU / slices.len() as f32, inner + (radius - inner) * scale)
        } else {
            ((slice.value / total) as f32 * TAU, radius)
        };
        let end = start + sweep;
        canvas.push(ChartMark::Arc {
            center,
            inner_radius: inner,
            outer_radius: outer,
            start_angle: start,
            end_angle: end,
            fill: palette[i].clone(),
        });
        let mid = start + sweep / 2.0;
        let at = polar(center, outer + 14.0, mid);
        let text = format!("{} {}", slice.name, percent(slice.value, total));
        canvas.caption(&text, at.x, at.y, anchor_for(at, center));
        start = end;
    }
    let entries: Vec<(String, String)> = slices
        .iter()
        .zip(&palette)
        .map(|(s, c)| (s.name.clone(), c.clone()))
        .collect();
    canvas.legend(&entries);
    Some(canvas.finish())
}

pub(super) fn radar(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let indicators = content.indicators.as_deref().filter(|i| i.len() >= 3)?;
    let series = content.radar_series.as_deref().unwrap_or_default();
    let n = indicators.len();
    let palette = style.chart_palette(series.len().max(1));
    let mut canvas = Canvas::new(style, ChartType::Radar, height, Margins::OPEN, series.len() > 1);
    let plot = canvas.plot;
    let center = plot.center();
    let radius = (plot.width.min(plot.height) / 2.0 - 32.0).max(20.0);
    let angle = |k: usize| k as f32 * TAU / n as f32;
    let grid = style.theme.border.clone();

    for level in 1..=RADAR_LEVELS {
        let r = radius * level as f32 / RADAR_LEVELS as f32;
        canvas.push(ChartMark::Polygon {
            points: (0..n).map(|k| polar(center, r, angle(k))).collect(),
            fill: style.theme.bar_track.clone(),
            opacity: if level == RADAR_LEVELS { 0.5 } else { 0.0 },
            stroke: Some(grid.clone()),
        });
    }
    for (k, indicator) in indicators.iter().enumerate() {
        let rim = polar(center, radius, angle(k));
        canvas.line(center, rim, &grid, 1.0, false);
        let at = polar(center, radius + 14.0, angle(k));
        canvas.caption(&indicator.name, at.x, at.y, anchor_for(at, center));
    }

    // Indicators without a usable max fall back to the largest value seen.
    let fallback = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0f64, f64::max)
        .max(1.0);
    for (s, line) in series.iter().enumerate() {
        let points: Vec<Point> = indicators
            .iter()
            .enumerate()
            .map(|(k, indicator)| {
                let max = if indicator.max > 0.0 { indicator.max } else { fallback };
                let value = line.values.get(k).copied().unwrap_or(0.0);
                let t = (value / max).clamp(0.0, 1.0) as f32;
                polar(center, radius * t, angle(k))
            })
            .collect();
        let color = palette[s].clone();
        canvas.push(ChartMark::Polygon {
            points: points.clone(),
            fill: color.clone(),
            opacity: 0.2,
            stroke: Some(color.clone()),
        });
        for point in points {
            canvas.push(ChartMark::Dot {
                center: point,
                radius: 3.0,
                fill: color.clone(),
                opacity: 1.0,
            });
        }
    }
    if series.len() > 1 {
        let entries: Vec<(String, String)> = series
            .iter()
            .zip(&palette)
            .map(|(s, c)| (s.name.clone(), c.clone()))
            .collect();
        canvas.legend(&entries);
    }
    Some(canvas.finish())
}

/// A 270° dial: grey track, coloured value arc, value text in the middle.
pub(super) fn gauge(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let data = content.gauge_data.as_ref()?;
    let max = if data.max > 0.0 { data.max } else { 100.0 };
    let ratio = (data.value / max).clamp(0.0, 1.0) as f32;
    let mut canvas = Canvas::new(style, ChartType::Gauge, height, Margins::OPEN, false);
    let plot = canvas.plot;
    let radius = (plot.width / 2.0).min(plot.height * 0.55).max(20.0);
    let center = Point::new(plot.center().x, plot.y + plot.height * 0.55);
    let inner = radius * 0.82;
    let color = style
        .chart_palette(1)
        .into_iter()
        .next()
        .unwrap_or_else(|| style.theme.accent_neutral.clone());

    canvas.push(ChartMark::Arc {
        center,
        inner_radius: inner,
        outer_radius: radius,
        start_angle: -GAUGE_SWEEP,
        end_angle: GAUGE_SWEEP,
        fill: style.theme.bar_track.clone(),
    });
    if ratio > 0.0 {
        canvas.push(ChartMark::Arc {
            center,
            inner_radius: inner,
            outer_radius: radius,
            start_angle: -GAUGE_SWEEP,
            end_angle: -GAUGE_SWEEP + 2.0 * GAUGE_SWEEP * ratio,
            fill: color,
        });
    }
    let value = LabelSpec::new(&format_number(data.value), style.label_size() * 2.0, &style.text)
        .bold()
        .lines(1)
        .at(center.x, center.y, style.config);
    let below = value.bottom() + 8.0;
    canvas.push(ChartMark::Text(value));
    if !data.name.is_empty() {
        canvas.caption(&data.name, center.x, below, TextAnchor::Middle);
    }
    for (t, text) in [(0.0f32, 0.0), (1.0, max)] {
        let at = polar(center, radius + 12.0, -GAUGE_SWEEP + 2.0 * GAUGE_SWEEP * t);
        canvas.caption(&format_number(text), at.x, at.y, anchor_for(at, center));
    }
    Some(canvas.finish())
}

/// Concentric rings, one per depth; each node spans an angle proportional to
/// its share of the parent total. Children inherit the root colour.
pub(super) fn sunburst(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let roots = content.sunburst_data.as_deref().filter(|r| !r.is_empty())?;
    let total: f64 = roots.iter().map(TreeNode::total).sum();
    if total <= 0.0 {
        return None;
    }
    let depth = roots.iter().map(tree_depth).max().unwrap_or(1).min(SUNBURST_DEPTH);
    let palette = style.chart_palette(roots.len());
    let mut canvas = Canvas::new(style, ChartType::Sunburst, height, Margins::OPEN, false);
    let plot = canvas.plot;
    let center = plot.center();
    let radius = (plot.width.min(plot.height) / 2.0).max(20.0);
    let hole = radius * 0.2;
    let ring = (radius - hole) / depth as f32;

    let mut rings = Rings {
        style,
        center,
        hole,
        ring,
        max_depth: depth,
        arcs: Vec::new(),
    };
    let mut start = 0.0f32;
    for (root, color) in roots.iter().zip(&palette) {
        let sweep = (root.total() / total) as f32 * TAU;
        rings.place(root, 0, start, sweep, color);
        start += sweep;
    }
    for (arc, label) in rings.arcs {
        canvas.push(arc);
        if let Some(label) = label {
            canvas.push(ChartMark::Text(label));
        }
    }
    Some(canvas.finish())
}

fn tree_depth(node: &TreeNode) -> usize {
    1 + node.children.iter().map(tree_depth).max().unwrap_or(0)
}

struct Rings<'s> {
    style: &'s DiagramStyle<'s>,
    center: Point,
    hole: f32,
    ring: f32,
    max_depth: usize,
    arcs: Vec<(ChartMark, Option<Label>)>,
}

impl Rings<'_> {
    fn place(&mut self, node: &TreeNode, depth: usize, start: f32, sweep: f32, color: &str) {
        if depth >= self.max_depth || sweep <= 0.0 {
            return;
        }
        let inner = self.hole + depth as f32 * self.ring;
        let outer = inner + self.ring - 1.0;
        let mid_radius = (inner + outer) / 2.0;
        // Only label sectors wide enough to hold a few characters.
        let label = (sweep * mid_radius > 36.0).then(|| {
            let at = polar(self.center, mid_radius, start + sweep / 2.0);
            self.style
                .on_fill(&node.name, self.style.caption_size() - 1.0)
                .width(self.ring.max(sweep * mid_radius * 0.8))
                .lines(1)
                .at(at.x, at.y, self.style.config)
        });
        self.arcs.push((
            ChartMark::Arc {
                center: self.center,
                inner_radius: inner,
                outer_radius: outer,
                start_angle: start,
                end_angle: start + sweep,
                fill: color.to_string(),
            },
            label,
        ));
        let total = node.total();
        if total <= 0.0 {
            return;
        }
        let mut child_start = start;
        for child in &node.children {
            let child_sweep = (child.total() / total) as f32 * sweep;
            self.place(child, depth + 1, child_start, child_sweep, color);
            child_start += child_sweep;
        }
    }
}
