//! Chart layouts. Every chart kind turns its payload into a flat list of
//! [`ChartMark`]s inside a plot rectangle; the renderer only paints marks.

mod cartesian;
mod gantt;
mod radial;
mod sankey;
mod treemap;

use crate::ir::{ChartContent, ChartType, ChartValue};

use super::geometry::{Point, Rect, VB_H, VB_W};
use super::text::LabelSpec;
use super::{ChartLayout, ChartMark, DiagramStyle, Label, LegendItem, TextAnchor};

const LEGEND_BAND: f32 = 28.0;
const SWATCH: f32 = 10.0;
/// Opacity of marks that are not the highlighted category.
const DIMMED: f32 = 0.45;

pub(super) fn compute_chart_layout(
    content: &ChartContent,
    style: &DiagramStyle<'_>,
) -> Option<ChartLayout> {
    let height = content
        .chart_height
        .map(|h| h.clamp(200.0, 720.0))
        .unwrap_or(VB_H);
    let layout = match content.chart_type {
        ChartType::Bar => cartesian::bar(content, style, height),
        ChartType::HorizontalBar => cartesian::horizontal_bar(content, style, height),
        ChartType::StackedBar => cartesian::stacked_bar(content, style, height),
        ChartType::Pie | ChartType::Donut | ChartType::Rose => radial::pie(content, style, height),
        ChartType::Line | ChartType::Area => cartesian::line(content, style, height),
        ChartType::Radar => radial::radar(content, style, height),
        ChartType::Proportion => cartesian::proportion(content, style, height),
        ChartType::Waterfall => cartesian::waterfall(content, style, height),
        ChartType::Combo => cartesian::combo(content, style, height),
        ChartType::Scatter => cartesian::scatter(content, style, height),
        ChartType::Gauge => radial::gauge(content, style, height),
        ChartType::Treemap => treemap::treemap(content, style, height),
        ChartType::Sankey => sankey::sankey(content, style, height),
        ChartType::Heatmap => cartesian::heatmap(content, style, height),
        ChartType::Sunburst => radial::sunburst(content, style, height),
        ChartType::Boxplot => cartesian::boxplot(content, style, height),
        ChartType::Gantt => gantt::gantt(content, style, height),
    };
    if layout.is_none() {
        tracing::debug!(chart_type = %content.chart_type, "chart has no data for its kind");
    }
    layout
}

/// Margins around the plot: left, top, right, bottom.
#[derive(Debug, Clone, Copy)]
pub(super) struct Margins(pub f32, pub f32, pub f32, pub f32);

impl Margins {
    pub(super) const AXES: Margins = Margins(56.0, 24.0, 24.0, 40.0);
    pub(super) const OPEN: Margins = Margins(16.0, 16.0, 16.0, 16.0);
}

/// Mark collector for one chart.
pub(super) struct Canvas<'s> {
    pub style: &'s DiagramStyle<'s>,
    pub plot: Rect,
    chart_type: ChartType,
    width: f32,
    height: f32,
    marks: Vec<ChartMark>,
    legend: Vec<LegendItem>,
}

impl<'s> Canvas<'s> {
    pub(super) fn new(
        style: &'s DiagramStyle<'s>,
        chart_type: ChartType,
        height: f32,
        margins: Margins,
        legend: bool,
    ) -> Self {
        let Margins(left, top, right, bottom) = margins;
        let bottom = bottom + if legend { LEGEND_BAND } else { 0.0 };
        Self {
            style,
            plot: Rect::new(
                left,
                top,
                (VB_W - left - right).max(1.0),
                (height - top - bottom).max(1.0),
            ),
            chart_type,
            width: VB_W,
            height,
            marks: Vec::new(),
            legend: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, mark: ChartMark) {
        self.marks.push(mark);
    }

    pub(super) fn label(&self, text: &str, x: f32, y: f32, anchor: TextAnchor) -> Label {
        self.style
            .caption(text)
            .anchor(anchor)
            .lines(1)
            .at(x, y, self.style.config)
    }

    /// Muted caption, e.g. tick and category labels.
    pub(super) fn caption(&mut self, text: &str, x: f32, y: f32, anchor: TextAnchor) {
        let label = self.label(text, x, y, anchor);
        self.marks.push(ChartMark::Text(label));
    }

    /// Caption constrained to `width`, ellipsised to one line.
    pub(super) fn fitted_caption(&mut self, text: &str, x: f32, y: f32, width: f32, anchor: TextAnchor) {
        let label = self
            .style
            .caption(text)
            .anchor(anchor)
            .width(width)
            .lines(1)
            .at(x, y, self.style.config);
        self.marks.push(ChartMark::Text(label));
    }

    /// Value label in the primary text colour.
    pub(super) fn value(&mut self, text: &str, x: f32, y: f32, anchor: TextAnchor) {
        let label = LabelSpec::new(text, self.style.caption_size(), &self.style.text)
            .bold()
            .anchor(anchor)
            .lines(1)
            .at(x, y, self.style.config);
        self.marks.push(ChartMark::Text(label));
    }

    pub(super) fn line(&mut self, from: Point, to: Point, stroke: &str, width: f32, dashed: bool) {
        self.marks.push(ChartMark::Line {
            from,
            to,
            stroke: stroke.to_string(),
            width,
            dashed,
        });
    }

    pub(super) fn rect(&mut self, rect: Rect, fill: &str, opacity: f32, radius: f32) {
        self.marks.push(ChartMark::Rect {
            rect,
            fill: fill.to_string(),
            opacity,
            radius,
        });
    }

    /// Horizontal gridlines and tick labels for a vertical value axis.
    pub(super) fn value_axis(&mut self, ticks: &Ticks, scale: &Scale, right_side: bool) {
        let grid = self.style.theme.border.clone();
        let plot = self.plot;
        for value in ticks.values() {
            let y = scale.map(value);
            if !right_side {
                self.line(Point::new(plot.x, y), Point::new(plot.right(), y), &grid, 1.0, false);
            }
            let text = format_number(value);
            if right_side {
                self.caption(&text, plot.right() + 8.0, y, TextAnchor::Start);
            } else {
                self.caption(&text, plot.x - 8.0, y, TextAnchor::End);
            }
        }
    }

    /// Vertical gridlines and tick labels for a horizontal value axis.
    pub(super) fn value_axis_x(&mut self, ticks: &Ticks, scale: &Scale) {
        let grid = self.style.theme.border.clone();
        let plot = self.plot;
        for value in ticks.values() {
            let x = scale.map(value);
            self.line(Point::new(x, plot.y), Point::new(x, plot.bottom()), &grid, 1.0, false);
            self.caption(&format_number(value), x, plot.bottom() + 14.0, TextAnchor::Middle);
        }
    }

    /// Category labels centred under equal bands of the plot.
    pub(super) fn category_axis(&mut self, categories: &[String]) {
        if categories.is_empty() {
            return;
        }
        let band = self.plot.width / categories.len() as f32;
        let axis = self.style.theme.text_caption.clone();
        let plot = self.plot;
        self.line(
            Point::new(plot.x, plot.bottom()),
            Point::new(plot.right(), plot.bottom()),
            &axis,
            1.0,
            false,
        );
        for (i, category) in categories.iter().enumerate() {
            let x = plot.x + band * (i as f32 + 0.5);
            self.fitted_caption(category, x, plot.bottom() + 14.0, band - 4.0, TextAnchor::Middle);
        }
    }

    /// One row of swatches centred under the plot.
    pub(super) fn legend(&mut self, entries: &[(String, String)]) {
        if entries.is_empty() {
            return;
        }
        let y = self.height - LEGEND_BAND / 2.0;
        let mut items: Vec<LegendItem> = entries
            .iter()
            .map(|(name, color)| LegendItem {
                color: color.clone(),
                label: self.label(name, 0.0, y, TextAnchor::Start),
                swatch: Rect::new(0.0, y - SWATCH / 2.0, SWATCH, SWATCH),
            })
            .collect();
        let total: f32 = items
            .iter()
            .map(|item| SWATCH + 6.0 + item.label.text.width + 16.0)
            .sum::<f32>()
            - 16.0;
        let mut x = ((self.width - total) / 2.0).max(4.0);
        for item in &mut items {
            item.swatch.x = x;
            item.label.x = x + SWATCH + 6.0;
            x += SWATCH + 6.0 + item.label.text.width + 16.0;
        }
        self.legend = items;
    }

    pub(super) fn finish(self) -> ChartLayout {
        ChartLayout {
            width: self.width,
            height: self.height,
            chart_type: self.chart_type,
            plot: self.plot,
            marks: self.marks,
            legend: self.legend,
        }
    }
}

/// Linear map from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy)]
pub(super) struct Scale {
    d0: f64,
    d1: f64,
    r0: f32,
    r1: f32,
}

impl Scale {
    pub(super) fn new(d0: f64, d1: f64, r0: f32, r1: f32) -> Self {
        let d1 = if (d1 - d0).abs() < f64::EPSILON { d0 + 1.0 } else { d1 };
        Self { d0, d1, r0, r1 }
    }

    pub(super) fn map(&self, value: f64) -> f32 {
        self.r0 + ((value - self.d0) / (self.d1 - self.d0)) as f32 * (self.r1 - self.r0)
    }
}

/// Rounded axis bounds with an even step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Ticks {
    pub lo: f64,
    pub hi: f64,
    pub step: f64,
}

impl Ticks {
    pub(super) fn nice(min: f64, max: f64, count: usize) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let span = if max - min > f64::EPSILON { max - min } else { max.abs().max(1.0) };
        let raw = span / count.max(1) as f64;
        let magnitude = 10f64.powf(raw.log10().floor());
        let norm = raw / magnitude;
        let step = magnitude
            * if norm <= 1.0 {
                1.0
            } else if norm <= 2.0 {
                2.0
            } else if norm <= 2.5 {
                2.5
            } else if norm <= 5.0 {
                5.0
            } else {
                10.0
            };
        let lo = (min / step).floor() * step;
        let mut hi = (max / step).ceil() * step;
        if hi <= lo {
            hi = lo + step;
        }
        Self { lo, hi, step }
    }

    /// Zero-based ticks covering `values`.
    pub(super) fn covering(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self::nice(min, max, 4)
    }

    pub(super) fn values(&self) -> Vec<f64> {
        let count = ((self.hi - self.lo) / self.step).round() as usize;
        (0..=count).map(|i| self.lo + i as f64 * self.step).collect()
    }
}

pub(super) fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-6 {
        format!("{}", value.round() as i64)
    } else if value.abs() >= 10.0 {
        format!("{value:.1}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').to_string()
    }
}

pub(super) fn percent(part: f64, total: f64) -> String {
    if total <= 0.0 {
        return "0%".to_string();
    }
    format!("{:.0}%", part / total * 100.0)
}

/// Explicit semantic colour, else the series colour.
pub(super) fn value_fill(value: &ChartValue, fallback: &str, style: &DiagramStyle<'_>) -> String {
    value
        .color
        .map(|c| style.theme.semantic_color(c).to_string())
        .unwrap_or_else(|| fallback.to_string())
}

pub(super) fn highlight_opacity(highlight: Option<&str>, name: &str) -> f32 {
    match highlight {
        Some(target) if !target.is_empty() && target != name => DIMMED,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ChartBar, ColorOverrides, SemanticColor};
    use crate::theme::Theme;

    pub(super) fn run(content: &ChartContent) -> Option<ChartLayout> {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        compute_chart_layout(content, &style)
    }

    pub(super) fn rects(layout: &ChartLayout) -> Vec<(Rect, String, f32)> {
        layout
            .marks
            .iter()
            .filter_map(|m| match m {
                ChartMark::Rect {
                    rect, fill, opacity, ..
                } => Some((*rect, fill.clone(), *opacity)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn ticks_are_rounded() {
        let ticks = Ticks::nice(0.0, 71.0, 4);
        assert_eq!(ticks, Ticks { lo: 0.0, hi: 80.0, step: 20.0 });
        assert_eq!(ticks.values(), vec![0.0, 20.0, 40.0, 60.0, 80.0]);
        let negative = Ticks::covering([-12.0, 30.0]);
        assert!(negative.lo <= -12.0 && negative.hi >= 30.0);
        let empty = Ticks::covering(std::iter::empty());
        assert!(empty.hi > empty.lo);
    }

    #[test]
    fn numbers_format_compactly() {
        assert_eq!(format_number(45.0), "45");
        assert_eq!(format_number(12.34), "12.3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(percent(1.0, 4.0), "25%");
    }

    #[test]
    fn every_kind_without_data_renders_nothing() {
        for kind in ChartType::ALL {
            assert!(run(&ChartContent::new(*kind)).is_none(), "{kind}");
        }
    }

    #[test]
    fn chart_height_resizes_the_canvas() {
        let mut content = ChartContent::new(ChartType::Bar);
        content.bars = Some(vec![ChartBar {
            category: "Q1".into(),
            values: vec![ChartValue {
                name: "Revenue".into(),
                value: 10.0,
                color: Some(SemanticColor::Negative),
            }],
        }]);
        content.chart_height = Some(300.0);
        let layout = run(&content).unwrap();
        assert_eq!(layout.height, 300.0);
        let bars = rects(&layout);
        assert_eq!(bars[0].1, Theme::swiss().accent_negative);
    }
}
