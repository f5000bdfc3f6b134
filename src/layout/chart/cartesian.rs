use crate::ir::{ChartBar, ChartContent, ChartType, ComboSeriesType, WaterfallKind};

use super::super::geometry::{Point, Rect};
use super::super::{ChartLayout, ChartMark, DiagramStyle, TextAnchor};
use super::{
    Canvas, Margins, Scale, Ticks, format_number, highlight_opacity, percent, value_fill,
};

fn non_empty<T>(items: &Option<Vec<T>>) -> Option<&[T]> {
    items.as_deref().filter(|items| !items.is_empty())
}

/// Series names taken from the first bar that carries each series slot.
fn series_names(bars: &[ChartBar]) -> Vec<String> {
    let count = bars.iter().map(|b| b.values.len()).max().unwrap_or(0);
    (0..count)
        .map(|s| {
            bars.iter()
                .find_map(|b| b.values.get(s))
                .map(|v| v.name.clone())
                .unwrap_or_default()
        })
        .collect()
}

fn legend_entries(names: &[String], colors: &[String]) -> Vec<(String, String)> {
    names
        .iter()
        .zip(colors)
        .map(|(n, c)| (n.clone(), c.clone()))
        .collect()
}

/// Categories from the payload, padded with blanks up to `count`.
fn categories(content: &ChartContent, count: usize) -> Vec<String> {
    let mut out = content.categories.clone().unwrap_or_default();
    if out.len() < count {
        out.resize(count, String::new());
    }
    out
}

pub(super) fn bar(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let bars = non_empty(&content.bars)?;
    let names = series_names(bars);
    if names.is_empty() {
        return None;
    }
    let palette = style.chart_palette(names.len());
    let mut canvas = Canvas::new(style, ChartType::Bar, height, Margins::AXES, names.len() > 1);
    let plot = canvas.plot;

    let ticks = Ticks::covering(bars.iter().flat_map(|b| b.values.iter().map(|v| v.value)));
    let y = Scale::new(ticks.lo, ticks.hi, plot.bottom(), plot.y);
    canvas.value_axis(&ticks, &y, false);

    let band = plot.width / bars.len() as f32;
    let group = band * 0.7;
    let bar_w = group / names.len() as f32;
    for (i, bar) in bars.iter().enumerate() {
        let x0 = plot.x + i as f32 * band + (band - group) / 2.0;
        let opacity = highlight_opacity(content.highlight.as_deref(), &bar.category);
        for (s, value) in bar.values.iter().enumerate() {
            let top = y.map(value.value.max(0.0));
            let bottom = y.map(value.value.min(0.0));
            let rect = Rect::new(x0 + s as f32 * bar_w + 1.0, top, (bar_w - 2.0).max(1.0), bottom - top);
            canvas.rect(rect, &value_fill(value, &palette[s], style), opacity, 3.0);
            canvas.value(&format_number(value.value), rect.center().x, top - 9.0, TextAnchor::Middle);
        }
    }
    let labels: Vec<String> = bars.iter().map(|b| b.category.clone()).collect();
    canvas.category_axis(&labels);
    if names.len() > 1 {
        canvas.legend(&legend_entries(&names, &palette));
    }
    Some(canvas.finish())
}

pub(super) fn horizontal_bar(
    content: &ChartContent,
    style: &DiagramStyle<'_>,
    height: f32,
) -> Option<ChartLayout> {
    let bars = non_empty(&content.bars)?;
    let names = series_names(bars);
    if names.is_empty() {
        return None;
    }
    let palette = style.chart_palette(names.len());
    let margins = Margins(120.0, 16.0, 48.0, 32.0);
    let mut canvas = Canvas::new(style, ChartType::HorizontalBar, height, margins, names.len() > 1);
    let plot = canvas.plot;

    let ticks = Ticks::covering(bars.iter().flat_map(|b| b.values.iter().map(|v| v.value)));
    let x = Scale::new(ticks.lo, ticks.hi, plot.x, plot.right());
    canvas.value_axis_x(&ticks, &x);

    let band = plot.height / bars.len() as f32;
    let group = band * 0.7;
    let bar_h = group / names.len() as f32;
    for (i, bar) in bars.iter().enumerate() {
        let y0 = plot.y + i as f32 * band + (band - group) / 2.0;
        let opacity = highlight_opacity(content.highlight.as_deref(), &bar.category);
        for (s, value) in bar.values.iter().enumerate() {
            let left = x.map(value.value.min(0.0));
            let right = x.map(value.value.max(0.0));
            let rect = Rect::new(left, y0 + s as f32 * bar_h + 1.0, right - left, (bar_h - 2.0).max(1.0));
            canvas.rect(rect, &value_fill(value, &palette[s], style), opacity, 3.0);
            canvas.value(&format_number(value.value), rect.right() + 6.0, rect.center().y, TextAnchor::Start);
        }
        canvas.fitted_caption(&bar.category, plot.x - 8.0, plot.y + band * (i as f32 + 0.5), 110.0, TextAnchor::End);
    }
    if names.len() > 1 {
        canvas.legend(&legend_entries(&names, &palette));
    }
    Some(canvas.finish())
}

pub(super) fn stacked_bar(
    content: &ChartContent,
    style: &DiagramStyle<'_>,
    height: f32,
) -> Option<ChartLayout> {
    let bars = non_empty(&content.bars)?;
    let names = series_names(bars);
    if names.is_empty() {
        return None;
    }
    let palette = style.chart_palette(names.len());
    let mut canvas = Canvas::new(style, ChartType::StackedBar, height, Margins::AXES, true);
    let plot = canvas.plot;

    let totals = bars
        .iter()
        .map(|b| b.values.iter().map(|v| v.value.max(0.0)).sum::<f64>());
    let ticks = Ticks::covering(totals);
    let y = Scale::new(ticks.lo, ticks.hi, plot.bottom(), plot.y);
    canvas.value_axis(&ticks, &y, false);

    let band = plot.width / bars.len() as f32;
    let bar_w = band * 0.55;
    for (i, bar) in bars.iter().enumerate() {
        let x0 = plot.x + i as f32 * band + (band - bar_w) / 2.0;
        let opacity = highlight_opacity(content.highlight.as_deref(), &bar.category);
        let mut base = 0.0;
        for (s, value) in bar.values.iter().enumerate() {
            let v = value.value.max(0.0);
            let top = y.map(base + v);
            let rect = Rect::new(x0, top, bar_w, y.map(base) - top);
            canvas.rect(rect, &value_fill(value, &palette[s], style), opacity, 0.0);
            if rect.height >= 16.0 {
                let text = format_number(value.value);
                let label = style
                    .on_fill(&text, style.caption_size())
                    .lines(1)
                    .at(rect.center().x, rect.center().y, style.config);
                canvas.push(ChartMark::Text(label));
            }
            base += v;
        }
        canvas.value(&format_number(base), x0 + bar_w / 2.0, y.map(base) - 9.0, TextAnchor::Middle);
    }
    let labels: Vec<String> = bars.iter().map(|b| b.category.clone()).collect();
    canvas.category_axis(&labels);
    canvas.legend(&legend_entries(&names, &palette));
    Some(canvas.finish())
}

/// Line and area charts share the category point scale.
pub(super) fn line(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let series = non_empty(&content.line_series)?;
    let count = series.iter().map(|s| s.data.len()).max().unwrap_or(0);
    if count == 0 {
        return None;
    }
    let palette = style.chart_palette(series.len());
    let mut canvas = Canvas::new(style, content.chart_type, height, Margins::AXES, series.len() > 1);
    let plot = canvas.plot;

    let ticks = Ticks::covering(series.iter().flat_map(|s| s.data.iter().copied()));
    let y = Scale::new(ticks.lo, ticks.hi, plot.bottom(), plot.y);
    canvas.value_axis(&ticks, &y, false);
    let band = plot.width / count as f32;
    let baseline = y.map(ticks.lo.max(0.0));

    for (s, line) in series.iter().enumerate() {
        let color = &palette[s];
        let points: Vec<Point> = line
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(plot.x + band * (i as f32 + 0.5), y.map(*v)))
            .collect();
        let filled = content.chart_type == ChartType::Area || line.area.unwrap_or(false);
        if filled && points.len() > 1 {
            let mut polygon = points.clone();
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                polygon.push(Point::new(last.x, baseline));
                polygon.push(Point::new(first.x, baseline));
            }
            canvas.push(ChartMark::Polygon {
                points: polygon,
                fill: color.clone(),
                opacity: 0.18,
                stroke: None,
            });
        }
        canvas.push(ChartMark::Polyline {
            points: points.clone(),
            stroke: color.clone(),
            width: 2.5,
            dashed: false,
        });
        for point in points {
            canvas.push(ChartMark::Dot {
                center: point,
                radius: 3.5,
                fill: color.clone(),
                opacity: 1.0,
            });
        }
    }
    canvas.category_axis(&categories(content, count));
    if series.len() > 1 {
        let names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
        canvas.legend(&legend_entries(&names, &palette));
    }
    Some(canvas.finish())
}

/// One progress track per item with the share of its own maximum.
pub(super) fn proportion(
    content: &ChartContent,
    style: &DiagramStyle<'_>,
    height: f32,
) -> Option<ChartLayout> {
    let items = non_empty(&content.proportion_items)?;
    let palette = style.chart_palette(items.len());
    let mut canvas = Canvas::new(style, ChartType::Proportion, height, Margins(24.0, 16.0, 24.0, 16.0), false);
    let plot = canvas.plot;
    let row_h = (plot.height / items.len() as f32).min(64.0);
    let track = style.theme.bar_track.clone();

    for (i, item) in items.iter().enumerate() {
        let top = plot.y + i as f32 * row_h;
        let ratio = if item.max > 0.0 {
            (item.value / item.max).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        let text_y = top + row_h * 0.3;
        let bar_y = top + row_h * 0.55;
        canvas.fitted_caption(&item.name, plot.x, text_y, plot.width * 0.7, TextAnchor::Start);
        canvas.value(&percent(item.value.max(0.0), item.max), plot.right(), text_y, TextAnchor::End);
        let bar_h = (row_h * 0.25).clamp(6.0, 14.0);
        canvas.rect(Rect::new(plot.x, bar_y, plot.width, bar_h), &track, 1.0, bar_h / 2.0);
        if ratio > 0.0 {
            canvas.rect(
                Rect::new(plot.x, bar_y, plot.width * ratio, bar_h),
                &palette[i],
                highlight_opacity(content.highlight.as_deref(), &item.name),
                bar_h / 2.0,
            );
        }
    }
    Some(canvas.finish())
}

/// Floating bars over a running total; totals reset the running level.
pub(super) fn waterfall(
    content: &ChartContent,
    style: &DiagramStyle<'_>,
    height: f32,
) -> Option<ChartLayout> {
    let items = non_empty(&content.waterfall_items)?;
    let theme = style.theme;

    let mut spans = Vec::with_capacity(items.len());
    let mut running = 0.0f64;
    for item in items {
        let (from, to) = match item.kind {
            WaterfallKind::Total => (0.0, item.value),
            WaterfallKind::Increase => (running, running + item.value.abs()),
            WaterfallKind::Decrease => (running, running - item.value.abs()),
        };
        running = to;
        spans.push((from, to));
    }

    let mut canvas = Canvas::new(style, ChartType::Waterfall, height, Margins::AXES, false);
    let plot = canvas.plot;
    let ticks = Ticks::covering(spans.iter().flat_map(|(a, b)| [*a, *b]));
    let y = Scale::new(ticks.lo, ticks.hi, plot.bottom(), plot.y);
    canvas.value_axis(&ticks, &y, false);

    let band = plot.width / items.len() as f32;
    let bar_w = band * 0.6;
    let mut previous: Option<(f32, f32)> = None;
    for (i, (item, (from, to))) in items.iter().zip(&spans).enumerate() {
        let x0 = plot.x + i as f32 * band + (band - bar_w) / 2.0;
        let top = y.map(from.max(*to));
        let bottom = y.map(from.min(*to));
        let fill = match item.kind {
            WaterfallKind::Total => &theme.accent_neutral,
            WaterfallKind::Increase => &theme.accent_positive,
            WaterfallKind::Decrease => &theme.accent_negative,
        };
        let opacity = highlight_opacity(content.highlight.as_deref(), &item.name);
        canvas.rect(Rect::new(x0, top, bar_w, (bottom - top).max(1.0)), fill, opacity, 2.0);
        let text = match item.kind {
            WaterfallKind::Total => format_number(item.value),
            WaterfallKind::Increase => format!("+{}", format_number(item.value.abs())),
            WaterfallKind::Decrease => format!("-{}", format_number(item.value.abs())),
        };
        canvas.value(&text, x0 + bar_w / 2.0, top - 9.0, TextAnchor::Middle);
        if let Some((prev_right, level)) = previous {
            let caption = theme.text_caption.clone();
            canvas.line(Point::new(prev_right, level), Point::new(x0, level), &caption, 1.0, true);
        }
        previous = Some((x0 + bar_w, y.map(*to)));
    }
    let labels: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
    canvas.category_axis(&labels);
    Some(canvas.finish())
}

/// Bars and lines over shared categories; series on axis 1 use a secondary
/// scale labelled on the right.
pub(super) fn combo(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let series = non_empty(&content.combo_series)?;
    let count = series.iter().map(|s| s.data.len()).max().unwrap_or(0);
    if count == 0 {
        return None;
    }
    let secondary = |s: &&crate::ir::ComboSeries| s.y_axis_index.unwrap_or(0) > 0;
    let has_secondary = series.iter().any(|s| secondary(&s));
    let margins = if has_secondary {
        Margins(56.0, 24.0, 56.0, 40.0)
    } else {
        Margins::AXES
    };
    let palette = style.chart_palette(series.len());
    let mut canvas = Canvas::new(style, ChartType::Combo, height, margins, true);
    let plot = canvas.plot;

    let primary_ticks = Ticks::covering(
        series
            .iter()
            .filter(|s| !secondary(s))
            .flat_map(|s| s.data.iter().copied()),
    );
    let primary = Scale::new(primary_ticks.lo, primary_ticks.hi, plot.bottom(), plot.y);
    canvas.value_axis(&primary_ticks, &primary, false);
    let secondary_ticks = Ticks::covering(
        series
            .iter()
            .filter(|s| secondary(s))
            .flat_map(|s| s.data.iter().copied()),
    );
    let secondary_scale = Scale::new(secondary_ticks.lo, secondary_ticks.hi, plot.bottom(), plot.y);
    if has_secondary {
        canvas.value_axis(&secondary_ticks, &secondary_scale, true);
    }

    let band = plot.width / count as f32;
    let bar_series: Vec<usize> = series
        .iter()
        .enumerate()
        .filter(|(_, s)| s.series_type == ComboSeriesType::Bar)
        .map(|(i, _)| i)
        .collect();
    let group = band * 0.7;
    let bar_w = group / bar_series.len().max(1) as f32;

    // Bars first so lines paint on top.
    for (slot, &s) in bar_series.iter().enumerate() {
        let line = &series[s];
        let scale = if secondary(&line) { &secondary_scale } else { &primary };
        for (i, v) in line.data.iter().enumerate() {
            let x0 = plot.x + i as f32 * band + (band - group) / 2.0 + slot as f32 * bar_w;
            let top = scale.map(v.max(0.0));
            let bottom = scale.map(v.min(0.0));
            canvas.rect(Rect::new(x0 + 1.0, top, (bar_w - 2.0).max(1.0), bottom - top), &palette[s], 1.0, 3.0);
        }
    }
    for (s, line) in series.iter().enumerate() {
        if line.series_type != ComboSeriesType::Line {
            continue;
        }
        let scale = if secondary(&line) { &secondary_scale } else { &primary };
        let points: Vec<Point> = line
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| Point::new(plot.x + band * (i as f32 + 0.5), scale.map(*v)))
            .collect();
        canvas.push(ChartMark::Polyline {
            points: points.clone(),
            stroke: palette[s].clone(),
            width: 2.5,
            dashed: false,
        });
        for point in points {
            canvas.push(ChartMark::Dot {
                center: point,
                radius: 3.5,
                fill: palette[s].clone(),
                opacity: 1.0,
            });
        }
    }

    canvas.category_axis(&categories(content, count));
    let names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
    canvas.legend(&legend_entries(&names, &palette));
    Some(canvas.finish())
}

/// Points are `[x, y]` or `[x, y, size]`; sized points scale their radius by
/// the square root of the size.
pub(super) fn scatter(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let series = non_empty(&content.scatter_series)?;
    let points: Vec<(usize, f64, f64, Option<f64>)> = series
        .iter()
        .enumerate()
        .flat_map(|(s, series)| {
            series
                .data
                .iter()
                .filter(|p| p.len() >= 2)
                .map(move |p| (s, p[0], p[1], p.get(2).copied()))
        })
        .collect();
    if points.is_empty() {
        return None;
    }
    let palette = style.chart_palette(series.len());
    let mut canvas = Canvas::new(style, ChartType::Scatter, height, Margins(56.0, 32.0, 24.0, 48.0), series.len() > 1);
    let plot = canvas.plot;

    let (x_min, x_max) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));
    let x_ticks = Ticks::nice(x_min.min(0.0), x_max, 5);
    let y_ticks = Ticks::covering(points.iter().map(|p| p.2));
    let x = Scale::new(x_ticks.lo, x_ticks.hi, plot.x, plot.right());
    let y = Scale::new(y_ticks.lo, y_ticks.hi, plot.bottom(), plot.y);
    canvas.value_axis(&y_ticks, &y, false);
    canvas.value_axis_x(&x_ticks, &x);

    let max_size = points
        .iter()
        .filter_map(|p| p.3)
        .fold(0.0f64, f64::max);
    for (s, px, py, size) in &points {
        let radius = match size {
            Some(size) if max_size > 0.0 => 4.0 + 12.0 * (size.max(0.0) / max_size).sqrt() as f32,
            _ => 6.0,
        };
        canvas.push(ChartMark::Dot {
            center: Point::new(x.map(*px), y.map(*py)),
            radius,
            fill: palette[*s].clone(),
            opacity: 0.7,
        });
    }
    if let Some(name) = content.scatter_x_axis.as_deref().filter(|n| !n.is_empty()) {
        canvas.caption(name, plot.right(), plot.bottom() + 32.0, TextAnchor::End);
    }
    if let Some(name) = content.scatter_y_axis.as_deref().filter(|n| !n.is_empty()) {
        canvas.caption(name, plot.x, plot.y - 16.0, TextAnchor::Start);
    }
    if series.len() > 1 {
        let names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
        canvas.legend(&legend_entries(&names, &palette));
    }
    Some(canvas.finish())
}

/// Cells `[x, y, value]` index into the x categories and the heatmap's own
/// y categories; opacity carries the value.
pub(super) fn heatmap(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let cells = non_empty(&content.heatmap_data)?;
    let x_count = cells
        .iter()
        .map(|c| c[0].max(0.0) as usize + 1)
        .max()
        .unwrap_or(0)
        .max(content.categories.as_ref().map_or(0, Vec::len));
    let y_labels = content.heatmap_y_categories.clone().unwrap_or_default();
    let y_count = cells
        .iter()
        .map(|c| c[1].max(0.0) as usize + 1)
        .max()
        .unwrap_or(0)
        .max(y_labels.len());

    let mut canvas = Canvas::new(style, ChartType::Heatmap, height, Margins(96.0, 16.0, 16.0, 40.0), false);
    let plot = canvas.plot;
    let cell_w = plot.width / x_count as f32;
    let cell_h = plot.height / y_count as f32;
    let (lo, hi) = cells
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), c| (lo.min(c[2]), hi.max(c[2])));
    let span = if hi - lo > f64::EPSILON { hi - lo } else { 1.0 };
    let color = style
        .chart_palette(1)
        .into_iter()
        .next()
        .unwrap_or_else(|| style.theme.accent_neutral.clone());

    for cell in cells {
        let (cx, cy) = (cell[0].max(0.0) as usize, cell[1].max(0.0) as usize);
        let t = ((cell[2] - lo) / span) as f32;
        let rect = Rect::new(
            plot.x + cx as f32 * cell_w + 1.0,
            plot.y + cy as f32 * cell_h + 1.0,
            (cell_w - 2.0).max(1.0),
            (cell_h - 2.0).max(1.0),
        );
        canvas.rect(rect, &color, 0.12 + 0.88 * t, 2.0);
        let text = format_number(cell[2]);
        let label = if t > 0.5 {
            style.on_fill(&text, style.caption_size())
        } else {
            style.caption(&text)
        }
        .lines(1)
        .at(rect.center().x, rect.center().y, style.config);
        canvas.push(ChartMark::Text(label));
    }
    for (i, name) in y_labels.iter().enumerate() {
        canvas.fitted_caption(name, plot.x - 8.0, plot.y + cell_h * (i as f32 + 0.5), 88.0, TextAnchor::End);
    }
    canvas.category_axis(&categories(content, x_count));
    Some(canvas.finish())
}

/// Box from q1 to q3 with a median bar and whiskers to min and max.
pub(super) fn boxplot(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let items = non_empty(&content.boxplot_items)?;
    let palette = style.chart_palette(items.len());
    let mut canvas = Canvas::new(style, ChartType::Boxplot, height, Margins::AXES, false);
    let plot = canvas.plot;
    let ticks = Ticks::covering(items.iter().flat_map(|i| i.values.iter().copied()));
    let y = Scale::new(ticks.lo, ticks.hi, plot.bottom(), plot.y);
    canvas.value_axis(&ticks, &y, false);

    let band = plot.width / items.len() as f32;
    let box_w = (band * 0.45).min(80.0);
    for (i, item) in items.iter().enumerate() {
        let mut v = item.values;
        v.sort_by(|a, b| a.total_cmp(b));
        let [min, q1, median, q3, max] = v.map(|value| y.map(value));
        let cx = plot.x + band * (i as f32 + 0.5);
        let color = palette[i].clone();
        canvas.line(Point::new(cx, max), Point::new(cx, q3), &color, 1.5, false);
        canvas.line(Point::new(cx, q1), Point::new(cx, min), &color, 1.5, false);
        for cap in [min, max] {
            canvas.line(Point::new(cx - box_w / 4.0, cap), Point::new(cx + box_w / 4.0, cap), &color, 1.5, false);
        }
        let (left, right) = (cx - box_w / 2.0, cx + box_w / 2.0);
        canvas.push(ChartMark::Polygon {
            points: vec![
                Point::new(left, q3),
                Point::new(right, q3),
                Point::new(right, q1),
                Point::new(left, q1),
            ],
            fill: color.clone(),
            opacity: 0.25,
            stroke: Some(color.clone()),
        });
        canvas.line(Point::new(left, median), Point::new(right, median), &color, 2.5, false);
    }
    let labels: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
    canvas.category_axis(&labels);
    Some(canvas.finish())
}
