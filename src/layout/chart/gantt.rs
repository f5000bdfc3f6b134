use crate::ir::{ChartContent, ChartType};

use super::super::geometry::Rect;
use super::super::{ChartLayout, DiagramStyle, TextAnchor};
use super::{Canvas, Margins, Scale, Ticks};

const LABEL_WIDTH: f32 = 120.0;
const MAX_ROW: f32 = 36.0;

/// One row per task on a shared numeric time axis. Tasks sharing a category
/// share a colour and the categories form the legend.
pub(super) fn gantt(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let tasks = content.gantt_tasks.as_deref().filter(|t| !t.is_empty())?;

    let mut categories: Vec<&str> = Vec::new();
    for task in tasks {
        if let Some(category) = task.category.as_deref()
            && !categories.contains(&category)
        {
            categories.push(category);
        }
    }
    let palette = style.chart_palette(categories.len().max(1));
    let margins = Margins(LABEL_WIDTH + 16.0, 16.0, 24.0, 32.0);
    let mut canvas = Canvas::new(style, ChartType::Gantt, height, margins, !categories.is_empty());
    let plot = canvas.plot;

    let (lo, hi) = tasks.iter().fold((f64::MAX, f64::MIN), |(lo, hi), t| {
        (lo.min(t.start.min(t.end)), hi.max(t.start.max(t.end)))
    });
    let ticks = Ticks::nice(lo, hi, 5);
    let x = Scale::new(ticks.lo, ticks.hi, plot.x, plot.right());
    canvas.value_axis_x(&ticks, &x);

    let row = (plot.height / tasks.len() as f32).min(MAX_ROW);
    for (i, task) in tasks.iter().enumerate() {
        let color = task
            .category
            .as_deref()
            .and_then(|c| categories.iter().position(|known| *known == c))
            .map_or(&palette[0], |k| &palette[k % palette.len()]);
        let top = plot.y + i as f32 * row;
        let left = x.map(task.start.min(task.end));
        let right = x.map(task.start.max(task.end));
        let bar = Rect::new(left, top + row * 0.2, (right - left).max(2.0), row * 0.6);
        canvas.rect(bar, color, 1.0, 3.0);
        canvas.fitted_caption(&task.name, plot.x - 8.0, bar.center().y, LABEL_WIDTH, TextAnchor::End);
    }

    if !categories.is_empty() {
        let entries: Vec<(String, String)> = categories
            .iter()
            .zip(&palette)
            .map(|(c, color)| (c.to_string(), color.clone()))
            .collect();
        canvas.legend(&entries);
    }
    Some(canvas.finish())
}

#[cfg(test)]
mod tests {
    use super::super::tests::{rects, run};
    use super::*;
    use crate::ir::GanttTask;

    fn task(name: &str, start: f64, end: f64, category: Option<&str>) -> GanttTask {
        GanttTask {
            name: name.into(),
            start,
            end,
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn bars_span_their_interval() {
        let mut content = ChartContent::new(ChartType::Gantt);
        content.gantt_tasks = Some(vec![
            task("Design", 0.0, 4.0, Some("Plan")),
            task("Build", 4.0, 10.0, Some("Ship")),
            task("Review", 8.0, 10.0, Some("Plan")),
        ]);
        let layout = run(&content).unwrap();
        let bars = rects(&layout);
        assert_eq!(bars.len(), 3);
        assert!((bars[0].0.right() - bars[1].0.x).abs() < 1e-3);
        assert!(bars[1].0.y > bars[0].0.y);
        assert_eq!(bars[0].1, bars[2].1);
        assert_ne!(bars[0].1, bars[1].1);
        assert_eq!(layout.legend.len(), 2);
    }

    #[test]
    fn uncategorised_tasks_have_no_legend() {
        let mut content = ChartContent::new(ChartType::Gantt);
        content.gantt_tasks = Some(vec![task("Only", 2.0, 2.0, None)]);
        let layout = run(&content).unwrap();
        assert!(layout.legend.is_empty());
        assert!(rects(&layout)[0].0.width >= 2.0);
    }
}
