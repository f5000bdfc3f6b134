use crate::config::LayoutConfig;
use crate::ir::{TableContent, TableVariant};

use super::geometry::{Rect, VB_W};
use super::text::LabelSpec;
use super::{DiagramStyle, Label, TableLayout, TableRowLayout, TextAnchor};

const CELL_PAD_X: f32 = 12.0;
const CELL_PAD_Y: f32 = 10.0;
const MIN_ROW_HEIGHT: f32 = 36.0;

struct CellStyle<'a> {
    size: f32,
    color: &'a str,
    bold: bool,
}

/// Lays out one row of cells starting at `y`; returns the labels and row height.
fn place_row(
    cells: &[String],
    y: f32,
    column_x: &[f32],
    cell: &CellStyle<'_>,
    config: &LayoutConfig,
) -> (Vec<Label>, f32) {
    let mut labels: Vec<Label> = cells
        .iter()
        .zip(column_x.windows(2))
        .map(|(text, edges)| {
            let spec = LabelSpec::new(text, cell.size, cell.color)
                .anchor(TextAnchor::Start)
                .width(edges[1] - edges[0] - 2.0 * CELL_PAD_X)
                .lines(2);
            let spec = if cell.bold { spec.bold() } else { spec };
            spec.at(edges[0] + CELL_PAD_X, 0.0, config)
        })
        .collect();
    let text_h = labels.iter().map(|l| l.text.height).fold(0.0, f32::max);
    let height = (text_h + 2.0 * CELL_PAD_Y).max(MIN_ROW_HEIGHT);
    for label in &mut labels {
        label.y = y + height / 2.0;
    }
    (labels, height)
}

pub(super) fn compute_table_layout(
    content: &TableContent,
    style: &DiagramStyle<'_>,
) -> Option<TableLayout> {
    let columns = content
        .rows
        .iter()
        .map(|row| row.cells.len())
        .chain(std::iter::once(content.headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return None;
    }
    let config = style.config;
    let col_w = VB_W / columns as f32;
    let column_x: Vec<f32> = (0..=columns).map(|c| c as f32 * col_w).collect();
    let header_fill = style
        .palette(content.headers.len().max(1))
        .into_iter()
        .next()
        .unwrap_or_else(|| style.theme.accent_neutral.clone());

    let mut rows = Vec::with_capacity(content.rows.len() + 1);
    let mut y = 0.0;
    if !content.headers.is_empty() {
        let cell = CellStyle {
            size: style.label_size(),
            color: "#FFFFFF",
            bold: true,
        };
        let (cells, height) = place_row(&content.headers, y, &column_x, &cell, config);
        rows.push(TableRowLayout {
            rect: Rect::new(0.0, y, VB_W, height),
            fill: Some(header_fill.clone()),
            header: true,
            highlight: false,
            cells,
        });
        y += height;
    }

    for (i, row) in content.rows.iter().enumerate() {
        let highlight = row.highlight.unwrap_or(false);
        let cell = CellStyle {
            size: style.caption_size() + 1.0,
            color: &style.text,
            bold: highlight,
        };
        let (cells, height) = place_row(&row.cells, y, &column_x, &cell, config);
        let fill = if highlight {
            Some(header_fill.clone())
        } else if content.variant == TableVariant::Striped && i % 2 == 1 {
            Some(style.theme.bar_track.clone())
        } else {
            None
        };
        rows.push(TableRowLayout {
            rect: Rect::new(0.0, y, VB_W, height),
            fill,
            header: false,
            highlight,
            cells,
        });
        y += height;
    }

    Some(TableLayout {
        width: VB_W,
        height: y.max(MIN_ROW_HEIGHT),
        variant: content.variant,
        column_x,
        rows,
        border_color: style.theme.text_caption.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ColorOverrides, TableRow};
    use crate::theme::Theme;

    fn run(content: &TableContent) -> Option<TableLayout> {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        compute_table_layout(content, &style)
    }

    fn row(cells: &[&str], highlight: Option<bool>) -> TableRow {
        TableRow {
            cells: cells.iter().map(|c| c.to_string()).collect(),
            highlight,
        }
    }

    #[test]
    fn header_uses_first_palette_colour() {
        let content = TableContent {
            headers: vec!["Plan".into(), "Price".into(), "Seats".into()],
            rows: vec![row(&["Basic", "$9", "1"], None), row(&["Team", "$29", "10"], None)],
            variant: TableVariant::Striped,
        };
        let layout = run(&content).unwrap();
        let theme = Theme::swiss();
        assert!(layout.rows[0].header);
        assert_eq!(layout.rows[0].fill.as_deref(), Some(theme.palette(3, None)[0].as_str()));
        assert_eq!(layout.rows[0].cells[0].color, "#FFFFFF");
        assert!(layout.rows[1].fill.is_none());
        assert_eq!(layout.rows[2].fill.as_deref(), Some(theme.bar_track.as_str()));
        assert_eq!(layout.column_x.len(), 4);
    }

    #[test]
    fn highlighted_rows_are_bold_and_tinted() {
        let content = TableContent {
            headers: Vec::new(),
            rows: vec![row(&["a", "b"], Some(true)), row(&["c"], None)],
            variant: TableVariant::Highlight,
        };
        let layout = run(&content).unwrap();
        assert!(layout.rows[0].highlight && layout.rows[0].cells[0].bold);
        assert!(layout.rows[0].fill.is_some());
        assert!(!layout.rows[1].cells[0].bold);
        assert_eq!(layout.rows[1].cells.len(), 1);
    }

    #[test]
    fn rows_stack_without_gaps() {
        let content = TableContent {
            headers: vec!["A".into()],
            rows: vec![row(&["x"], None), row(&["y"], None)],
            variant: TableVariant::Bordered,
        };
        let layout = run(&content).unwrap();
        for pair in layout.rows.windows(2) {
            assert!((pair[0].rect.bottom() - pair[1].rect.y).abs() < 1e-3);
        }
        assert!((layout.height - layout.rows[2].rect.bottom()).abs() < 1e-3);
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert!(run(&TableContent::default()).is_none());
    }
}
