use crate::ir::{ChartContent, ChartType, TreeNode};

use super::super::geometry::Rect;
use super::super::{ChartLayout, ChartMark, DiagramStyle};
use super::{Canvas, Margins};

const GAP: f32 = 2.0;
const PADDING: f32 = 4.0;
const HEADER: f32 = 18.0;
const MIN_LABEL_AREA: f32 = 1600.0;

/// Slice-and-dice treemap: depth 0 splits horizontally, depth 1 vertically,
/// and so on. Each top-level branch keeps one palette colour.
pub(super) fn treemap(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let roots = content.treemap_data.as_deref().filter(|r| !r.is_empty())?;
    if roots.iter().map(TreeNode::total).sum::<f64>() <= 0.0 {
        return None;
    }
    let palette = style.chart_palette(roots.len());
    let mut canvas = Canvas::new(style, ChartType::Treemap, height, Margins::OPEN, false);
    let plot = canvas.plot;
    let mut tiles = Tiles {
        canvas: &mut canvas,
        colors: &palette,
    };
    tiles.split(roots, plot, 0, None);
    Some(canvas.finish())
}

struct Tiles<'c, 's> {
    canvas: &'c mut Canvas<'s>,
    colors: &'c [String],
}

impl Tiles<'_, '_> {
    fn split(&mut self, nodes: &[TreeNode], rect: Rect, depth: usize, inherited: Option<&str>) {
        if nodes.is_empty() || rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let total: f64 = nodes.iter().map(TreeNode::total).sum();
        if total <= 0.0 {
            return;
        }
        let colors = self.colors;
        let horizontal = depth % 2 == 0;
        let gaps = GAP * nodes.len().saturating_sub(1) as f32;
        let available = if horizontal {
            (rect.width - gaps).max(0.0)
        } else {
            (rect.height - gaps).max(0.0)
        };

        let mut offset = 0.0;
        for (i, node) in nodes.iter().enumerate() {
            let span = available * (node.total() / total) as f32;
            let tile = if horizontal {
                Rect::new(rect.x + offset, rect.y, span, rect.height)
            } else {
                Rect::new(rect.x, rect.y + offset, rect.width, span)
            };
            offset += span + GAP;
            if span <= 0.0 {
                continue;
            }
            let color = inherited.unwrap_or_else(|| colors[i % colors.len()].as_str());
            self.tile(node, tile, depth, color);
        }
    }

    fn tile(&mut self, node: &TreeNode, rect: Rect, depth: usize, color: &str) {
        let style = self.canvas.style;
        let opacity = (1.0 - depth as f32 * 0.18).max(0.4);
        self.canvas.rect(rect, color, opacity, 2.0);

        let leaf = node.children.is_empty();
        if rect.width * rect.height >= MIN_LABEL_AREA {
            let size = style.caption_size();
            let spec = style
                .on_fill(&node.name, size)
                .width(rect.width - 2.0 * PADDING)
                .lines(if leaf { 2 } else { 1 });
            let label = if leaf {
                let center = rect.center();
                spec.at(center.x, center.y, style.config)
            } else {
                spec.bold().below(rect.center().x, rect.y + 3.0, style.config)
            };
            self.canvas.push(ChartMark::Text(label));
        }
        if !leaf {
            let inner = Rect::new(
                rect.x + PADDING,
                rect.y + HEADER,
                rect.width - 2.0 * PADDING,
                rect.height - HEADER - PADDING,
            );
            if inner.width > 1.0 && inner.height > 1.0 {
                self.split(&node.children, inner, depth + 1, Some(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{rects, run};
    use super::*;

    fn leaf(name: &str, value: f64) -> TreeNode {
        TreeNode {
            name: name.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    #[test]
    fn top_level_splits_width_by_value() {
        let mut content = ChartContent::new(ChartType::Treemap);
        content.treemap_data = Some(vec![leaf("A", 3.0), leaf("B", 1.0)]);
        let layout = run(&content).unwrap();
        let tiles = rects(&layout);
        assert_eq!(tiles.len(), 2);
        assert!((tiles[0].0.width - 3.0 * tiles[1].0.width).abs() < 1e-2);
        assert_eq!(tiles[0].0.height, tiles[1].0.height);
        assert_ne!(tiles[0].1, tiles[1].1);
    }

    #[test]
    fn children_stack_vertically_inside_parent() {
        let mut content = ChartContent::new(ChartType::Treemap);
        content.treemap_data = Some(vec![TreeNode {
            name: "Product".into(),
            value: None,
            children: vec![leaf("Web", 2.0), leaf("Mobile", 2.0)],
        }]);
        let layout = run(&content).unwrap();
        let tiles = rects(&layout);
        assert_eq!(tiles.len(), 3);
        let (parent, first, second) = (tiles[0].0, tiles[1].0, tiles[2].0);
        assert_eq!(first.x, second.x);
        assert!(second.y > first.y);
        assert!(first.y >= parent.y && second.bottom() <= parent.bottom());
        assert!(tiles.iter().all(|t| t.1 == tiles[0].1));
        assert!(tiles[1].2 < tiles[0].2);
    }

    #[test]
    fn zero_total_renders_nothing() {
        let mut content = ChartContent::new(ChartType::Treemap);
        content.treemap_data = Some(vec![leaf("A", 0.0)]);
        assert!(run(&content).is_none());
    }
}
