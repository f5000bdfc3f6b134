use crate::ir::{MindmapContent, MindmapNode};

use super::geometry::{Point, QuadCurve, Rect, VB_H, VB_W, orbit_angle, orbit_position};
use super::{DiagramStyle, MindmapEdgeLayout, MindmapLayout, MindmapNodeLayout};

const ORBIT_RX: f32 = 230.0;
const ORBIT_RY: f32 = 150.0;
const FAN_DISTANCE: f32 = 120.0;
const FAN_SPREAD: f32 = 0.38;
const MAX_NODE_WIDTH: f32 = 150.0;
const MARGIN: f32 = 16.0;

fn node(text: &str, center: Point, depth: usize, color: &str, style: &DiagramStyle<'_>) -> MindmapNodeLayout {
    let config = style.config;
    let spec = match depth {
        0 => style.on_fill(text, style.label_size() + 2.0).bold(),
        1 => style.on_fill(text, style.label_size()).bold(),
        _ => style.caption(text),
    };
    let label = spec
        .width(MAX_NODE_WIDTH - 20.0)
        .lines(2)
        .at(center.x, center.y, config);
    let w = label.text.width + 24.0;
    let h = label.text.height + 14.0;
    MindmapNodeLayout {
        rect: Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h),
        depth,
        color: color.to_string(),
        label,
    }
}

fn edge(from: Point, to: Point, color: &str, width: f32) -> MindmapEdgeLayout {
    MindmapEdgeLayout {
        curve: QuadCurve {
            start: from,
            control: Point::new((from.x + to.x) / 2.0, to.y),
            end: to,
        },
        color: color.to_string(),
        width,
    }
}

fn has_content(root: &MindmapNode) -> bool {
    !root.label.trim().is_empty() || !root.children.is_empty()
}

pub(super) fn compute_mindmap_layout(
    content: &MindmapContent,
    style: &DiagramStyle<'_>,
) -> Option<MindmapLayout> {
    let root = &content.root;
    if !has_content(root) {
        return None;
    }
    let center = Point::new(VB_W / 2.0, VB_H / 2.0);
    let n = root.children.len();
    let palette = style.palette(n);

    let mut nodes = vec![node(&root.label, center, 0, &style.theme.accent_neutral, style)];
    let mut edges = Vec::new();

    for (i, child) in root.children.iter().enumerate() {
        let color = &palette[i];
        let pos = orbit_position(center, ORBIT_RX, ORBIT_RY, i, n);
        edges.push(edge(center, pos, color, 3.0));
        nodes.push(node(&child.label, pos, 1, color, style));

        let theta = orbit_angle(i, n);
        let m = child.children.len();
        for (k, grandchild) in child.children.iter().enumerate() {
            let angle = theta + (k as f32 - (m as f32 - 1.0) / 2.0) * FAN_SPREAD;
            let at = pos.offset(FAN_DISTANCE * angle.cos(), FAN_DISTANCE * angle.sin());
            edges.push(edge(pos, at, color, 1.5));
            nodes.push(node(&grandchild.label, at, 2, color, style));
            if !grandchild.children.is_empty() {
                tracing::debug!(
                    label = %grandchild.label,
                    "mindmap nodes below the third level are not drawn"
                );
            }
        }
    }

    Some(fit(nodes, edges))
}

/// Grows the canvas to the node bounds and centres the drawing in it.
fn fit(mut nodes: Vec<MindmapNodeLayout>, mut edges: Vec<MindmapEdgeLayout>) -> MindmapLayout {
    let (min_x, min_y, max_x, max_y) = nodes.iter().fold(
        (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
        |(x0, y0, x1, y1), n| {
            (
                x0.min(n.rect.x),
                y0.min(n.rect.y),
                x1.max(n.rect.right()),
                y1.max(n.rect.bottom()),
            )
        },
    );
    let width = VB_W.max(max_x - min_x + 2.0 * MARGIN);
    let height = VB_H.max(max_y - min_y + 2.0 * MARGIN);
    let dx = width / 2.0 - (min_x + max_x) / 2.0;
    let dy = height / 2.0 - (min_y + max_y) / 2.0;

    for node in &mut nodes {
        node.rect.x += dx;
        node.rect.y += dy;
        node.label.translate(dx, dy);
    }
    for edge in &mut edges {
        let c = &mut edge.curve;
        c.start = c.start.offset(dx, dy);
        c.control = c.control.offset(dx, dy);
        c.end = c.end.offset(dx, dy);
    }

    MindmapLayout {
        width,
        height,
        edges,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::ColorOverrides;
    use crate::theme::Theme;

    fn run(root: MindmapNode) -> Option<MindmapLayout> {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let colors = ColorOverrides::default();
        let style = DiagramStyle::new(&colors, &theme, &config);
        compute_mindmap_layout(&MindmapContent { root }, &style)
    }

    fn sample() -> MindmapNode {
        MindmapNode {
            label: "Strategy".into(),
            children: vec![
                MindmapNode {
                    label: "Market".into(),
                    children: vec![MindmapNode::leaf("Segments"), MindmapNode::leaf("Pricing")],
                },
                MindmapNode::leaf("Product"),
                MindmapNode::leaf("People"),
                MindmapNode::leaf("Finance"),
            ],
        }
    }

    #[test]
    fn root_sits_in_the_middle() {
        let layout = run(sample()).unwrap();
        let root = &layout.nodes[0];
        assert_eq!(root.depth, 0);
        let c = root.rect.center();
        assert!((c.x - layout.width / 2.0).abs() < 60.0);
        assert_eq!(layout.nodes.len(), 7);
        assert_eq!(layout.edges.len(), 6);
    }

    #[test]
    fn grandchildren_fan_away_from_the_root() {
        let layout = run(sample()).unwrap();
        let root = layout.nodes[0].rect.center();
        let market = layout.nodes[1].rect.center();
        for leaf in layout.nodes.iter().filter(|n| n.depth == 2) {
            assert!(leaf.rect.center().distance(root) > market.distance(root));
            assert_eq!(leaf.color, layout.nodes[1].color);
        }
    }

    #[test]
    fn nodes_stay_inside_the_canvas() {
        let layout = run(sample()).unwrap();
        for node in &layout.nodes {
            assert!(node.rect.x >= 0.0 && node.rect.right() <= layout.width);
            assert!(node.rect.y >= 0.0 && node.rect.bottom() <= layout.height);
        }
    }

    #[test]
    fn blank_root_renders_nothing() {
        assert!(run(MindmapNode::default()).is_none());
        let single = run(MindmapNode::leaf("Idea")).unwrap();
        assert_eq!(single.nodes.len(), 1);
        assert!(single.edges.is_empty());
    }
}
