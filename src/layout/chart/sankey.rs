use std::collections::{HashMap, VecDeque};

use crate::ir::{ChartContent, ChartType};

use super::super::geometry::Rect;
use super::super::{ChartLayout, ChartMark, DiagramStyle, TextAnchor};
use super::{Canvas, Margins};

const NODE_WIDTH: f32 = 12.0;
const NODE_GAP: f32 = 12.0;
const LINK_OPACITY: f32 = 0.35;

struct Flow {
    from: usize,
    to: usize,
    value: f64,
}

/// Column-ranked flow diagram. Nodes are placed by longest path from the
/// sources; each node is as tall as the larger of its inflow and outflow.
pub(super) fn sankey(content: &ChartContent, style: &DiagramStyle<'_>, height: f32) -> Option<ChartLayout> {
    let links = content.sankey_links.as_deref().unwrap_or_default();
    let mut names: Vec<String> = content
        .sankey_nodes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|n| n.name.clone())
        .collect();
    // Links may name nodes the node list forgot.
    for link in links {
        for name in [&link.source, &link.target] {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect();
    let flows: Vec<Flow> = links
        .iter()
        .filter(|l| l.value > 0.0 && l.source != l.target)
        .filter_map(|l| {
            Some(Flow {
                from: *index.get(l.source.as_str())?,
                to: *index.get(l.target.as_str())?,
                value: l.value,
            })
        })
        .collect();
    if flows.is_empty() {
        return None;
    }

    let n = names.len();
    let ranks = ranks(n, &flows);
    let max_rank = ranks.iter().copied().max().unwrap_or(0);

    let mut in_total = vec![0.0f64; n];
    let mut out_total = vec![0.0f64; n];
    for flow in &flows {
        out_total[flow.from] += flow.value;
        in_total[flow.to] += flow.value;
    }
    let totals: Vec<f64> = (0..n).map(|i| in_total[i].max(out_total[i])).collect();

    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for (i, &rank) in ranks.iter().enumerate() {
        if totals[i] > 0.0 {
            columns[rank].push(i);
        }
    }

    let palette = style.chart_palette(n);
    let mut canvas = Canvas::new(style, ChartType::Sankey, height, Margins(16.0, 16.0, 16.0, 16.0), false);
    let plot = canvas.plot;

    // One scale for every column so equal values have equal heights.
    let scale = columns
        .iter()
        .filter(|c| !c.is_empty())
        .map(|column| {
            let sum: f64 = column.iter().map(|&i| totals[i]).sum();
            let room = plot.height - NODE_GAP * column.len().saturating_sub(1) as f32;
            room.max(1.0) / sum as f32
        })
        .fold(f32::INFINITY, f32::min);
    let step = if max_rank > 0 {
        (plot.width - NODE_WIDTH) / max_rank as f32
    } else {
        0.0
    };

    let mut nodes = vec![Rect::new(0.0, 0.0, 0.0, 0.0); n];
    for (rank, column) in columns.iter().enumerate() {
        let used: f32 = column.iter().map(|&i| totals[i] as f32 * scale).sum::<f32>()
            + NODE_GAP * column.len().saturating_sub(1) as f32;
        let mut y = plot.y + (plot.height - used) / 2.0;
        for &i in column {
            let h = totals[i] as f32 * scale;
            nodes[i] = Rect::new(plot.x + rank as f32 * step, y, NODE_WIDTH, h);
            y += h + NODE_GAP;
        }
    }

    // Outflows leave top to bottom in target order; inflows arrive in source order.
    let mut order: Vec<usize> = (0..flows.len()).collect();
    order.sort_by(|&a, &b| {
        let (fa, fb) = (&flows[a], &flows[b]);
        nodes[fa.to].y.total_cmp(&nodes[fb.to].y)
    });
    let mut out_offset = vec![0.0f32; n];
    let mut source_tops = vec![0.0f32; flows.len()];
    for &k in &order {
        let flow = &flows[k];
        source_tops[k] = nodes[flow.from].y + out_offset[flow.from];
        out_offset[flow.from] += flow.value as f32 * scale;
    }
    order.sort_by(|&a, &b| {
        let (fa, fb) = (&flows[a], &flows[b]);
        nodes[fa.from].y.total_cmp(&nodes[fb.from].y)
    });
    let mut in_offset = vec![0.0f32; n];
    for &k in &order {
        let flow = &flows[k];
        let thickness = flow.value as f32 * scale;
        let target_top = nodes[flow.to].y + in_offset[flow.to];
        in_offset[flow.to] += thickness;
        canvas.push(ChartMark::Band {
            source_x: nodes[flow.from].right(),
            source_top: source_tops[k],
            source_bottom: source_tops[k] + thickness,
            target_x: nodes[flow.to].x,
            target_top,
            target_bottom: target_top + thickness,
            fill: palette[flow.from].clone(),
            opacity: LINK_OPACITY,
        });
    }

    for (i, name) in names.iter().enumerate() {
        if totals[i] <= 0.0 {
            continue;
        }
        let rect = nodes[i];
        canvas.rect(rect, &palette[i], 1.0, 0.0);
        let y = rect.center().y;
        if ranks[i] == max_rank && max_rank > 0 {
            canvas.fitted_caption(name, rect.x - 6.0, y, step - NODE_WIDTH - 12.0, TextAnchor::End);
        } else {
            canvas.fitted_caption(name, rect.right() + 6.0, y, (step - NODE_WIDTH - 12.0).max(80.0), TextAnchor::Start);
        }
    }
    Some(canvas.finish())
}

/// Longest-path ranks from a topological order. Nodes caught in a cycle keep
/// the rank reached before the cycle was entered.
fn ranks(n: usize, flows: &[Flow]) -> Vec<usize> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];
    for flow in flows {
        outgoing[flow.from].push(flow.to);
        indegree[flow.to] += 1;
    }
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut ranks = vec![0usize; n];
    let mut visited = 0;
    while let Some(node) = queue.pop_front() {
        visited += 1;
        for &to in &outgoing[node] {
            ranks[to] = ranks[to].max(ranks[node] + 1);
            indegree[to] -= 1;
            if indegree[to] == 0 {
                queue.push_back(to);
            }
        }
    }
    if visited < n {
        tracing::debug!(nodes = n - visited, "sankey links form a cycle");
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::super::tests::{rects, run};
    use super::*;
    use crate::ir::{SankeyLink, SankeyNode};

    fn link(source: &str, target: &str, value: f64) -> SankeyLink {
        SankeyLink {
            source: source.into(),
            target: target.into(),
            value,
        }
    }

    fn content(links: Vec<SankeyLink>) -> ChartContent {
        let mut content = ChartContent::new(ChartType::Sankey);
        content.sankey_nodes = Some(vec![SankeyNode { name: "Visits".into() }]);
        content.sankey_links = Some(links);
        content
    }

    #[test]
    fn nodes_fall_into_columns_by_depth() {
        let layout = run(&content(vec![
            link("Visits", "Signup", 60.0),
            link("Visits", "Bounce", 40.0),
            link("Signup", "Paid", 20.0),
        ]))
        .unwrap();
        let nodes = rects(&layout);
        assert_eq!(nodes.len(), 4);
        let xs: Vec<f32> = nodes.iter().map(|n| n.0.x).collect();
        assert_eq!(xs[1], xs[2]);
        assert!(xs[0] < xs[1] && xs[1] < xs[3]);
        // Source height equals the sum of its outflows.
        let children = nodes[1].0.height + nodes[2].0.height;
        assert!((nodes[0].0.height - children).abs() < 1e-2);
    }

    #[test]
    fn bands_join_adjacent_edges() {
        let layout = run(&content(vec![link("Visits", "Signup", 10.0)])).unwrap();
        let nodes = rects(&layout);
        let band = layout
            .marks
            .iter()
            .find_map(|m| match m {
                ChartMark::Band { source_x, target_x, .. } => Some((*source_x, *target_x)),
                _ => None,
            })
            .unwrap();
        assert_eq!(band.0, nodes[0].0.right());
        assert_eq!(band.1, nodes[1].0.x);
    }

    #[test]
    fn self_loops_and_zero_links_render_nothing() {
        assert!(run(&content(vec![link("Visits", "Visits", 5.0), link("Visits", "Out", 0.0)])).is_none());
    }
}
