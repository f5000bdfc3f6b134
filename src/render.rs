use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{ImageFit, RoadmapStatus};
use crate::layout::*;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Minimal SVG writer; every shape is appended as one element.
struct Svg<'a> {
    out: String,
    theme: &'a Theme,
    config: &'a LayoutConfig,
}

impl<'a> Svg<'a> {
    fn new(theme: &'a Theme, config: &'a LayoutConfig) -> Self {
        Self {
            out: String::new(),
            theme,
            config,
        }
    }

    fn raw(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn rect(&mut self, rect: Rect, radius: f32, fill: &str, extra: &str) {
        self.out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius:.2}\" fill=\"{}\" {extra}/>",
            rect.x,
            rect.y,
            rect.width.max(0.0),
            rect.height.max(0.0),
            escape_xml(fill),
        ));
    }

    fn circle(&mut self, center: Point, radius: f32, fill: &str, extra: &str) {
        self.out.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" {extra}/>",
            center.x,
            center.y,
            radius.max(0.0),
            escape_xml(fill),
        ));
    }

    fn ellipse(&mut self, ellipse: &Ellipse, stroke: &str, dashed: bool) {
        let dash = if dashed { " stroke-dasharray=\"6 6\"" } else { "" };
        self.out.push_str(&format!(
            "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"{dash}/>",
            ellipse.center.x,
            ellipse.center.y,
            ellipse.rx,
            ellipse.ry,
            escape_xml(stroke),
        ));
    }

    fn polygon(&mut self, points: &[Point], fill: &str, extra: &str) {
        if points.len() < 3 {
            return;
        }
        self.out.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" {extra}/>",
            points_attr(points),
            escape_xml(fill),
        ));
    }

    fn polyline(&mut self, points: &[Point], stroke: &str, width: f32, dashed: bool) {
        if points.len() < 2 {
            return;
        }
        let dash = if dashed { " stroke-dasharray=\"5 4\"" } else { "" };
        self.out.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width:.2}\" stroke-linejoin=\"round\"{dash}/>",
            points_attr(points),
            escape_xml(stroke),
        ));
    }

    fn line(&mut self, from: Point, to: Point, stroke: &str, width: f32, extra: &str) {
        self.out.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{width:.2}\" {extra}/>",
            from.x,
            from.y,
            to.x,
            to.y,
            escape_xml(stroke),
        ));
    }

    fn path(&mut self, d: &str, fill: &str, extra: &str) {
        self.out.push_str(&format!("<path d=\"{d}\" fill=\"{}\" {extra}/>", escape_xml(fill)));
    }

    fn curve(&mut self, curve: &QuadCurve, stroke: &str, width: f32, marker: bool) {
        let end = if marker { " marker-end=\"url(#arrow)\"" } else { "" };
        self.path(
            &format!(
                "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
                curve.start.x, curve.start.y, curve.control.x, curve.control.y, curve.end.x, curve.end.y
            ),
            "none",
            &format!("stroke=\"{}\" stroke-width=\"{width:.2}\"{end}", escape_xml(stroke)),
        );
    }

    fn label(&mut self, label: &Label) {
        let line_height = label.font_size * self.config.line_height;
        let anchor = match label.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let weight = if label.bold { " font-weight=\"700\"" } else { "" };
        // Baseline of the first line, centred in its line box.
        let start_y = label.top() + line_height / 2.0 + label.font_size * 0.35;
        self.out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{start_y:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\"{weight}>",
            label.x,
            escape_xml(&self.theme.font_family),
            label.font_size,
            escape_xml(&label.color),
        ));
        for (idx, line) in label.text.lines.iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { line_height };
            self.out.push_str(&format!(
                "<tspan x=\"{:.2}\" dy=\"{dy:.2}\">{}</tspan>",
                label.x,
                escape_xml(line)
            ));
        }
        self.out.push_str("</text>");
    }

    fn labels<'l>(&mut self, labels: impl IntoIterator<Item = &'l Label>) {
        for label in labels {
            self.label(label);
        }
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let render = RenderConfig {
        background: layout.background.clone(),
        ..RenderConfig::default()
    };
    render_svg_with(layout, theme, config, &render)
}

/// Same as [`render_svg`] with the slide background and corner radius taken
/// from `render`.
pub fn render_svg_with(layout: &Layout, theme: &Theme, config: &LayoutConfig, render: &RenderConfig) -> String {
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);
    let mut svg = Svg::new(theme, config);

    svg.raw(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.raw(&format!(
        "<defs><marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"9\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker></defs>",
        escape_xml(&theme.text_caption)
    ));
    svg.rect(
        Rect::new(0.0, 0.0, width, height),
        render.corner_radius,
        &render.background,
        "",
    );

    if let Some(bar) = layout.accent_bar {
        svg.rect(bar, bar.height / 2.0, &theme.accent_neutral, "");
    }
    if let Some(badge) = &layout.badge {
        svg.rect(badge.rect, badge.rect.height / 2.0, &badge.fill, "");
        svg.label(&badge.label);
    }
    svg.labels(&layout.texts);
    if let Some(placed) = &layout.diagram {
        placed_svg(&mut svg, placed);
    }
    for block in &layout.blocks {
        block_svg(&mut svg, block);
    }

    svg.raw("</svg>");
    svg.out
}

fn block_svg(svg: &mut Svg<'_>, block: &BlockLayout) {
    svg.raw(&format!("<g data-block=\"{}\">", escape_xml(&block.id)));
    if let Some(image) = &block.image {
        image_svg(svg, image);
    }
    svg.labels(&block.texts);
    if let Some(placed) = &block.diagram {
        placed_svg(svg, placed);
    }
    svg.raw("</g>");
}

fn image_svg(svg: &mut Svg<'_>, image: &ImageLayout) {
    let Some(src) = &image.src else {
        let dash = format!("stroke=\"{}\" stroke-dasharray=\"6 4\"", escape_xml(&svg.theme.border));
        svg.rect(image.rect, 8.0, &image.fill, &dash);
        svg.label(&image.placeholder);
        return;
    };
    let aspect = match image.fit {
        ImageFit::Cover => "xMidYMid slice",
        ImageFit::Contain => "xMidYMid meet",
        ImageFit::Fill => "none",
    };
    svg.raw(&format!(
        "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" href=\"{}\" preserveAspectRatio=\"{aspect}\"/>",
        image.rect.x,
        image.rect.y,
        image.rect.width,
        image.rect.height,
        escape_xml(src),
    ));
}

/// Scales the diagram's own coordinate space into its frame, centred and
/// aspect-preserving.
fn placed_svg(svg: &mut Svg<'_>, placed: &PlacedDiagram) {
    let (w, h) = placed.data.viewbox();
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let frame = placed.frame;
    let scale = (frame.width / w).min(frame.height / h);
    let dx = frame.x + (frame.width - w * scale) / 2.0;
    let dy = frame.y + (frame.height - h * scale) / 2.0;
    svg.raw(&format!(
        "<g class=\"diagram {}\" transform=\"translate({dx:.2} {dy:.2}) scale({scale:.4})\">",
        placed.data.family()
    ));
    diagram_svg(svg, &placed.data);
    svg.raw("</g>");
}

fn diagram_svg(svg: &mut Svg<'_>, data: &DiagramData) {
    match data {
        DiagramData::Grid(l) => grid_svg(svg, l),
        DiagramData::Sequence(l) => sequence_svg(svg, l),
        DiagramData::Compare(CompareLayout::Versus(l)) => versus_svg(svg, l),
        DiagramData::Compare(CompareLayout::Quadrant(l)) => quadrant_svg(svg, l),
        DiagramData::Compare(CompareLayout::Iceberg(l)) => iceberg_svg(svg, l),
        DiagramData::Funnel(l) => funnel_svg(svg, l),
        DiagramData::Concentric(l) => concentric_svg(svg, l),
        DiagramData::HubSpoke(l) => hub_spoke_svg(svg, l),
        DiagramData::Venn(l) => venn_svg(svg, l),
        DiagramData::Cycle(l) => cycle_svg(svg, l),
        DiagramData::Stack(l) => stack_svg(svg, l),
        DiagramData::Table(l) => table_svg(svg, l),
        DiagramData::Swot(l) => swot_svg(svg, l),
        DiagramData::Roadmap(l) => roadmap_svg(svg, l),
        DiagramData::Mindmap(l) => mindmap_svg(svg, l),
        DiagramData::Chart(l) => chart_svg(svg, l),
    }
}

fn stroke_attr(stroke: Option<&str>) -> String {
    stroke
        .map(|s| format!("stroke=\"{}\" stroke-width=\"1.5\"", escape_xml(s)))
        .unwrap_or_default()
}

/// Rounded rectangle with only the top-left and bottom-right corners curved.
fn leaf_path(rect: Rect, radius: f32) -> String {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    format!(
        "M {:.2} {y:.2} L {right:.2} {y:.2} L {right:.2} {:.2} Q {right:.2} {bottom:.2} {:.2} {bottom:.2} L {x:.2} {bottom:.2} L {x:.2} {:.2} Q {x:.2} {y:.2} {:.2} {y:.2} Z",
        x + r,
        bottom - r,
        right - r,
        y + r,
        x + r,
    )
}

fn grid_svg(svg: &mut Svg<'_>, layout: &GridLayout) {
    for card in &layout.cards {
        let stroke = stroke_attr(card.stroke.as_deref());
        match card.shape {
            CardShape::Leaf => svg.path(&leaf_path(card.rect, card.radius), &card.fill, &stroke),
            CardShape::Rounded => svg.rect(card.rect, card.radius, &card.fill, &stroke),
            CardShape::Square => svg.rect(card.rect, 0.0, &card.fill, &stroke),
        }
        match &card.marker {
            Some(CardMarker::SideBar(rect)) | Some(CardMarker::TopBar(rect)) | Some(CardMarker::Pillar(rect)) => {
                svg.rect(*rect, 2.0, &card.accent, "");
            }
            Some(CardMarker::NumberCircle { center, radius, number }) => {
                svg.circle(*center, *radius, &card.accent, "");
                svg.label(number);
            }
            Some(CardMarker::Tab { rect, label }) => {
                svg.rect(*rect, 4.0, &card.accent, "");
                svg.label(label);
            }
            Some(CardMarker::Diamond(points)) => svg.polygon(points, &card.accent, ""),
            Some(CardMarker::Sign { center, radius, glyph }) => {
                svg.circle(*center, *radius, &card.accent, "");
                svg.label(glyph);
            }
            None => {}
        }
        svg.labels(card.icon.iter().chain(&card.value));
        svg.label(&card.title);
        svg.labels(&card.description);
    }
    if let Some(frame) = layout.joined {
        let stroke = format!("stroke=\"{}\" stroke-width=\"1.5\"", escape_xml(&svg.theme.border));
        svg.rect(frame, 0.0, "none", &stroke);
    }
}

fn sequence_svg(svg: &mut Svg<'_>, layout: &SequenceLayout) {
    let border = svg.theme.border.clone();
    if let Some((from, to)) = layout.track {
        svg.line(from, to, &border, 2.0, "");
    }
    for connector in &layout.connectors {
        match connector.kind {
            ConnectorKind::Arrow => svg.line(
                connector.from,
                connector.to,
                &connector.color,
                1.5,
                "marker-end=\"url(#arrow)\"",
            ),
            ConnectorKind::Dashed => svg.line(
                connector.from,
                connector.to,
                &connector.color,
                1.5,
                "stroke-dasharray=\"4 4\"",
            ),
            ConnectorKind::Dot => svg.circle(connector.from.lerp(connector.to, 0.5), 3.0, &connector.color, ""),
        }
    }
    for step in &layout.steps {
        let stroke = stroke_attr(step.stroke.as_deref());
        match &step.shape {
            StepShape::Card { radius } => svg.rect(step.rect, *radius, &step.fill, &stroke),
            StepShape::Pill => svg.rect(step.rect, step.rect.height / 2.0, &step.fill, &stroke),
            StepShape::Chevron(points) => svg.polygon(points, &step.fill, &stroke),
            StepShape::Marker { center, radius } => svg.circle(*center, *radius, &step.fill, &stroke),
        }
        svg.labels(&step.badge);
        svg.label(&step.label);
        svg.labels(&step.description);
    }
}

fn versus_svg(svg: &mut Svg<'_>, layout: &VersusLayout) {
    let border = svg.theme.border.clone();
    let card = svg.theme.card_background.clone();
    let stroke = format!("stroke=\"{}\" stroke-width=\"1\"", escape_xml(&border));
    for column in &layout.columns {
        svg.rect(column.rect, svg.config.card_radius, &card, &stroke);
        svg.rect(column.header_bar, 0.0, &column.color, "");
        svg.label(&column.name);
        for &y in &column.separators {
            svg.line(
                Point::new(column.rect.x + 12.0, y),
                Point::new(column.rect.right() - 12.0, y),
                &border,
                1.0,
                "",
            );
        }
        for (label, value) in &column.rows {
            svg.label(label);
            svg.label(value);
        }
    }
    svg.labels(&layout.badges);
}

fn quadrant_svg(svg: &mut Svg<'_>, layout: &QuadrantLayout) {
    for (rect, fill) in &layout.quadrants {
        svg.rect(*rect, 0.0, fill, "fill-opacity=\"0.12\"");
    }
    let plot = layout.plot;
    let center = plot.center();
    let axis = layout.axis_color.clone();
    svg.line(Point::new(plot.x, center.y), Point::new(plot.right(), center.y), &axis, 1.5, "");
    svg.line(Point::new(center.x, plot.y), Point::new(center.x, plot.bottom()), &axis, 1.5, "");
    svg.labels(&layout.quadrant_labels);
    svg.labels(layout.x_axis.iter().chain(&layout.y_axis));
    for point in &layout.points {
        svg.circle(point.center, point.radius, &point.color, "");
        svg.label(&point.label);
    }
}

fn iceberg_svg(svg: &mut Svg<'_>, layout: &IcebergLayout) {
    svg.rect(
        Rect::new(0.0, layout.waterline_y, layout.width, layout.height - layout.waterline_y),
        0.0,
        &layout.water_color,
        "fill-opacity=\"0.15\"",
    );
    svg.polygon(&layout.body, &layout.body_color, "");
    svg.polygon(&layout.tip, &layout.tip_color, "");
    svg.line(
        Point::new(0.0, layout.waterline_y),
        Point::new(layout.width, layout.waterline_y),
        &layout.water_color,
        2.0,
        "stroke-dasharray=\"8 6\"",
    );
    svg.label(&layout.visible_caption);
    svg.label(&layout.hidden_caption);
    for item in layout.visible.iter().chain(&layout.hidden) {
        svg.label(&item.label);
        svg.labels(&item.description);
    }
}

fn funnel_svg(svg: &mut Svg<'_>, layout: &FunnelLayout) {
    for layer in &layout.layers {
        svg.polygon(&layer.polygon, &layer.color, "");
        svg.label(&layer.label);
        svg.labels(layer.description.iter().chain(&layer.value));
    }
}

fn concentric_svg(svg: &mut Svg<'_>, layout: &ConcentricLayout) {
    for ring in &layout.rings {
        let extra = format!(
            "fill-opacity=\"{:.2}\" stroke=\"{}\" stroke-width=\"1.5\"",
            ring.fill_opacity,
            escape_xml(&ring.stroke)
        );
        match &ring.shape {
            RingShape::Circle { center, radius } => svg.circle(*center, *radius, &ring.fill, &extra),
            RingShape::Diamond(points) => svg.polygon(points, &ring.fill, &extra),
        }
    }
    let leader = layout.leader_color.clone();
    for ring in &layout.rings {
        svg.line(ring.leader.0, ring.leader.1, &leader, 1.0, "stroke-dasharray=\"3 3\"");
        svg.circle(ring.leader.0, 2.5, &leader, "");
        svg.label(&ring.label);
        svg.labels(&ring.description);
    }
}

fn hub_node_svg(svg: &mut Svg<'_>, node: &HubNodeLayout) {
    svg.circle(
        node.center,
        node.radius,
        &node.fill,
        &format!("fill-opacity=\"{:.2}\"", node.fill_opacity),
    );
    svg.label(&node.label);
    svg.labels(&node.description);
}

fn hub_spoke_svg(svg: &mut Svg<'_>, layout: &HubSpokeLayout) {
    if let Some(track) = &layout.track {
        svg.ellipse(track, &layout.track_color, true);
    }
    for halo in &layout.halos {
        svg.circle(
            layout.center.center,
            halo.radius,
            &layout.center.fill,
            &format!("fill-opacity=\"{:.2}\"", halo.opacity),
        );
    }
    for link in &layout.links {
        let extra = format!("stroke-opacity=\"{:.2}\" stroke-linecap=\"round\"", link.opacity);
        match link.control {
            Some(control) => svg.path(
                &format!(
                    "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
                    link.start.x, link.start.y, control.x, control.y, link.end.x, link.end.y
                ),
                "none",
                &format!("stroke=\"{}\" stroke-width=\"{:.2}\" {extra}", escape_xml(&link.color), link.width),
            ),
            None => svg.line(link.start, link.end, &link.color, link.width, &extra),
        }
    }
    hub_node_svg(svg, &layout.center);
    for spoke in &layout.spokes {
        hub_node_svg(svg, spoke);
    }
}

fn venn_svg(svg: &mut Svg<'_>, layout: &VennLayout) {
    for circle in &layout.circles {
        let extra = format!(
            "fill-opacity=\"{:.2}\" stroke=\"{}\" stroke-width=\"1.5\"",
            circle.fill_opacity,
            escape_xml(&circle.color)
        );
        svg.circle(circle.center, circle.radius, &circle.color, &extra);
    }
    for circle in &layout.circles {
        svg.label(&circle.label);
        svg.labels(&circle.description);
    }
    svg.labels(&layout.intersection);
}

fn cycle_svg(svg: &mut Svg<'_>, layout: &CycleLayout) {
    if let Some(track) = &layout.track {
        svg.ellipse(track, &layout.connector_color, false);
    }
    for connector in &layout.connectors {
        svg.curve(connector, &layout.connector_color, 2.0, true);
    }
    for node in &layout.nodes {
        match &node.gear {
            Some(points) => svg.polygon(points, &node.color, ""),
            None => svg.circle(node.center, node.radius, &node.color, ""),
        }
        svg.label(&node.label);
        svg.labels(&node.description);
    }
}

fn stack_svg(svg: &mut Svg<'_>, layout: &StackLayout) {
    let mut layers: Vec<&StackLayerLayout> = layout.layers.iter().collect();
    layers.sort_by_key(|l| l.z_index);
    for layer in layers {
        svg.rect(layer.rect, svg.config.card_radius / 2.0, &layer.color, "");
        svg.labels(&layer.tag);
        if let Some((center, radius, label)) = &layer.badge {
            svg.circle(*center, *radius, "#FFFFFF", "fill-opacity=\"0.25\"");
            svg.label(label);
        }
        svg.label(&layer.label);
        svg.labels(&layer.description);
    }
}

fn table_svg(svg: &mut Svg<'_>, layout: &TableLayout) {
    let border = layout.border_color.clone();
    let bordered = layout.variant == crate::ir::TableVariant::Bordered;
    for row in &layout.rows {
        if let Some(fill) = &row.fill {
            svg.rect(row.rect, 0.0, fill, "");
        }
        if bordered || row.header {
            svg.line(
                Point::new(row.rect.x, row.rect.bottom()),
                Point::new(row.rect.right(), row.rect.bottom()),
                &border,
                1.0,
                "",
            );
        }
        svg.labels(&row.cells);
    }
    if bordered && let (Some(first), Some(last)) = (layout.rows.first(), layout.rows.last()) {
        for &x in &layout.column_x {
            svg.line(Point::new(x, first.rect.y), Point::new(x, last.rect.bottom()), &border, 1.0, "");
        }
        let frame = Rect::new(first.rect.x, first.rect.y, first.rect.width, last.rect.bottom() - first.rect.y);
        let stroke = format!("stroke=\"{}\" stroke-width=\"1\"", escape_xml(&border));
        svg.rect(frame, 0.0, "none", &stroke);
    }
}

fn swot_svg(svg: &mut Svg<'_>, layout: &SwotLayout) {
    for quadrant in &layout.quadrants {
        svg.rect(quadrant.rect, svg.config.card_radius, &quadrant.color, "fill-opacity=\"0.1\"");
        svg.rect(
            Rect::new(quadrant.rect.x, quadrant.rect.y, 4.0, quadrant.rect.height),
            0.0,
            &quadrant.color,
            "",
        );
        svg.label(&quadrant.icon);
        svg.label(&quadrant.heading);
        svg.labels(&quadrant.items);
    }
}

fn roadmap_svg(svg: &mut Svg<'_>, layout: &RoadmapLayout) {
    svg.line(layout.track.0, layout.track.1, &layout.track_color, 3.0, "stroke-linecap=\"round\"");
    for phase in &layout.phases {
        if phase.diamond {
            let (c, r) = (phase.marker, 9.0);
            let points = [
                Point::new(c.x, c.y - r),
                Point::new(c.x + r, c.y),
                Point::new(c.x, c.y + r),
                Point::new(c.x - r, c.y),
            ];
            svg.polygon(&points, &phase.color, "");
        } else {
            svg.circle(phase.marker, 8.0, &phase.color, "");
        }
        svg.label(&phase.label);
        for task in &phase.tasks {
            match task.status {
                RoadmapStatus::Done => svg.circle(task.marker, 4.0, &task.color, ""),
                RoadmapStatus::Active => svg.circle(
                    task.marker,
                    4.0,
                    &task.color,
                    &format!("stroke=\"{}\" stroke-width=\"3\" stroke-opacity=\"0.3\"", escape_xml(&task.color)),
                ),
                RoadmapStatus::Pending => svg.circle(
                    task.marker,
                    3.5,
                    "none",
                    &format!("stroke=\"{}\" stroke-width=\"1.5\"", escape_xml(&task.color)),
                ),
            }
            svg.label(&task.label);
        }
    }
}

fn mindmap_svg(svg: &mut Svg<'_>, layout: &MindmapLayout) {
    for edge in &layout.edges {
        svg.curve(&edge.curve, &edge.color, edge.width, false);
    }
    let card = svg.theme.card_background.clone();
    for node in &layout.nodes {
        if node.depth == 0 {
            svg.rect(node.rect, node.rect.height / 2.0, &node.color, "");
        } else {
            let stroke = format!("stroke=\"{}\" stroke-width=\"1.5\"", escape_xml(&node.color));
            svg.rect(node.rect, 8.0, &card, &stroke);
        }
        svg.label(&node.label);
    }
}

/// Annular sector with angles clockwise from twelve o'clock.
fn arc_path(center: Point, inner: f32, outer: f32, start: f32, end: f32) -> String {
    let sweep = (end - start).abs();
    // A full turn cannot be drawn as a single arc.
    let end = if sweep >= std::f32::consts::TAU - 1e-4 { start + std::f32::consts::TAU - 1e-3 } else { end };
    let at = |r: f32, a: f32| Point::new(center.x + r * a.sin(), center.y - r * a.cos());
    let large = if (end - start).abs() > std::f32::consts::PI { 1 } else { 0 };
    let (o0, o1) = (at(outer, start), at(outer, end));
    if inner <= 0.0 {
        return format!(
            "M {:.2} {:.2} L {:.2} {:.2} A {outer:.2} {outer:.2} 0 {large} 1 {:.2} {:.2} Z",
            center.x, center.y, o0.x, o0.y, o1.x, o1.y
        );
    }
    let (i0, i1) = (at(inner, start), at(inner, end));
    format!(
        "M {:.2} {:.2} A {outer:.2} {outer:.2} 0 {large} 1 {:.2} {:.2} L {:.2} {:.2} A {inner:.2} {inner:.2} 0 {large} 0 {:.2} {:.2} Z",
        o0.x, o0.y, o1.x, o1.y, i1.x, i1.y, i0.x, i0.y
    )
}

/// Ribbon between two vertical spans joined by horizontal cubic tangents.
fn band_path(sx: f32, st: f32, sb: f32, tx: f32, tt: f32, tb: f32) -> String {
    let mid = (sx + tx) / 2.0;
    format!(
        "M {sx:.2} {st:.2} C {mid:.2} {st:.2} {mid:.2} {tt:.2} {tx:.2} {tt:.2} L {tx:.2} {tb:.2} C {mid:.2} {tb:.2} {mid:.2} {sb:.2} {sx:.2} {sb:.2} Z"
    )
}

fn chart_svg(svg: &mut Svg<'_>, layout: &ChartLayout) {
    let background = svg.theme.slide_background.clone();
    for mark in &layout.marks {
        match mark {
            ChartMark::Rect {
                rect,
                fill,
                opacity,
                radius,
            } => svg.rect(*rect, *radius, fill, &format!("fill-opacity=\"{opacity:.2}\"")),
            ChartMark::Arc {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
                fill,
            } => svg.path(
                &arc_path(*center, *inner_radius, *outer_radius, *start_angle, *end_angle),
                fill,
                &format!("stroke=\"{}\" stroke-width=\"1\"", escape_xml(&background)),
            ),
            ChartMark::Polyline {
                points,
                stroke,
                width,
                dashed,
            } => svg.polyline(points, stroke, *width, *dashed),
            ChartMark::Polygon {
                points,
                fill,
                opacity,
                stroke,
            } => svg.polygon(
                points,
                fill,
                &format!("fill-opacity=\"{opacity:.2}\" {}", stroke_attr(stroke.as_deref())),
            ),
            ChartMark::Dot {
                center,
                radius,
                fill,
                opacity,
            } => svg.circle(*center, *radius, fill, &format!("fill-opacity=\"{opacity:.2}\"")),
            ChartMark::Line {
                from,
                to,
                stroke,
                width,
                dashed,
            } => {
                let extra = if *dashed { "stroke-dasharray=\"4 3\"" } else { "" };
                svg.line(*from, *to, stroke, *width, extra);
            }
            ChartMark::Band {
                source_x,
                source_top,
                source_bottom,
                target_x,
                target_top,
                target_bottom,
                fill,
                opacity,
            } => svg.path(
                &band_path(*source_x, *source_top, *source_bottom, *target_x, *target_top, *target_bottom),
                fill,
                &format!("fill-opacity=\"{opacity:.2}\""),
            ),
            ChartMark::Text(label) => svg.label(label),
        }
    }
    for item in &layout.legend {
        svg.rect(item.swatch, 2.0, &item.color, "");
        svg.label(&item.label);
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = render_cfg.scale.max(0.1);
    let size = tree.size().to_int_size();
    let width = (size.width() as f32 * scale).ceil() as u32;
    let height = (size.height() as f32 * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::from_scale(scale, scale), &mut pixmap_mut);
    pixmap.save_png(output)?;
    tracing::debug!(width, height, path = %output.display(), "wrote png");
    Ok(())
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::create_default_slide;
    use crate::ir::{ChartType, SlideData, SlideKind};
    use crate::layout::compute_layout;

    fn render(slide: &SlideData) -> String {
        let theme = Theme::swiss();
        let config = LayoutConfig::default();
        let layout = compute_layout(slide, &theme, &config);
        render_svg(&layout, &theme, &config)
    }

    #[test]
    fn every_default_slide_renders() {
        for kind in SlideKind::ALL {
            let svg = render(&create_default_slide(kind));
            assert!(svg.starts_with("<svg"), "{kind}");
            assert!(svg.ends_with("</svg>"), "{kind}");
            if kind.is_diagram() {
                assert!(svg.contains("class=\"diagram"), "{kind}");
            }
        }
    }

    #[test]
    fn every_chart_type_renders() {
        for chart_type in ChartType::ALL {
            let slide = crate::convert::convert_to_type(
                &create_default_slide(SlideKind::Chart),
                SlideKind::Chart,
                Some(chart_type.as_str()),
            );
            let rebuilt = crate::convert::build_target(
                SlideKind::Chart,
                slide.title(),
                None,
                &crate::convert::extract_common_items(&slide).items,
                Some(chart_type.as_str()),
            );
            let svg = render(&rebuilt);
            assert!(svg.contains("</svg>"), "{chart_type}");
        }
    }

    #[test]
    fn text_is_escaped() {
        let mut slide = create_default_slide(SlideKind::KeyPoint);
        if let SlideData::KeyPoint(s) = &mut slide {
            s.title = "R&D <plans>".into();
        }
        let svg = render(&slide);
        assert!(svg.contains("R&amp;D &lt;plans&gt;"));
        assert!(!svg.contains("<plans>"));
    }

    #[test]
    fn arcs_cover_full_turns() {
        let d = arc_path(Point::new(0.0, 0.0), 0.0, 10.0, 0.0, std::f32::consts::TAU);
        assert!(d.contains(" 1 1 "));
        assert_eq!(escape_xml("a\"b'"), "a&quot;b&apos;");
    }
}
