use serde::Serialize;

use crate::ir::{
    CompareMode, CycleVariant, Direction, HubSpokeVariant, ImageFit, RoadmapStatus,
    RoadmapVariant, SequenceVariant, SlideKind, StackVariant, TableVariant,
};

use super::geometry::{Ellipse, Point, QuadCurve, Rect};

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A positioned text block. `y` is the vertical centre of the block.
#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub x: f32,
    pub y: f32,
    pub text: TextBlock,
    pub font_size: f32,
    pub color: String,
    pub anchor: TextAnchor,
    pub bold: bool,
}

impl Label {
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn top(&self) -> f32 {
        self.y - self.text.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.text.height / 2.0
    }
}

// ─── Grid ───

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardShape {
    Rounded,
    /// Large radius on the top-left and bottom-right corners only.
    Leaf,
    Square,
}

#[derive(Debug, Clone, Serialize)]
pub enum CardMarker {
    SideBar(Rect),
    TopBar(Rect),
    NumberCircle { center: Point, radius: f32, number: Label },
    Tab { rect: Rect, label: Label },
    Pillar(Rect),
    Diamond(Vec<Point>),
    Sign { center: Point, radius: f32, glyph: Label },
}

#[derive(Debug, Clone, Serialize)]
pub struct GridCardLayout {
    pub rect: Rect,
    pub shape: CardShape,
    pub radius: f32,
    pub fill: String,
    pub stroke: Option<String>,
    pub accent: String,
    pub marker: Option<CardMarker>,
    pub icon: Option<Label>,
    pub value: Option<Label>,
    pub title: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridLayout {
    pub width: f32,
    pub height: f32,
    pub columns: usize,
    pub rows: usize,
    pub cards: Vec<GridCardLayout>,
    /// Cards share edges; the renderer draws one outer frame.
    pub joined: Option<Rect>,
}

// ─── Sequence ───

#[derive(Debug, Clone, Serialize)]
pub enum StepShape {
    Card { radius: f32 },
    Pill,
    Chevron(Vec<Point>),
    /// Marker on a shared track with text below or beside it.
    Marker { center: Point, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    Arrow,
    Dot,
    Dashed,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceStepLayout {
    pub rect: Rect,
    pub shape: StepShape,
    pub fill: String,
    pub stroke: Option<String>,
    pub badge: Option<Label>,
    pub label: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectorLayout {
    pub from: Point,
    pub to: Point,
    pub kind: ConnectorKind,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceLayout {
    pub width: f32,
    pub height: f32,
    pub variant: SequenceVariant,
    pub direction: Direction,
    pub track: Option<(Point, Point)>,
    pub steps: Vec<SequenceStepLayout>,
    pub connectors: Vec<ConnectorLayout>,
}

// ─── Compare ───

#[derive(Debug, Clone, Serialize)]
pub struct VersusColumnLayout {
    pub rect: Rect,
    pub header_bar: Rect,
    pub color: String,
    pub name: Label,
    pub rows: Vec<(Label, Label)>,
    pub separators: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersusLayout {
    pub width: f32,
    pub height: f32,
    pub columns: Vec<VersusColumnLayout>,
    pub badges: Vec<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuadrantPointLayout {
    pub center: Point,
    pub radius: f32,
    pub color: String,
    pub label: Label,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuadrantLayout {
    pub width: f32,
    pub height: f32,
    pub plot: Rect,
    pub quadrants: Vec<(Rect, String)>,
    pub quadrant_labels: Vec<Label>,
    pub x_axis: Option<Label>,
    pub y_axis: Option<Label>,
    pub axis_color: String,
    pub points: Vec<QuadrantPointLayout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IcebergItemLayout {
    pub rect: Rect,
    pub label: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IcebergLayout {
    pub width: f32,
    pub height: f32,
    pub waterline_y: f32,
    pub tip: Vec<Point>,
    pub body: Vec<Point>,
    pub tip_color: String,
    pub body_color: String,
    pub water_color: String,
    pub visible_caption: Label,
    pub hidden_caption: Label,
    pub visible: Vec<IcebergItemLayout>,
    pub hidden: Vec<IcebergItemLayout>,
}

#[derive(Debug, Clone, Serialize)]
pub enum CompareLayout {
    Versus(VersusLayout),
    Quadrant(QuadrantLayout),
    Iceberg(IcebergLayout),
}

impl CompareLayout {
    pub fn mode(&self) -> CompareMode {
        match self {
            CompareLayout::Versus(_) => CompareMode::Versus,
            CompareLayout::Quadrant(_) => CompareMode::Quadrant,
            CompareLayout::Iceberg(_) => CompareMode::Iceberg,
        }
    }
}

// ─── Funnel ───

/// Horizontal extents of a layer in percent of the diagram width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FunnelClip {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelLayerLayout {
    pub rect: Rect,
    pub clip: FunnelClip,
    pub polygon: Vec<Point>,
    pub color: String,
    pub label: Label,
    pub description: Option<Label>,
    pub value: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelLayout {
    pub width: f32,
    pub height: f32,
    pub layers: Vec<FunnelLayerLayout>,
}

// ─── Concentric ───

#[derive(Debug, Clone, Serialize)]
pub enum RingShape {
    Circle { center: Point, radius: f32 },
    Diamond(Vec<Point>),
}

#[derive(Debug, Clone, Serialize)]
pub struct RingLayout {
    pub shape: RingShape,
    pub radius: f32,
    pub fill: String,
    pub fill_opacity: f32,
    pub stroke: String,
    pub leader: (Point, Point),
    pub label: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConcentricLayout {
    pub width: f32,
    pub height: f32,
    /// Outermost ring first; paint order.
    pub rings: Vec<RingLayout>,
    pub leader_color: String,
}

// ─── Hub and spoke ───

#[derive(Debug, Clone, Serialize)]
pub struct HubNodeLayout {
    pub center: Point,
    pub radius: f32,
    pub fill: String,
    pub fill_opacity: f32,
    pub label: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpokeLinkLayout {
    pub start: Point,
    pub end: Point,
    pub control: Option<Point>,
    pub color: String,
    pub opacity: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HaloLayout {
    pub radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HubSpokeLayout {
    pub width: f32,
    pub height: f32,
    pub variant: HubSpokeVariant,
    pub track: Option<Ellipse>,
    pub track_color: String,
    pub halos: Vec<HaloLayout>,
    pub links: Vec<SpokeLinkLayout>,
    pub center: HubNodeLayout,
    pub spokes: Vec<HubNodeLayout>,
}

// ─── Venn ───

#[derive(Debug, Clone, Serialize)]
pub struct VennCircleLayout {
    pub center: Point,
    pub radius: f32,
    pub color: String,
    pub fill_opacity: f32,
    pub label: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VennLayout {
    pub width: f32,
    pub height: f32,
    pub circles: Vec<VennCircleLayout>,
    pub intersection: Option<Label>,
}

// ─── Cycle ───

#[derive(Debug, Clone, Serialize)]
pub struct CycleNodeLayout {
    pub center: Point,
    pub radius: f32,
    pub color: String,
    pub gear: Option<Vec<Point>>,
    pub label: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleLayout {
    pub width: f32,
    pub height: f32,
    pub variant: CycleVariant,
    pub track: Option<Ellipse>,
    pub nodes: Vec<CycleNodeLayout>,
    pub connectors: Vec<QuadCurve>,
    pub connector_color: String,
}

// ─── Stack ───

#[derive(Debug, Clone, Serialize)]
pub struct StackLayerLayout {
    pub rect: Rect,
    pub color: String,
    pub z_index: usize,
    pub tag: Option<Label>,
    pub badge: Option<(Point, f32, Label)>,
    pub label: Label,
    pub description: Option<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StackLayout {
    pub width: f32,
    pub height: f32,
    pub variant: StackVariant,
    pub layers: Vec<StackLayerLayout>,
}

// ─── Table ───

#[derive(Debug, Clone, Serialize)]
pub struct TableRowLayout {
    pub rect: Rect,
    pub fill: Option<String>,
    pub header: bool,
    pub highlight: bool,
    pub cells: Vec<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableLayout {
    pub width: f32,
    pub height: f32,
    pub variant: TableVariant,
    pub column_x: Vec<f32>,
    pub rows: Vec<TableRowLayout>,
    pub border_color: String,
}

// ─── Swot ───

#[derive(Debug, Clone, Serialize)]
pub struct SwotQuadrantLayout {
    pub rect: Rect,
    pub color: String,
    pub heading: Label,
    pub icon: Label,
    pub items: Vec<Label>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwotLayout {
    pub width: f32,
    pub height: f32,
    pub quadrants: Vec<SwotQuadrantLayout>,
}

// ─── Roadmap ───

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapTaskLayout {
    pub marker: Point,
    pub status: RoadmapStatus,
    pub color: String,
    pub label: Label,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapPhaseLayout {
    pub rect: Rect,
    pub marker: Point,
    pub diamond: bool,
    pub color: String,
    pub label: Label,
    pub tasks: Vec<RoadmapTaskLayout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapLayout {
    pub width: f32,
    pub height: f32,
    pub variant: RoadmapVariant,
    pub track: (Point, Point),
    pub track_color: String,
    pub phases: Vec<RoadmapPhaseLayout>,
}

// ─── Mindmap ───

#[derive(Debug, Clone, Serialize)]
pub struct MindmapNodeLayout {
    pub rect: Rect,
    pub depth: usize,
    pub color: String,
    pub label: Label,
}

#[derive(Debug, Clone, Serialize)]
pub struct MindmapEdgeLayout {
    pub curve: QuadCurve,
    pub color: String,
    pub width: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MindmapLayout {
    pub width: f32,
    pub height: f32,
    pub edges: Vec<MindmapEdgeLayout>,
    pub nodes: Vec<MindmapNodeLayout>,
}

// ─── Chart ───

#[derive(Debug, Clone, Serialize)]
pub enum ChartMark {
    Rect {
        rect: Rect,
        fill: String,
        opacity: f32,
        radius: f32,
    },
    /// Annular sector; angles run clockwise from twelve o'clock in radians.
    Arc {
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        start_angle: f32,
        end_angle: f32,
        fill: String,
    },
    Polyline {
        points: Vec<Point>,
        stroke: String,
        width: f32,
        dashed: bool,
    },
    Polygon {
        points: Vec<Point>,
        fill: String,
        opacity: f32,
        stroke: Option<String>,
    },
    Dot {
        center: Point,
        radius: f32,
        fill: String,
        opacity: f32,
    },
    Line {
        from: Point,
        to: Point,
        stroke: String,
        width: f32,
        dashed: bool,
    },
    /// Sankey ribbon between two vertical spans.
    Band {
        source_x: f32,
        source_top: f32,
        source_bottom: f32,
        target_x: f32,
        target_top: f32,
        target_bottom: f32,
        fill: String,
        opacity: f32,
    },
    Text(Label),
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendItem {
    pub color: String,
    pub label: Label,
    pub swatch: Rect,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartLayout {
    pub width: f32,
    pub height: f32,
    pub chart_type: crate::ir::ChartType,
    pub plot: Rect,
    pub marks: Vec<ChartMark>,
    pub legend: Vec<LegendItem>,
}

// ─── Composition ───

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "family", content = "layout", rename_all = "kebab-case")]
pub enum DiagramData {
    Grid(GridLayout),
    Sequence(SequenceLayout),
    Compare(CompareLayout),
    Funnel(FunnelLayout),
    Concentric(ConcentricLayout),
    HubSpoke(HubSpokeLayout),
    Venn(VennLayout),
    Cycle(CycleLayout),
    Stack(StackLayout),
    Table(TableLayout),
    Swot(SwotLayout),
    Roadmap(RoadmapLayout),
    Mindmap(MindmapLayout),
    Chart(ChartLayout),
}

impl DiagramData {
    /// Intrinsic size of the diagram's own coordinate space.
    pub fn viewbox(&self) -> (f32, f32) {
        match self {
            DiagramData::Grid(l) => (l.width, l.height),
            DiagramData::Sequence(l) => (l.width, l.height),
            DiagramData::Compare(CompareLayout::Versus(l)) => (l.width, l.height),
            DiagramData::Compare(CompareLayout::Quadrant(l)) => (l.width, l.height),
            DiagramData::Compare(CompareLayout::Iceberg(l)) => (l.width, l.height),
            DiagramData::Funnel(l) => (l.width, l.height),
            DiagramData::Concentric(l) => (l.width, l.height),
            DiagramData::HubSpoke(l) => (l.width, l.height),
            DiagramData::Venn(l) => (l.width, l.height),
            DiagramData::Cycle(l) => (l.width, l.height),
            DiagramData::Stack(l) => (l.width, l.height),
            DiagramData::Table(l) => (l.width, l.height),
            DiagramData::Swot(l) => (l.width, l.height),
            DiagramData::Roadmap(l) => (l.width, l.height),
            DiagramData::Mindmap(l) => (l.width, l.height),
            DiagramData::Chart(l) => (l.width, l.height),
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            DiagramData::Grid(_) => "grid",
            DiagramData::Sequence(_) => "sequence",
            DiagramData::Compare(_) => "compare",
            DiagramData::Funnel(_) => "funnel",
            DiagramData::Concentric(_) => "concentric",
            DiagramData::HubSpoke(_) => "hub-spoke",
            DiagramData::Venn(_) => "venn",
            DiagramData::Cycle(_) => "cycle",
            DiagramData::Stack(_) => "stack",
            DiagramData::Table(_) => "table",
            DiagramData::Swot(_) => "swot",
            DiagramData::Roadmap(_) => "roadmap",
            DiagramData::Mindmap(_) => "mindmap",
            DiagramData::Chart(_) => "chart",
        }
    }
}

/// A diagram scaled into a frame on the slide, aspect ratio preserved.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedDiagram {
    pub frame: Rect,
    pub data: DiagramData,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeLayout {
    pub rect: Rect,
    pub fill: String,
    pub label: Label,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageLayout {
    pub rect: Rect,
    pub src: Option<String>,
    pub fit: ImageFit,
    pub fill: String,
    pub placeholder: Label,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockLayout {
    pub id: String,
    pub block_type: &'static str,
    pub rect: Rect,
    pub texts: Vec<Label>,
    pub image: Option<ImageLayout>,
    pub diagram: Option<PlacedDiagram>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub kind: SlideKind,
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub accent_bar: Option<Rect>,
    pub badge: Option<BadgeLayout>,
    pub texts: Vec<Label>,
    pub diagram: Option<PlacedDiagram>,
    pub blocks: Vec<BlockLayout>,
}
