//! Typed slide model: the closed `SlideData` union, freeform blocks, and the
//! per-family variant enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::variants::VariantOption;

/// Declares a rendering-variant enum backed by its registry strings.
///
/// Decoding an unknown string yields the first (default) variant, so an
/// invalid value can never be stored in a slide.
macro_rules! variant_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => ($value:literal, $label:literal) ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "&'static str")]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];
            pub const OPTIONS: &'static [VariantOption] = &[
                $( VariantOption { value: $value, label: $label } ),+
            ];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $value ),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $( $value => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::parse(&value).unwrap_or_else(|| {
                    tracing::debug!(
                        kind = stringify!($name),
                        value = %value,
                        "unknown variant, using default"
                    );
                    Self::default()
                })
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }
    };
}

variant_enum!(GridItemVariant {
    Solid => ("solid", "Solid"),
    Outline => ("outline", "Outline"),
    Sideline => ("sideline", "Side line"),
    Topline => ("topline", "Top line"),
    TopCircle => ("top-circle", "Top circle"),
    Joined => ("joined", "Joined"),
    Leaf => ("leaf", "Leaf"),
    Labeled => ("labeled", "Labeled"),
    Alternating => ("alternating", "Alternating"),
    Pillar => ("pillar", "Pillar"),
    Diamonds => ("diamonds", "Diamonds"),
    Signs => ("signs", "Signs"),
});

variant_enum!(SequenceVariant {
    Timeline => ("timeline", "Timeline"),
    Chain => ("chain", "Chain"),
    Arrows => ("arrows", "Arrows"),
    Pills => ("pills", "Pills"),
    RibbonArrows => ("ribbon-arrows", "Ribbon"),
    Numbered => ("numbered", "Numbered"),
    Zigzag => ("zigzag", "Zigzag"),
});

variant_enum!(CompareMode {
    Versus => ("versus", "Versus"),
    Quadrant => ("quadrant", "Quadrant"),
    Iceberg => ("iceberg", "Iceberg"),
});

variant_enum!(FunnelVariant {
    Funnel => ("funnel", "Funnel"),
    Pyramid => ("pyramid", "Pyramid"),
    Slope => ("slope", "Slope"),
});

variant_enum!(ConcentricVariant {
    Circles => ("circles", "Circles"),
    Diamond => ("diamond", "Diamond"),
    Target => ("target", "Target"),
});

variant_enum!(HubSpokeVariant {
    Orbit => ("orbit", "Orbit"),
    Solar => ("solar", "Solar"),
    Pinwheel => ("pinwheel", "Pinwheel"),
});

variant_enum!(VennVariant {
    Classic => ("classic", "Classic"),
    Linear => ("linear", "Linear"),
    LinearFilled => ("linear-filled", "Linear filled"),
});

variant_enum!(CycleVariant {
    Circular => ("circular", "Circular"),
    Gear => ("gear", "Gear"),
    Loop => ("loop", "Loop"),
});

variant_enum!(TableVariant {
    Striped => ("striped", "Striped"),
    Bordered => ("bordered", "Bordered"),
    Highlight => ("highlight", "Highlight"),
});

variant_enum!(RoadmapVariant {
    Horizontal => ("horizontal", "Horizontal"),
    Vertical => ("vertical", "Vertical"),
    Milestone => ("milestone", "Milestone"),
});

variant_enum!(StackVariant {
    Horizontal => ("horizontal", "Horizontal"),
    Vertical => ("vertical", "Vertical"),
    Offset => ("offset", "Offset"),
});

variant_enum!(
    /// Chart sub-kind. Each kind reads its own optional payload on `ChartContent`.
    ChartType {
        Bar => ("bar", "Bar"),
        HorizontalBar => ("horizontal-bar", "Horizontal bar"),
        StackedBar => ("stacked-bar", "Stacked bar"),
        Pie => ("pie", "Pie"),
        Donut => ("donut", "Donut"),
        Rose => ("rose", "Rose"),
        Line => ("line", "Line"),
        Area => ("area", "Area"),
        Radar => ("radar", "Radar"),
        Proportion => ("proportion", "Proportion"),
        Waterfall => ("waterfall", "Waterfall"),
        Combo => ("combo", "Combo"),
        Scatter => ("scatter", "Scatter"),
        Gauge => ("gauge", "Gauge"),
        Treemap => ("treemap", "Treemap"),
        Sankey => ("sankey", "Sankey"),
        Heatmap => ("heatmap", "Heatmap"),
        Sunburst => ("sunburst", "Sunburst"),
        Boxplot => ("boxplot", "Boxplot"),
        Gantt => ("gantt", "Gantt"),
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    Title,
    KeyPoint,
    Chart,
    GridItem,
    Sequence,
    Compare,
    Funnel,
    Concentric,
    HubSpoke,
    Venn,
    Cycle,
    Table,
    Roadmap,
    Swot,
    Mindmap,
    Stack,
    BlockSlide,
}

impl SlideKind {
    pub const ALL: [SlideKind; 17] = [
        SlideKind::Title,
        SlideKind::KeyPoint,
        SlideKind::Chart,
        SlideKind::GridItem,
        SlideKind::Sequence,
        SlideKind::Compare,
        SlideKind::Funnel,
        SlideKind::Concentric,
        SlideKind::HubSpoke,
        SlideKind::Venn,
        SlideKind::Cycle,
        SlideKind::Table,
        SlideKind::Roadmap,
        SlideKind::Swot,
        SlideKind::Mindmap,
        SlideKind::Stack,
        SlideKind::BlockSlide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlideKind::Title => "title",
            SlideKind::KeyPoint => "key-point",
            SlideKind::Chart => "chart",
            SlideKind::GridItem => "grid-item",
            SlideKind::Sequence => "sequence",
            SlideKind::Compare => "compare",
            SlideKind::Funnel => "funnel",
            SlideKind::Concentric => "concentric",
            SlideKind::HubSpoke => "hub-spoke",
            SlideKind::Venn => "venn",
            SlideKind::Cycle => "cycle",
            SlideKind::Table => "table",
            SlideKind::Roadmap => "roadmap",
            SlideKind::Swot => "swot",
            SlideKind::Mindmap => "mindmap",
            SlideKind::Stack => "stack",
            SlideKind::BlockSlide => "block-slide",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Kinds that can live inside a freeform block.
    pub fn is_diagram(self) -> bool {
        !matches!(
            self,
            SlideKind::Title | SlideKind::KeyPoint | SlideKind::BlockSlide
        )
    }
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown slide type `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticColor {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapStatus {
    Done,
    Active,
    #[default]
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterfallKind {
    Total,
    #[default]
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComboSeriesType {
    #[default]
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

// ─── Styling overrides ───

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<String>,
}

impl ColorOverrides {
    pub fn is_empty(&self) -> bool {
        self.text_color.is_none() && self.color_palette.is_none()
    }
}

/// Per-slide typography and color overrides; each field shadows the theme
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(flatten)]
    pub colors: ColorOverrides,
}

// ─── Shared content items ───

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledItem {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabeledItem {
    pub fn new(label: impl Into<String>, description: Option<String>) -> Self {
        Self {
            label: label.into(),
            description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_color: Option<SemanticColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItemContent {
    #[serde(default)]
    pub items: Vec<GridItem>,
    #[serde(default)]
    pub variant: GridItemVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceContent {
    #[serde(default)]
    pub steps: Vec<LabeledItem>,
    #[serde(default)]
    pub variant: SequenceVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareEntry {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareSide {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<CompareEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadrantItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareContent {
    #[serde(default)]
    pub mode: CompareMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<Vec<CompareSide>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadrant_items: Option<Vec<QuadrantItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<Vec<LabeledItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<Vec<LabeledItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelLayer {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelContent {
    #[serde(default)]
    pub layers: Vec<FunnelLayer>,
    #[serde(default)]
    pub variant: FunnelVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentricContent {
    #[serde(default)]
    pub rings: Vec<LabeledItem>,
    #[serde(default)]
    pub variant: ConcentricVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSpokeContent {
    #[serde(default)]
    pub center: LabeledItem,
    #[serde(default)]
    pub spokes: Vec<LabeledItem>,
    #[serde(default)]
    pub variant: HubSpokeVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VennContent {
    #[serde(default)]
    pub sets: Vec<LabeledItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intersection_label: Option<String>,
    #[serde(default)]
    pub variant: VennVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleContent {
    #[serde(default)]
    pub steps: Vec<LabeledItem>,
    #[serde(default)]
    pub variant: CycleVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableContent {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub variant: TableVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapTask {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub status: RoadmapStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub items: Vec<RoadmapTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapContent {
    #[serde(default)]
    pub phases: Vec<RoadmapPhase>,
    #[serde(default)]
    pub variant: RoadmapVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotContent {
    #[serde(default)]
    pub strengths: Vec<LabeledItem>,
    #[serde(default)]
    pub weaknesses: Vec<LabeledItem>,
    #[serde(default)]
    pub opportunities: Vec<LabeledItem>,
    #[serde(default)]
    pub threats: Vec<LabeledItem>,
}

impl SwotContent {
    /// Quadrants in S, W, O, T order.
    pub fn quadrants(&self) -> [&[LabeledItem]; 4] {
        [
            &self.strengths,
            &self.weaknesses,
            &self.opportunities,
            &self.threats,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapNode {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MindmapNode>,
}

impl MindmapNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapContent {
    #[serde(default)]
    pub root: MindmapNode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackContent {
    #[serde(default)]
    pub layers: Vec<LabeledItem>,
    #[serde(default)]
    pub variant: StackVariant,
}

// ─── Chart payloads ───

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartValue {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SemanticColor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub category: String,
    #[serde(default)]
    pub values: Vec<ChartValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarIndicator {
    pub name: String,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarSeries {
    pub name: String,
    #[serde(default)]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProportionItem {
    pub name: String,
    pub value: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterfallItem {
    pub name: String,
    pub value: f64,
    #[serde(rename = "type", default)]
    pub kind: WaterfallKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboSeries {
    pub name: String,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default)]
    pub series_type: ComboSeriesType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_index: Option<u32>,
}

/// Points are `[x, y]` or `[x, y, size]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub name: String,
    #[serde(default)]
    pub data: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaugeData {
    pub value: f64,
    pub max: f64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Own value, or the sum of the children when the node carries none.
    pub fn total(&self) -> f64 {
        match self.value {
            Some(value) => value.max(0.0),
            None => self.children.iter().map(TreeNode::total).sum(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

/// Five-number summary: min, q1, median, q3, max.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxplotItem {
    pub name: String,
    pub values: [f64; 5],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    pub name: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartContent {
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bars: Option<Vec<ChartBar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slices: Option<Vec<ChartSlice>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_series: Option<Vec<LineSeries>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<RadarIndicator>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar_series: Option<Vec<RadarSeries>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proportion_items: Option<Vec<ProportionItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterfall_items: Option<Vec<WaterfallItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo_series: Option<Vec<ComboSeries>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter_series: Option<Vec<ScatterSeries>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter_x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scatter_y_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge_data: Option<GaugeData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treemap_data: Option<Vec<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sankey_nodes: Option<Vec<SankeyNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sankey_links: Option<Vec<SankeyLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap_y_categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap_data: Option<Vec<[f64; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunburst_data: Option<Vec<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxplot_items: Option<Vec<BoxplotItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gantt_tasks: Option<Vec<GanttTask>>,
}

impl ChartContent {
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..Self::default()
        }
    }
}

// ─── Slides ───

/// A diagram slide: title, optional body, family-specific content, styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSlide<C> {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(flatten)]
    pub content: C,
    #[serde(flatten)]
    pub style: SlideStyle,
}

impl<C> DiagramSlide<C> {
    pub fn new(title: impl Into<String>, body: Option<String>, content: C) -> Self {
        Self {
            title: title.into(),
            body,
            content,
            style: SlideStyle::default(),
        }
    }
}

pub type ChartSlide = DiagramSlide<ChartContent>;
pub type GridItemSlide = DiagramSlide<GridItemContent>;
pub type SequenceSlide = DiagramSlide<SequenceContent>;
pub type CompareSlide = DiagramSlide<CompareContent>;
pub type FunnelSlide = DiagramSlide<FunnelContent>;
pub type ConcentricSlide = DiagramSlide<ConcentricContent>;
pub type HubSpokeSlide = DiagramSlide<HubSpokeContent>;
pub type VennSlide = DiagramSlide<VennContent>;
pub type CycleSlide = DiagramSlide<CycleContent>;
pub type TableSlide = DiagramSlide<TableContent>;
pub type RoadmapSlide = DiagramSlide<RoadmapContent>;
pub type SwotSlide = DiagramSlide<SwotContent>;
pub type MindmapSlide = DiagramSlide<MindmapContent>;
pub type StackSlide = DiagramSlide<StackContent>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSlide {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(flatten)]
    pub style: SlideStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPointSlide {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(flatten)]
    pub style: SlideStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSlide {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(flatten)]
    pub style: SlideStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SlideData {
    Title(TitleSlide),
    KeyPoint(KeyPointSlide),
    Chart(ChartSlide),
    GridItem(GridItemSlide),
    Sequence(SequenceSlide),
    Compare(CompareSlide),
    Funnel(FunnelSlide),
    Concentric(ConcentricSlide),
    HubSpoke(HubSpokeSlide),
    Venn(VennSlide),
    Cycle(CycleSlide),
    Table(TableSlide),
    Roadmap(RoadmapSlide),
    Swot(SwotSlide),
    Mindmap(MindmapSlide),
    Stack(StackSlide),
    BlockSlide(BlockSlide),
}

impl SlideData {
    pub fn kind(&self) -> SlideKind {
        match self {
            SlideData::Title(_) => SlideKind::Title,
            SlideData::KeyPoint(_) => SlideKind::KeyPoint,
            SlideData::Chart(_) => SlideKind::Chart,
            SlideData::GridItem(_) => SlideKind::GridItem,
            SlideData::Sequence(_) => SlideKind::Sequence,
            SlideData::Compare(_) => SlideKind::Compare,
            SlideData::Funnel(_) => SlideKind::Funnel,
            SlideData::Concentric(_) => SlideKind::Concentric,
            SlideData::HubSpoke(_) => SlideKind::HubSpoke,
            SlideData::Venn(_) => SlideKind::Venn,
            SlideData::Cycle(_) => SlideKind::Cycle,
            SlideData::Table(_) => SlideKind::Table,
            SlideData::Roadmap(_) => SlideKind::Roadmap,
            SlideData::Swot(_) => SlideKind::Swot,
            SlideData::Mindmap(_) => SlideKind::Mindmap,
            SlideData::Stack(_) => SlideKind::Stack,
            SlideData::BlockSlide(_) => SlideKind::BlockSlide,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SlideData::Title(s) => &s.title,
            SlideData::KeyPoint(s) => &s.title,
            SlideData::BlockSlide(s) => &s.title,
            SlideData::Chart(s) => &s.title,
            SlideData::GridItem(s) => &s.title,
            SlideData::Sequence(s) => &s.title,
            SlideData::Compare(s) => &s.title,
            SlideData::Funnel(s) => &s.title,
            SlideData::Concentric(s) => &s.title,
            SlideData::HubSpoke(s) => &s.title,
            SlideData::Venn(s) => &s.title,
            SlideData::Cycle(s) => &s.title,
            SlideData::Table(s) => &s.title,
            SlideData::Roadmap(s) => &s.title,
            SlideData::Swot(s) => &s.title,
            SlideData::Mindmap(s) => &s.title,
            SlideData::Stack(s) => &s.title,
        }
    }

    /// Body text. Title and block slides have none.
    pub fn body(&self) -> Option<&str> {
        let body = match self {
            SlideData::Title(_) | SlideData::BlockSlide(_) => None,
            SlideData::KeyPoint(s) => s.body.as_ref(),
            SlideData::Chart(s) => s.body.as_ref(),
            SlideData::GridItem(s) => s.body.as_ref(),
            SlideData::Sequence(s) => s.body.as_ref(),
            SlideData::Compare(s) => s.body.as_ref(),
            SlideData::Funnel(s) => s.body.as_ref(),
            SlideData::Concentric(s) => s.body.as_ref(),
            SlideData::HubSpoke(s) => s.body.as_ref(),
            SlideData::Venn(s) => s.body.as_ref(),
            SlideData::Cycle(s) => s.body.as_ref(),
            SlideData::Table(s) => s.body.as_ref(),
            SlideData::Roadmap(s) => s.body.as_ref(),
            SlideData::Swot(s) => s.body.as_ref(),
            SlideData::Mindmap(s) => s.body.as_ref(),
            SlideData::Stack(s) => s.body.as_ref(),
        };
        body.map(String::as_str)
    }

    pub fn subtitle(&self) -> Option<&str> {
        match self {
            SlideData::Title(s) => s.subtitle.as_deref(),
            SlideData::KeyPoint(s) => s.subtitle.as_deref(),
            _ => None,
        }
    }

    pub fn style(&self) -> &SlideStyle {
        match self {
            SlideData::Title(s) => &s.style,
            SlideData::KeyPoint(s) => &s.style,
            SlideData::BlockSlide(s) => &s.style,
            SlideData::Chart(s) => &s.style,
            SlideData::GridItem(s) => &s.style,
            SlideData::Sequence(s) => &s.style,
            SlideData::Compare(s) => &s.style,
            SlideData::Funnel(s) => &s.style,
            SlideData::Concentric(s) => &s.style,
            SlideData::HubSpoke(s) => &s.style,
            SlideData::Venn(s) => &s.style,
            SlideData::Cycle(s) => &s.style,
            SlideData::Table(s) => &s.style,
            SlideData::Roadmap(s) => &s.style,
            SlideData::Swot(s) => &s.style,
            SlideData::Mindmap(s) => &s.style,
            SlideData::Stack(s) => &s.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut SlideStyle {
        match self {
            SlideData::Title(s) => &mut s.style,
            SlideData::KeyPoint(s) => &mut s.style,
            SlideData::BlockSlide(s) => &mut s.style,
            SlideData::Chart(s) => &mut s.style,
            SlideData::GridItem(s) => &mut s.style,
            SlideData::Sequence(s) => &mut s.style,
            SlideData::Compare(s) => &mut s.style,
            SlideData::Funnel(s) => &mut s.style,
            SlideData::Concentric(s) => &mut s.style,
            SlideData::HubSpoke(s) => &mut s.style,
            SlideData::Venn(s) => &mut s.style,
            SlideData::Cycle(s) => &mut s.style,
            SlideData::Table(s) => &mut s.style,
            SlideData::Roadmap(s) => &mut s.style,
            SlideData::Swot(s) => &mut s.style,
            SlideData::Mindmap(s) => &mut s.style,
            SlideData::Stack(s) => &mut s.style,
        }
    }

    /// Current rendering variant (or mode / chart type) as its registry string.
    pub fn variant(&self) -> Option<&'static str> {
        match self {
            SlideData::GridItem(s) => Some(s.content.variant.as_str()),
            SlideData::Sequence(s) => Some(s.content.variant.as_str()),
            SlideData::Compare(s) => Some(s.content.mode.as_str()),
            SlideData::Funnel(s) => Some(s.content.variant.as_str()),
            SlideData::Concentric(s) => Some(s.content.variant.as_str()),
            SlideData::HubSpoke(s) => Some(s.content.variant.as_str()),
            SlideData::Venn(s) => Some(s.content.variant.as_str()),
            SlideData::Cycle(s) => Some(s.content.variant.as_str()),
            SlideData::Table(s) => Some(s.content.variant.as_str()),
            SlideData::Roadmap(s) => Some(s.content.variant.as_str()),
            SlideData::Stack(s) => Some(s.content.variant.as_str()),
            SlideData::Chart(s) => Some(s.content.chart_type.as_str()),
            SlideData::Title(_)
            | SlideData::KeyPoint(_)
            | SlideData::Swot(_)
            | SlideData::Mindmap(_)
            | SlideData::BlockSlide(_) => None,
        }
    }
}

// ─── Freeform blocks ───

/// Positioned block inside a block slide. Geometry is in percent of the
/// canvas; array order is paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub data: BlockData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramBlock<C> {
    #[serde(flatten)]
    pub content: C,
    #[serde(flatten)]
    pub colors: ColorOverrides,
}

impl<C> DiagramBlock<C> {
    pub fn new(content: C, colors: ColorOverrides) -> Self {
        Self { content, colors }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleBodyBlock {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<ImageFit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockData {
    TitleBody(TitleBodyBlock),
    Image(ImageBlock),
    Chart(DiagramBlock<ChartContent>),
    GridItem(DiagramBlock<GridItemContent>),
    Sequence(DiagramBlock<SequenceContent>),
    Compare(DiagramBlock<CompareContent>),
    Funnel(DiagramBlock<FunnelContent>),
    Concentric(DiagramBlock<ConcentricContent>),
    HubSpoke(DiagramBlock<HubSpokeContent>),
    Venn(DiagramBlock<VennContent>),
    Cycle(DiagramBlock<CycleContent>),
    Table(DiagramBlock<TableContent>),
    Roadmap(DiagramBlock<RoadmapContent>),
    Swot(DiagramBlock<SwotContent>),
    Mindmap(DiagramBlock<MindmapContent>),
    Stack(DiagramBlock<StackContent>),
}

impl BlockData {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockData::TitleBody(_) => "title-body",
            BlockData::Image(_) => "image",
            other => other
                .diagram_kind()
                .map(SlideKind::as_str)
                .unwrap_or("title-body"),
        }
    }

    /// Slide kind of a diagram block; `None` for text and image blocks.
    pub fn diagram_kind(&self) -> Option<SlideKind> {
        let kind = match self {
            BlockData::TitleBody(_) | BlockData::Image(_) => return None,
            BlockData::Chart(_) => SlideKind::Chart,
            BlockData::GridItem(_) => SlideKind::GridItem,
            BlockData::Sequence(_) => SlideKind::Sequence,
            BlockData::Compare(_) => SlideKind::Compare,
            BlockData::Funnel(_) => SlideKind::Funnel,
            BlockData::Concentric(_) => SlideKind::Concentric,
            BlockData::HubSpoke(_) => SlideKind::HubSpoke,
            BlockData::Venn(_) => SlideKind::Venn,
            BlockData::Cycle(_) => SlideKind::Cycle,
            BlockData::Table(_) => SlideKind::Table,
            BlockData::Roadmap(_) => SlideKind::Roadmap,
            BlockData::Swot(_) => SlideKind::Swot,
            BlockData::Mindmap(_) => SlideKind::Mindmap,
            BlockData::Stack(_) => SlideKind::Stack,
        };
        Some(kind)
    }

    pub fn colors(&self) -> Option<&ColorOverrides> {
        match self {
            BlockData::TitleBody(_) | BlockData::Image(_) => None,
            BlockData::Chart(b) => Some(&b.colors),
            BlockData::GridItem(b) => Some(&b.colors),
            BlockData::Sequence(b) => Some(&b.colors),
            BlockData::Compare(b) => Some(&b.colors),
            BlockData::Funnel(b) => Some(&b.colors),
            BlockData::Concentric(b) => Some(&b.colors),
            BlockData::HubSpoke(b) => Some(&b.colors),
            BlockData::Venn(b) => Some(&b.colors),
            BlockData::Cycle(b) => Some(&b.colors),
            BlockData::Table(b) => Some(&b.colors),
            BlockData::Roadmap(b) => Some(&b.colors),
            BlockData::Swot(b) => Some(&b.colors),
            BlockData::Mindmap(b) => Some(&b.colors),
            BlockData::Stack(b) => Some(&b.colors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_falls_back_to_default() {
        let slide: SlideData = serde_json::from_str(
            r#"{"type":"funnel","title":"Pipeline","layers":[],"variant":"hourglass"}"#,
        )
        .unwrap();
        let SlideData::Funnel(funnel) = slide else {
            panic!("expected funnel");
        };
        assert_eq!(funnel.content.variant, FunnelVariant::Funnel);
    }

    #[test]
    fn slide_tag_and_fields_use_web_casing() {
        let slide = SlideData::HubSpoke(DiagramSlide::new(
            "Platform",
            None,
            HubSpokeContent {
                center: LabeledItem::new("Core", None),
                spokes: vec![LabeledItem::new("Api", None)],
                variant: HubSpokeVariant::Pinwheel,
            },
        ));
        let json = serde_json::to_value(&slide).unwrap();
        assert_eq!(json["type"], "hub-spoke");
        assert_eq!(json["variant"], "pinwheel");
        assert_eq!(json["center"]["label"], "Core");
        assert!(json.get("body").is_none());
    }

    #[test]
    fn styling_overrides_are_flattened() {
        let slide: SlideData = serde_json::from_str(
            r##"{"type":"venn","title":"Overlap","sets":[{"label":"A"}],"variant":"linear",
                "titleSize":40,"textColor":"#111111","colorPalette":"ocean"}"##,
        )
        .unwrap();
        let style = slide.style();
        assert_eq!(style.title_size, Some(40.0));
        assert_eq!(style.colors.text_color.as_deref(), Some("#111111"));
        assert_eq!(style.colors.color_palette.as_deref(), Some("ocean"));
        assert_eq!(slide.variant(), Some("linear"));
    }

    #[test]
    fn chart_block_decodes_with_payload() {
        let block: BlockData = serde_json::from_str(
            r#"{"type":"chart","chartType":"pie","slices":[{"name":"A","value":60},{"name":"B","value":40}]}"#,
        )
        .unwrap();
        assert_eq!(block.type_name(), "chart");
        let BlockData::Chart(chart) = block else {
            panic!("expected chart block");
        };
        assert_eq!(chart.content.chart_type, ChartType::Pie);
        assert_eq!(chart.content.slices.map(|s| s.len()), Some(2));
    }

    #[test]
    fn slide_kind_round_trips_through_strings() {
        for kind in SlideKind::ALL {
            assert_eq!(SlideKind::parse(kind.as_str()), Some(kind));
        }
        assert!("diagram".parse::<SlideKind>().is_err());
    }

    #[test]
    fn tree_node_total_sums_children() {
        let node = TreeNode {
            name: "root".into(),
            value: None,
            children: vec![
                TreeNode {
                    name: "a".into(),
                    value: Some(3.0),
                    children: Vec::new(),
                },
                TreeNode {
                    name: "b".into(),
                    value: Some(4.5),
                    children: Vec::new(),
                },
            ],
        };
        assert_eq!(node.total(), 7.5);
    }
}
