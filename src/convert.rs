//! Conversion between slide kinds through a neutral list of common items,
//! default slides per kind, and a small layout recommender.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ir::*;
use crate::variants::{is_valid_variant, resolve_variant};

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex")
});

const MAX_RINGS: usize = 5;
const MAX_SETS: usize = 4;

/// One entry of the neutral interchange form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl CommonItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn described(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            value: None,
        }
    }

    pub fn valued(name: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            name: name.into(),
            description: None,
            value,
        }
    }
}

impl From<&LabeledItem> for CommonItem {
    fn from(item: &LabeledItem) -> Self {
        Self::described(item.label.clone(), item.description.clone())
    }
}

impl From<&CommonItem> for LabeledItem {
    fn from(item: &CommonItem) -> Self {
        LabeledItem::new(item.name.clone(), item.description.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonSlideData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub items: Vec<CommonItem>,
}

// ─── Extract ───

fn labeled(items: &[LabeledItem]) -> Vec<CommonItem> {
    items.iter().map(CommonItem::from).collect()
}

/// Leading numeric prefix of `text`, e.g. `"12.5%"` gives `12.5`. Zero and
/// non-numeric text give `None`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let found = LEADING_NUMBER.find(text.trim())?;
    found.as_str().parse::<f64>().ok().filter(|v| *v != 0.0 && v.is_finite())
}

/// Neutral items for any slide. Never fails; kinds without items give an
/// empty list.
pub fn extract_common_items(slide: &SlideData) -> CommonSlideData {
    let title = slide.title().to_string();
    let body = slide.body().map(str::to_string);
    let items = match slide {
        SlideData::Title(s) => {
            return CommonSlideData {
                title,
                body: s.subtitle.clone(),
                items: Vec::new(),
            };
        }
        SlideData::KeyPoint(_) | SlideData::BlockSlide(_) => Vec::new(),
        SlideData::Chart(s) => chart_items(&s.content),
        SlideData::GridItem(s) => s
            .content
            .items
            .iter()
            .map(|item| CommonItem {
                name: item.title.clone(),
                description: item.description.clone(),
                value: item.value.as_deref().and_then(parse_leading_number),
            })
            .collect(),
        SlideData::Sequence(s) => labeled(&s.content.steps),
        SlideData::Compare(s) => compare_items(&s.content),
        SlideData::Funnel(s) => s
            .content
            .layers
            .iter()
            .map(|layer| CommonItem {
                name: layer.label.clone(),
                description: layer.description.clone(),
                value: layer.value,
            })
            .collect(),
        SlideData::Concentric(s) => labeled(&s.content.rings),
        SlideData::HubSpoke(s) => std::iter::once(CommonItem::from(&s.content.center))
            .chain(s.content.spokes.iter().map(CommonItem::from))
            .collect(),
        SlideData::Venn(s) => labeled(&s.content.sets),
        SlideData::Cycle(s) => labeled(&s.content.steps),
        SlideData::Table(s) => s
            .content
            .rows
            .iter()
            .map(|row| CommonItem {
                name: row.cells.first().cloned().unwrap_or_default(),
                description: Some(row.cells.iter().skip(1).cloned().collect::<Vec<_>>().join(", ")),
                value: None,
            })
            .collect(),
        SlideData::Roadmap(s) => s
            .content
            .phases
            .iter()
            .map(|phase| CommonItem {
                name: phase.label.clone(),
                description: Some(
                    phase
                        .items
                        .iter()
                        .map(|task| task.label.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                value: None,
            })
            .collect(),
        SlideData::Swot(s) => s
            .content
            .quadrants()
            .into_iter()
            .flat_map(labeled)
            .collect(),
        SlideData::Mindmap(s) => {
            let root = &s.content.root;
            let mut items = vec![CommonItem::named(root.label.clone())];
            for child in &root.children {
                items.push(CommonItem::named(child.label.clone()));
                items.extend(child.children.iter().map(|gc| CommonItem::named(gc.label.clone())));
            }
            items
        }
        SlideData::Stack(s) => labeled(&s.content.layers),
    };
    CommonSlideData { title, body, items }
}

/// Each chart kind contributes its own name/value pairs.
fn chart_items(chart: &ChartContent) -> Vec<CommonItem> {
    fn list<T>(items: &Option<Vec<T>>) -> &[T] {
        items.as_deref().unwrap_or_default()
    }
    let categories = list(&chart.categories);
    match chart.chart_type {
        ChartType::Bar | ChartType::HorizontalBar | ChartType::StackedBar => list(&chart.bars)
            .iter()
            .map(|bar| CommonItem::valued(bar.category.clone(), bar.values.first().map(|v| v.value)))
            .collect(),
        ChartType::Pie | ChartType::Donut | ChartType::Rose => list(&chart.slices)
            .iter()
            .map(|slice| CommonItem::valued(slice.name.clone(), Some(slice.value)))
            .collect(),
        ChartType::Line | ChartType::Area => {
            let first = list(&chart.line_series).first();
            categories
                .iter()
                .enumerate()
                .map(|(i, name)| CommonItem::valued(name.clone(), first.and_then(|s| s.data.get(i).copied())))
                .collect()
        }
        ChartType::Radar => {
            let first = list(&chart.radar_series).first();
            list(&chart.indicators)
                .iter()
                .enumerate()
                .map(|(i, ind)| CommonItem::valued(ind.name.clone(), first.and_then(|s| s.values.get(i).copied())))
                .collect()
        }
        ChartType::Proportion => list(&chart.proportion_items)
            .iter()
            .map(|item| CommonItem::valued(item.name.clone(), Some(item.value)))
            .collect(),
        ChartType::Waterfall => list(&chart.waterfall_items)
            .iter()
            .map(|item| CommonItem::valued(item.name.clone(), Some(item.value)))
            .collect(),
        ChartType::Combo => {
            let first = list(&chart.combo_series).first();
            categories
                .iter()
                .enumerate()
                .map(|(i, name)| CommonItem::valued(name.clone(), first.and_then(|s| s.data.get(i).copied())))
                .collect()
        }
        ChartType::Scatter => list(&chart.scatter_series)
            .iter()
            .flat_map(|series| {
                series
                    .data
                    .iter()
                    .enumerate()
                    .map(|(i, point)| CommonItem::valued(format!("{} {}", series.name, i + 1), point.get(1).copied()))
            })
            .collect(),
        ChartType::Gauge => chart
            .gauge_data
            .iter()
            .map(|gauge| {
                let name = if gauge.name.is_empty() { "Value" } else { gauge.name.as_str() };
                CommonItem::valued(name, Some(gauge.value))
            })
            .collect(),
        ChartType::Treemap => list(&chart.treemap_data)
            .iter()
            .map(|node| CommonItem::valued(node.name.clone(), node.value))
            .collect(),
        ChartType::Sankey => list(&chart.sankey_nodes)
            .iter()
            .map(|node| CommonItem::named(node.name.clone()))
            .collect(),
        ChartType::Heatmap => categories
            .iter()
            .enumerate()
            .map(|(i, name)| CommonItem::valued(name.clone(), Some(i as f64)))
            .collect(),
        ChartType::Sunburst => list(&chart.sunburst_data)
            .iter()
            .map(|node| CommonItem::valued(node.name.clone(), node.value))
            .collect(),
        ChartType::Boxplot => list(&chart.boxplot_items)
            .iter()
            .map(|item| CommonItem::valued(item.name.clone(), Some(item.values[2])))
            .collect(),
        ChartType::Gantt => list(&chart.gantt_tasks)
            .iter()
            .map(|task| CommonItem::valued(task.name.clone(), Some(task.end - task.start)))
            .collect(),
    }
}

fn compare_items(compare: &CompareContent) -> Vec<CommonItem> {
    match compare.mode {
        CompareMode::Versus => compare
            .sides
            .iter()
            .flatten()
            .map(|side| {
                let entries: Vec<String> = side
                    .items
                    .iter()
                    .map(|entry| format!("{}: {}", entry.label, entry.value))
                    .collect();
                CommonItem::described(side.name.clone(), Some(entries.join("; ")))
            })
            .collect(),
        CompareMode::Iceberg => compare
            .visible
            .iter()
            .flatten()
            .chain(compare.hidden.iter().flatten())
            .map(CommonItem::from)
            .collect(),
        CompareMode::Quadrant => compare
            .quadrant_items
            .iter()
            .flatten()
            .map(|item| CommonItem::valued(item.label.clone(), Some((item.x + item.y) / 2.0)))
            .collect(),
    }
}

// ─── Build ───

/// Items used when the source contributes nothing.
pub fn placeholder_items() -> Vec<CommonItem> {
    [40.0, 30.0, 20.0]
        .into_iter()
        .enumerate()
        .map(|(i, value)| CommonItem {
            name: format!("Item {}", i + 1),
            description: Some("Description".to_string()),
            value: Some(value),
        })
        .collect()
}

/// Stand-in value for an item without one. Deterministic in the item index
/// and always inside `20..100`.
pub fn placeholder_value(index: usize) -> f64 {
    (20 + (index * 37 + 25) % 80) as f64
}

fn display_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn variant_or_default<T: From<String> + Default>(kind: SlideKind, variant: Option<&str>) -> T {
    resolve_variant(kind, variant)
        .map(|value| T::from(value.to_string()))
        .unwrap_or_default()
}

/// Builds a slide of `kind` from neutral items. Never fails: empty `items`
/// are replaced by placeholders and an invalid `variant` falls back to the
/// kind's default.
pub fn build_target(
    kind: SlideKind,
    title: &str,
    body: Option<&str>,
    items: &[CommonItem],
    variant: Option<&str>,
) -> SlideData {
    let placeholders;
    let items = if items.is_empty() {
        placeholders = placeholder_items();
        placeholders.as_slice()
    } else {
        items
    };
    let names = || items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>().join(", ");
    let body_owned = body.map(str::to_string);

    match kind {
        SlideKind::Title => SlideData::Title(TitleSlide {
            title: title.to_string(),
            subtitle: Some(body.map_or_else(names, str::to_string)),
            ..TitleSlide::default()
        }),
        SlideKind::KeyPoint => SlideData::KeyPoint(KeyPointSlide {
            title: title.to_string(),
            body: Some(body.map_or_else(names, str::to_string)),
            ..KeyPointSlide::default()
        }),
        SlideKind::Chart => SlideData::Chart(DiagramSlide::new(title, body_owned.clone(), build_chart(
            items,
            variant_or_default(SlideKind::Chart, variant),
        ))),
        SlideKind::GridItem => SlideData::GridItem(DiagramSlide::new(title, body_owned.clone(), GridItemContent {
            items: items
                .iter()
                .map(|i| GridItem {
                    title: i.name.clone(),
                    description: i.description.clone(),
                    value: i.value.map(|v| v.to_string()),
                    ..GridItem::default()
                })
                .collect(),
            variant: variant_or_default(kind, variant),
            ..GridItemContent::default()
        })),
        SlideKind::Sequence => SlideData::Sequence(DiagramSlide::new(title, body_owned.clone(), SequenceContent {
            steps: items.iter().map(LabeledItem::from).collect(),
            variant: variant_or_default(kind, variant),
            ..SequenceContent::default()
        })),
        SlideKind::Compare => SlideData::Compare(DiagramSlide::new(title, body_owned.clone(), build_compare(
            items,
            variant_or_default(kind, variant),
        ))),
        SlideKind::Funnel => SlideData::Funnel(DiagramSlide::new(title, body_owned.clone(), FunnelContent {
            layers: items
                .iter()
                .map(|i| FunnelLayer {
                    label: i.name.clone(),
                    description: i.description.clone(),
                    value: i.value,
                })
                .collect(),
            variant: variant_or_default(kind, variant),
        })),
        SlideKind::Concentric => SlideData::Concentric(DiagramSlide::new(title, body_owned.clone(), ConcentricContent {
            rings: items.iter().take(MAX_RINGS).map(LabeledItem::from).collect(),
            variant: variant_or_default(kind, variant),
        })),
        SlideKind::HubSpoke => {
            let center = items
                .first()
                .map(LabeledItem::from)
                .unwrap_or_else(|| LabeledItem::new(title, None));
            let spokes = if items.len() > 1 { &items[1..] } else { items };
            SlideData::HubSpoke(DiagramSlide::new(title, body_owned.clone(), HubSpokeContent {
                center,
                spokes: spokes.iter().map(LabeledItem::from).collect(),
                variant: variant_or_default(kind, variant),
            }))
        }
        SlideKind::Venn => SlideData::Venn(DiagramSlide::new(title, body_owned.clone(), VennContent {
            sets: items.iter().take(MAX_SETS).map(LabeledItem::from).collect(),
            intersection_label: None,
            variant: variant_or_default(kind, variant),
        })),
        SlideKind::Cycle => SlideData::Cycle(DiagramSlide::new(title, body_owned.clone(), CycleContent {
            steps: items.iter().map(LabeledItem::from).collect(),
            variant: variant_or_default(kind, variant),
        })),
        SlideKind::Table => SlideData::Table(DiagramSlide::new(title, body_owned.clone(), TableContent {
            headers: vec!["Name".to_string(), "Details".to_string()],
            rows: items
                .iter()
                .map(|i| TableRow {
                    cells: vec![
                        i.name.clone(),
                        i.description.clone().unwrap_or_else(|| display_value(i.value)),
                    ],
                    highlight: None,
                })
                .collect(),
            variant: variant_or_default(kind, variant),
        })),
        SlideKind::Roadmap => SlideData::Roadmap(DiagramSlide::new(title, body_owned.clone(), RoadmapContent {
            phases: items
                .iter()
                .map(|i| RoadmapPhase {
                    label: i.name.clone(),
                    items: vec![RoadmapTask {
                        label: i.description.clone().unwrap_or_else(|| "Task".to_string()),
                        status: RoadmapStatus::Pending,
                    }],
                })
                .collect(),
            variant: variant_or_default(kind, variant),
        })),
        SlideKind::Swot => {
            let quarter = items.len().div_ceil(4);
            let part = |k: usize| -> Vec<LabeledItem> {
                let start = (quarter * k).min(items.len());
                let end = if k == 3 { items.len() } else { (quarter * (k + 1)).min(items.len()) };
                items[start..end].iter().map(LabeledItem::from).collect()
            };
            SlideData::Swot(DiagramSlide::new(title, body_owned.clone(), SwotContent {
                strengths: part(0),
                weaknesses: part(1),
                opportunities: part(2),
                threats: part(3),
            }))
        }
        SlideKind::Mindmap => {
            let label = items.first().map_or_else(|| title.to_string(), |i| i.name.clone());
            let children = if items.len() > 1 { &items[1..] } else { items };
            SlideData::Mindmap(DiagramSlide::new(title, body_owned.clone(), MindmapContent {
                root: MindmapNode {
                    label,
                    children: children.iter().map(|i| MindmapNode::leaf(i.name.clone())).collect(),
                },
            }))
        }
        SlideKind::Stack => SlideData::Stack(DiagramSlide::new(title, body_owned.clone(), StackContent {
            layers: items.iter().map(LabeledItem::from).collect(),
            variant: variant_or_default(kind, variant),
        })),
        SlideKind::BlockSlide => SlideData::BlockSlide(BlockSlide {
            title: title.to_string(),
            ..BlockSlide::default()
        }),
    }
}

fn build_compare(items: &[CommonItem], mode: CompareMode) -> CompareContent {
    let mid = items.len().div_ceil(2);
    match mode {
        CompareMode::Versus => {
            let side = |part: &[CommonItem], fallback: &str| CompareSide {
                name: part.first().map_or_else(|| fallback.to_string(), |i| i.name.clone()),
                items: part
                    .iter()
                    .map(|i| CompareEntry {
                        label: i.name.clone(),
                        value: i.description.clone().unwrap_or_else(|| display_value(i.value)),
                    })
                    .collect(),
            };
            CompareContent {
                mode,
                sides: Some(vec![side(&items[..mid], "Option A"), side(&items[mid..], "Option B")]),
                ..CompareContent::default()
            }
        }
        CompareMode::Iceberg => CompareContent {
            mode,
            visible: Some(items[..mid].iter().map(LabeledItem::from).collect()),
            hidden: Some(items[mid..].iter().map(LabeledItem::from).collect()),
            ..CompareContent::default()
        },
        CompareMode::Quadrant => CompareContent {
            mode,
            quadrant_items: Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, i)| QuadrantItem {
                        label: i.name.clone(),
                        x: ((idx % 3) + 1) as f64 * 25.0,
                        y: ((idx / 3) + 1) as f64 * 25.0,
                    })
                    .collect(),
            ),
            x_axis: Some("Dimension X".to_string()),
            y_axis: Some("Dimension Y".to_string()),
            ..CompareContent::default()
        },
    }
}

fn build_chart(items: &[CommonItem], chart_type: ChartType) -> ChartContent {
    let values: Vec<(String, f64)> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.name.clone(), item.value.unwrap_or_else(|| placeholder_value(i))))
        .collect();
    let names = || values.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>();
    let data = || values.iter().map(|(_, v)| *v).collect::<Vec<_>>();
    let single = |name: &str, value: f64| ChartValue {
        name: name.to_string(),
        value,
        color: None,
    };
    let slices = || {
        values
            .iter()
            .map(|(name, value)| ChartSlice {
                name: name.clone(),
                value: *value,
            })
            .collect::<Vec<_>>()
    };
    let tree = || {
        values
            .iter()
            .map(|(name, value)| TreeNode {
                name: name.clone(),
                value: Some(*value),
                children: Vec::new(),
            })
            .collect::<Vec<_>>()
    };

    let mut chart = ChartContent::new(chart_type);
    match chart_type {
        ChartType::Bar | ChartType::HorizontalBar => {
            chart.bars = Some(
                values
                    .iter()
                    .map(|(name, value)| ChartBar {
                        category: name.clone(),
                        values: vec![single("Value", *value)],
                    })
                    .collect(),
            );
        }
        ChartType::StackedBar => {
            chart.bars = Some(
                values
                    .iter()
                    .map(|(name, value)| ChartBar {
                        category: name.clone(),
                        values: vec![
                            single("Series A", (value * 0.6).round()),
                            single("Series B", (value * 0.4).round()),
                        ],
                    })
                    .collect(),
            );
        }
        ChartType::Pie | ChartType::Donut | ChartType::Rose => chart.slices = Some(slices()),
        ChartType::Line | ChartType::Area => {
            chart.categories = Some(names());
            chart.line_series = Some(vec![LineSeries {
                name: "Data".to_string(),
                data: data(),
                area: None,
            }]);
        }
        ChartType::Radar => {
            chart.indicators = Some(
                values
                    .iter()
                    .map(|(name, value)| RadarIndicator {
                        name: name.clone(),
                        max: (value * 1.5).max(100.0),
                    })
                    .collect(),
            );
            chart.radar_series = Some(vec![RadarSeries {
                name: "Data".to_string(),
                values: data(),
            }]);
        }
        ChartType::Proportion => {
            chart.proportion_items = Some(
                values
                    .iter()
                    .map(|(name, value)| ProportionItem {
                        name: name.clone(),
                        value: *value,
                        max: 100.0,
                    })
                    .collect(),
            );
        }
        ChartType::Waterfall => {
            let last = values.len().saturating_sub(1);
            chart.waterfall_items = Some(
                values
                    .iter()
                    .enumerate()
                    .map(|(idx, (name, value))| WaterfallItem {
                        name: name.clone(),
                        value: *value,
                        kind: if idx == 0 || idx == last {
                            WaterfallKind::Total
                        } else {
                            WaterfallKind::Increase
                        },
                    })
                    .collect(),
            );
        }
        ChartType::Combo => {
            chart.categories = Some(names());
            chart.combo_series = Some(vec![
                ComboSeries {
                    name: "Value".to_string(),
                    data: data(),
                    series_type: ComboSeriesType::Bar,
                    y_axis_index: None,
                },
                ComboSeries {
                    name: "Trend".to_string(),
                    data: values.iter().map(|(_, v)| (v * 0.3).round()).collect(),
                    series_type: ComboSeriesType::Line,
                    y_axis_index: Some(1),
                },
            ]);
        }
        ChartType::Scatter => {
            chart.scatter_series = Some(vec![ScatterSeries {
                name: "Data".to_string(),
                data: values
                    .iter()
                    .enumerate()
                    .map(|(idx, (_, value))| vec![idx as f64 * 20.0 + 10.0, *value])
                    .collect(),
            }]);
        }
        ChartType::Gauge => {
            chart.gauge_data = Some(GaugeData {
                value: values.first().map_or(50.0, |(_, v)| *v),
                max: 100.0,
                name: values.first().map_or_else(|| "Completion".to_string(), |(n, _)| n.clone()),
            });
        }
        ChartType::Treemap => chart.treemap_data = Some(tree()),
        ChartType::Sunburst => chart.sunburst_data = Some(tree()),
        ChartType::Sankey => {
            chart.sankey_nodes = Some(
                values
                    .iter()
                    .map(|(name, _)| SankeyNode { name: name.clone() })
                    .collect(),
            );
            chart.sankey_links = Some(
                values
                    .windows(2)
                    .map(|pair| SankeyLink {
                        source: pair[0].0.clone(),
                        target: pair[1].0.clone(),
                        value: pair[0].1,
                    })
                    .collect(),
            );
        }
        ChartType::Heatmap => {
            let columns: Vec<String> = names().into_iter().take(5).collect();
            let rows = ["Row 1", "Row 2", "Row 3"];
            let mut cells = Vec::with_capacity(columns.len() * rows.len());
            for x in 0..columns.len() {
                for y in 0..rows.len() {
                    cells.push([x as f64, y as f64, ((x * 3 + y * 7) % 10) as f64]);
                }
            }
            chart.categories = Some(columns);
            chart.heatmap_y_categories = Some(rows.iter().map(|r| r.to_string()).collect());
            chart.heatmap_data = Some(cells);
        }
        ChartType::Boxplot => {
            chart.boxplot_items = Some(
                values
                    .iter()
                    .map(|(name, v)| BoxplotItem {
                        name: name.clone(),
                        values: [
                            (v * 0.3).round(),
                            (v * 0.5).round(),
                            (v * 0.7).round(),
                            (v * 0.85).round(),
                            *v,
                        ],
                    })
                    .collect(),
            );
        }
        ChartType::Gantt => {
            chart.gantt_tasks = Some(
                values
                    .iter()
                    .enumerate()
                    .map(|(idx, (name, _))| GanttTask {
                        name: name.clone(),
                        start: idx as f64 * 3.0,
                        end: idx as f64 * 3.0 + 4.0,
                        category: None,
                    })
                    .collect(),
            );
        }
    }
    chart
}

// ─── Convert ───

/// Sets the variant (or mode / chart type) when the registry accepts it;
/// anything else leaves the slide untouched.
pub fn apply_variant(slide: &SlideData, variant: Option<&str>) -> SlideData {
    let mut out = slide.clone();
    let Some(value) = variant.filter(|v| is_valid_variant(slide.kind(), v)) else {
        return out;
    };
    let value = value.to_string();
    match &mut out {
        SlideData::GridItem(s) => s.content.variant = value.into(),
        SlideData::Sequence(s) => s.content.variant = value.into(),
        SlideData::Compare(s) => s.content.mode = value.into(),
        SlideData::Funnel(s) => s.content.variant = value.into(),
        SlideData::Concentric(s) => s.content.variant = value.into(),
        SlideData::HubSpoke(s) => s.content.variant = value.into(),
        SlideData::Venn(s) => s.content.variant = value.into(),
        SlideData::Cycle(s) => s.content.variant = value.into(),
        SlideData::Table(s) => s.content.variant = value.into(),
        SlideData::Roadmap(s) => s.content.variant = value.into(),
        SlideData::Stack(s) => s.content.variant = value.into(),
        SlideData::Chart(s) => s.content.chart_type = value.into(),
        SlideData::Title(_)
        | SlideData::KeyPoint(_)
        | SlideData::Swot(_)
        | SlideData::Mindmap(_)
        | SlideData::BlockSlide(_) => {}
    }
    out
}

/// Converts `source` into `kind`. Same-kind conversion only switches the
/// variant, so a chart keeps its data when its chart type changes.
pub fn convert_to_type(source: &SlideData, kind: SlideKind, variant: Option<&str>) -> SlideData {
    if source.kind() == kind {
        return apply_variant(source, variant);
    }
    let common = extract_common_items(source);
    tracing::debug!(
        from = %source.kind(),
        to = %kind,
        items = common.items.len(),
        "converting slide"
    );
    build_target(kind, &common.title, common.body.as_deref(), &common.items, variant)
}

// ─── Defaults ───

fn items(pairs: &[(&str, &str)]) -> Vec<LabeledItem> {
    pairs
        .iter()
        .map(|(label, description)| LabeledItem::new(*label, Some(description.to_string())))
        .collect()
}

/// A small valid slide for every kind, used by "new slide" actions and as
/// the baseline in tests.
pub fn create_default_slide(kind: SlideKind) -> SlideData {
    match kind {
        SlideKind::Title => SlideData::Title(TitleSlide {
            title: "New slide".into(),
            subtitle: Some("Add a subtitle here".into()),
            ..TitleSlide::default()
        }),
        SlideKind::KeyPoint => SlideData::KeyPoint(KeyPointSlide {
            title: "Key point".into(),
            body: Some("Add supporting detail here".into()),
            ..KeyPointSlide::default()
        }),
        SlideKind::Chart => {
            let mut chart = ChartContent::new(ChartType::Bar);
            chart.bars = Some(
                [("Q1", 45.0), ("Q2", 62.0), ("Q3", 38.0), ("Q4", 71.0)]
                    .into_iter()
                    .map(|(category, value)| ChartBar {
                        category: category.into(),
                        values: vec![ChartValue {
                            name: "Revenue".into(),
                            value,
                            color: None,
                        }],
                    })
                    .collect(),
            );
            SlideData::Chart(DiagramSlide::new("Data overview", None, chart))
        }
        SlideKind::GridItem => SlideData::GridItem(DiagramSlide::new(
            "Project overview",
            None,
            GridItemContent {
                items: [("Project one", "📋"), ("Project two", "⚡"), ("Project three", "🎯"), ("Project four", "💡")]
                    .into_iter()
                    .map(|(title, icon)| GridItem {
                        title: title.into(),
                        description: Some("Description".into()),
                        icon: Some(icon.into()),
                        ..GridItem::default()
                    })
                    .collect(),
                ..GridItemContent::default()
            },
        )),
        SlideKind::Sequence => SlideData::Sequence(DiagramSlide::new(
            "Process steps",
            None,
            SequenceContent {
                steps: items(&[("Step one", "Kick-off"), ("Step two", "Execution"), ("Step three", "Wrap-up")]),
                ..SequenceContent::default()
            },
        )),
        SlideKind::Compare => {
            let side = |name: &str, strength: &str, trait_: &str| CompareSide {
                name: name.into(),
                items: vec![
                    CompareEntry { label: "Strength".into(), value: strength.into() },
                    CompareEntry { label: "Trait".into(), value: trait_.into() },
                ],
            };
            SlideData::Compare(DiagramSlide::new(
                "Option comparison",
                None,
                CompareContent {
                    mode: CompareMode::Versus,
                    sides: Some(vec![
                        side("Option A", "Low cost", "Fast rollout"),
                        side("Option B", "High performance", "Scales well"),
                    ]),
                    ..CompareContent::default()
                },
            ))
        }
        SlideKind::Funnel => SlideData::Funnel(DiagramSlide::new(
            "Conversion funnel",
            None,
            FunnelContent {
                layers: [("Visits", 1000.0), ("Signups", 600.0), ("Paid", 200.0)]
                    .into_iter()
                    .map(|(label, value)| FunnelLayer {
                        label: label.into(),
                        description: None,
                        value: Some(value),
                    })
                    .collect(),
                variant: FunnelVariant::Funnel,
            },
        )),
        SlideKind::Concentric => SlideData::Concentric(DiagramSlide::new(
            "Layered structure",
            None,
            ConcentricContent {
                rings: items(&[("Core", "Foundations"), ("Middle", "Extensions"), ("Outer", "Ecosystem")]),
                variant: ConcentricVariant::Circles,
            },
        )),
        SlideKind::HubSpoke => SlideData::HubSpoke(DiagramSlide::new(
            "Hub and spokes",
            None,
            HubSpokeContent {
                center: LabeledItem::new("Core", Some("Central node".into())),
                spokes: items(&[
                    ("Node one", "Detail"),
                    ("Node two", "Detail"),
                    ("Node three", "Detail"),
                    ("Node four", "Detail"),
                ]),
                variant: HubSpokeVariant::Orbit,
            },
        )),
        SlideKind::Venn => SlideData::Venn(DiagramSlide::new(
            "Overlap analysis",
            None,
            VennContent {
                sets: items(&[("Set A", "First dimension"), ("Set B", "Second dimension")]),
                intersection_label: Some("Overlap".into()),
                variant: VennVariant::Classic,
            },
        )),
        SlideKind::Cycle => SlideData::Cycle(DiagramSlide::new(
            "PDCA cycle",
            None,
            CycleContent {
                steps: items(&[
                    ("Plan", "Set goals"),
                    ("Do", "Implement"),
                    ("Check", "Review results"),
                    ("Act", "Improve"),
                ]),
                variant: CycleVariant::Circular,
            },
        )),
        SlideKind::Table => {
            let row = |cells: [&str; 4], highlight: Option<bool>| TableRow {
                cells: cells.iter().map(|c| c.to_string()).collect(),
                highlight,
            };
            SlideData::Table(DiagramSlide::new(
                "Status overview",
                None,
                TableContent {
                    headers: ["Project", "Owner", "Status", "Progress"].map(String::from).to_vec(),
                    rows: vec![
                        row(["Frontend rewrite", "Alex", "In progress", "65%"], None),
                        row(["API upgrade", "Sam", "Done", "100%"], Some(true)),
                        row(["Performance", "Kim", "Not started", "0%"], None),
                    ],
                    variant: TableVariant::Striped,
                },
            ))
        }
        SlideKind::Roadmap => {
            let phase = |label: &str, tasks: [(&str, RoadmapStatus); 2]| RoadmapPhase {
                label: label.into(),
                items: tasks
                    .into_iter()
                    .map(|(label, status)| RoadmapTask { label: label.into(), status })
                    .collect(),
            };
            SlideData::Roadmap(DiagramSlide::new(
                "Product roadmap",
                None,
                RoadmapContent {
                    phases: vec![
                        phase("Q1", [("Research", RoadmapStatus::Done), ("Prototype", RoadmapStatus::Done)]),
                        phase("Q2", [("Core build", RoadmapStatus::Active), ("Unit tests", RoadmapStatus::Pending)]),
                        phase("Q3", [("Integration", RoadmapStatus::Pending), ("Staged rollout", RoadmapStatus::Pending)]),
                    ],
                    variant: RoadmapVariant::Horizontal,
                },
            ))
        }
        SlideKind::Swot => SlideData::Swot(DiagramSlide::new(
            "SWOT analysis",
            None,
            SwotContent {
                strengths: vec![
                    LabeledItem::new("Brand", Some("Category leader".into())),
                    LabeledItem::new("Engineering depth", None),
                ],
                weaknesses: vec![LabeledItem::new("Release cadence", Some("Slow iteration".into()))],
                opportunities: vec![LabeledItem::new("New markets", Some("Strong growth".into()))],
                threats: vec![
                    LabeledItem::new("Competition", None),
                    LabeledItem::new("Regulation", None),
                ],
            },
        )),
        SlideKind::Mindmap => SlideData::Mindmap(DiagramSlide::new(
            "Mind map",
            None,
            MindmapContent {
                root: MindmapNode {
                    label: "Central topic".into(),
                    children: vec![
                        MindmapNode {
                            label: "Branch one".into(),
                            children: vec![MindmapNode::leaf("Point A"), MindmapNode::leaf("Point B")],
                        },
                        MindmapNode {
                            label: "Branch two".into(),
                            children: vec![MindmapNode::leaf("Point C")],
                        },
                        MindmapNode::leaf("Branch three"),
                    ],
                },
            },
        )),
        SlideKind::Stack => SlideData::Stack(DiagramSlide::new(
            "Architecture",
            None,
            StackContent {
                layers: items(&[
                    ("Presentation", "UI / interaction"),
                    ("Domain", "Core logic"),
                    ("Data", "Storage / cache"),
                    ("Infrastructure", "Cloud / network"),
                ]),
                variant: StackVariant::Horizontal,
            },
        )),
        SlideKind::BlockSlide => SlideData::BlockSlide(BlockSlide {
            title: "New slide".into(),
            blocks: vec![ContentBlock {
                id: "b1".into(),
                x: 10.0,
                y: 5.0,
                width: 80.0,
                height: 25.0,
                data: BlockData::TitleBody(TitleBodyBlock {
                    title: "New slide".into(),
                    body: Some("Add content here".into()),
                    ..TitleBodyBlock::default()
                }),
            }],
            ..BlockSlide::default()
        }),
    }
}

// ─── Recommend ───

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRecommendation {
    #[serde(rename = "type")]
    pub kind: SlideKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<&'static str>,
    pub reason: &'static str,
    pub score: u32,
}

const MAX_RECOMMENDATIONS: usize = 3;

/// `true` when there are at least three values and none rises above its
/// predecessor.
pub fn is_monotonic_decreasing(values: &[f64]) -> bool {
    values.len() >= 3 && values.windows(2).all(|w| w[1] <= w[0])
}

/// Up to three alternative layouts for `slide`, best first. The slide's
/// current kind and variant is never suggested.
pub fn recommend_layout(slide: &SlideData) -> Vec<LayoutRecommendation> {
    let items = extract_common_items(slide).items;
    let n = items.len();
    let values: Vec<f64> = items.iter().filter_map(|i| i.value).collect();
    let has_values = !values.is_empty();
    let has_descriptions = items
        .iter()
        .any(|i| i.description.as_deref().is_some_and(|d| !d.is_empty()));
    let sum: f64 = values.iter().sum();

    let mut recs = Vec::new();
    let mut push = |kind, variant, reason, score| {
        recs.push(LayoutRecommendation {
            kind,
            variant,
            reason,
            score,
        });
    };
    if n == 0 {
        push(SlideKind::KeyPoint, None, "No items; a key point reads best", 90);
        push(SlideKind::Title, None, "Title-only layout", 85);
    }
    if n == 2 {
        push(SlideKind::Compare, Some("versus"), "Two items invite a side-by-side comparison", 90);
    }
    if has_values && n >= 3 {
        push(SlideKind::Chart, Some("bar"), "Numeric values suit a bar chart", 85);
    }
    if has_values && (80.0..=120.0).contains(&sum) && values.len() >= 2 {
        push(SlideKind::Chart, Some("pie"), "Values add up to a whole; a pie shows the shares", 88);
    }
    if is_monotonic_decreasing(&values) && n >= 3 {
        push(SlideKind::Funnel, Some("funnel"), "Decreasing values suit a funnel", 82);
    }
    if (3..=7).contains(&n) && !has_values {
        push(SlideKind::Sequence, Some("timeline"), "A handful of steps suits a timeline", 78);
    }
    if (2..=6).contains(&n) && has_descriptions {
        push(SlideKind::GridItem, Some("solid"), "Described items suit a card grid", 75);
    }
    if n > 6 {
        push(SlideKind::GridItem, Some("outline"), "Many items suit a compact grid", 72);
    }

    let current = (slide.kind(), slide.variant());
    recs.retain(|r| (r.kind, r.variant) != current);
    recs.sort_by(|a, b| b.score.cmp(&a.score));
    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_numbers_parse_like_the_editor() {
        assert_eq!(parse_leading_number("12.5%"), Some(12.5));
        assert_eq!(parse_leading_number(" -3 units"), Some(-3.0));
        assert_eq!(parse_leading_number("0"), None);
        assert_eq!(parse_leading_number("n/a"), None);
    }

    #[test]
    fn every_kind_extracts_and_defaults() {
        for kind in SlideKind::ALL {
            let slide = create_default_slide(kind);
            assert_eq!(slide.kind(), kind);
            let common = extract_common_items(&slide);
            assert_eq!(common.title, slide.title());
        }
    }

    #[test]
    fn swot_flattens_in_quadrant_order() {
        let common = extract_common_items(&create_default_slide(SlideKind::Swot));
        let names: Vec<_> = common.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            ["Brand", "Engineering depth", "Release cadence", "New markets", "Competition", "Regulation"]
        );
    }

    #[test]
    fn mindmap_flattens_three_levels() {
        let common = extract_common_items(&create_default_slide(SlideKind::Mindmap));
        assert_eq!(common.items.len(), 7);
        assert_eq!(common.items[1].name, "Branch one");
        assert_eq!(common.items[2].name, "Point A");
    }

    #[test]
    fn table_and_roadmap_join_trailing_text() {
        let table = extract_common_items(&create_default_slide(SlideKind::Table));
        assert_eq!(table.items[0].description.as_deref(), Some("Alex, In progress, 65%"));
        let roadmap = extract_common_items(&create_default_slide(SlideKind::Roadmap));
        assert_eq!(roadmap.items[0].description.as_deref(), Some("Research, Prototype"));
    }

    #[test]
    fn versus_and_quadrant_extraction() {
        let versus = extract_common_items(&create_default_slide(SlideKind::Compare));
        assert_eq!(
            versus.items[0].description.as_deref(),
            Some("Strength: Low cost; Trait: Fast rollout")
        );
        let quadrant = SlideData::Compare(DiagramSlide::new(
            "Matrix",
            None,
            CompareContent {
                mode: CompareMode::Quadrant,
                quadrant_items: Some(vec![QuadrantItem { label: "A".into(), x: 20.0, y: 60.0 }]),
                ..CompareContent::default()
            },
        ));
        assert_eq!(extract_common_items(&quadrant).items[0].value, Some(40.0));
    }

    #[test]
    fn build_caps_rings_and_sets() {
        let items: Vec<CommonItem> = (0..8).map(|i| CommonItem::named(format!("N{i}"))).collect();
        let SlideData::Concentric(rings) = build_target(SlideKind::Concentric, "T", None, &items, None) else {
            panic!("expected concentric");
        };
        assert_eq!(rings.content.rings.len(), 5);
        let SlideData::Venn(venn) = build_target(SlideKind::Venn, "T", None, &items, None) else {
            panic!("expected venn");
        };
        assert_eq!(venn.content.sets.len(), 4);
    }

    #[test]
    fn build_falls_back_to_default_variant() {
        let slide = build_target(SlideKind::Cycle, "T", None, &[], Some("spiral"));
        assert_eq!(slide.variant(), Some("circular"));
        let SlideData::Cycle(cycle) = slide else {
            panic!("expected cycle");
        };
        assert_eq!(cycle.content.steps.len(), 3);
        assert_eq!(cycle.content.steps[0].label, "Item 1");
    }

    #[test]
    fn swot_build_splits_into_quarters() {
        let items: Vec<CommonItem> = (0..5).map(|i| CommonItem::named(format!("N{i}"))).collect();
        let SlideData::Swot(swot) = build_target(SlideKind::Swot, "T", None, &items, None) else {
            panic!("expected swot");
        };
        let sizes = swot.content.quadrants().map(<[LabeledItem]>::len);
        assert_eq!(sizes, [2, 2, 1, 0]);
    }

    #[test]
    fn chart_placeholders_are_deterministic() {
        let items = [CommonItem::named("A"), CommonItem::named("B")];
        let first = build_target(SlideKind::Chart, "T", None, &items, Some("pie"));
        let second = build_target(SlideKind::Chart, "T", None, &items, Some("pie"));
        assert_eq!(first, second);
        assert!((0..50).map(placeholder_value).all(|v| (20.0..100.0).contains(&v)));
    }

    #[test]
    fn same_kind_conversion_only_switches_variant() {
        let chart = create_default_slide(SlideKind::Chart);
        let SlideData::Chart(line) = convert_to_type(&chart, SlideKind::Chart, Some("line")) else {
            panic!("expected chart");
        };
        assert_eq!(line.content.chart_type, ChartType::Line);
        assert_eq!(line.content.bars.as_ref().map(Vec::len), Some(4));

        let unchanged = convert_to_type(&chart, SlideKind::Chart, Some("spiral"));
        assert_eq!(unchanged, chart);
    }

    #[test]
    fn funnel_to_sequence_keeps_names() {
        let funnel = create_default_slide(SlideKind::Funnel);
        let SlideData::Sequence(seq) = convert_to_type(&funnel, SlideKind::Sequence, None) else {
            panic!("expected sequence");
        };
        let labels: Vec<_> = seq.content.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Visits", "Signups", "Paid"]);
        assert_eq!(seq.title, "Conversion funnel");
    }

    #[test]
    fn monotonic_detector() {
        assert!(is_monotonic_decreasing(&[1000.0, 600.0, 200.0]));
        assert!(!is_monotonic_decreasing(&[200.0, 600.0, 1000.0]));
        assert!(!is_monotonic_decreasing(&[2.0, 1.0]));
    }

    #[test]
    fn recommendations_skip_the_current_layout() {
        let funnel = create_default_slide(SlideKind::Funnel);
        let recs = recommend_layout(&funnel);
        assert!(recs.len() <= 3);
        assert!(recs.iter().all(|r| !(r.kind == SlideKind::Funnel && r.variant == Some("funnel"))));
        assert_eq!(recs[0].kind, SlideKind::Chart);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));

        let key_point = create_default_slide(SlideKind::KeyPoint);
        let recs = recommend_layout(&key_point);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, SlideKind::Title);
    }
}
