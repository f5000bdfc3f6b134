//! Registry of the rendering variants each slide family offers.

use serde::Serialize;

use crate::ir::{
    ChartType, CompareMode, ConcentricVariant, CycleVariant, FunnelVariant, GridItemVariant,
    HubSpokeVariant, RoadmapVariant, SequenceVariant, SlideKind, StackVariant, TableVariant,
    VennVariant,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// The field a family switches on and the values it accepts. The first option
/// is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantField {
    pub field: &'static str,
    pub options: &'static [VariantOption],
}

impl VariantField {
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }

    pub fn default_value(&self) -> &'static str {
        self.options.first().map(|option| option.value).unwrap_or("")
    }
}

pub fn variant_field(kind: SlideKind) -> Option<VariantField> {
    let (field, options) = match kind {
        SlideKind::GridItem => ("variant", GridItemVariant::OPTIONS),
        SlideKind::Sequence => ("variant", SequenceVariant::OPTIONS),
        SlideKind::Compare => ("mode", CompareMode::OPTIONS),
        SlideKind::Funnel => ("variant", FunnelVariant::OPTIONS),
        SlideKind::Concentric => ("variant", ConcentricVariant::OPTIONS),
        SlideKind::HubSpoke => ("variant", HubSpokeVariant::OPTIONS),
        SlideKind::Venn => ("variant", VennVariant::OPTIONS),
        SlideKind::Cycle => ("variant", CycleVariant::OPTIONS),
        SlideKind::Table => ("variant", TableVariant::OPTIONS),
        SlideKind::Roadmap => ("variant", RoadmapVariant::OPTIONS),
        SlideKind::Stack => ("variant", StackVariant::OPTIONS),
        SlideKind::Chart => ("chartType", ChartType::OPTIONS),
        SlideKind::Title
        | SlideKind::KeyPoint
        | SlideKind::Swot
        | SlideKind::Mindmap
        | SlideKind::BlockSlide => return None,
    };
    Some(VariantField { field, options })
}

/// Lookup by raw type string, shared with block pickers.
pub fn variant_field_for(type_name: &str) -> Option<VariantField> {
    SlideKind::parse(type_name).and_then(variant_field)
}

pub fn is_valid_variant(kind: SlideKind, value: &str) -> bool {
    variant_field(kind).is_some_and(|field| field.contains(value))
}

pub fn default_variant(kind: SlideKind) -> Option<&'static str> {
    variant_field(kind).map(|field| field.default_value())
}

/// `value` when the registry accepts it for `kind`, otherwise the default.
pub fn resolve_variant(kind: SlideKind, value: Option<&str>) -> Option<&'static str> {
    let field = variant_field(kind)?;
    match value {
        Some(value) => match field.options.iter().find(|o| o.value == value) {
            Some(option) => Some(option.value),
            None => {
                tracing::debug!(kind = %kind, value, "invalid variant, using default");
                Some(field.default_value())
            }
        },
        None => Some(field.default_value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_variant_families() {
        let with_variants: Vec<_> = SlideKind::ALL
            .into_iter()
            .filter(|kind| variant_field(*kind).is_some())
            .collect();
        assert_eq!(with_variants.len(), 12);
        assert_eq!(variant_field(SlideKind::Compare).map(|f| f.field), Some("mode"));
        assert_eq!(
            variant_field(SlideKind::Chart).map(|f| f.options.len()),
            Some(20)
        );
    }

    #[test]
    fn defaults_are_first_options() {
        assert_eq!(default_variant(SlideKind::GridItem), Some("solid"));
        assert_eq!(default_variant(SlideKind::Sequence), Some("timeline"));
        assert_eq!(default_variant(SlideKind::Chart), Some("bar"));
        assert_eq!(default_variant(SlideKind::Swot), None);
    }

    #[test]
    fn validates_by_kind_and_type_string() {
        assert!(is_valid_variant(SlideKind::Venn, "linear-filled"));
        assert!(!is_valid_variant(SlideKind::Venn, "solid"));
        assert!(variant_field_for("cycle").is_some_and(|f| f.contains("gear")));
        assert!(variant_field_for("block-slide").is_none());
    }

    #[test]
    fn resolve_falls_back_to_default() {
        assert_eq!(
            resolve_variant(SlideKind::Stack, Some("diagonal")),
            Some("horizontal")
        );
        assert_eq!(resolve_variant(SlideKind::Stack, Some("offset")), Some("offset"));
        assert_eq!(resolve_variant(SlideKind::Title, Some("offset")), None);
    }
}
