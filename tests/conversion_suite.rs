use std::path::Path;

use serde_json::json;
use slidekit::blocks::{BlockIds, apply_block_variant, blocks_to_legacy, convert_block, legacy_to_blocks};
use slidekit::convert::extract_common_items;
use slidekit::deck::{DeckError, export_deck, import_deck};
use slidekit::ir::{BlockData, ChartType};
use slidekit::patch::patch_slide;
use slidekit::variants::{default_variant, variant_field};
use slidekit::{SlideData, SlideKind, convert_to_type, create_default_slide, recommend_layout};

fn read_deck(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("decks")
        .join(rel);
    std::fs::read_to_string(path).expect("fixture read failed")
}

fn names(slide: &SlideData) -> Vec<String> {
    extract_common_items(slide).items.into_iter().map(|item| item.name).collect()
}

#[test]
fn every_conversion_is_total() {
    for source_kind in SlideKind::ALL {
        let source = create_default_slide(source_kind);
        for target in SlideKind::ALL {
            let converted = convert_to_type(&source, target, None);
            assert_eq!(converted.kind(), target, "{source_kind} -> {target}");
            if source_kind != target {
                assert_eq!(converted.variant(), default_variant(target), "{source_kind} -> {target}");
            }
            serde_json::to_string(&converted).expect("converted slide serializes");
        }
    }
}

#[test]
fn requested_variants_are_applied_and_bad_ones_fall_back() {
    let source = create_default_slide(SlideKind::GridItem);
    for kind in SlideKind::ALL {
        let Some(field) = variant_field(kind) else {
            continue;
        };
        for option in field.options {
            let converted = convert_to_type(&source, kind, Some(option.value));
            assert_eq!(converted.variant(), Some(option.value), "{kind}/{}", option.value);
        }
        if kind != SlideKind::GridItem {
            let fallback = convert_to_type(&source, kind, Some("no-such-variant"));
            assert_eq!(fallback.variant(), default_variant(kind), "{kind}");
        }
    }
}

#[test]
fn labels_and_values_survive_a_trip_through_a_chart() {
    let funnel: SlideData = serde_json::from_value(json!({
        "type": "funnel",
        "title": "Pipeline",
        "variant": "funnel",
        "layers": [
            { "label": "Leads", "value": 900 },
            { "label": "Calls", "value": 150 },
            { "label": "Deals", "value": 12 }
        ]
    }))
    .unwrap();

    let chart = convert_to_type(&funnel, SlideKind::Chart, Some("bar"));
    let SlideData::Chart(bar) = &chart else {
        panic!("expected a chart");
    };
    assert_eq!(bar.content.chart_type, ChartType::Bar);
    assert_eq!(bar.title, "Pipeline");

    let pie = convert_to_type(&chart, SlideKind::Chart, Some("pie"));
    let SlideData::Chart(pie) = &pie else {
        panic!("expected a chart");
    };
    assert_eq!(pie.content.chart_type, ChartType::Pie);
    assert_eq!(pie.content.bars, bar.content.bars, "same-kind conversion keeps data");

    let SlideData::Funnel(back) = convert_to_type(&chart, SlideKind::Funnel, None) else {
        panic!("expected a funnel");
    };
    let layers: Vec<(&str, Option<f64>)> = back
        .content
        .layers
        .iter()
        .map(|layer| (layer.label.as_str(), layer.value))
        .collect();
    assert_eq!(layers, [("Leads", Some(900.0)), ("Calls", Some(150.0)), ("Deals", Some(12.0))]);
}

#[test]
fn empty_sources_get_placeholder_items() {
    let key_point = create_default_slide(SlideKind::KeyPoint);
    let funnel = convert_to_type(&key_point, SlideKind::Funnel, None);
    assert_eq!(names(&funnel), ["Item 1", "Item 2", "Item 3"]);
    assert_eq!(funnel.title(), key_point.title());
}

#[test]
fn recommendations_skip_the_current_layout() {
    let funnel = create_default_slide(SlideKind::Funnel);
    let recs = recommend_layout(&funnel);
    assert!(!recs.is_empty() && recs.len() <= 3);
    for rec in &recs {
        assert!(!(rec.kind == funnel.kind() && rec.variant == funnel.variant()));
    }
    assert!(recs.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[test]
fn deck_fixtures_import() {
    let deck = import_deck(&read_deck("quarterly.json")).expect("quarterly deck imports");
    assert_eq!(deck.title, "Quarterly review");
    let kinds: Vec<SlideKind> = deck.slides.iter().map(SlideData::kind).collect();
    assert_eq!(
        kinds,
        [SlideKind::Title, SlideKind::Sequence, SlideKind::Table, SlideKind::KeyPoint]
    );

    let relaxed = import_deck(&read_deck("hand_edited.json5")).expect("json5 deck imports");
    assert_eq!(relaxed.slides.len(), 2);
    assert_eq!(relaxed.slides[0].variant(), Some("loop"));

    let err = import_deck(&read_deck("missing_center.json")).unwrap_err();
    assert!(matches!(
        &err,
        DeckError::MissingFields { index: 3, kind, field: "center" } if kind == "hub-spoke"
    ));
}

#[test]
fn exported_decks_import_again() {
    let deck = import_deck(&read_deck("quarterly.json")).unwrap();
    let raw = export_deck(&deck.title, deck.description.as_deref(), &deck.slides).unwrap();
    let again = import_deck(&raw).unwrap();
    assert_eq!(again, deck);
}

#[test]
fn block_editing_round_trip() {
    let cycle = create_default_slide(SlideKind::Cycle);
    let mut ids = BlockIds::with_seed(42);
    let mut blocks = legacy_to_blocks(&cycle, &mut ids);
    assert_eq!(blocks.blocks.len(), 2);
    assert!(blocks.blocks.iter().all(|block| block.id.starts_with("blk-42-")));

    let body = blocks.blocks[1].clone();
    let as_stack = convert_block(&body, SlideKind::Stack, Some("vertical"));
    assert_eq!(as_stack.id, body.id);
    assert_eq!(
        (as_stack.x, as_stack.y, as_stack.width, as_stack.height),
        (body.x, body.y, body.width, body.height)
    );
    assert_eq!(as_stack.data.diagram_kind(), Some(SlideKind::Stack));

    let offset = apply_block_variant(&as_stack, "offset");
    assert!(matches!(&offset.data, BlockData::Stack(block) if block.content.variant.as_str() == "offset"));
    let ignored = apply_block_variant(&offset, "spiral");
    assert_eq!(ignored, offset);

    blocks.blocks[1] = offset;
    let collapsed = blocks_to_legacy(&blocks);
    assert_eq!(collapsed.kind(), SlideKind::Stack);
    assert_eq!(collapsed.title(), cycle.title());
    assert_eq!(names(&collapsed), names(&cycle));
}

#[test]
fn field_patches_flow_into_conversion() {
    let sequence = create_default_slide(SlideKind::Sequence);
    let patched = patch_slide(&sequence, "steps.0.label", json!("Kickoff"));
    assert_eq!(names(&patched)[0], "Kickoff");
    assert_eq!(names(&sequence)[0], names(&create_default_slide(SlideKind::Sequence))[0]);

    let cycle = convert_to_type(&patched, SlideKind::Cycle, None);
    assert_eq!(names(&cycle)[0], "Kickoff");
}
