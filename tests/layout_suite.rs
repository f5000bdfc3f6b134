use std::path::Path;

use slidekit::layout::{DiagramData, Layout};
use slidekit::variants::variant_field;
use slidekit::{
    LayoutConfig, SlideData, SlideKind, Theme, compute_layout, convert_to_type, create_default_slide,
    render_svg,
};

fn assert_valid_svg(svg: &str, name: &str) {
    assert!(svg.contains("<svg"), "{name}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{name}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{name}: NaN in output");
}

fn layout_and_render(slide: &SlideData) -> (Layout, String) {
    let theme = Theme::swiss();
    let layout_config = LayoutConfig::default();
    let layout = compute_layout(slide, &theme, &layout_config);
    let svg = render_svg(&layout, &theme, &layout_config);
    (layout, svg)
}

fn load_fixture(rel: &str) -> SlideData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("slides")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    serde_json::from_str(&input).unwrap_or_else(|err| panic!("{rel}: {err}"))
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let fixtures = [
        ("block_slide.json", SlideKind::BlockSlide),
        ("chart_sankey.json", SlideKind::Chart),
        ("chart_waterfall.json", SlideKind::Chart),
        ("funnel_pyramid.json", SlideKind::Funnel),
        ("grid_labeled.json", SlideKind::GridItem),
        ("hub_spoke_orbit.json", SlideKind::HubSpoke),
        ("mindmap.json", SlideKind::Mindmap),
        ("roadmap.json", SlideKind::Roadmap),
    ];

    for (rel, kind) in fixtures {
        let slide = load_fixture(rel);
        assert_eq!(slide.kind(), kind, "{rel}: decoded as the wrong type");
        let (layout, svg) = layout_and_render(&slide);
        assert_valid_svg(&svg, rel);
        if kind.is_diagram() {
            assert!(layout.diagram.is_some(), "{rel}: diagram missing");
        }
    }
}

#[test]
fn every_type_and_variant_lays_out() {
    for kind in SlideKind::ALL {
        let base = create_default_slide(kind);
        let variants: Vec<Option<&str>> = match variant_field(kind) {
            Some(field) => field.options.iter().map(|option| Some(option.value)).collect(),
            None => vec![None],
        };
        for variant in variants {
            let slide = convert_to_type(&base, kind, variant);
            let name = format!("{kind}/{}", variant.unwrap_or("-"));
            let (layout, svg) = layout_and_render(&slide);
            assert_valid_svg(&svg, &name);
            assert!(layout.width > 0.0 && layout.height > 0.0, "{name}: empty canvas");
            if let Some(placed) = &layout.diagram {
                let (w, h) = placed.data.viewbox();
                assert!(w > 0.0 && h > 0.0, "{name}: degenerate viewbox");
                assert!(placed.frame.width > 0.0 && placed.frame.height > 0.0, "{name}: empty frame");
            }
        }
    }
}

#[test]
fn funnel_layers_tile_without_gaps() {
    let slide = load_fixture("funnel_pyramid.json");
    let (layout, _) = layout_and_render(&slide);
    let Some(DiagramData::Funnel(funnel)) = layout.diagram.map(|placed| placed.data) else {
        panic!("expected a funnel layout");
    };
    assert_eq!(funnel.layers.len(), 4);
    for pair in funnel.layers.windows(2) {
        assert!((pair[0].clip.bottom_left - pair[1].clip.top_left).abs() < 1e-3);
        assert!((pair[0].clip.bottom_right - pair[1].clip.top_right).abs() < 1e-3);
        assert!(pair[0].rect.y < pair[1].rect.y);
    }
    let apex = &funnel.layers[0].clip;
    assert!(apex.top_right - apex.top_left < apex.bottom_right - apex.bottom_left);
}

#[test]
fn block_slides_place_every_block() {
    let slide = load_fixture("block_slide.json");
    let (layout, svg) = layout_and_render(&slide);
    assert_eq!(layout.blocks.len(), 3);
    let types: Vec<&str> = layout.blocks.iter().map(|block| block.block_type).collect();
    assert_eq!(types, ["title-body", "cycle", "image"]);
    assert!(layout.blocks[1].diagram.is_some());
    assert!(layout.blocks[2].image.is_some());
    assert!(svg.contains("Team photo"));
}

#[test]
fn empty_content_still_renders() {
    let empties = [
        r#"{"type": "grid-item", "title": "Nothing", "variant": "solid", "items": []}"#,
        r#"{"type": "funnel", "title": "Nothing", "variant": "funnel", "layers": []}"#,
        r#"{"type": "sequence", "title": "Nothing", "variant": "timeline", "steps": []}"#,
        r#"{"type": "venn", "title": "Nothing", "variant": "classic", "sets": []}"#,
        r#"{"type": "concentric", "title": "Nothing", "variant": "circles", "rings": []}"#,
        r#"{"type": "stack", "title": "Nothing", "variant": "offset", "layers": []}"#,
        r#"{"type": "hub-spoke", "title": "Nothing", "variant": "orbit", "center": {"label": "Hub"}, "spokes": []}"#,
        r#"{"type": "table", "title": "Nothing", "variant": "striped", "headers": [], "rows": []}"#,
        r#"{"type": "chart", "title": "Nothing", "chartType": "radar"}"#,
        r#"{"type": "chart", "title": "Nothing", "chartType": "sankey", "sankeyNodes": [], "sankeyLinks": []}"#,
    ];
    for raw in empties {
        let slide: SlideData = serde_json::from_str(raw).expect("empty slide decodes");
        let (layout, svg) = layout_and_render(&slide);
        assert!(layout.diagram.is_none(), "{raw}: empty content should not place a diagram");
        assert_valid_svg(&svg, raw);
        assert!(svg.contains("Nothing"));
    }

    let blank: SlideData = serde_json::from_str(r#"{"type": "block-slide", "title": "Blank", "blocks": []}"#).unwrap();
    let (layout, svg) = layout_and_render(&blank);
    assert!(layout.blocks.is_empty());
    assert_valid_svg(&svg, "block-slide");
}

#[test]
fn themes_change_the_output() {
    let slide = create_default_slide(SlideKind::Concentric);
    let layout_config = LayoutConfig::default();
    let swiss = Theme::swiss();
    let midnight = Theme::by_name("midnight").expect("midnight theme");
    let a = render_svg(&compute_layout(&slide, &swiss, &layout_config), &swiss, &layout_config);
    let b = render_svg(&compute_layout(&slide, &midnight, &layout_config), &midnight, &layout_config);
    assert_ne!(a, b);
}

#[test]
fn layout_is_deterministic() {
    let theme = Theme::swiss();
    let layout_config = LayoutConfig::default();
    let mut slides: Vec<SlideData> = SlideKind::ALL.into_iter().map(create_default_slide).collect();
    slides.push(load_fixture("chart_sankey.json"));
    slides.push(load_fixture("block_slide.json"));
    for slide in &slides {
        let first = compute_layout(slide, &theme, &layout_config);
        let second = compute_layout(slide, &theme, &layout_config);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap(),
            "{}: layout differs between runs",
            slide.kind()
        );
        assert_eq!(
            render_svg(&first, &theme, &layout_config),
            render_svg(&second, &theme, &layout_config)
        );
    }
}
