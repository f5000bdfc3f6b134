use serde::Deserialize;
use slidekit::{RenderOptions, SlideKind, convert_to_type, render_with_options};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlideRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    canvas_width: Option<f32>,
    canvas_height: Option<f32>,
}

fn build_render_options(options: SlideRenderOptions) -> RenderOptions {
    let mut render_options = options
        .theme
        .as_deref()
        .and_then(RenderOptions::themed)
        .unwrap_or_else(RenderOptions::swiss);

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(width) = options.canvas_width.filter(|w| *w > 0.0) {
        render_options.layout.canvas_width = width;
    }
    if let Some(height) = options.canvas_height.filter(|h| *h > 0.0) {
        render_options.layout.canvas_height = height;
    }
    render_options
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub fn render_slide_svg(slide_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = match options_json {
        Some(raw_options) => serde_json::from_str::<SlideRenderOptions>(&raw_options).map_err(to_js)?,
        None => SlideRenderOptions::default(),
    };
    render_with_options(slide_json, build_render_options(options)).map_err(to_js)
}

/// Converts a slide to `target_type`; an invalid variant falls back to the
/// target's default.
#[wasm_bindgen]
pub fn convert_slide(slide_json: &str, target_type: &str, variant: Option<String>) -> Result<String, JsValue> {
    let slide = serde_json::from_str(slide_json).map_err(to_js)?;
    let kind = SlideKind::parse(target_type).ok_or_else(|| to_js(format!("unknown slide type: {target_type}")))?;
    serde_json::to_string(&convert_to_type(&slide, kind, variant.as_deref())).map_err(to_js)
}

#[cfg(test)]
mod tests {
    use slidekit::{SlideKind, create_default_slide, render_with_options};

    use crate::{SlideRenderOptions, build_render_options};

    #[test]
    fn renders_a_default_cycle() {
        let slide = serde_json::to_string(&create_default_slide(SlideKind::Cycle)).unwrap();
        let svg = render_with_options(&slide, build_render_options(SlideRenderOptions::default()))
            .expect("default cycle slide should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Plan"));
    }

    #[test]
    fn unknown_theme_falls_back_to_swiss() {
        let options = build_render_options(SlideRenderOptions {
            theme: Some("neon".into()),
            canvas_width: Some(1280.0),
            ..SlideRenderOptions::default()
        });
        assert_eq!(options.theme.name, "swiss");
        assert_eq!(options.layout.canvas_width, 1280.0);
    }
}
