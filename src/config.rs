use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub padding: f32,
    pub header_gap: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub hero_title_size: f32,
    pub label_size: f32,
    pub caption_size: f32,
    pub line_height: f32,
    pub max_label_width_chars: usize,
    pub card_radius: f32,
    pub card_padding: f32,
    pub grid_gap: f32,
    pub sequence_gap: f32,
    pub block_inset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 960.0,
            canvas_height: 540.0,
            padding: 48.0,
            header_gap: 20.0,
            title_size: 32.0,
            body_size: 16.0,
            hero_title_size: 52.0,
            label_size: 16.0,
            caption_size: 13.0,
            line_height: 1.35,
            max_label_width_chars: 48,
            card_radius: 10.0,
            card_padding: 16.0,
            grid_gap: 16.0,
            sequence_gap: 12.0,
            block_inset: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub background: String,
    pub corner_radius: f32,
    /// Pixel density of PNG output.
    pub scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: "#F5F5F0".to_string(),
            corner_radius: 0.0,
            scale: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::swiss();
        let render = RenderConfig {
            background: theme.slide_background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    page_background: Option<String>,
    slide_background: Option<String>,
    card_background: Option<String>,
    text_primary: Option<String>,
    text_secondary: Option<String>,
    text_caption: Option<String>,
    accent_positive: Option<String>,
    accent_negative: Option<String>,
    accent_neutral: Option<String>,
    border: Option<String>,
    bar_track: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    canvas_width: Option<f32>,
    canvas_height: Option<f32>,
    padding: Option<f32>,
    header_gap: Option<f32>,
    title_size: Option<f32>,
    body_size: Option<f32>,
    hero_title_size: Option<f32>,
    label_size: Option<f32>,
    caption_size: Option<f32>,
    line_height: Option<f32>,
    max_label_width_chars: Option<usize>,
    card_radius: Option<f32>,
    card_padding: Option<f32>,
    grid_gap: Option<f32>,
    sequence_gap: Option<f32>,
    block_inset: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    background: Option<String>,
    corner_radius: Option<f32>,
    scale: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    palettes: Option<BTreeMap<String, Vec<String>>>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => {
                config.render.background = theme.slide_background.clone();
                config.theme = theme;
            }
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping swiss"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
        config.render.background = config.theme.slide_background.clone();
    }

    if let Some(palettes) = parsed.palettes {
        for (name, colors) in palettes {
            if colors.is_empty() {
                tracing::warn!(palette = %name, "ignoring empty palette");
                continue;
            }
            config.theme.palettes.insert(name, colors);
        }
    }

    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout);
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.corner_radius {
            config.render.corner_radius = v;
        }
        if let Some(v) = render.scale.filter(|s| *s > 0.0) {
            config.render.scale = v;
        }
    }

    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.page_background {
        theme.page_background = v;
    }
    if let Some(v) = vars.slide_background {
        theme.slide_background = v;
    }
    if let Some(v) = vars.card_background {
        theme.card_background = v;
    }
    if let Some(v) = vars.text_primary {
        theme.text_primary = v;
    }
    if let Some(v) = vars.text_secondary {
        theme.text_secondary = v;
    }
    if let Some(v) = vars.text_caption {
        theme.text_caption = v;
    }
    if let Some(v) = vars.accent_positive {
        theme.accent_positive = v;
    }
    if let Some(v) = vars.accent_negative {
        theme.accent_negative = v;
    }
    if let Some(v) = vars.accent_neutral {
        theme.accent_neutral = v;
    }
    if let Some(v) = vars.border {
        theme.border = v;
    }
    if let Some(v) = vars.bar_track {
        theme.bar_track = v;
    }
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) {
    if let Some(v) = file.canvas_width {
        layout.canvas_width = v.max(1.0);
    }
    if let Some(v) = file.canvas_height {
        layout.canvas_height = v.max(1.0);
    }
    if let Some(v) = file.padding {
        layout.padding = v;
    }
    if let Some(v) = file.header_gap {
        layout.header_gap = v;
    }
    if let Some(v) = file.title_size {
        layout.title_size = v;
    }
    if let Some(v) = file.body_size {
        layout.body_size = v;
    }
    if let Some(v) = file.hero_title_size {
        layout.hero_title_size = v;
    }
    if let Some(v) = file.label_size {
        layout.label_size = v;
    }
    if let Some(v) = file.caption_size {
        layout.caption_size = v;
    }
    if let Some(v) = file.line_height {
        layout.line_height = v;
    }
    if let Some(v) = file.max_label_width_chars {
        layout.max_label_width_chars = v;
    }
    if let Some(v) = file.card_radius {
        layout.card_radius = v;
    }
    if let Some(v) = file.card_padding {
        layout.card_padding = v;
    }
    if let Some(v) = file.grid_gap {
        layout.grid_gap = v;
    }
    if let Some(v) = file.sequence_gap {
        layout.sequence_gap = v;
    }
    if let Some(v) = file.block_inset {
        layout.block_inset = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.theme.name, "swiss");
        assert_eq!(config.layout.canvas_width, 960.0);
        assert_eq!(config.render.background, config.theme.slide_background);
    }

    #[test]
    fn overrides_theme_palettes_and_layout() {
        let config = parse_config(
            r##"{
                "theme": "midnight",
                "themeVariables": { "accentNeutral": "#123456" },
                "palettes": { "brand": ["#111111", "#222222"], "empty": [] },
                "layout": { "canvasWidth": 1280, "titleSize": 40 }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.name, "midnight");
        assert_eq!(config.theme.accent_neutral, "#123456");
        assert_eq!(
            config.theme.palette(3, Some("brand")),
            vec!["#111111", "#222222", "#111111"]
        );
        assert!(!config.theme.palettes.contains_key("empty"));
        assert_eq!(config.layout.canvas_width, 1280.0);
        assert_eq!(config.layout.title_size, 40.0);
        assert_eq!(config.layout.body_size, 16.0);
    }

    #[test]
    fn reads_config_from_disk() {
        let path =
            std::env::temp_dir().join(format!("slidekit-config-{}.json", std::process::id()));
        std::fs::write(&path, r##"{"render": {"background": "#000000"}}"##).unwrap();
        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.render.background, "#000000");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_config("{ theme: ").is_err());
    }
}
