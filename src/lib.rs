pub mod blocks;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod deck;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod patch;
pub mod render;
pub mod theme;
pub mod variants;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig};
pub use convert::{convert_to_type, create_default_slide, recommend_layout};
pub use ir::{SlideData, SlideKind};
pub use layout::compute_layout;
pub use render::{render_svg, render_svg_with};
pub use theme::Theme;

/// Everything needed to turn a slide into SVG.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl RenderOptions {
    pub fn swiss() -> Self {
        Config::default().into()
    }

    /// Named theme; `None` for an unknown name.
    pub fn themed(name: &str) -> Option<Self> {
        let theme = Theme::by_name(name)?;
        let render = RenderConfig {
            background: theme.slide_background.clone(),
            ..RenderConfig::default()
        };
        Some(Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        })
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::swiss()
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
        }
    }
}

pub fn render_slide(slide: &SlideData, options: &RenderOptions) -> String {
    let layout = compute_layout(slide, &options.theme, &options.layout);
    render_svg_with(&layout, &options.theme, &options.layout, &options.render)
}

/// Decodes a slide from JSON and renders it.
pub fn render_with_options(slide_json: &str, options: RenderOptions) -> anyhow::Result<String> {
    let slide: SlideData = serde_json::from_str(slide_json)?;
    Ok(render_slide(&slide, &options))
}
