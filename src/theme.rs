use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PALETTE: &str = "default";

const GRADIENT_PALETTE: [&str; 6] = [
    "#546E7A", "#78909C", "#4CAF50", "#81C784", "#E57373", "#EF9A9A",
];

const CHART_PALETTE: [&str; 10] = [
    "#546E7A", "#4CAF50", "#E57373", "#42A5F5", "#FFB74D", "#AB47BC", "#78909C", "#81C784",
    "#EF9A9A", "#64B5F6",
];

const OCEAN_PALETTE: [&str; 6] = [
    "#01579B", "#0277BD", "#0288D1", "#26A69A", "#4DB6AC", "#80CBC4",
];

const SUNSET_PALETTE: [&str; 6] = [
    "#BF360C", "#E64A19", "#FF7043", "#FFA726", "#FFCA28", "#8D6E63",
];

const FOREST_PALETTE: [&str; 6] = [
    "#1B5E20", "#2E7D32", "#558B2F", "#7CB342", "#9E9D24", "#6D4C41",
];

const MONO_PALETTE: [&str; 5] = ["#263238", "#455A64", "#607D8B", "#90A4AE", "#B0BEC5"];

fn builtin_palettes() -> BTreeMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 6] = [
        (DEFAULT_PALETTE, &GRADIENT_PALETTE),
        ("chart", &CHART_PALETTE),
        ("ocean", &OCEAN_PALETTE),
        ("sunset", &SUNSET_PALETTE),
        ("forest", &FOREST_PALETTE),
        ("mono", &MONO_PALETTE),
    ];
    entries
        .into_iter()
        .map(|(name, colors)| {
            (
                name.to_string(),
                colors.iter().map(|c| c.to_string()).collect(),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub font_family: String,
    pub page_background: String,
    pub slide_background: String,
    pub card_background: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub text_caption: String,
    pub accent_positive: String,
    pub accent_negative: String,
    pub accent_neutral: String,
    pub border: String,
    pub bar_track: String,
    pub palettes: BTreeMap<String, Vec<String>>,
}

impl Theme {
    pub fn swiss() -> Self {
        Self {
            name: "swiss".to_string(),
            font_family: "Inter, HarmonyOS Sans, Source Han Sans, sans-serif".to_string(),
            page_background: "#EEEEE8".to_string(),
            slide_background: "#F5F5F0".to_string(),
            card_background: "#FFFFFF".to_string(),
            text_primary: "#333333".to_string(),
            text_secondary: "#757575".to_string(),
            text_caption: "#9E9E9E".to_string(),
            accent_positive: "#4CAF50".to_string(),
            accent_negative: "#E57373".to_string(),
            accent_neutral: "#546E7A".to_string(),
            border: "rgba(0,0,0,0.06)".to_string(),
            bar_track: "#F0F0EA".to_string(),
            palettes: builtin_palettes(),
        }
    }

    pub fn midnight() -> Self {
        Self {
            name: "midnight".to_string(),
            font_family: "Inter, HarmonyOS Sans, Source Han Sans, sans-serif".to_string(),
            page_background: "#0F1419".to_string(),
            slide_background: "#182028".to_string(),
            card_background: "#222C36".to_string(),
            text_primary: "#ECEFF1".to_string(),
            text_secondary: "#B0BEC5".to_string(),
            text_caption: "#78909C".to_string(),
            accent_positive: "#66BB6A".to_string(),
            accent_negative: "#EF5350".to_string(),
            accent_neutral: "#90A4AE".to_string(),
            border: "rgba(255,255,255,0.08)".to_string(),
            bar_track: "#2B3640".to_string(),
            palettes: builtin_palettes(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "swiss" | "default" | "light" => Some(Self::swiss()),
            "midnight" | "dark" => Some(Self::midnight()),
            _ => None,
        }
    }

    /// `count` colours cycled from the named palette. Unknown names use the
    /// default palette.
    pub fn palette(&self, count: usize, name: Option<&str>) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        let requested = name.unwrap_or(DEFAULT_PALETTE);
        let colors = match self.palettes.get(requested) {
            Some(colors) if !colors.is_empty() => colors,
            _ => {
                if requested != DEFAULT_PALETTE {
                    tracing::debug!(palette = requested, "unknown palette, using default");
                }
                match self.palettes.get(DEFAULT_PALETTE) {
                    Some(colors) if !colors.is_empty() => colors,
                    _ => return vec![self.accent_neutral.clone(); count],
                }
            }
        };
        colors.iter().cycle().take(count).cloned().collect()
    }

    pub fn chart_palette(&self, count: usize, name: Option<&str>) -> Vec<String> {
        self.palette(count, Some(name.unwrap_or("chart")))
    }

    pub fn semantic_color(&self, color: crate::ir::SemanticColor) -> &str {
        match color {
            crate::ir::SemanticColor::Positive => &self.accent_positive,
            crate::ir::SemanticColor::Negative => &self.accent_negative,
            crate::ir::SemanticColor::Neutral => &self.accent_neutral,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::swiss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        let theme = Theme::swiss();
        for count in 0..15 {
            assert_eq!(theme.palette(count, None).len(), count);
        }
    }

    #[test]
    fn palette_is_deterministic_and_cycles() {
        let theme = Theme::swiss();
        let a = theme.palette(8, Some("ocean"));
        let b = theme.palette(8, Some("ocean"));
        assert_eq!(a, b);
        assert_eq!(a[0], a[6]);
    }

    #[test]
    fn single_colour_is_the_neutral_accent() {
        let theme = Theme::swiss();
        assert_eq!(theme.palette(1, None), vec![theme.accent_neutral.clone()]);
    }

    #[test]
    fn unknown_palette_falls_back_to_default() {
        let theme = Theme::swiss();
        assert_eq!(theme.palette(4, Some("neon")), theme.palette(4, None));
    }
}
