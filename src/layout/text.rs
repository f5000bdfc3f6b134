use crate::config::LayoutConfig;

use super::{Label, TextAnchor, TextBlock};

/// Approximate advance width as a fraction of the font size.
pub(super) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.28,
        'i' | 'j' | 'l' | 'I' | '|' | '!' | '\'' => 0.25,
        '.' | ',' | ':' | ';' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '{' | '}' | '-' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.92,
        '@' | '#' | '%' | '&' => 0.9,
        'A'..='Z' => 0.66,
        'a'..='z' => 0.55,
        '0'..='9' => 0.58,
        '…' => 0.9,
        c if is_wide(c) => 1.0,
        _ => 0.6,
    }
}

/// CJK ideographs, kana, hangul and fullwidth forms take a full em.
fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF)
}

pub(super) fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

pub(super) fn split_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

/// Greedy word wrap. Runs of wide glyphs break per character since CJK text
/// carries no spaces.
pub(super) fn wrap_line(line: &str, max_width: f32, font_size: f32) -> Vec<String> {
    if text_width(line, font_size) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for token in tokens(line) {
        let candidate = if current.is_empty() {
            token.trim_start().to_string()
        } else {
            format!("{current}{token}")
        };
        if text_width(&candidate, font_size) > max_width && !current.is_empty() {
            lines.push(current.trim_end().to_string());
            current = token.trim_start().to_string();
        } else {
            current = candidate;
        }
    }
    if !current.trim().is_empty() {
        lines.push(current.trim_end().to_string());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn tokens(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut word = String::new();
    for ch in line.chars() {
        if is_wide(ch) {
            if !word.is_empty() {
                out.push(std::mem::take(&mut word));
            }
            out.push(ch.to_string());
        } else if ch == ' ' {
            word.push(ch);
            out.push(std::mem::take(&mut word));
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        out.push(word);
    }
    out
}

pub(super) fn measure_text(
    text: &str,
    font_size: f32,
    max_width: Option<f32>,
    config: &LayoutConfig,
) -> TextBlock {
    let limit = max_width.unwrap_or(config.max_label_width_chars.max(1) as f32 * font_size * 0.56);
    let mut lines = Vec::new();
    for line in split_lines(text) {
        lines.extend(wrap_line(&line, limit.max(font_size), font_size));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * config.line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

/// Caps a block at `max_lines`, ellipsising the last kept line.
pub(super) fn clamp_lines(mut block: TextBlock, max_lines: usize, font_size: f32, line_height: f32) -> TextBlock {
    if block.lines.len() <= max_lines || max_lines == 0 {
        return block;
    }
    block.lines.truncate(max_lines);
    if let Some(last) = block.lines.last_mut() {
        last.push('…');
    }
    block.height = max_lines as f32 * font_size * line_height;
    block
}

/// Builder for positioned labels; engines chain the optional parts.
pub(super) struct LabelSpec<'a> {
    text: &'a str,
    font_size: f32,
    color: &'a str,
    anchor: TextAnchor,
    bold: bool,
    max_width: Option<f32>,
    max_lines: Option<usize>,
}

impl<'a> LabelSpec<'a> {
    pub(super) fn new(text: &'a str, font_size: f32, color: &'a str) -> Self {
        Self {
            text,
            font_size,
            color,
            anchor: TextAnchor::Middle,
            bold: false,
            max_width: None,
            max_lines: None,
        }
    }

    pub(super) fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub(super) fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub(super) fn width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width.max(1.0));
        self
    }

    pub(super) fn lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    /// Places the label with `y` as the vertical centre of the block.
    pub(super) fn at(self, x: f32, y: f32, config: &LayoutConfig) -> Label {
        let mut text = measure_text(self.text, self.font_size, self.max_width, config);
        if let Some(max_lines) = self.max_lines {
            text = clamp_lines(text, max_lines, self.font_size, config.line_height);
        }
        Label {
            x,
            y,
            text,
            font_size: self.font_size,
            color: self.color.to_string(),
            anchor: self.anchor,
            bold: self.bold,
        }
    }

    /// Places the label with `top` as the upper edge of the block.
    pub(super) fn below(self, x: f32, top: f32, config: &LayoutConfig) -> Label {
        let mut label = self.at(x, top, config);
        label.y = top + label.text.height / 2.0;
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_handles_escaped_newlines() {
        assert_eq!(split_lines("a\\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("  one \n two  "), vec!["one", "two"]);
    }

    #[test]
    fn width_scales_with_font_size() {
        let w16 = text_width("Revenue", 16.0);
        let w32 = text_width("Revenue", 32.0);
        assert!((w32 - 2.0 * w16).abs() < 0.01);
    }

    #[test]
    fn wide_glyphs_take_a_full_em() {
        assert_eq!(char_width_factor('中'), 1.0);
        assert!(text_width("中文", 10.0) > text_width("ab", 10.0));
    }

    #[test]
    fn wraps_long_lines() {
        let lines = wrap_line("a fairly long sentence that must wrap", 80.0, 16.0);
        assert!(lines.len() > 1, "{lines:?}");
        assert!(wrap_line("short", 500.0, 16.0).len() == 1);
    }

    #[test]
    fn wraps_cjk_without_spaces() {
        let lines = wrap_line("数据驱动的增长策略与执行", 60.0, 16.0);
        assert!(lines.len() > 1);
    }

    #[test]
    fn measure_empty_text_keeps_one_line() {
        let config = LayoutConfig::default();
        let block = measure_text("", 16.0, None, &config);
        assert_eq!(block.lines.len(), 1);
        assert_eq!(block.width, 0.0);
    }

    #[test]
    fn clamp_lines_adds_ellipsis() {
        let config = LayoutConfig::default();
        let block = measure_text("one two three four five six", 16.0, Some(40.0), &config);
        let clamped = clamp_lines(block, 2, 16.0, config.line_height);
        assert_eq!(clamped.lines.len(), 2);
        assert!(clamped.lines[1].ends_with('…'));
    }

    #[test]
    fn label_below_sets_centre_from_top() {
        let config = LayoutConfig::default();
        let label = LabelSpec::new("Title", 20.0, "#333").below(10.0, 100.0, &config);
        assert!((label.y - (100.0 + label.text.height / 2.0)).abs() < 1e-3);
    }
}
