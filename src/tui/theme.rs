use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::UiConfig;

/// Color palette for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub green: Color,
    pub purple: Color,
    pub selection_bg: Color,
    pub progress_fill: Color,
    pub progress_empty: Color,
}

impl Theme {
    /// Night palette (purple on near-black)
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            progress_fill: Color::Rgb(0xCC, 0x66, 0xFF),
            progress_empty: Color::Rgb(0x2A, 0x1F, 0x45),
        }
    }

    /// Day palette (indigo on pale blue)
    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xEE, 0xF2, 0xFF),
            text: Color::Rgb(0x31, 0x2E, 0x81),
            text_bright: Color::Rgb(0x1E, 0x1B, 0x4B),
            highlight: Color::Rgb(0x63, 0x66, 0xF1),
            dim: Color::Rgb(0x81, 0x8C, 0xF8),
            green: Color::Rgb(0x05, 0x96, 0x69),
            purple: Color::Rgb(0x7C, 0x3A, 0xED),
            selection_bg: Color::Rgb(0xE0, 0xE7, 0xFF),
            progress_fill: Color::Rgb(0x63, 0x66, 0xF1),
            progress_empty: Color::Rgb(0xC7, 0xD2, 0xFE),
        }
    }

    /// Palette for the theme flag, with `[ui.colors.*]` overrides applied
    pub fn for_flag(dark: bool, ui: &UiConfig) -> Self {
        if dark {
            Theme::dark().with_overrides(&ui.colors.dark)
        } else {
            Theme::light().with_overrides(&ui.colors.light)
        }
    }

    fn with_overrides(mut self, colors: &HashMap<String, String>) -> Self {
        for (key, value) in colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut self.background,
                "text" => &mut self.text,
                "text_bright" => &mut self.text_bright,
                "highlight" => &mut self.highlight,
                "dim" => &mut self.dim,
                "green" => &mut self.green,
                "purple" => &mut self.purple,
                "selection_bg" => &mut self.selection_bg,
                "progress_fill" => &mut self.progress_fill,
                "progress_empty" => &mut self.progress_empty,
                _ => continue,
            };
            *slot = color;
        }
        self
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
    }

    #[test]
    fn test_flag_selects_palette() {
        let ui = UiConfig::default();
        assert_eq!(Theme::for_flag(true, &ui), Theme::dark());
        assert_eq!(Theme::for_flag(false, &ui), Theme::light());
        assert_ne!(Theme::dark().background, Theme::light().background);
    }

    #[test]
    fn test_overrides_apply_to_their_palette_only() {
        let mut ui = UiConfig::default();
        ui.colors.dark.insert("highlight".into(), "#010203".into());
        ui.colors.dark.insert("nonsense".into(), "#FFFFFF".into());
        ui.colors.light.insert("background".into(), "not a color".into());

        let dark = Theme::for_flag(true, &ui);
        assert_eq!(dark.highlight, Color::Rgb(1, 2, 3));
        assert_eq!(dark.text, Theme::dark().text);

        let light = Theme::for_flag(false, &ui);
        assert_eq!(light, Theme::light());
    }
}
