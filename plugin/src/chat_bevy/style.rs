use bevy::prelude::*;
use serde::Deserialize;

/// Colors and sizes of the chat UI
#[derive(Debug, Clone)]
pub struct ChatTheme {
    pub background: Color,
    pub controls_background: Color,
    pub input_background: Color,
    pub text: Color,
    pub error_text: Color,
    pub status_text: Color,
    pub font_size: f32,
}

impl Default for ChatTheme {
    fn default() -> Self {
        Self {
            background: Color::srgb(0.12, 0.12, 0.12),
            controls_background: Color::srgb(0.15, 0.15, 0.16),
            input_background: Color::srgb(0.2, 0.2, 0.2),
            text: Color::srgb(0.8, 0.8, 0.8),
            error_text: Color::srgb(1.0, 0.27, 0.27),
            status_text: Color::srgb(0.6, 0.9, 0.6),
            font_size: 16.0,
        }
    }
}

/// CSS-like theme overrides, as read from a JSON file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSpec {
    pub background: Option<String>,
    pub controls_background: Option<String>,
    pub input_background: Option<String>,
    pub color: Option<String>,
    pub error_color: Option<String>,
    pub status_color: Option<String>,
    pub font_size: Option<f32>,
}

impl ChatTheme {
    /// Overlay [`ThemeSpec`] overrides on the default theme. Unparseable colors keep the default.
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let mut theme = Self::default();
        let overrides = [
            (&spec.background, &mut theme.background),
            (&spec.controls_background, &mut theme.controls_background),
            (&spec.input_background, &mut theme.input_background),
            (&spec.color, &mut theme.text),
            (&spec.error_color, &mut theme.error_text),
            (&spec.status_color, &mut theme.status_text),
        ];
        for (value, slot) in overrides {
            if let Some(color) = value.as_deref().and_then(parse_color) {
                *slot = color;
            }
        }
        if let Some(size) = spec.font_size.filter(|s| *s > 0.0) {
            theme.font_size = size;
        }
        theme
    }
}

/// Parse a CSS color string to Bevy Color
/// Supports: "red", "#f00", "#ff0000", "#ff000080", "rgb(255, 0, 0)", "rgba(255, 0, 0, 0.5)"
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim().to_lowercase();

    let named = match value.as_str() {
        "transparent" => Some(Color::NONE),
        "black" => Some(Color::BLACK),
        "white" => Some(Color::WHITE),
        "red" => Some(Color::srgb(1.0, 0.0, 0.0)),
        "green" => Some(Color::srgb(0.0, 1.0, 0.0)),
        "blue" => Some(Color::srgb(0.0, 0.0, 1.0)),
        "yellow" => Some(Color::srgb(1.0, 1.0, 0.0)),
        "gray" | "grey" => Some(Color::srgb(0.5, 0.5, 0.5)),
        "darkgray" | "darkgrey" => Some(Color::srgb(0.25, 0.25, 0.25)),
        "lightgray" | "lightgrey" => Some(Color::srgb(0.75, 0.75, 0.75)),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }

    log::warn!("Unknown color format: '{}'", value);
    None
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }

    // Short forms repeat each digit: #f0a -> #ff00aa
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).ok();
    let alpha = if expanded.len() == 8 { channel(3)? } else { 255 };

    Some(Color::srgba_u8(channel(0)?, channel(1)?, channel(2)?, alpha))
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    let a = match parts.get(3) {
        Some(a) => a.parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };

    Some(Color::srgba(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a,
    ))
}
