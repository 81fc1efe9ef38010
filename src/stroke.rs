use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::StyleError;

pub const MIN_LINE_WIDTH: u32 = 1;
pub const MAX_LINE_WIDTH: u32 = 50;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Eraser => "Eraser",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Pen => "✏",
            Tool::Eraser => "⌫",
        }
    }
}

/// Style applied to each segment of a stroke.
///
/// The renderer reads it on every `extend_stroke` call, so changing it
/// mid-stroke alters the rest of that stroke.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StrokeStyle {
    pub tool: Tool,
    pub color: Color32,
    line_width: u32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: Color32::WHITE,
            line_width: 5,
        }
    }
}

impl StrokeStyle {
    // Create a style, clamping the width into the supported range
    pub fn new(tool: Tool, color: Color32, line_width: u32) -> Self {
        Self {
            tool,
            color,
            line_width: line_width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH),
        }
    }

    // Create a style from a hex color string such as "#FF0000"
    pub fn from_hex(tool: Tool, color: &str, line_width: u32) -> Result<Self, StyleError> {
        Ok(Self::new(tool, parse_hex_color(color)?, line_width))
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, line_width: u32) {
        self.line_width = line_width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == Tool::Eraser
    }
}

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
pub fn parse_hex_color(input: &str) -> Result<Color32, StyleError> {
    let invalid = || StyleError::InvalidColor(input.to_owned());
    let hex = input.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = channel(&c.to_string())?;
                rgb[i] = v * 17;
            }
            Ok(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Ok(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Ok(Color32::from_rgba_unmultiplied(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex_color("#FF0000").unwrap(), Color32::RED);
        assert_eq!(parse_hex_color("00ff00").unwrap(), Color32::from_rgb(0, 255, 0));
        assert_eq!(parse_hex_color("#fff").unwrap(), Color32::WHITE);
        assert_eq!(
            parse_hex_color("#0000FF80").unwrap(),
            Color32::from_rgba_unmultiplied(0, 0, 255, 128)
        );
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex_color("#12").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn test_line_width_is_clamped() {
        let mut style = StrokeStyle::new(Tool::Pen, Color32::RED, 0);
        assert_eq!(style.line_width(), 1);
        style.set_line_width(80);
        assert_eq!(style.line_width(), 50);
    }

    #[test]
    fn test_default_style() {
        let style = StrokeStyle::default();
        assert_eq!(style.tool, Tool::Pen);
        assert_eq!(style.color, Color32::WHITE);
        assert_eq!(style.line_width(), 5);
    }
}
