//! Color representation

use std::fmt;

/// Opaque RGB color
///
/// DrawingML stores colors in several forms (`srgbClr`, `sysClr`, `schemeClr`,
/// `prstClr`); all of them are resolved to plain RGB when a drawing is parsed.
/// Transparency is carried separately by [`crate::shape::Paint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Create from a hex string (e.g., "#FF0000", "FF0000" or ARGB "FFFF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        // Skip alpha if present
        let hex = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return None,
        };

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::rgb(r, g, b))
    }

    /// Convert to hex string (without # prefix)
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Resolve a theme color name against the default Office theme
    pub fn from_scheme(name: &str) -> Option<Self> {
        let rgb = match name {
            "dk1" | "tx1" => (0, 0, 0),
            "lt1" | "bg1" => (255, 255, 255),
            "dk2" | "tx2" => (68, 84, 106),
            "lt2" | "bg2" => (231, 230, 230),
            "accent1" => (68, 114, 196),
            "accent2" => (237, 125, 49),
            "accent3" => (165, 165, 165),
            "accent4" => (255, 192, 0),
            "accent5" => (91, 155, 213),
            "accent6" => (112, 173, 71),
            "hlink" => (5, 99, 193),
            "folHlink" => (149, 79, 114),
            _ => return None,
        };
        Some(Color::rgb(rgb.0, rgb.1, rgb.2))
    }

    /// Resolve a preset color name (`prstClr`); only common names are known
    pub fn from_preset(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::rgb(0, 128, 0),
            "lime" => Color::rgb(0, 255, 0),
            "blue" => Color::BLUE,
            "yellow" => Color::YELLOW,
            "cyan" | "aqua" => Color::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
            "gray" | "grey" => Color::GRAY,
            "orange" => Color::rgb(255, 165, 0),
            "purple" => Color::rgb(128, 0, 128),
            _ => return None,
        };
        Some(color)
    }

    /// Convert to RGB tuple
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    // Common colors
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
