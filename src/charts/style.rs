//! Chart Style Module
//! Palette, fonts and colour scales shared by every chart.

use plotters::prelude::ViridisRGB;
use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor};
use serde::{Deserialize, Serialize};

/// Palette used when the configured one is empty.
pub const FALLBACK_COLOR: RGBColor = RGBColor(52, 152, 219); // Blue

/// Default categorical palette.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#0b3d91", // Navy
    "#e0f7fa", // Ice
    "#228b22", // Forest green
    "#1e90ff", // Dodger blue
    "#8B4513", // Saddle brown
    "#D2691E", // Chocolate
    "#DAA520", // Goldenrod
    "#556B2F", // Olive
];

/// Fixed cosmetic configuration for rendered charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartStyle {
    pub palette: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub title_font_size: u32,
    pub label_font_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            width: 1000,
            height: 600,
            font_family: "sans-serif".to_string(),
            title_font_size: 20,
            label_font_size: 12,
        }
    }
}

impl ChartStyle {
    /// Palette colour for series `index`, cycling through the palette.
    pub fn palette_color(&self, index: usize) -> RGBColor {
        if self.palette.is_empty() {
            return FALLBACK_COLOR;
        }
        parse_hex_color(&self.palette[index % self.palette.len()]).unwrap_or(FALLBACK_COLOR)
    }

    pub fn font(&self, size: f64) -> FontDesc<'_> {
        FontDesc::new(FontFamily::Name(&self.font_family), size, FontStyle::Normal)
    }

    pub fn title_font(&self) -> FontDesc<'_> {
        self.font(self.title_font_size as f64)
    }

    pub fn label_font(&self) -> FontDesc<'_> {
        self.font(self.label_font_size as f64)
    }
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Viridis colour at `t` in `[0, 1]` (clamped).
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t };
    ViridisRGB::get_color(t)
}

/// Position of `value` within `[min, max]`; a flat range maps to the middle.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

/// Short axis label: 1.2B, 340M, 12k.
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e4 {
        format!("{:.0}k", value / 1e3)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#0b3d91"), Some(RGBColor(11, 61, 145)));
        assert_eq!(parse_hex_color("DAA520"), Some(RGBColor(218, 165, 32)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_palette_cycles() {
        let style = ChartStyle::default();
        assert_eq!(style.palette_color(0), style.palette_color(8));
        assert_eq!(style.palette_color(2), RGBColor(34, 139, 34));

        let empty = ChartStyle {
            palette: Vec::new(),
            ..ChartStyle::default()
        };
        assert_eq!(empty.palette_color(3), FALLBACK_COLOR);
    }

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(254, 232, 37));
        assert_eq!(viridis(2.0), viridis(1.0));
        assert_eq!(viridis(-0.5), viridis(0.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn test_normalize_flat_range() {
        assert_eq!(normalize(5.0, 5.0, 5.0), 0.5);
        assert_eq!(normalize(7.5, 5.0, 10.0), 0.5);
    }

    #[test]
    fn test_compact_number() {
        assert_eq!(compact_number(1_425_887_337.0), "1.4B");
        assert_eq!(compact_number(38_000_000.0), "38.0M");
        assert_eq!(compact_number(25_000.0), "25k");
        assert_eq!(compact_number(42.0), "42");
        assert_eq!(compact_number(0.25), "0.25");
    }
}
