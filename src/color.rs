use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Srgb};

use crate::config::{ColorConfig, ConfigError};

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`) into an opaque colour.
pub fn parse_hex(field: &'static str, value: &str) -> Result<Color32, ConfigError> {
    let rgb: Srgb<u8> = value.trim().parse().map_err(|_| ConfigError::BadColor {
        field,
        value: value.to_string(),
    })?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// A darker shade of `color`, used for outlines drawn over a fill.
pub fn darker(color: Color32, amount: f32) -> Color32 {
    let rgb = Srgb::new(color.r(), color.g(), color.b()).into_format::<f32>();
    let hsl: Hsl = rgb.into_color();
    let shaded: Srgb = hsl.darken(amount).into_color();
    let out = shaded.into_format::<u8>();
    Color32::from_rgba_unmultiplied(out.red, out.green, out.blue, color.a())
}

// ---------------------------------------------------------------------------
// Resolved colour scheme
// ---------------------------------------------------------------------------

/// Colours of every mark kind, resolved once from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub point: Color32,
    pub highlight: Color32,
    pub bar: Color32,
    pub line: Color32,
    pub brush_outline: Color32,
}

impl ColorScheme {
    pub fn from_config(config: &ColorConfig) -> Result<Self, ConfigError> {
        let line = parse_hex("line", &config.line)?;
        let alpha = (config.line_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        let highlight = parse_hex("highlight", &config.highlight)?;
        Ok(ColorScheme {
            point: parse_hex("point", &config.point)?,
            highlight,
            bar: parse_hex("bar", &config.bar)?,
            line: Color32::from_rgba_unmultiplied(line.r(), line.g(), line.b(), alpha),
            brush_outline: darker(highlight, 0.3),
        })
    }

    /// Fill for a scatter point depending on whether the brush contains it.
    pub fn point_fill(&self, inside: bool) -> Color32 {
        if inside { self.highlight } else { self.point }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_palette() {
        let scheme = ColorScheme::from_config(&ColorConfig::default()).unwrap();
        assert_eq!(scheme.point, Color32::from_rgb(0x69, 0xb3, 0xa2));
        assert_eq!(scheme.highlight, Color32::from_rgb(0xe1, 0x57, 0x59));
        assert_eq!(scheme.line.a(), 77);
    }

    #[test]
    fn rejects_named_colours() {
        let err = parse_hex("bar", "steelblue").unwrap_err();
        assert!(matches!(err, ConfigError::BadColor { field: "bar", .. }));
    }

    #[test]
    fn darker_keeps_alpha_and_lowers_lightness() {
        let base = Color32::from_rgb(200, 100, 100);
        let dark = darker(base, 0.3);
        assert_eq!(dark.a(), 255);
        assert!(dark.r() < base.r());
    }
}
