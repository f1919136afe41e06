use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::{PaletteError, Result};

/// One palette entry: an RGB triple and its lowercase `#rrggbb` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Color {
    rgb: [u8; 3],
    hex: String,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: [r, g, b],
            hex: format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Parse `rrggbb`, with or without a leading `#`, in any case.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PaletteError::invalid_input(format!(
                "hex color must be 6 characters, got {s:?}"
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| PaletteError::invalid_input(format!("invalid hex color {s:?}")))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Build a color from a k-means centroid in normalized `[0, 1]` RGB.
    ///
    /// Channels are rounded to the nearest integer; the cast saturates, so
    /// centroids of in-range samples always land in `0..=255`.
    pub(crate) fn from_centroid(centroid: &Srgb<f32>) -> Self {
        let channel = |c: f32| (c * 255.0).round() as u8;
        Self::new(
            channel(centroid.red),
            channel(centroid.green),
            channel(centroid.blue),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        color.rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_zero_padded() {
        let color = Color::new(255, 0, 128);
        assert_eq!(color.rgb(), [255, 0, 128]);
        assert_eq!(color.hex(), "#ff0080");
        assert_eq!(color.to_string(), "#ff0080");
        assert_eq!(Color::new(1, 2, 3).hex(), "#010203");
    }

    #[test]
    fn parses_hex_in_any_case() {
        assert_eq!("#FF0080".parse::<Color>().unwrap(), Color::new(255, 0, 128));
        assert_eq!(Color::from_hex("0a0B0c").unwrap().hex(), "#0a0b0c");
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#fff", "#12345g", "1234567", "#ééé"] {
            let err = Color::from_hex(bad).unwrap_err();
            assert!(err.is_caller_error(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn centroid_channels_round_to_nearest() {
        let color = Color::from_centroid(&Srgb::new(1.0, 0.0, 0.5));
        assert_eq!(color.rgb(), [255, 0, 128]);

        let color = Color::from_centroid(&Srgb::new(254.6 / 255.0, 0.4 / 255.0, 10.6 / 255.0));
        assert_eq!(color.rgb(), [255, 0, 11]);
    }

    #[test]
    fn converts_to_and_from_arrays() {
        let color = Color::from([12, 34, 56]);
        let rgb: [u8; 3] = color.clone().into();
        assert_eq!(rgb, [12, 34, 56]);
        assert_eq!(color.hex(), "#0c2238");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_rgb_and_hex() {
        let json = serde_json::to_value(Color::new(255, 0, 0)).unwrap();
        assert_eq!(json, serde_json::json!({ "rgb": [255, 0, 0], "hex": "#ff0000" }));
    }
}
