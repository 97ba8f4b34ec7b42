//! Rendering options

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{QrError, QrResult};

/// Default rendered side length in pixels
pub const DEFAULT_PIXEL_WIDTH: u32 = 512;

/// Default quiet zone, in modules
pub const DEFAULT_MARGIN: u32 = 2;

/// Largest side length accepted for a rendered badge
pub const MAX_PIXEL_WIDTH: u32 = 4096;

/// Largest quiet zone accepted, in modules
pub const MAX_MARGIN: u32 = 32;

/// Brand blue used for the dark modules
pub const BRAND_DARK: HexColor = HexColor::rgb(0x13, 0x5b, 0xec);

/// Background for the light modules
pub const BRAND_LIGHT: HexColor = HexColor::rgb(0xff, 0xff, 0xff);

/// RGBA color written as a CSS-style hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 4]);

impl HexColor {
    /// Opaque color from RGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0xff])
    }

    /// Color from RGBA components
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Raw RGBA bytes
    pub const fn to_rgba(self) -> [u8; 4] {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = QrError;

    /// Accepts `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`
    fn from_str(s: &str) -> QrResult<Self> {
        let invalid = || QrError::InvalidOptions(format!("invalid color '{s}'"));

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|n| n * 0x11);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        let rgba = match hex.len() {
            3 => [nibble(0), nibble(1), nibble(2), Ok(0xff)],
            4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
            6 => [byte(0), byte(2), byte(4), Ok(0xff)],
            8 => [byte(0), byte(2), byte(4), byte(6)],
            _ => return Err(invalid()),
        };

        let mut out = [0u8; 4];
        for (slot, v) in out.iter_mut().zip(rgba) {
            *slot = v.map_err(|_| invalid())?;
        }
        Ok(Self(out))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 0xff {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How a verification URL is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrOptions {
    /// Side length of the output image in pixels
    pub pixel_width: u32,
    /// Quiet zone around the symbol, in modules
    pub margin: u32,
    /// Foreground (dark module) color
    pub dark: HexColor,
    /// Background (light module) color
    pub light: HexColor,
}

impl QrOptions {
    pub fn with_pixel_width(mut self, pixel_width: u32) -> Self {
        self.pixel_width = pixel_width;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_colors(mut self, dark: HexColor, light: HexColor) -> Self {
        self.dark = dark;
        self.light = light;
        self
    }

    /// Reject options that cannot produce an image
    pub fn validate(&self) -> QrResult<()> {
        if self.pixel_width == 0 {
            return Err(QrError::InvalidOptions(
                "pixel width must be positive".to_string(),
            ));
        }
        if self.pixel_width > MAX_PIXEL_WIDTH {
            return Err(QrError::InvalidOptions(format!(
                "pixel width {} exceeds {MAX_PIXEL_WIDTH}",
                self.pixel_width
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(QrError::InvalidOptions(format!(
                "margin {} exceeds {MAX_MARGIN} modules",
                self.margin
            )));
        }
        Ok(())
    }
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            pixel_width: DEFAULT_PIXEL_WIDTH,
            margin: DEFAULT_MARGIN,
            dark: BRAND_DARK,
            light: BRAND_LIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!("#135bec".parse::<HexColor>().unwrap(), BRAND_DARK);
        assert_eq!("#135BEC".parse::<HexColor>().unwrap(), BRAND_DARK);
        assert_eq!("#fff".parse::<HexColor>().unwrap(), BRAND_LIGHT);
        assert_eq!(
            "#00000080".parse::<HexColor>().unwrap(),
            HexColor::rgba(0, 0, 0, 0x80)
        );
        assert_eq!(
            "#0008".parse::<HexColor>().unwrap(),
            HexColor::rgba(0, 0, 0, 0x88)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["135bec", "#12", "#gggggg", "#1234567", "", "#"] {
            assert!(
                matches!(bad.parse::<HexColor>(), Err(QrError::InvalidOptions(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(BRAND_DARK.to_string(), "#135bec");
        assert_eq!(HexColor::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_defaults() {
        let opts = QrOptions::default();
        assert_eq!(opts.pixel_width, 512);
        assert_eq!(opts.margin, 2);
        assert_eq!(opts.dark, BRAND_DARK);
        assert_eq!(opts.light, BRAND_LIGHT);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let opts = QrOptions::default().with_pixel_width(0);
        assert!(matches!(opts.validate(), Err(QrError::InvalidOptions(_))));
    }

    #[test]
    fn test_oversized_width_and_margin_rejected() {
        for opts in [
            QrOptions::default().with_pixel_width(u32::MAX),
            QrOptions::default().with_pixel_width(MAX_PIXEL_WIDTH + 1),
            QrOptions::default().with_margin(u32::MAX),
            QrOptions::default().with_margin(MAX_MARGIN + 1),
        ] {
            assert!(
                matches!(opts.validate(), Err(QrError::InvalidOptions(_))),
                "accepted {opts:?}"
            );
        }

        let edge = QrOptions::default()
            .with_pixel_width(MAX_PIXEL_WIDTH)
            .with_margin(MAX_MARGIN);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let json = serde_json::to_value(QrOptions::default()).unwrap();
        assert_eq!(json["pixelWidth"], 512);
        assert_eq!(json["dark"], "#135bec");

        let parsed: QrOptions =
            serde_json::from_str(r##"{"margin": 4, "light": "#eeeeee"}"##).unwrap();
        assert_eq!(parsed.margin, 4);
        assert_eq!(parsed.pixel_width, DEFAULT_PIXEL_WIDTH);
        assert_eq!(parsed.light, HexColor::rgb(0xee, 0xee, 0xee));
    }
}
