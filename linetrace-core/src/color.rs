//! Stroke and background colors.
//!
//! Colors keep the CSS form they were generated in (`#rrggbb` or
//! `hsl(h, s%, l%)`) so the vector writer can emit them verbatim, and convert
//! to sRGB bytes for the raster backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Light grey used for the alignment grid.
    pub const GRID: Self = Self::new(0xcc, 0xcc, 0xcc);

    /// Create a color from channel bytes.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] for any other form.
    pub fn from_hex(input: &str) -> CoreResult<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || CoreError::Parse(format!("invalid hex color '{input}'"));
        if !hex.is_ascii() {
            return Err(bad());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(bad()),
        }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

/// Color of a single stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ColorSpec {
    /// A literal sRGB color.
    Rgb(Rgb),
    /// Hue in degrees, saturation and lightness in percent.
    Hsl {
        /// Hue, `0..360`.
        hue: u16,
        /// Saturation, `0..=100`.
        saturation: u8,
        /// Lightness, `0..=100`.
        lightness: u8,
    },
}

impl ColorSpec {
    /// `#000000`.
    pub const BLACK: Self = Self::Rgb(Rgb::BLACK);

    /// Build an HSL color.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if hue is not below 360 or a percentage
    /// exceeds 100.
    pub fn hsl(hue: u16, saturation: u8, lightness: u8) -> CoreResult<Self> {
        if hue >= 360 || saturation > 100 || lightness > 100 {
            return Err(CoreError::Parse(format!(
                "hsl({hue}, {saturation}%, {lightness}%) is out of range"
            )));
        }
        Ok(Self::Hsl {
            hue,
            saturation,
            lightness,
        })
    }

    /// Convert to sRGB bytes.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        match self {
            Self::Rgb(rgb) => rgb,
            Self::Hsl {
                hue,
                saturation,
                lightness,
            } => hsl_to_rgb(
                f64::from(hue),
                f64::from(saturation) / 100.0,
                f64::from(lightness) / 100.0,
            ),
        }
    }

    fn parse_hsl(input: &str) -> CoreResult<Self> {
        let bad = || CoreError::Parse(format!("invalid hsl color '{input}'"));
        let body = input
            .trim()
            .strip_prefix("hsl(")
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(bad)?;
        let mut parts = body.split(',').map(str::trim);
        let hue = parts.next().ok_or_else(bad)?;
        let sat = parts.next().ok_or_else(bad)?;
        let light = parts.next().ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        let hue = hue.parse::<u16>().map_err(|_| bad())?;
        let sat = sat
            .strip_suffix('%')
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or_else(bad)?;
        let light = light
            .strip_suffix('%')
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or_else(bad)?;
        Self::hsl(hue, sat, light)
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(rgb) => write!(f, "{rgb}"),
            Self::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue}, {saturation}%, {lightness}%)"),
        }
    }
}

impl FromStr for ColorSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim_start().starts_with("hsl(") {
            Self::parse_hsl(s)
        } else {
            Rgb::from_hex(s).map(Self::Rgb)
        }
    }
}

impl From<ColorSpec> for String {
    fn from(c: ColorSpec) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for ColorSpec {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[allow(clippy::many_single_char_names)]
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp {
        hp if hp < 1.0 => (c, x, 0.0),
        hp if hp < 2.0 => (x, c, 0.0),
        hp if hp < 3.0 => (0.0, c, x),
        hp if hp < 4.0 => (0.0, x, c),
        hp if hp < 5.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_byte(r1), to_byte(g1), to_byte(b1))
}
