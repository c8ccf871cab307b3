//! Line style parameters consumed by the stroke generator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// How stroke endpoints are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    /// Strokes enter and leave through opposite canvas edges.
    Through,
    /// Both endpoints anywhere inside the canvas.
    Random,
    /// A per-stroke coin flip between `Through` and `Random`.
    #[default]
    Mixed,
}

/// How stroke colors are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Every stroke is `#000000`.
    #[default]
    Black,
    /// One of three hue bands: blue, green, magenta.
    Theme,
    /// Any hue, saturated mid-lightness colors.
    Random,
}

/// Requested line cap policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Flat ends flush with the endpoints.
    Butt,
    /// Semicircular ends.
    Round,
    /// A per-stroke coin flip between `Butt` and `Round`.
    #[default]
    Mixed,
}

/// Line cap resolved for a single stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeCap {
    /// Flat ends flush with the endpoints.
    #[default]
    Butt,
    /// Semicircular ends.
    Round,
}

impl StrokeCap {
    /// The CSS / SVG keyword for this cap.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
        }
    }
}

impl fmt::Display for StrokeCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! keyword_enum {
    ($ty:ty { $($variant:ident => $kw:literal),+ $(,)? }) => {
        impl $ty {
            /// The lowercase keyword for this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $kw,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($kw => Ok(Self::$variant),)+
                    other => Err(CoreError::Parse(format!(
                        "unknown {} '{other}'",
                        stringify!($ty)
                    ))),
                }
            }
        }
    };
}

keyword_enum!(LineMode { Through => "through", Random => "random", Mixed => "mixed" });
keyword_enum!(ColorMode { Black => "black", Theme => "theme", Random => "random" });
keyword_enum!(LineCap { Butt => "butt", Round => "round", Mixed => "mixed" });

/// Everything the generator needs to know about how strokes should look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyleParams {
    /// Endpoint placement policy.
    pub line_mode: LineMode,
    /// Color policy.
    pub color_mode: ColorMode,
    /// Thinnest stroke width, in logical units.
    pub min_width: f64,
    /// Thickest stroke width, in logical units.
    pub max_width: f64,
    /// Control point excursion as a percentage (0..=100) of the longer canvas side.
    pub curve_strength: u8,
    /// Line cap policy.
    pub line_cap: LineCap,
    /// Number of strokes per scene.
    pub count: usize,
}

impl Default for LineStyleParams {
    fn default() -> Self {
        Self {
            line_mode: LineMode::Mixed,
            color_mode: ColorMode::Black,
            min_width: 1.0,
            max_width: 5.0,
            curve_strength: 50,
            line_cap: LineCap::Mixed,
            count: 8,
        }
    }
}

impl LineStyleParams {
    /// Largest accepted curve strength.
    pub const MAX_CURVE_STRENGTH: u8 = 100;

    /// Check the width range and curve strength.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidParams`] when widths are not finite and
    /// positive, `min_width > max_width`, or curve strength exceeds 100.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.min_width.is_finite() && self.min_width > 0.0) {
            return Err(CoreError::InvalidParams(format!(
                "min width must be a positive number, got {}",
                self.min_width
            )));
        }
        if !(self.max_width.is_finite() && self.max_width > 0.0) {
            return Err(CoreError::InvalidParams(format!(
                "max width must be a positive number, got {}",
                self.max_width
            )));
        }
        if self.min_width > self.max_width {
            return Err(CoreError::InvalidParams(format!(
                "min width {} exceeds max width {}",
                self.min_width, self.max_width
            )));
        }
        if self.curve_strength > Self::MAX_CURVE_STRENGTH {
            return Err(CoreError::InvalidParams(format!(
                "curve strength {} is outside 0..=100",
                self.curve_strength
            )));
        }
        Ok(())
    }

    /// Curve strength as a fraction in `[0, 1]`.
    #[must_use]
    pub fn curve_fraction(&self) -> f64 {
        f64::from(self.curve_strength) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        LineStyleParams::default().validate().expect("defaults");
    }

    #[test]
    fn test_validate_rejects_bad_widths() {
        let inverted = LineStyleParams {
            min_width: 5.0,
            max_width: 1.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let zero = LineStyleParams {
            min_width: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let nan = LineStyleParams {
            max_width: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_curve_above_100() {
        let p = LineStyleParams {
            curve_strength: 101,
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(CoreError::InvalidParams(_))));
    }

    #[test]
    fn test_keywords_round_trip_through_str() {
        assert_eq!("Through".parse::<LineMode>().expect("mode"), LineMode::Through);
        assert_eq!("theme".parse::<ColorMode>().expect("color"), ColorMode::Theme);
        assert_eq!(LineCap::Mixed.to_string(), "mixed");
        assert!("curvy".parse::<LineMode>().is_err());
    }

    #[test]
    fn test_params_json_uses_camel_case() {
        let json = serde_json::to_string(&LineStyleParams::default()).expect("json");
        assert!(json.contains("\"lineMode\":\"mixed\""));
        assert!(json.contains("\"curveStrength\":50"));
    }
}
