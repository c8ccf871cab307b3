//! User-facing configuration.
//!
//! [`Settings`] gathers every parameter a host exposes (canvas size, line
//! style, background, display policy) into one plain value. Where the
//! settings come from (form fields, a JSON file, URL parameters) is up to
//! the host; the core only validates and projects them.

use serde::{Deserialize, Serialize};

use crate::{
    Background, ColorMode, CoreError, CoreResult, Dimensions, DisplayMode, LineCap, LineMode,
    LineStyleParams, Rgb,
};

/// All user-facing parameters, with the defaults of a fresh session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Logical canvas width.
    pub width: u32,
    /// Logical canvas height.
    pub height: u32,
    /// Strokes per scene.
    pub line_count: usize,
    /// Endpoint placement policy.
    pub line_mode: LineMode,
    /// Color policy.
    pub color_mode: ColorMode,
    /// Thinnest stroke width.
    pub min_width: f64,
    /// Thickest stroke width.
    pub max_width: f64,
    /// Curve strength in percent.
    pub curve_strength: u8,
    /// Line cap policy.
    pub line_cap: LineCap,
    /// Background color.
    pub bg_color: Rgb,
    /// Background opacity in percent.
    pub bg_opacity: u8,
    /// Whether the alignment grid is shown.
    pub show_grid: bool,
    /// How the canvas is fitted into its container.
    pub display_mode: DisplayMode,
    /// Keep the backing store at native resolution when displayed shrunk.
    pub high_quality: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let style = LineStyleParams::default();
        Self {
            width: Dimensions::DEFAULT.width(),
            height: Dimensions::DEFAULT.height(),
            line_count: style.count,
            line_mode: style.line_mode,
            color_mode: style.color_mode,
            min_width: style.min_width,
            max_width: style.max_width,
            curve_strength: style.curve_strength,
            line_cap: style.line_cap,
            bg_color: Rgb::WHITE,
            bg_opacity: 100,
            show_grid: false,
            display_mode: DisplayMode::Auto,
            high_quality: true,
        }
    }
}

impl Settings {
    /// Logical canvas size.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if a side is zero.
    pub fn dimensions(&self) -> CoreResult<Dimensions> {
        Dimensions::new(self.width, self.height)
    }

    /// Line style parameters for the generator.
    #[must_use]
    pub fn line_style(&self) -> LineStyleParams {
        LineStyleParams {
            line_mode: self.line_mode,
            color_mode: self.color_mode,
            min_width: self.min_width,
            max_width: self.max_width,
            curve_strength: self.curve_strength,
            line_cap: self.line_cap,
            count: self.line_count,
        }
    }

    /// Background fill.
    #[must_use]
    pub fn background(&self) -> Background {
        Background::new(self.bg_color, self.bg_opacity)
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> CoreResult<()> {
        self.dimensions()?;
        self.line_style().validate()?;
        if self.bg_opacity > 100 {
            return Err(CoreError::InvalidParams(format!(
                "background opacity {} is outside 0..=100",
                self.bg_opacity
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is invalid.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fresh_session() {
        let s = Settings::default();
        s.validate().expect("valid defaults");
        assert_eq!(s.dimensions().expect("dims"), Dimensions::DEFAULT);
        assert_eq!(s.line_count, 8);
        assert_eq!(s.line_mode, LineMode::Mixed);
        assert_eq!(s.color_mode, ColorMode::Black);
        assert_eq!(s.curve_strength, 50);
        assert_eq!(s.bg_color, Rgb::WHITE);
        assert!(s.high_quality);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r##"{"width": 1920, "height": 1080, "bgColor": "#000"}"##)
            .expect("settings");
        assert_eq!(s.width, 1920);
        assert_eq!(s.bg_color, Rgb::BLACK);
        assert_eq!(s.line_count, 8);
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        assert!(Settings::from_json(r#"{"width": 0}"#).is_err());
        assert!(Settings::from_json(r#"{"minWidth": 9, "maxWidth": 2}"#).is_err());
        assert!(Settings::from_json(r#"{"bgOpacity": 120}"#).is_err());
        assert!(Settings::from_json(r#"{"displayMode": "zoom"}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            show_grid: true,
            display_mode: DisplayMode::FitHeight,
            ..Settings::default()
        };
        let back = Settings::from_json(&s.to_json().expect("json")).expect("back");
        assert_eq!(back, s);
    }
}
