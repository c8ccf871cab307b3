//! Scenes: one generation batch of strokes plus its background state.

use serde::{Deserialize, Serialize};

use crate::{
    ColorSpec, CoreError, CoreResult, Dimensions, DisplayMode, LineStyleParams, Point, Rgb,
    StrokeCap,
};

/// Spacing of the alignment grid, in logical units.
pub const GRID_SPACING: f64 = 20.0;
/// Line width of the alignment grid, in logical units.
pub const GRID_LINE_WIDTH: f64 = 0.5;
/// Opacity of the alignment grid.
pub const GRID_OPACITY: f64 = 0.5;

/// One cubic Bézier curve with its style. The atomic unit of the artwork.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Curve start.
    pub start: Point,
    /// Curve end.
    pub end: Point,
    /// First control point.
    pub control1: Point,
    /// Second control point.
    pub control2: Point,
    /// Stroke width in logical units.
    pub width: f64,
    /// Stroke color.
    pub color: ColorSpec,
    /// Line cap.
    pub cap: StrokeCap,
}

impl Stroke {
    /// The four points of the control polygon, in drawing order.
    #[must_use]
    pub fn control_polygon(&self) -> [Point; 4] {
        [self.start, self.control1, self.control2, self.end]
    }

    /// The same stroke with every coordinate and the width multiplied by `k`.
    #[must_use]
    pub fn scaled(&self, k: f64) -> Self {
        Self {
            start: self.start.scaled(k),
            end: self.end.scaled(k),
            control1: self.control1.scaled(k),
            control2: self.control2.scaled(k),
            width: self.width * k,
            ..*self
        }
    }

    /// Check that every coordinate and the width are finite, and the width
    /// is positive.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NonFiniteGeometry`] describing the first bad value.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(p) = self.control_polygon().iter().find(|p| !p.is_finite()) {
            return Err(CoreError::NonFiniteGeometry(format!(
                "stroke point ({}, {})",
                p.x, p.y
            )));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(CoreError::NonFiniteGeometry(format!(
                "stroke width {}",
                self.width
            )));
        }
        Ok(())
    }
}

/// Background fill of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    /// Fill color.
    pub color: Rgb,
    /// Opacity in percent, `0..=100`. Zero means no fill at all.
    pub opacity_percent: u8,
}

impl Background {
    /// Create a background, clamping the opacity to 100.
    #[must_use]
    pub fn new(color: Rgb, opacity_percent: u8) -> Self {
        Self {
            color,
            opacity_percent: opacity_percent.min(100),
        }
    }

    /// Opacity as a fraction in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        f64::from(self.opacity_percent.min(100)) / 100.0
    }

    /// Whether anything is painted for this background.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.opacity_percent > 0
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::new(Rgb::WHITE, 100)
    }
}

/// The full set of strokes plus background and grid state produced by one
/// generation pass.
///
/// A scene is replaced wholesale on regeneration; it is never edited stroke
/// by stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    logical: Dimensions,
    params: LineStyleParams,
    strokes: Vec<Stroke>,
    /// Background fill.
    pub background: Background,
    /// Whether the alignment grid is painted.
    pub show_grid: bool,
}

impl Scene {
    /// Create a scene from already generated strokes.
    #[must_use]
    pub fn new(
        logical: Dimensions,
        params: LineStyleParams,
        strokes: Vec<Stroke>,
        background: Background,
        show_grid: bool,
    ) -> Self {
        Self {
            logical,
            params,
            strokes,
            background,
            show_grid,
        }
    }

    /// A scene with no strokes.
    #[must_use]
    pub fn empty(logical: Dimensions) -> Self {
        Self::new(
            logical,
            LineStyleParams {
                count: 0,
                ..LineStyleParams::default()
            },
            Vec::new(),
            Background::default(),
            false,
        )
    }

    /// Logical size the strokes were generated for.
    #[must_use]
    pub fn logical(&self) -> Dimensions {
        self.logical
    }

    /// Parameters the strokes were generated with.
    #[must_use]
    pub fn params(&self) -> &LineStyleParams {
        &self.params
    }

    /// Strokes in paint order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Number of strokes.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Check if the scene has no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Check every stroke for non-finite geometry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NonFiniteGeometry`] naming the offending stroke.
    pub fn validate(&self) -> CoreResult<()> {
        for (idx, stroke) in self.strokes.iter().enumerate() {
            stroke
                .validate()
                .map_err(|e| CoreError::NonFiniteGeometry(format!("stroke #{idx}: {e}")))?;
        }
        Ok(())
    }

    /// One-line summary for status bars, e.g.
    /// `lines: 8 / canvas: 500x500 / display: auto`.
    #[must_use]
    pub fn status_line(&self, mode: DisplayMode) -> String {
        format!(
            "lines: {} / canvas: {} / display: {mode}",
            self.strokes.len(),
            self.logical
        )
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(CoreError::Serialization)
    }

    /// Deserialize a scene from JSON and validate its geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or a stroke is non-finite.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let scene: Self = serde_json::from_str(json).map_err(CoreError::Serialization)?;
        scene.validate()?;
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(y: f64) -> Stroke {
        Stroke {
            start: Point::new(0.0, y),
            end: Point::new(100.0, y),
            control1: Point::new(30.0, y),
            control2: Point::new(70.0, y),
            width: 2.0,
            color: ColorSpec::BLACK,
            cap: StrokeCap::Butt,
        }
    }

    fn scene_with(strokes: Vec<Stroke>) -> Scene {
        Scene::new(
            Dimensions::new(100, 100).expect("dims"),
            LineStyleParams::default(),
            strokes,
            Background::default(),
            true,
        )
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut bad = line(10.0);
        bad.control1.x = f64::NAN;
        assert!(scene_with(vec![line(1.0), bad]).validate().is_err());
        assert!(scene_with(vec![line(1.0)]).validate().is_ok());
    }

    #[test]
    fn test_status_line() {
        let scene = scene_with(vec![line(1.0), line(2.0)]);
        assert_eq!(
            scene.status_line(DisplayMode::FitWidth),
            "lines: 2 / canvas: 100x100 / display: fit-width"
        );
    }

    #[test]
    fn test_json_round_trip_preserves_strokes() {
        let scene = scene_with(vec![line(5.0)]);
        let json = scene.to_json().expect("json");
        assert!(json.contains("\"showGrid\":true"));
        let back = Scene::from_json(&json).expect("from json");
        assert_eq!(back, scene);
    }

    #[test]
    fn test_scaled_stroke() {
        let s = line(10.0).scaled(2.0);
        assert_eq!(s.start, Point::new(0.0, 20.0));
        assert!((s.width - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_background_alpha() {
        let bg = Background::new(Rgb::WHITE, 150);
        assert_eq!(bg.opacity_percent, 100);
        assert!(!Background::new(Rgb::BLACK, 0).is_visible());
        assert!((Background::new(Rgb::BLACK, 25).alpha() - 0.25).abs() < f64::EPSILON);
    }
}
