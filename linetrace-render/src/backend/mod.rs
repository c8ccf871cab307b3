//! Paint backend implementations.

pub mod raster;
pub mod recording;
pub mod svg;

use linetrace_core::{Dimensions, Rgb, Stroke, GRID_LINE_WIDTH, GRID_OPACITY, GRID_SPACING};

use crate::{BackendType, RenderResult};

/// Alignment grid appearance, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    /// Distance between grid lines.
    pub spacing: f64,
    /// Grid line color.
    pub color: Rgb,
    /// Grid line width.
    pub line_width: f64,
    /// Grid line opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            spacing: GRID_SPACING,
            color: Rgb::GRID,
            line_width: GRID_LINE_WIDTH,
            opacity: GRID_OPACITY,
        }
    }
}

impl GridStyle {
    /// Positions of grid lines along one axis spanning `extent` logical
    /// units, including both edges when they land on a step.
    #[must_use]
    pub fn positions(&self, extent: f64) -> Vec<f64> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Vec::new();
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (extent / self.spacing).floor() as usize;
        #[allow(clippy::cast_precision_loss)]
        let positions = (0..=steps).map(|i| i as f64 * self.spacing).collect();
        positions
    }
}

/// The drawing contract every output target implements.
///
/// Coordinates arrive in logical units. Every operation multiplies
/// coordinates, widths and grid spacing by `resolution`, so painting the
/// same scene at `k` yields the same picture at `k` times the density.
pub trait PaintBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Logical size this backend paints.
    fn logical(&self) -> Dimensions;

    /// Erase everything painted so far and start a frame painted at
    /// `resolution`.
    fn clear(&mut self, resolution: f64);

    /// Fill the whole surface with `color` at `opacity_percent`.
    ///
    /// # Errors
    ///
    /// Returns an error if painting fails.
    fn paint_background(&mut self, color: Rgb, opacity_percent: u8) -> RenderResult<()>;

    /// Paint axis-aligned grid lines over the whole surface.
    ///
    /// # Errors
    ///
    /// Returns an error if painting fails.
    fn paint_grid(&mut self, style: &GridStyle, resolution: f64) -> RenderResult<()>;

    /// Paint one stroke.
    ///
    /// # Errors
    ///
    /// Returns an error if painting fails.
    fn paint_stroke(&mut self, stroke: &Stroke, resolution: f64) -> RenderResult<()>;
}
