//! Surface sizing: mapping a logical artwork size onto a physical surface.
//!
//! Given the logical size, the container area the host can spare, a
//! [`DisplayMode`] policy and the device pixel ratio, [`compute_surface`]
//! decides how large the artwork is displayed, how large its backing store
//! is, and which transform every subsequent paint call runs under.
//!
//! ```text
//!   logical (design units) ──scale_factor──▶ display (CSS px)
//!          │                                       │
//!          └──────── transform.scale ──────▶ backing store (device px)
//! ```
//!
//! With high-DPI rendering requested and the artwork shown smaller than
//! native, the backing store stays at the logical size and only the display
//! box shrinks; otherwise the backing store follows the display box times
//! the device pixel ratio.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ContainerSize, CoreError, CoreResult, Dimensions, Point};

/// Half-pixel offset applied once per surface configuration.
pub const HALF_PIXEL: f64 = 0.5;

/// Policy mapping the logical size onto the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Native size when it fits, otherwise the largest size that fits.
    #[default]
    Auto,
    /// Always native size; overflow is the surrounding layout's problem.
    Original,
    /// Scale so the display width equals the container width.
    FitWidth,
    /// Scale so the display height equals the container height.
    FitHeight,
}

impl DisplayMode {
    /// The kebab-case keyword for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Original => "original",
            Self::FitWidth => "fit-width",
            Self::FitHeight => "fit-height",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "original" => Ok(Self::Original),
            "fit-width" => Ok(Self::FitWidth),
            "fit-height" => Ok(Self::FitHeight),
            other => Err(CoreError::Parse(format!("unknown display mode '{other}'"))),
        }
    }
}

/// The fit that was actually applied after resolving the display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppliedFit {
    /// Shown at native size.
    Original,
    /// Bound to the container width.
    FitWidth,
    /// Bound to the container height.
    FitHeight,
    /// No container was available; default size at scale 1.
    Fallback,
}

impl AppliedFit {
    /// Short label for zoom indicators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::FitWidth => "fit-width",
            Self::FitHeight => "fit-height",
            Self::Fallback => "default",
        }
    }
}

/// Uniform scale followed by the half-pixel translation.
///
/// A logical point `p` lands in the backing store at `scale * (p + offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTransform {
    /// Uniform scale from logical units to backing-store pixels.
    pub scale: f64,
    /// Translation applied before scaling, in logical units.
    pub offset: Point,
}

impl SurfaceTransform {
    /// No scale, no offset. Used for offscreen export buffers, where the
    /// resolution multiplier is applied to coordinates directly.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Point::new(0.0, 0.0),
    };

    /// A transform with the given scale and the standard half-pixel offset.
    #[must_use]
    pub const fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            offset: Point::new(HALF_PIXEL, HALF_PIXEL),
        }
    }

    /// Map a logical point into backing-store pixels.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        p.offset(self.offset.x, self.offset.y).scaled(self.scale)
    }
}

/// Derived layout of the drawing surface.
///
/// Recomputed on every resize, display mode change, or DPI quality change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceMetrics {
    /// Logical size that was laid out (the default size on fallback).
    pub logical: Dimensions,
    /// Backing-store width in device pixels.
    pub backing_width: u32,
    /// Backing-store height in device pixels.
    pub backing_height: u32,
    /// Display width in CSS pixels.
    pub css_width: f64,
    /// Display height in CSS pixels.
    pub css_height: f64,
    /// Display size divided by logical size.
    pub scale_factor: f64,
    /// Physical-to-CSS pixel ratio the layout was computed for.
    pub device_pixel_ratio: f64,
    /// Whether the native-resolution downscale policy is active.
    pub high_dpi: bool,
    /// Fit actually applied.
    pub fit: AppliedFit,
    /// Transform to install on the drawing context before painting.
    pub transform: SurfaceTransform,
}

impl SurfaceMetrics {
    /// Zoom indicator text, e.g. `0.88x (fit-width)`.
    #[must_use]
    pub fn zoom_label(&self) -> String {
        format!("{:.2}x ({})", self.scale_factor, self.fit.label())
    }

    /// Convert a point in display (CSS) pixels relative to the surface's
    /// top-left corner into logical coordinates.
    #[must_use]
    pub fn display_to_logical(&self, p: Point) -> Point {
        p.scaled(1.0 / self.scale_factor)
    }

    /// Convert a logical point into display (CSS) pixels.
    #[must_use]
    pub fn logical_to_display(&self, p: Point) -> Point {
        p.scaled(self.scale_factor)
    }
}

/// Compute the surface layout.
///
/// `container` is `None` when the host could not find its container
/// element; in that case the default 500x500 logical size is laid out at
/// scale 1. That is the only silent fallback: every other invalid input
/// fails fast.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDevicePixelRatio`] if `device_pixel_ratio` is
/// not finite and positive.
pub fn compute_surface(
    logical: Dimensions,
    container: Option<ContainerSize>,
    mode: DisplayMode,
    device_pixel_ratio: f64,
    high_dpi_requested: bool,
) -> CoreResult<SurfaceMetrics> {
    if !(device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0) {
        return Err(CoreError::InvalidDevicePixelRatio(device_pixel_ratio));
    }

    let Some(container) = container else {
        tracing::warn!(
            "No container available, falling back to {} at scale 1",
            Dimensions::DEFAULT
        );
        let fallback = Dimensions::DEFAULT;
        return Ok(finish(
            fallback,
            fallback.width_f64(),
            fallback.height_f64(),
            1.0,
            AppliedFit::Fallback,
            device_pixel_ratio,
            high_dpi_requested,
        ));
    };

    let (display_w, display_h, scale, fit) = layout(logical, container, mode);
    let metrics = finish(
        logical,
        display_w,
        display_h,
        scale,
        fit,
        device_pixel_ratio,
        high_dpi_requested,
    );

    tracing::debug!(
        "Surface {} in {}x{} ({mode}): display {:.1}x{:.1}, backing {}x{}, scale {:.3}, high_dpi {}",
        logical,
        container.width,
        container.height,
        metrics.css_width,
        metrics.css_height,
        metrics.backing_width,
        metrics.backing_height,
        metrics.scale_factor,
        metrics.high_dpi
    );

    Ok(metrics)
}

/// Resolve the display mode into a display size and scale factor.
fn layout(
    logical: Dimensions,
    container: ContainerSize,
    mode: DisplayMode,
) -> (f64, f64, f64, AppliedFit) {
    let (w, h) = (logical.width_f64(), logical.height_f64());

    if mode == DisplayMode::Auto && container.fits(logical) {
        return (w, h, 1.0, AppliedFit::Original);
    }

    let canvas_ratio = logical.aspect_ratio();
    let fit_width = || {
        (
            container.width,
            container.width / canvas_ratio,
            container.width / w,
            AppliedFit::FitWidth,
        )
    };
    let fit_height = || {
        (
            container.height * canvas_ratio,
            container.height,
            container.height / h,
            AppliedFit::FitHeight,
        )
    };

    match mode {
        DisplayMode::Original => (w, h, 1.0, AppliedFit::Original),
        DisplayMode::FitWidth => fit_width(),
        DisplayMode::FitHeight => fit_height(),
        DisplayMode::Auto => {
            // Equal ratios bind to width.
            if canvas_ratio >= container.aspect_ratio() {
                fit_width()
            } else {
                fit_height()
            }
        }
    }
}

/// Size the backing store and build the paint transform.
fn finish(
    logical: Dimensions,
    display_w: f64,
    display_h: f64,
    scale_factor: f64,
    fit: AppliedFit,
    device_pixel_ratio: f64,
    high_dpi_requested: bool,
) -> SurfaceMetrics {
    let high_dpi = high_dpi_requested && scale_factor < 1.0;

    let (backing_width, backing_height, transform) = if high_dpi {
        (
            logical.width(),
            logical.height(),
            SurfaceTransform::with_scale(1.0),
        )
    } else {
        (
            to_pixels(display_w * device_pixel_ratio),
            to_pixels(display_h * device_pixel_ratio),
            SurfaceTransform::with_scale(device_pixel_ratio),
        )
    };

    SurfaceMetrics {
        logical,
        backing_width,
        backing_height,
        css_width: display_w,
        css_height: display_h,
        scale_factor,
        device_pixel_ratio,
        high_dpi,
        fit,
        transform,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pixels(v: f64) -> u32 {
    v.round().clamp(1.0, f64::from(u32::MAX)) as u32
}
