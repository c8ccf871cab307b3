//! Points and sizes shared by the sizer, the generator and the renderers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// A point in logical (design) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate, growing rightwards.
    pub x: f64,
    /// Y coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint of the segment `self -> other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: self.x + (other.x - self.x) / 2.0,
            y: self.y + (other.y - self.y) / 2.0,
        }
    }

    /// Translate by an offset.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Multiply both coordinates by a uniform factor.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Logical size of the artwork in design units.
///
/// Independent of how many device pixels the artwork ends up occupying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct Dimensions {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawDimensions {
    width: u32,
    height: u32,
}

impl TryFrom<RawDimensions> for Dimensions {
    type Error = CoreError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl Dimensions {
    /// Size used when no container is available to lay out against.
    pub const DEFAULT: Self = Self {
        width: 500,
        height: 500,
    };

    /// Create logical dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if either side is zero.
    pub fn new(width: u32, height: u32) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in logical units.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Height in logical units.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Width as a float for geometry.
    #[must_use]
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as a float for geometry.
    #[must_use]
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        self.width_f64() / self.height_f64()
    }

    /// The longer of the two sides.
    #[must_use]
    pub fn longer_side(self) -> f64 {
        self.width_f64().max(self.height_f64())
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = CoreError;

    /// Parse the `WIDTHxHEIGHT` form used by size presets, e.g. `1920x1080`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| CoreError::Parse(format!("expected WIDTHxHEIGHT, got '{s}'")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| CoreError::Parse(format!("width '{w}': {e}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| CoreError::Parse(format!("height '{h}': {e}")))?;
        Self::new(width, height)
    }
}

/// Available drawing area reported by the host layout, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    /// Available width.
    pub width: f64,
    /// Available height.
    pub height: f64,
}

impl ContainerSize {
    /// Margin kept free on each axis when measuring a container element.
    pub const ELEMENT_MARGIN: f64 = 40.0;

    /// Create a container size from the available area directly.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidContainer`] if either side is not a
    /// finite positive number.
    pub fn new(width: f64, height: f64) -> CoreResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CoreError::InvalidContainer { width, height });
        }
        Ok(Self { width, height })
    }

    /// Create a container size from an element's client box, reserving
    /// [`Self::ELEMENT_MARGIN`] on each axis.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidContainer`] if nothing is left after the
    /// margin.
    pub fn from_element(client_width: f64, client_height: f64) -> CoreResult<Self> {
        Self::new(
            client_width - Self::ELEMENT_MARGIN,
            client_height - Self::ELEMENT_MARGIN,
        )
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    /// Whether a logical size fits without scaling.
    #[must_use]
    pub fn fits(self, logical: Dimensions) -> bool {
        logical.width_f64() <= self.width && logical.height_f64() <= self.height
    }
}
