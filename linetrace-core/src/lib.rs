//! # Linetrace Core
//!
//! Core line-art engine: turns a parameter set into cubic Bézier strokes and
//! maps a logical drawing size onto a physical device surface.
//! Compiles to WASM for browser hosts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               linetrace-core                │
//! ├─────────────────────────────────────────────┤
//! │  Stroke Generator │  Surface Sizer          │
//! │  - Endpoints      │  - Display modes        │
//! │  - Control points │  - Device pixel ratio   │
//! │  - Width / color  │  - High-DPI downscale   │
//! ├─────────────────────────────────────────────┤
//! │  Scene            │  Artboard               │
//! │  - Strokes        │  - Settings             │
//! │  - Background     │  - Regeneration         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Painting lives in `linetrace-render`; this crate never touches pixels.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artboard;
pub mod color;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod params;
pub mod rng;
pub mod scene;
pub mod settings;
pub mod surface;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use artboard::Artboard;
pub use color::{ColorSpec, Rgb};
pub use error::{CoreError, CoreResult};
pub use generator::{generate, generate_scene, StrokeGenerator, FALLBACK_WIDTH};
pub use geometry::{ContainerSize, Dimensions, Point};
pub use params::{ColorMode, LineCap, LineMode, LineStyleParams, StrokeCap};
pub use rng::{ConstantRandom, RandomSource, ReplayRandom, StdRandom};
pub use scene::{Background, Scene, Stroke, GRID_LINE_WIDTH, GRID_OPACITY, GRID_SPACING};
pub use settings::Settings;
pub use surface::{
    compute_surface, AppliedFit, DisplayMode, SurfaceMetrics, SurfaceTransform, HALF_PIXEL,
};

/// Linetrace core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
