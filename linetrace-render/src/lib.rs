//! # Linetrace Renderer
//!
//! Paints a [`Scene`] onto an output target and exports it to files.
//!
//! ## Paint Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             PaintBackend Trait              │
//! ├─────────────┬─────────────┬─────────────────┤
//! │ Raster      │ SVG         │ Recording       │
//! │ (tiny-skia) │ (vector)    │ (inspection)    │
//! └─────────────┴─────────────┴─────────────────┘
//! ```
//!
//! Live preview and high-resolution export share one code path: the same
//! scene is painted with a different resolution multiplier.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod export;

pub use backend::raster::RasterBackend;
pub use backend::recording::{PaintOp, RecordingBackend};
pub use backend::svg::SvgBackend;
pub use backend::{GridStyle, PaintBackend};
pub use error::{RenderError, RenderResult};
pub use export::{export_file_name, ExportConfig, ExportFormat, SceneExporter};

use linetrace_core::Scene;

/// Available paint backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// tiny-skia pixel buffer.
    Raster,
    /// SVG document.
    Svg,
    /// Operation recorder.
    Recording,
}

/// Paints whole scenes onto a backend.
pub struct Renderer<B: PaintBackend> {
    backend: B,
    resolution: f64,
    grid: GridStyle,
    frame_count: u64,
}

impl<B: PaintBackend> Renderer<B> {
    /// Create a renderer painting at resolution 1.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            resolution: 1.0,
            grid: GridStyle::default(),
            frame_count: 0,
        }
    }

    /// Create a renderer painting at resolution multiplier `resolution`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidResolution`] unless `resolution` is
    /// finite and positive.
    pub fn with_resolution(backend: B, resolution: f64) -> RenderResult<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(RenderError::InvalidResolution(resolution));
        }
        Ok(Self {
            resolution,
            ..Self::new(backend)
        })
    }

    /// Replace the grid appearance.
    #[must_use]
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = grid;
        self
    }

    /// Paint a scene: clear, background, grid, then strokes in order.
    ///
    /// The scene is validated before anything is cleared, so a rejected
    /// scene leaves the previous frame intact.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidScene`] for non-finite geometry, or an
    /// error from the backend.
    pub fn render(&mut self, scene: &Scene) -> RenderResult<()> {
        scene
            .validate()
            .map_err(|e| RenderError::InvalidScene(e.to_string()))?;

        tracing::trace!(
            "{:?} render: {} strokes at {}x",
            self.backend.backend_type(),
            scene.stroke_count(),
            self.resolution
        );

        self.backend.clear(self.resolution);
        if scene.background.is_visible() {
            self.backend
                .paint_background(scene.background.color, scene.background.opacity_percent)?;
        }
        if scene.show_grid {
            self.backend.paint_grid(&self.grid, self.resolution)?;
        }
        for stroke in scene.strokes() {
            self.backend.paint_stroke(stroke, self.resolution)?;
        }

        self.frame_count += 1;
        Ok(())
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Resolution multiplier applied to every paint operation.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Borrow the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Take the backend, e.g. to encode its pixels.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linetrace_core::{
        Background, ColorSpec, Dimensions, LineStyleParams, Point, Rgb, Stroke, StrokeCap,
    };

    fn stroke(y: f64) -> Stroke {
        Stroke {
            start: Point::new(0.0, y),
            end: Point::new(40.0, y),
            control1: Point::new(10.0, y),
            control2: Point::new(30.0, y),
            width: 1.0,
            color: ColorSpec::BLACK,
            cap: StrokeCap::Butt,
        }
    }

    fn dims() -> Dimensions {
        Dimensions::new(40, 40).expect("dims")
    }

    fn scene(strokes: Vec<Stroke>, show_grid: bool) -> Scene {
        Scene::new(
            dims(),
            LineStyleParams::default(),
            strokes,
            Background::new(Rgb::WHITE, 100),
            show_grid,
        )
    }

    #[test]
    fn test_paint_order() {
        let mut renderer = Renderer::new(RecordingBackend::new(dims()));
        renderer
            .render(&scene(vec![stroke(5.0), stroke(9.0)], true))
            .expect("render");

        let ops = renderer.backend().ops();
        assert!(matches!(ops[0], PaintOp::Background { .. }));
        // 3 vertical + 3 horizontal grid lines
        assert!(ops[1..7]
            .iter()
            .all(|op| matches!(op, PaintOp::GridLine { .. })));
        assert_eq!(renderer.backend().strokes().count(), 2);
        assert_eq!(renderer.frame_count(), 1);
    }

    #[test]
    fn test_invalid_scene_keeps_previous_frame() {
        let mut renderer = Renderer::new(RecordingBackend::new(dims()));
        renderer
            .render(&scene(vec![stroke(5.0)], false))
            .expect("render");

        let mut bad = stroke(1.0);
        bad.end.x = f64::INFINITY;
        let result = renderer.render(&scene(vec![bad], false));
        assert!(matches!(result, Err(RenderError::InvalidScene(_))));
        assert_eq!(renderer.backend().clear_count(), 1);
        assert_eq!(renderer.backend().strokes().count(), 1);
        assert_eq!(renderer.frame_count(), 1);
    }

    #[test]
    fn test_invalid_resolution_rejected() {
        let backend = RecordingBackend::new(Dimensions::DEFAULT);
        assert!(Renderer::with_resolution(backend.clone(), 0.0).is_err());
        assert!(Renderer::with_resolution(backend.clone(), f64::NAN).is_err());
        let renderer = Renderer::with_resolution(backend, 3.0).expect("renderer");
        assert!((renderer.resolution() - 3.0).abs() < f64::EPSILON);
        assert_eq!(renderer.active_backend(), BackendType::Recording);
    }

    #[test]
    fn test_transparent_background_skipped() {
        let mut renderer = Renderer::new(RecordingBackend::new(dims()));
        let mut s = scene(vec![stroke(5.0)], false);
        s.background = Background::new(Rgb::WHITE, 0);
        renderer.render(&s).expect("render");
        assert_eq!(renderer.backend().ops().len(), 1);
    }
}
