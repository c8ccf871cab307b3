//! Raster backend painting into a tiny-skia pixmap.
//!
//! Used both for the on-screen backing store (configured from
//! [`SurfaceMetrics`]) and for offscreen export buffers.

use linetrace_core::{
    Dimensions, Point, Rgb, Stroke, StrokeCap, SurfaceMetrics, SurfaceTransform,
};
use tiny_skia::{Color, LineCap, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Transform};

use crate::{BackendType, RenderError, RenderResult};

use super::{GridStyle, PaintBackend};

/// Pixel-buffer backend.
pub struct RasterBackend {
    pixmap: Pixmap,
    logical: Dimensions,
    transform: Transform,
}

impl RasterBackend {
    /// Create a backend with an explicit buffer size and surface transform.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Allocation`] if the buffer cannot be created.
    pub fn new(
        logical: Dimensions,
        width: u32,
        height: u32,
        transform: SurfaceTransform,
    ) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })?;
        tracing::debug!(
            "Raster surface {}x{} for {} (scale {}, offset {},{})",
            width,
            height,
            logical,
            transform.scale,
            transform.offset.x,
            transform.offset.y
        );
        Ok(Self {
            pixmap,
            logical,
            transform: to_skia(transform),
        })
    }

    /// Create the on-screen backing store described by `metrics`.
    ///
    /// The half-pixel offset is installed here, once per configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Allocation`] if the buffer cannot be created.
    pub fn for_surface(metrics: &SurfaceMetrics) -> RenderResult<Self> {
        Self::new(
            metrics.logical,
            metrics.backing_width,
            metrics.backing_height,
            metrics.transform,
        )
    }

    /// Create an offscreen buffer of `width`x`height` pixels with no
    /// transform; the resolution multiplier scales coordinates instead.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Allocation`] if the buffer cannot be created.
    pub fn offscreen(logical: Dimensions, width: u32, height: u32) -> RenderResult<Self> {
        Self::new(logical, width, height, SurfaceTransform::IDENTITY)
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Read one premultiplied pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    /// Borrow the underlying pixmap.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Take the underlying pixmap.
    #[must_use]
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn line(&mut self, from: Point, to: Point, paint: &Paint<'_>, width: f64) {
        let mut pb = PathBuilder::new();
        pb.move_to(narrow(from.x), narrow(from.y));
        pb.line_to(narrow(to.x), narrow(to.y));
        if let Some(path) = pb.finish() {
            let stroke = tiny_skia::Stroke {
                width: narrow(width),
                ..tiny_skia::Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, paint, &stroke, self.transform, None);
        }
    }
}

impl PaintBackend for RasterBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Raster
    }

    fn logical(&self) -> Dimensions {
        self.logical
    }

    fn clear(&mut self, _resolution: f64) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    #[allow(clippy::cast_precision_loss)]
    fn paint_background(&mut self, color: Rgb, opacity_percent: u8) -> RenderResult<()> {
        if opacity_percent == 0 {
            return Ok(());
        }
        let rect = Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        )
        .ok_or(RenderError::Allocation {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
        })?;
        let alpha = f64::from(opacity_percent.min(100)) / 100.0;
        let paint = solid(color, alpha);
        // The fill covers the whole buffer regardless of the surface transform.
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }

    fn paint_grid(&mut self, style: &GridStyle, resolution: f64) -> RenderResult<()> {
        let (w, h) = (self.logical.width_f64(), self.logical.height_f64());
        let paint = solid(style.color, style.opacity);
        let width = style.line_width * resolution;

        for x in style.positions(w) {
            self.line(
                Point::new(x * resolution, 0.0),
                Point::new(x * resolution, h * resolution),
                &paint,
                width,
            );
        }
        for y in style.positions(h) {
            self.line(
                Point::new(0.0, y * resolution),
                Point::new(w * resolution, y * resolution),
                &paint,
                width,
            );
        }
        Ok(())
    }

    fn paint_stroke(&mut self, stroke: &Stroke, resolution: f64) -> RenderResult<()> {
        let s = stroke.scaled(resolution);
        let mut pb = PathBuilder::new();
        pb.move_to(narrow(s.start.x), narrow(s.start.y));
        pb.cubic_to(
            narrow(s.control1.x),
            narrow(s.control1.y),
            narrow(s.control2.x),
            narrow(s.control2.y),
            narrow(s.end.x),
            narrow(s.end.y),
        );
        let Some(path) = pb.finish() else {
            tracing::trace!("Skipping degenerate stroke at ({}, {})", s.start.x, s.start.y);
            return Ok(());
        };

        let paint = solid(s.color.to_rgb(), 1.0);
        let sk_stroke = tiny_skia::Stroke {
            width: narrow(s.width),
            line_cap: match s.cap {
                StrokeCap::Butt => LineCap::Butt,
                StrokeCap::Round => LineCap::Round,
            },
            ..tiny_skia::Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &sk_stroke, self.transform, None);
        Ok(())
    }
}

fn to_skia(t: SurfaceTransform) -> Transform {
    let scale = narrow(t.scale);
    Transform::from_scale(scale, scale).pre_translate(narrow(t.offset.x), narrow(t.offset.y))
}

fn solid(color: Rgb, alpha: f64) -> Paint<'static> {
    let mut paint = Paint::default();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    paint.set_color_rgba8(color.r, color.g, color.b, a);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(v: f64) -> f32 {
    v as f32
}
