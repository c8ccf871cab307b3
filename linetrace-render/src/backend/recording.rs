//! Backend that records paint operations instead of drawing them.
//!
//! Records already carry the resolution multiplier applied, which makes it
//! straightforward to compare the geometry of two renders.

use linetrace_core::{Dimensions, Point, Rgb, Stroke};

use crate::{BackendType, RenderResult};

use super::{GridStyle, PaintBackend};

/// One recorded paint operation, in output units.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// Background fill.
    Background {
        /// Fill color.
        color: Rgb,
        /// Opacity in percent.
        opacity_percent: u8,
    },
    /// One grid line.
    GridLine {
        /// Line start.
        from: Point,
        /// Line end.
        to: Point,
        /// Line width.
        width: f64,
    },
    /// One stroke, scaled.
    Stroke(Stroke),
}

/// Paint-op recorder.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    logical: Dimensions,
    ops: Vec<PaintOp>,
    clears: usize,
}

impl RecordingBackend {
    /// Create an empty recorder.
    #[must_use]
    pub fn new(logical: Dimensions) -> Self {
        Self {
            logical,
            ops: Vec::new(),
            clears: 0,
        }
    }

    /// Operations recorded since the last clear.
    #[must_use]
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Recorded strokes, in paint order.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.ops.iter().filter_map(|op| match op {
            PaintOp::Stroke(s) => Some(s),
            _ => None,
        })
    }

    /// How many times the surface was cleared.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl PaintBackend for RecordingBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Recording
    }

    fn logical(&self) -> Dimensions {
        self.logical
    }

    fn clear(&mut self, _resolution: f64) {
        self.ops.clear();
        self.clears += 1;
    }

    fn paint_background(&mut self, color: Rgb, opacity_percent: u8) -> RenderResult<()> {
        self.ops.push(PaintOp::Background {
            color,
            opacity_percent,
        });
        Ok(())
    }

    fn paint_grid(&mut self, style: &GridStyle, resolution: f64) -> RenderResult<()> {
        let (w, h) = (self.logical.width_f64(), self.logical.height_f64());
        let width = style.line_width * resolution;
        for x in style.positions(w) {
            self.ops.push(PaintOp::GridLine {
                from: Point::new(x * resolution, 0.0),
                to: Point::new(x * resolution, h * resolution),
                width,
            });
        }
        for y in style.positions(h) {
            self.ops.push(PaintOp::GridLine {
                from: Point::new(0.0, y * resolution),
                to: Point::new(w * resolution, y * resolution),
                width,
            });
        }
        Ok(())
    }

    fn paint_stroke(&mut self, stroke: &Stroke, resolution: f64) -> RenderResult<()> {
        self.ops.push(PaintOp::Stroke(stroke.scaled(resolution)));
        Ok(())
    }
}
