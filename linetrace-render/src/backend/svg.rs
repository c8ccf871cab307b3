//! SVG vector backend.
//!
//! Serializes paint operations into a standalone SVG document. At
//! resolution 1 the document uses exactly the logical coordinates the raster
//! backend paints, so vector and raster output share one geometry.
//!
//! The document size follows the resolution of the frame started by the
//! last [`PaintBackend::clear`], so the canvas and its contents always agree.

use std::fmt::Write;

use linetrace_core::{Dimensions, Rgb, Stroke};

use crate::{BackendType, RenderResult};

use super::{GridStyle, PaintBackend};

/// Title embedded in every exported document.
pub const SVG_TITLE: &str = "Linetrace";

/// Vector backend accumulating SVG markup.
pub struct SvgBackend {
    logical: Dimensions,
    resolution: f64,
    background: String,
    grid: String,
    lines: String,
}

impl SvgBackend {
    /// Create a backend for a document of `logical` size, at resolution 1
    /// until a frame is started.
    #[must_use]
    pub fn new(logical: Dimensions) -> Self {
        Self {
            logical,
            resolution: 1.0,
            background: String::new(),
            grid: String::new(),
            lines: String::new(),
        }
    }

    /// Assemble the document painted so far.
    #[must_use]
    pub fn document(&self) -> String {
        let width = self.logical.width_f64() * self.resolution;
        let height = self.logical.height_f64() * self.resolution;

        let mut svg = String::with_capacity(
            512 + self.background.len() + self.grid.len() + self.lines.len(),
        );
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        let _ = write!(
            svg,
            "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n<title>{SVG_TITLE}</title>\n<desc>Generated by {SVG_TITLE}</desc>",
        );
        svg.push_str(&self.background);
        svg.push_str(&self.grid);
        svg.push_str("\n<g id=\"lines\">");
        svg.push_str(&self.lines);
        svg.push_str("\n</g>\n</svg>\n");
        svg
    }
}

impl PaintBackend for SvgBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Svg
    }

    fn logical(&self) -> Dimensions {
        self.logical
    }

    fn clear(&mut self, resolution: f64) {
        self.resolution = resolution;
        self.background.clear();
        self.grid.clear();
        self.lines.clear();
    }

    fn paint_background(&mut self, color: Rgb, opacity_percent: u8) -> RenderResult<()> {
        if opacity_percent == 0 {
            return Ok(());
        }
        let width = self.logical.width_f64() * self.resolution;
        let height = self.logical.height_f64() * self.resolution;
        let opacity = f64::from(opacity_percent.min(100)) / 100.0;
        let _ = write!(
            self.background,
            "\n<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"{color}\" fill-opacity=\"{opacity}\"/>",
        );
        Ok(())
    }

    fn paint_grid(&mut self, style: &GridStyle, resolution: f64) -> RenderResult<()> {
        let (w, h) = (self.logical.width_f64(), self.logical.height_f64());
        let (rw, rh) = (w * resolution, h * resolution);

        self.grid.clear();
        let _ = write!(
            self.grid,
            "\n<g id=\"grid\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\">",
            style.color,
            style.line_width * resolution,
            style.opacity
        );
        for x in style.positions(w) {
            let x = x * resolution;
            let _ = write!(
                self.grid,
                "\n  <line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{rh}\"/>"
            );
        }
        for y in style.positions(h) {
            let y = y * resolution;
            let _ = write!(
                self.grid,
                "\n  <line x1=\"0\" y1=\"{y}\" x2=\"{rw}\" y2=\"{y}\"/>"
            );
        }
        self.grid.push_str("\n</g>");
        Ok(())
    }

    fn paint_stroke(&mut self, stroke: &Stroke, resolution: f64) -> RenderResult<()> {
        let s = stroke.scaled(resolution);
        let _ = write!(
            self.lines,
            "\n  <path d=\"M {} {} C {} {}, {} {}, {} {}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"{}\" fill=\"none\"/>",
            s.start.x,
            s.start.y,
            s.control1.x,
            s.control1.y,
            s.control2.x,
            s.control2.y,
            s.end.x,
            s.end.y,
            s.color,
            s.width,
            s.cap
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Renderer;
    use linetrace_core::{Background, ColorSpec, LineStyleParams, Point, Scene, StrokeCap};

    fn stroke() -> Stroke {
        Stroke {
            start: Point::new(10.0, 20.0),
            end: Point::new(90.0, 80.0),
            control1: Point::new(30.5, 40.0),
            control2: Point::new(60.0, 70.25),
            width: 2.5,
            color: ColorSpec::hsl(210, 80, 50).expect("hsl"),
            cap: StrokeCap::Round,
        }
    }

    #[test]
    fn test_path_uses_logical_coordinates() {
        let mut svg = SvgBackend::new(Dimensions::new(100, 100).expect("dims"));
        svg.paint_stroke(&stroke(), 1.0).expect("paint");
        let doc = svg.document();
        assert!(doc.contains("d=\"M 10 20 C 30.5 40, 60 70.25, 90 80\""));
        assert!(doc.contains("stroke=\"hsl(210, 80%, 50%)\""));
        assert!(doc.contains("stroke-width=\"2.5\""));
        assert!(doc.contains("stroke-linecap=\"round\""));
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("<title>Linetrace</title>"));
    }

    #[test]
    fn test_background_omitted_when_transparent() {
        let mut svg = SvgBackend::new(Dimensions::new(40, 40).expect("dims"));
        svg.paint_background(Rgb::WHITE, 0).expect("paint");
        assert!(!svg.document().contains("<rect"));
        svg.paint_background(Rgb::BLACK, 50).expect("paint");
        assert!(svg
            .document()
            .contains("fill=\"#000000\" fill-opacity=\"0.5\""));
    }

    #[test]
    fn test_grid_lines_cover_both_axes() {
        let mut svg = SvgBackend::new(Dimensions::new(40, 20).expect("dims"));
        svg.paint_grid(&GridStyle::default(), 1.0).expect("grid");
        let doc = svg.document();
        assert!(doc.contains(
            "<g id=\"grid\" stroke=\"#cccccc\" stroke-width=\"0.5\" stroke-opacity=\"0.5\">"
        ));
        // x = 0, 20, 40 and y = 0, 20
        assert_eq!(doc.matches("<line").count(), 5);
    }

    #[test]
    fn test_resolution_scales_document() {
        let mut svg = SvgBackend::new(Dimensions::new(100, 50).expect("dims"));
        svg.clear(2.0);
        svg.paint_stroke(&stroke(), 2.0).expect("paint");
        let doc = svg.document();
        assert!(doc.contains("width=\"200\" height=\"100\""));
        assert!(doc.contains("M 20 40 C 61 80"));
        assert!(doc.contains("stroke-width=\"5\""));
    }

    #[test]
    fn test_renderer_resolution_sizes_document_and_background() {
        let logical = Dimensions::new(100, 50).expect("dims");
        let scene = Scene::new(
            logical,
            LineStyleParams::default(),
            vec![stroke()],
            Background::new(Rgb::WHITE, 100),
            true,
        );
        let mut renderer =
            Renderer::with_resolution(SvgBackend::new(logical), 2.0).expect("renderer");
        renderer.render(&scene).expect("render");

        let doc = renderer.backend().document();
        assert!(doc.contains("<svg width=\"200\" height=\"100\" viewBox=\"0 0 200 100\""));
        assert!(doc.contains("<rect x=\"0\" y=\"0\" width=\"200\" height=\"100\""));
        assert!(doc.contains("M 20 40 C 61 80, 120 140.5, 180 160"));
        assert!(doc.contains("x2=\"200\" y2=\"80\""));
    }
}
