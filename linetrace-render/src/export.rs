//! Scene export to image/document formats.
//!
//! Renders a [`Scene`] to PNG, JPEG, or SVG. Raster formats paint into an
//! offscreen tiny-skia buffer at the configured resolution multiplier; SVG is
//! written directly from the scene's geometry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use image::ImageEncoder;
use linetrace_core::{CoreError, Dimensions, Rgb, Scene};
use serde::{Deserialize, Serialize};

use crate::backend::{raster::RasterBackend, svg::SvgBackend};
use crate::error::{RenderError, RenderResult};
use crate::Renderer;

/// Prefix of exported file names.
pub const FILE_NAME_PREFIX: &str = "linetrace";

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG image.
    #[default]
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
        }
    }

    /// MIME type of the encoded output.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Whether the format is a pixel format.
    #[must_use]
    pub const fn is_raster(self) -> bool {
        !matches!(self, Self::Svg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            other => Err(CoreError::Parse(format!("unknown export format '{other}'"))),
        }
    }
}

/// Configuration for scene export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Resolution multiplier (e.g. 2.0 for retina).
    pub resolution: f64,
    /// JPEG quality 1-100 (default: 90).
    pub jpeg_quality: u8,
    /// Largest raster buffer, in pixels, the exporter will allocate.
    pub max_pixels: u64,
    /// Color transparent pixels are flattened onto for JPEG.
    pub matte: Rgb,
}

impl ExportConfig {
    /// Default pixel budget: 100 megapixels.
    pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            jpeg_quality: 90,
            max_pixels: Self::DEFAULT_MAX_PIXELS,
            matte: Rgb::WHITE,
        }
    }
}

/// Exports a [`Scene`] to image and document formats.
pub struct SceneExporter {
    config: ExportConfig,
}

impl SceneExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Get the exporter configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export a scene to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be rendered or encoded.
    pub fn export(&self, scene: &Scene, format: ExportFormat) -> RenderResult<Vec<u8>> {
        tracing::debug!(
            "Exporting {} strokes as {format} at {}x",
            scene.stroke_count(),
            self.config.resolution
        );
        match format {
            ExportFormat::Png => self.render_to_png(scene),
            ExportFormat::Jpeg => self.render_to_jpeg(scene),
            ExportFormat::Svg => {
                let svg = self.render_to_svg(scene)?;
                Ok(svg.into_bytes())
            }
        }
    }

    /// Raster output size for a logical size: `round(W*k) x round(H*k)`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidResolution`] for a bad multiplier, or
    /// [`RenderError::Allocation`] when the buffer would exceed the pixel
    /// budget.
    pub fn raster_size(&self, logical: Dimensions) -> RenderResult<(u32, u32)> {
        let k = self.checked_resolution()?;
        let width = scaled_side(logical.width_f64(), k);
        let height = scaled_side(logical.height_f64(), k);
        match (width, height) {
            (Some(w), Some(h)) if u64::from(w) * u64::from(h) <= self.config.max_pixels => {
                Ok((w, h))
            }
            (w, h) => Err(RenderError::Allocation {
                width: w.unwrap_or(u32::MAX),
                height: h.unwrap_or(u32::MAX),
            }),
        }
    }

    /// Paint the scene into a fresh pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be allocated or the scene is
    /// invalid.
    pub fn render_to_raster(&self, scene: &Scene) -> RenderResult<RasterBackend> {
        let (width, height) = self.raster_size(scene.logical())?;
        let backend = RasterBackend::offscreen(scene.logical(), width, height)?;
        let mut renderer = Renderer::with_resolution(backend, self.config.resolution)?;
        renderer.render(scene)?;
        Ok(renderer.into_backend())
    }

    /// Export the scene to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        self.render_to_raster(scene)?
            .pixmap()
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
    }

    /// Export the scene to JPEG bytes, flattening transparency onto the
    /// matte color.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_jpeg(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let raster = self.render_to_raster(scene)?;
        let (width, height) = (raster.width(), raster.height());
        let matte = self.config.matte;

        let mut rgb_data = Vec::with_capacity(raster.pixmap().data().len() / 4 * 3);
        // Pixels are premultiplied: out = src + matte * (1 - alpha).
        for pixel in raster.pixmap().data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            rgb_data.push(flatten(pixel[0], matte.r, inv));
            rgb_data.push(flatten(pixel[1], matte.g, inv));
            rgb_data.push(flatten(pixel[2], matte.b, inv));
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut buf,
            self.config.jpeg_quality.clamp(1, 100),
        );
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Encode(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene contains non-finite geometry.
    pub fn render_to_svg(&self, scene: &Scene) -> RenderResult<String> {
        let k = self.checked_resolution()?;
        let mut renderer = Renderer::with_resolution(SvgBackend::new(scene.logical()), k)?;
        renderer.render(scene)?;
        Ok(renderer.backend().document())
    }

    fn checked_resolution(&self) -> RenderResult<f64> {
        let k = self.config.resolution;
        if k.is_finite() && k > 0.0 {
            Ok(k)
        } else {
            Err(RenderError::InvalidResolution(k))
        }
    }
}

/// File name for an export: `linetrace-{W}x{H}-{YYYY-MM-DDTHH-MM-SS}.{ext}`.
#[must_use]
pub fn export_file_name(
    logical: Dimensions,
    format: ExportFormat,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        "{FILE_NAME_PREFIX}-{logical}-{}.{}",
        timestamp.format("%Y-%m-%dT%H-%M-%S"),
        format.extension()
    )
}

/// One side of a scaled raster, or `None` if it does not fit a `u32`.
fn scaled_side(side: f64, k: f64) -> Option<u32> {
    let px = (side * k).round().max(1.0);
    if px > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let px = px as u32;
    Some(px)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn flatten(premultiplied: u8, matte: u8, inv_alpha: f32) -> u8 {
    f32::from(matte)
        .mul_add(inv_alpha, f32::from(premultiplied))
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use linetrace_core::{
        generate_scene, Background, ConstantRandom, LineStyleParams, StdRandom,
    };

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h).expect("dims")
    }

    fn sample_scene() -> Scene {
        let mut rng = StdRandom::from_seed(5);
        generate_scene(
            dims(120, 80),
            LineStyleParams::default(),
            Background::default(),
            true,
            &mut rng,
        )
        .expect("scene")
    }

    #[test]
    fn test_export_png_magic() {
        let bytes = SceneExporter::with_defaults()
            .export(&sample_scene(), ExportFormat::Png)
            .expect("png");
        assert_eq!(&bytes[..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_export_jpeg_magic() {
        let bytes = SceneExporter::with_defaults()
            .export(&sample_scene(), ExportFormat::Jpeg)
            .expect("jpeg");
        assert_eq!(bytes[0], 0xFF);
        assert_eq!(bytes[1], 0xD8);
    }

    #[test]
    fn test_export_svg_is_utf8() {
        let bytes = SceneExporter::with_defaults()
            .export(&sample_scene(), ExportFormat::Svg)
            .expect("svg");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("<g id=\"lines\">"));
        assert!(text.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_raster_size_rounds() {
        let exporter = SceneExporter::new(ExportConfig {
            resolution: 1.5,
            ..ExportConfig::default()
        });
        assert_eq!(exporter.raster_size(dims(101, 33)).expect("size"), (152, 50));
    }

    #[test]
    fn test_pixel_budget_is_allocation_error() {
        let exporter = SceneExporter::new(ExportConfig {
            resolution: 4.0,
            max_pixels: 1_000_000,
            ..ExportConfig::default()
        });
        let err = exporter.raster_size(dims(500, 500)).expect_err("too big");
        assert!(matches!(
            err,
            RenderError::Allocation {
                width: 2000,
                height: 2000
            }
        ));
        // The vector path has no pixel budget.
        let scene = Scene::empty(dims(500, 500));
        assert!(exporter.export(&scene, ExportFormat::Svg).is_ok());
    }

    #[test]
    fn test_bad_resolution_rejected() {
        let exporter = SceneExporter::new(ExportConfig {
            resolution: -1.0,
            ..ExportConfig::default()
        });
        assert!(matches!(
            exporter.export(&sample_scene(), ExportFormat::Png),
            Err(RenderError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_jpeg_flattens_onto_matte() {
        let mut scene = Scene::empty(dims(16, 16));
        scene.background = Background::new(Rgb::BLACK, 0);
        let raster = SceneExporter::with_defaults()
            .render_to_raster(&scene)
            .expect("raster");
        assert_eq!(raster.pixel(0, 0).expect("pixel").alpha(), 0);
        assert_eq!(flatten(0, 255, 1.0), 255);
        assert_eq!(flatten(128, 255, 0.5), 255);
        assert_eq!(flatten(0, 255, 0.0), 0);
    }

    #[test]
    fn test_export_file_name() {
        let ts = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("timestamp");
        assert_eq!(
            export_file_name(dims(1920, 1080), ExportFormat::Jpeg, ts),
            "linetrace-1920x1080-2024-03-09T14-05-07.jpg"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JPG".parse::<ExportFormat>().expect("jpg"), ExportFormat::Jpeg);
        assert_eq!("svg".parse::<ExportFormat>().expect("svg"), ExportFormat::Svg);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert!(!ExportFormat::Svg.is_raster());
        assert_eq!(ExportFormat::Png.mime_type(), "image/png");
    }

    #[test]
    fn test_constant_scene_exports_at_double_resolution() {
        let mut rng = ConstantRandom::new(0.5).expect("rng");
        let scene = generate_scene(
            dims(50, 50),
            LineStyleParams::default(),
            Background::default(),
            false,
            &mut rng,
        )
        .expect("scene");
        let exporter = SceneExporter::new(ExportConfig {
            resolution: 2.0,
            ..ExportConfig::default()
        });
        let raster = exporter.render_to_raster(&scene).expect("raster");
        assert_eq!((raster.width(), raster.height()), (100, 100));
    }
}
