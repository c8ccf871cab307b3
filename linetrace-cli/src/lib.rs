//! # Linetrace CLI
//!
//! Command-line host for the Linetrace engine.
//!
//! ## Usage
//!
//! ```bash
//! linetrace generate --size 1920x1080 --count 24 --format svg --output out/
//! linetrace surface --width 500 --height 500 --container-width 440 --container-height 440
//! linetrace scene --seed 7 --line-mode through
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `StyleArgs` - Flags overlaid on a [`Settings`] value (defaults or a JSON file)
//! - `commands` - One function per subcommand, returning what `main` prints

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use linetrace_core::{
    ColorMode, Dimensions, DisplayMode, LineCap, LineMode, Rgb, Settings, StdRandom,
};
use linetrace_render::{ExportConfig, ExportFormat};

/// Command-line arguments for linetrace.
#[derive(Debug, Clone, Parser)]
#[command(name = "linetrace")]
#[command(about = "Generative line art: random Bézier strokes exported to PNG, JPEG or SVG")]
#[command(version)]
pub struct CliArgs {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a scene and export it to a file.
    Generate(GenerateArgs),
    /// Print the surface layout for a canvas and container as JSON.
    Surface(SurfaceArgs),
    /// Print a generated scene as JSON.
    Scene(SceneArgs),
}

/// Flags shared by every command that builds [`Settings`].
///
/// Unset flags keep the value from `--settings` (or the defaults).
#[derive(Debug, Clone, Default, Args)]
pub struct StyleArgs {
    /// Settings JSON file to start from
    #[arg(long, env = "LINETRACE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Canvas size as WIDTHxHEIGHT (e.g. 1920x1080)
    #[arg(long)]
    pub size: Option<Dimensions>,

    /// Canvas width in logical units
    #[arg(long, env = "LINETRACE_WIDTH")]
    pub width: Option<u32>,

    /// Canvas height in logical units
    #[arg(long, env = "LINETRACE_HEIGHT")]
    pub height: Option<u32>,

    /// Number of strokes
    #[arg(long)]
    pub count: Option<usize>,

    /// Endpoint placement: through, random or mixed
    #[arg(long)]
    pub line_mode: Option<LineMode>,

    /// Stroke colors: black, theme or random
    #[arg(long)]
    pub color_mode: Option<ColorMode>,

    /// Thinnest stroke width
    #[arg(long)]
    pub min_width: Option<f64>,

    /// Thickest stroke width
    #[arg(long)]
    pub max_width: Option<f64>,

    /// Curve strength in percent (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub curve: Option<u8>,

    /// Line caps: butt, round or mixed
    #[arg(long)]
    pub line_cap: Option<LineCap>,

    /// Background color (#rgb or #rrggbb)
    #[arg(long)]
    pub background: Option<Rgb>,

    /// Background opacity in percent (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub opacity: Option<u8>,

    /// Paint the alignment grid
    #[arg(long, overrides_with = "no_grid")]
    pub grid: bool,

    /// Hide the alignment grid, even if the settings file shows it
    #[arg(long, overrides_with = "grid")]
    pub no_grid: bool,

    /// Seed for reproducible artwork
    #[arg(long, env = "LINETRACE_SEED")]
    pub seed: Option<u64>,
}

impl StyleArgs {
    /// Load the base settings and overlay every explicit flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or the result is
    /// invalid.
    pub fn resolve(&self) -> anyhow::Result<Settings> {
        let base = match &self.settings {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };
        let settings = self.overlay(base);
        settings.validate()?;
        Ok(settings)
    }

    /// Overlay explicit flags on `settings`. `--width`/`--height` win over
    /// `--size`.
    #[must_use]
    pub fn overlay(&self, mut settings: Settings) -> Settings {
        if let Some(size) = self.size {
            settings.width = size.width();
            settings.height = size.height();
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(count) = self.count {
            settings.line_count = count;
        }
        if let Some(mode) = self.line_mode {
            settings.line_mode = mode;
        }
        if let Some(mode) = self.color_mode {
            settings.color_mode = mode;
        }
        if let Some(width) = self.min_width {
            settings.min_width = width;
        }
        if let Some(width) = self.max_width {
            settings.max_width = width;
        }
        if let Some(curve) = self.curve {
            settings.curve_strength = curve;
        }
        if let Some(cap) = self.line_cap {
            settings.line_cap = cap;
        }
        if let Some(color) = self.background {
            settings.bg_color = color;
        }
        if let Some(opacity) = self.opacity {
            settings.bg_opacity = opacity;
        }
        if self.grid {
            settings.show_grid = true;
        } else if self.no_grid {
            settings.show_grid = false;
        }
        settings
    }

    /// Random source for this run: seeded when `--seed` is given.
    #[must_use]
    pub fn random_source(&self) -> StdRandom {
        match self.seed {
            Some(seed) => StdRandom::from_seed(seed),
            None => StdRandom::from_entropy(),
        }
    }
}

/// Arguments for `linetrace generate`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Scene settings.
    #[command(flatten)]
    pub style: StyleArgs,

    /// Output format: png, jpeg or svg
    #[arg(long, default_value = "png")]
    pub format: ExportFormat,

    /// Resolution multiplier
    #[arg(long, default_value_t = 1.0)]
    pub resolution: f64,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Largest raster buffer in pixels
    #[arg(long, env = "LINETRACE_MAX_PIXELS", default_value_t = ExportConfig::DEFAULT_MAX_PIXELS)]
    pub max_pixels: u64,

    /// Output file, or a directory to place a timestamped file in
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
}

impl GenerateArgs {
    /// Exporter configuration from the flags.
    #[must_use]
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            resolution: self.resolution,
            jpeg_quality: self.jpeg_quality,
            max_pixels: self.max_pixels,
            ..ExportConfig::default()
        }
    }
}

/// Arguments for `linetrace surface`.
#[derive(Debug, Clone, Args)]
pub struct SurfaceArgs {
    /// Scene settings (size, display mode and quality are used).
    #[command(flatten)]
    pub style: StyleArgs,

    /// Available container width; omit to use the fallback layout
    #[arg(long, requires = "container_height")]
    pub container_width: Option<f64>,

    /// Available container height
    #[arg(long, requires = "container_width")]
    pub container_height: Option<f64>,

    /// Treat the container size as the element's client size and subtract
    /// the margin
    #[arg(long)]
    pub element: bool,

    /// Display mode: auto, original, fit-width or fit-height
    #[arg(long)]
    pub mode: Option<DisplayMode>,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    pub dpr: f64,

    /// Scale the backing store with the display even when shrunk
    #[arg(long)]
    pub no_high_dpi: bool,
}

/// Arguments for `linetrace scene`.
#[derive(Debug, Clone, Args)]
pub struct SceneArgs {
    /// Scene settings.
    #[command(flatten)]
    pub style: StyleArgs,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Read settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings = Settings::from_json(&json)
        .with_context(|| format!("parsing settings from {}", path.display()))?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let args = CliArgs::try_parse_from([
            "linetrace",
            "generate",
            "--size",
            "800x600",
            "--line-mode",
            "through",
            "--format",
            "jpg",
            "--background",
            "#123",
            "-o",
            "out.jpg",
        ])
        .expect("parse");
        let Command::Generate(generate) = args.command else {
            panic!("expected generate");
        };
        assert_eq!(generate.format, ExportFormat::Jpeg);
        let settings = generate.style.resolve().expect("settings");
        assert_eq!((settings.width, settings.height), (800, 600));
        assert_eq!(settings.line_mode, LineMode::Through);
        assert_eq!(settings.bg_color, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(generate.output, PathBuf::from("out.jpg"));
    }

    #[test]
    fn test_explicit_width_beats_size() {
        let style = StyleArgs {
            size: Some(Dimensions::new(100, 100).expect("dims")),
            width: Some(300),
            ..StyleArgs::default()
        };
        let settings = style.overlay(Settings::default());
        assert_eq!((settings.width, settings.height), (300, 100));
    }

    #[test]
    fn test_grid_flags_toggle_both_ways() {
        let shown = Settings {
            show_grid: true,
            ..Settings::default()
        };
        let hide = StyleArgs {
            no_grid: true,
            ..StyleArgs::default()
        };
        assert!(!hide.overlay(shown.clone()).show_grid);
        assert!(StyleArgs::default().overlay(shown).show_grid);

        let args = CliArgs::try_parse_from(["linetrace", "scene", "--no-grid", "--grid"])
            .expect("parse");
        let Command::Scene(scene) = args.command else {
            panic!("expected scene");
        };
        assert!(scene.style.grid);
        assert!(!scene.style.no_grid);
    }

    #[test]
    fn test_curve_out_of_range_rejected() {
        let result = CliArgs::try_parse_from(["linetrace", "scene", "--curve", "150"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_container_flags_come_in_pairs() {
        let result =
            CliArgs::try_parse_from(["linetrace", "surface", "--container-width", "400"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_overlay_fails_validation() {
        let style = StyleArgs {
            min_width: Some(8.0),
            max_width: Some(2.0),
            ..StyleArgs::default()
        };
        assert!(style.resolve().is_err());
    }
}
