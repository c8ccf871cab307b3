//! Subcommand implementations.
//!
//! Each function does the work and hands back what `main` should report, so
//! tests can drive them without a process boundary.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use linetrace_core::{compute_surface, Artboard, ContainerSize, Scene, SurfaceMetrics};
use linetrace_render::{export_file_name, ExportFormat, SceneExporter};

use crate::{GenerateArgs, SceneArgs, SurfaceArgs};

/// Result of `linetrace generate`.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// File the export was written to.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: usize,
    /// Status bar text for the generated scene.
    pub status: String,
}

/// Generate a scene and write it in the requested format.
///
/// When `--output` names an existing directory the file name is derived
/// from the canvas size, format and `now`.
///
/// # Errors
///
/// Returns an error if the settings are invalid, the export fails, or the
/// file cannot be written.
pub fn generate(args: &GenerateArgs, now: DateTime<Utc>) -> anyhow::Result<GenerateReport> {
    let settings = args.style.resolve()?;
    let mut rng = args.style.random_source();
    let board = Artboard::new(settings, &mut rng)?;
    let scene = board.scene();

    let exporter = SceneExporter::new(args.export_config());
    let bytes = exporter
        .export(scene, args.format)
        .with_context(|| format!("exporting {} as {}", scene.logical(), args.format))?;

    let path = output_path(&args.output, scene, args.format, now);
    std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());

    Ok(GenerateReport {
        path,
        bytes: bytes.len(),
        status: board.status_line(),
    })
}

/// Compute the surface layout.
///
/// # Errors
///
/// Returns an error if the settings, container size or pixel ratio are
/// invalid.
pub fn surface(args: &SurfaceArgs) -> anyhow::Result<SurfaceMetrics> {
    let settings = args.style.resolve()?;
    let container = match (args.container_width, args.container_height) {
        (Some(w), Some(h)) if args.element => Some(ContainerSize::from_element(w, h)?),
        (Some(w), Some(h)) => Some(ContainerSize::new(w, h)?),
        _ => None,
    };
    let metrics = compute_surface(
        settings.dimensions()?,
        container,
        args.mode.unwrap_or(settings.display_mode),
        args.dpr,
        settings.high_quality && !args.no_high_dpi,
    )?;
    tracing::info!("Surface {}: {}", metrics.logical, metrics.zoom_label());
    Ok(metrics)
}

/// Generate a scene.
///
/// # Errors
///
/// Returns an error if the settings are invalid.
pub fn scene(args: &SceneArgs) -> anyhow::Result<Scene> {
    let settings = args.style.resolve()?;
    let mut rng = args.style.random_source();
    let board = Artboard::new(settings, &mut rng)?;
    tracing::info!("{}", board.status_line());
    Ok(board.scene().clone())
}

/// Serialize a value for printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn output_path(
    output: &Path,
    scene: &Scene,
    format: ExportFormat,
    now: DateTime<Utc>,
) -> PathBuf {
    if output.is_dir() {
        output.join(export_file_name(scene.logical(), format, now))
    } else {
        output.to_path_buf()
    }
}
