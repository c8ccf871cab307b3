//! WebAssembly bindings for linetrace-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! The host owns the DOM: it measures the container, reads the device pixel
//! ratio and paints the scene JSON this module hands back.

use wasm_bindgen::prelude::*;

use crate::{Artboard, ContainerSize, Settings, StdRandom};

/// Initialize the linetrace WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Artboard instance for WASM.
#[wasm_bindgen]
pub struct WasmArtboard {
    board: Artboard,
    rng: StdRandom,
}

#[wasm_bindgen]
impl WasmArtboard {
    /// Create an artboard from settings JSON. An empty string uses defaults.
    ///
    /// # Errors
    ///
    /// Returns an error string if the settings are malformed or invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WasmArtboard, String> {
        Self::build(settings_json, StdRandom::from_entropy())
    }

    /// Create an artboard whose scenes are reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the settings are malformed or invalid.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(settings_json: &str, seed: u32) -> Result<WasmArtboard, String> {
        Self::build(settings_json, StdRandom::from_seed(u64::from(seed)))
    }

    fn build(settings_json: &str, mut rng: StdRandom) -> Result<WasmArtboard, String> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(|e| e.to_string())?
        };
        let board = Artboard::new(settings, &mut rng).map_err(|e| e.to_string())?;
        Ok(Self { board, rng })
    }

    /// Compute the surface layout and return it as JSON.
    ///
    /// `container_width`/`container_height` are the element's client size;
    /// the 40 px margin is subtracted here. When both sides are zero or
    /// negative the container is unavailable and the default surface is used.
    ///
    /// # Errors
    ///
    /// Returns an error string if the container is too small, not finite,
    /// or only partly measured, or if the device pixel ratio is invalid.
    pub fn layout(
        &mut self,
        container_width: f64,
        container_height: f64,
        device_pixel_ratio: f64,
    ) -> Result<String, String> {
        let container = if container_width <= 0.0 && container_height <= 0.0 {
            None
        } else {
            Some(
                ContainerSize::from_element(container_width, container_height)
                    .map_err(|e| e.to_string())?,
            )
        };
        let metrics = self
            .board
            .layout(container, device_pixel_ratio)
            .map_err(|e| e.to_string())?;
        serde_json::to_string(metrics).map_err(|e| e.to_string())
    }

    /// Generate a new scene and return it as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if generation fails.
    pub fn regenerate(&mut self) -> Result<String, String> {
        let scene = self
            .board
            .regenerate(&mut self.rng)
            .map_err(|e| e.to_string())?;
        scene.to_json().map_err(|e| e.to_string())
    }

    /// Apply new settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the settings are malformed or invalid.
    #[wasm_bindgen(js_name = setSettingsJson)]
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), String> {
        let settings = Settings::from_json(json).map_err(|e| e.to_string())?;
        self.board
            .set_settings(settings, &mut self.rng)
            .map_err(|e| e.to_string())
    }

    /// Get the current settings as JSON.
    #[wasm_bindgen(js_name = getSettingsJson)]
    #[must_use]
    pub fn get_settings_json(&self) -> String {
        self.board.settings().to_json().unwrap_or_default()
    }

    /// Get the current scene as JSON.
    #[wasm_bindgen(js_name = getSceneJson)]
    #[must_use]
    pub fn get_scene_json(&self) -> String {
        self.board.scene().to_json().unwrap_or_default()
    }

    /// Status bar text for the current scene.
    #[wasm_bindgen(js_name = statusLine)]
    #[must_use]
    pub fn status_line(&self) -> String {
        self.board.status_line()
    }

    /// Zoom label for the last layout, empty before the first layout.
    #[wasm_bindgen(js_name = zoomLabel)]
    #[must_use]
    pub fn zoom_label(&self) -> String {
        self.board
            .surface()
            .map(crate::SurfaceMetrics::zoom_label)
            .unwrap_or_default()
    }
}
