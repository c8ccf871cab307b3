//! Artboard state: current settings, scene and surface layout.

use crate::{
    compute_surface, generate_scene, Background, ContainerSize, CoreResult, RandomSource, Scene,
    Settings, SurfaceMetrics,
};

/// The complete state behind one drawing surface.
///
/// Every change replaces whole values: a scene is regenerated wholesale and
/// only swapped in once complete, so a failed regeneration leaves the
/// previous scene untouched.
#[derive(Debug, Clone)]
pub struct Artboard {
    settings: Settings,
    scene: Scene,
    surface: Option<SurfaceMetrics>,
    generation: u64,
}

impl Artboard {
    /// Create an artboard and generate its first scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid.
    pub fn new<R: RandomSource + ?Sized>(settings: Settings, rng: &mut R) -> CoreResult<Self> {
        settings.validate()?;
        let scene = build_scene(&settings, rng)?;
        Ok(Self {
            settings,
            scene,
            surface: None,
            generation: 1,
        })
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Surface layout from the last [`Self::layout`] call.
    #[must_use]
    pub fn surface(&self) -> Option<&SurfaceMetrics> {
        self.surface.as_ref()
    }

    /// How many scenes have been generated so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the scene with a freshly generated one.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails; the previous scene is kept.
    pub fn regenerate<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> CoreResult<&Scene> {
        let scene = build_scene(&self.settings, rng)?;
        self.scene = scene;
        self.generation += 1;
        tracing::debug!(
            "Scene #{} ready: {}",
            self.generation,
            self.scene.status_line(self.settings.display_mode)
        );
        Ok(&self.scene)
    }

    /// Apply new settings.
    ///
    /// Regenerates the scene when anything affecting strokes changed;
    /// background and grid changes restyle the current strokes in place of
    /// discarding them. The surface layout is dropped when the canvas size,
    /// display mode or quality flag changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid; nothing changes then.
    pub fn set_settings<R: RandomSource + ?Sized>(
        &mut self,
        settings: Settings,
        rng: &mut R,
    ) -> CoreResult<()> {
        settings.validate()?;

        let layout_changed = settings.width != self.settings.width
            || settings.height != self.settings.height
            || settings.display_mode != self.settings.display_mode
            || settings.high_quality != self.settings.high_quality;
        let strokes_changed = settings.dimensions()? != self.scene.logical()
            || settings.line_style() != *self.scene.params();

        if strokes_changed {
            let scene = build_scene(&settings, rng)?;
            self.scene = scene;
            self.generation += 1;
        } else {
            self.scene.background = settings.background();
            self.scene.show_grid = settings.show_grid;
        }
        if layout_changed {
            self.surface = None;
        }
        self.settings = settings;
        Ok(())
    }

    /// Change the background without regenerating strokes.
    pub fn set_background(&mut self, background: Background) {
        self.settings.bg_color = background.color;
        self.settings.bg_opacity = background.opacity_percent;
        self.scene.background = background;
    }

    /// Toggle the alignment grid without regenerating strokes.
    pub fn set_show_grid(&mut self, show: bool) {
        self.settings.show_grid = show;
        self.scene.show_grid = show;
    }

    /// Recompute the surface layout for the current container and DPR.
    ///
    /// # Errors
    ///
    /// Returns an error if the device pixel ratio is invalid; the previous
    /// layout is kept.
    pub fn layout(
        &mut self,
        container: Option<ContainerSize>,
        device_pixel_ratio: f64,
    ) -> CoreResult<&SurfaceMetrics> {
        let metrics = compute_surface(
            self.settings.dimensions()?,
            container,
            self.settings.display_mode,
            device_pixel_ratio,
            self.settings.high_quality,
        )?;
        Ok(self.surface.insert(metrics))
    }

    /// Status bar text for the current scene.
    #[must_use]
    pub fn status_line(&self) -> String {
        self.scene.status_line(self.settings.display_mode)
    }
}

fn build_scene<R: RandomSource + ?Sized>(settings: &Settings, rng: &mut R) -> CoreResult<Scene> {
    generate_scene(
        settings.dimensions()?,
        settings.line_style(),
        settings.background(),
        settings.show_grid,
        rng,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DisplayMode, LineMode, Rgb, StdRandom};

    fn artboard() -> (Artboard, StdRandom) {
        let mut rng = StdRandom::from_seed(21);
        let board = Artboard::new(Settings::default(), &mut rng).expect("artboard");
        (board, rng)
    }

    #[test]
    fn test_new_generates_initial_scene() {
        let (board, _) = artboard();
        assert_eq!(board.scene().stroke_count(), 8);
        assert_eq!(board.generation(), 1);
        assert!(board.surface().is_none());
        assert_eq!(board.status_line(), "lines: 8 / canvas: 500x500 / display: auto");
    }

    #[test]
    fn test_regenerate_replaces_scene() {
        let (mut board, mut rng) = artboard();
        let before = board.scene().clone();
        board.regenerate(&mut rng).expect("regenerate");
        assert_eq!(board.generation(), 2);
        assert_ne!(board.scene(), &before);
        assert_eq!(board.scene().stroke_count(), before.stroke_count());
    }

    #[test]
    fn test_invalid_settings_keep_previous_state() {
        let (mut board, mut rng) = artboard();
        let before = board.scene().clone();
        let bad = Settings {
            width: 0,
            ..Settings::default()
        };
        assert!(board.set_settings(bad, &mut rng).is_err());
        assert_eq!(board.scene(), &before);
        assert_eq!(board.settings().width, 500);
    }

    #[test]
    fn test_background_change_keeps_strokes() {
        let (mut board, mut rng) = artboard();
        let strokes = board.scene().strokes().to_vec();
        let settings = Settings {
            bg_color: Rgb::BLACK,
            show_grid: true,
            ..board.settings().clone()
        };
        board.set_settings(settings, &mut rng).expect("settings");
        assert_eq!(board.scene().strokes(), strokes.as_slice());
        assert_eq!(board.scene().background.color, Rgb::BLACK);
        assert!(board.scene().show_grid);
        assert_eq!(board.generation(), 1);
    }

    #[test]
    fn test_style_change_regenerates() {
        let (mut board, mut rng) = artboard();
        let settings = Settings {
            line_mode: LineMode::Through,
            line_count: 3,
            ..board.settings().clone()
        };
        board.set_settings(settings, &mut rng).expect("settings");
        assert_eq!(board.scene().stroke_count(), 3);
        assert_eq!(board.generation(), 2);
    }

    #[test]
    fn test_layout_and_invalidation() {
        let (mut board, mut rng) = artboard();
        let container = ContainerSize::new(440.0, 440.0).expect("container");
        let scale = board.layout(Some(container), 1.0).expect("layout").scale_factor;
        assert!((scale - 0.88).abs() < 1e-12);
        assert!(board.surface().is_some());

        let settings = Settings {
            display_mode: DisplayMode::Original,
            ..board.settings().clone()
        };
        board.set_settings(settings, &mut rng).expect("settings");
        assert!(board.surface().is_none());
    }

    #[test]
    fn test_direct_restyle() {
        let (mut board, _) = artboard();
        board.set_background(Background::new(Rgb::BLACK, 40));
        board.set_show_grid(true);
        assert_eq!(board.settings().bg_opacity, 40);
        assert!(board.scene().show_grid);
    }
}
