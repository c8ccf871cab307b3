//! Stroke generation.
//!
//! Turns a logical size and a [`LineStyleParams`] into an ordered batch of
//! cubic Bézier [`Stroke`]s. Generation is a pure function of its inputs and
//! the injected [`RandomSource`]: replaying the same draws reproduces the
//! same scene.
//!
//! Draws are consumed per stroke in a fixed order: line mode coin (mixed
//! only), endpoints, control point offsets, width, color, cap coin (mixed
//! only).

use crate::rng::{coin, uniform, uniform_int, uniform_steps};
use crate::{
    Background, ColorMode, ColorSpec, CoreResult, Dimensions, LineCap, LineMode,
    LineStyleParams, Point, RandomSource, Scene, Stroke, StrokeCap,
};

/// Width of the stroke substituted when a stroke fails to generate.
pub const FALLBACK_WIDTH: f64 = 2.0;

/// A hue band of the theme palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThemeBand {
    hue_base: u16,
    lightness_base: u8,
}

const THEME_BANDS: [ThemeBand; 3] = [
    // blue
    ThemeBand {
        hue_base: 200,
        lightness_base: 45,
    },
    // green
    ThemeBand {
        hue_base: 100,
        lightness_base: 40,
    },
    // magenta
    ThemeBand {
        hue_base: 280,
        lightness_base: 45,
    },
];

const THEME_HUE_SPAN: u16 = 40;
const THEME_SATURATION_BASE: u8 = 70;
const THEME_SATURATION_SPAN: u16 = 20;
const THEME_LIGHTNESS_SPAN: u16 = 15;

const RANDOM_HUE_SPAN: u16 = 360;
const RANDOM_SATURATION_BASE: u8 = 70;
const RANDOM_SATURATION_SPAN: u16 = 30;
const RANDOM_LIGHTNESS_BASE: u8 = 30;
const RANDOM_LIGHTNESS_SPAN: u16 = 40;

/// Most strokes reserved up front; larger batches grow as they go.
const MAX_PREALLOCATED_STROKES: usize = 4096;

/// Generates strokes for a fixed canvas size and parameter set.
#[derive(Debug, Clone, Copy)]
pub struct StrokeGenerator {
    logical: Dimensions,
    params: LineStyleParams,
}

impl StrokeGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail validation.
    pub fn new(logical: Dimensions, params: LineStyleParams) -> CoreResult<Self> {
        params.validate()?;
        Ok(Self { logical, params })
    }

    /// Logical size strokes are generated for.
    #[must_use]
    pub fn logical(&self) -> Dimensions {
        self.logical
    }

    /// Parameters strokes are generated with.
    #[must_use]
    pub fn params(&self) -> &LineStyleParams {
        &self.params
    }

    /// Generate a single stroke.
    ///
    /// # Errors
    ///
    /// Returns an error if the random source breaks its `[0, 1)` contract or
    /// the resulting geometry is not finite.
    pub fn generate_one<R: RandomSource + ?Sized>(&self, rng: &mut R) -> CoreResult<Stroke> {
        let (start, end) = self.endpoints(rng)?;

        let center = start.midpoint(end);
        let max_offset = self.logical.longer_side() * self.params.curve_fraction();
        let control1 = center.offset(
            uniform(rng, -max_offset, max_offset)?,
            uniform(rng, -max_offset, max_offset)?,
        );
        let control2 = center.offset(
            uniform(rng, -max_offset, max_offset)?,
            uniform(rng, -max_offset, max_offset)?,
        );

        let width = uniform(rng, self.params.min_width, self.params.max_width)?;
        let color = self.color(rng)?;
        let cap = self.cap(rng)?;

        let stroke = Stroke {
            start,
            end,
            control1,
            control2,
            width,
            color,
            cap,
        };
        stroke.validate()?;

        tracing::trace!(
            "Stroke ({:.1}, {:.1}) -> ({:.1}, {:.1}) width {:.2} {} {}",
            start.x,
            start.y,
            end.x,
            end.y,
            width,
            color,
            cap
        );

        Ok(stroke)
    }

    /// Generate exactly `params.count` strokes.
    ///
    /// A stroke that fails to generate is replaced by
    /// [`Self::fallback_stroke`]; one bad stroke never aborts the batch.
    pub fn generate_strokes<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec<Stroke> {
        let mut strokes = Vec::with_capacity(initial_capacity(self.params.count));
        for idx in 0..self.params.count {
            let stroke = match self.generate_one(rng) {
                Ok(stroke) => stroke,
                Err(e) => {
                    tracing::warn!("Stroke #{idx} failed, substituting fallback: {e}");
                    self.fallback_stroke(rng)
                }
            };
            strokes.push(stroke);
        }
        strokes
    }

    /// A horizontal line across the canvas at a random height, with default
    /// width, color and cap.
    ///
    /// Draws a single value; if the source yields garbage the line sits at
    /// mid-height.
    pub fn fallback_stroke<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Stroke {
        let (w, h) = (self.logical.width_f64(), self.logical.height_f64());
        let y = uniform_int(rng, 0, self.logical.height()).map_or(h / 2.0, f64::from);
        Stroke {
            start: Point::new(0.0, y),
            end: Point::new(w, y),
            control1: Point::new(w * 0.3, y),
            control2: Point::new(w * 0.7, y),
            width: FALLBACK_WIDTH,
            color: ColorSpec::BLACK,
            cap: StrokeCap::Butt,
        }
    }

    fn endpoints<R: RandomSource + ?Sized>(&self, rng: &mut R) -> CoreResult<(Point, Point)> {
        let through = match self.params.line_mode {
            LineMode::Through => true,
            LineMode::Random => false,
            LineMode::Mixed => coin(rng)?,
        };
        if through {
            self.through_endpoints(rng)
        } else {
            self.random_endpoints(rng)
        }
    }

    /// Endpoints on two opposite edges.
    fn through_endpoints<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> CoreResult<(Point, Point)> {
        let (w, h) = (self.logical.width(), self.logical.height());
        let horizontal = coin(rng)?;
        if horizontal {
            let y0 = f64::from(uniform_int(rng, 0, h)?);
            let y1 = f64::from(uniform_int(rng, 0, h)?);
            Ok((Point::new(0.0, y0), Point::new(f64::from(w), y1)))
        } else {
            let x0 = f64::from(uniform_int(rng, 0, w)?);
            let x1 = f64::from(uniform_int(rng, 0, w)?);
            Ok((Point::new(x0, 0.0), Point::new(x1, f64::from(h))))
        }
    }

    /// Endpoints anywhere on the canvas.
    fn random_endpoints<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> CoreResult<(Point, Point)> {
        let (w, h) = (self.logical.width(), self.logical.height());
        let sx = f64::from(uniform_int(rng, 0, w)?);
        let sy = f64::from(uniform_int(rng, 0, h)?);
        let ex = f64::from(uniform_int(rng, 0, w)?);
        let ey = f64::from(uniform_int(rng, 0, h)?);
        Ok((Point::new(sx, sy), Point::new(ex, ey)))
    }

    fn color<R: RandomSource + ?Sized>(&self, rng: &mut R) -> CoreResult<ColorSpec> {
        match self.params.color_mode {
            ColorMode::Black => Ok(ColorSpec::BLACK),
            ColorMode::Theme => {
                let band = THEME_BANDS[uniform_int(rng, 0, 2)? as usize];
                let hue = band.hue_base + uniform_steps(rng, THEME_HUE_SPAN)?;
                let saturation =
                    THEME_SATURATION_BASE + narrow(uniform_steps(rng, THEME_SATURATION_SPAN)?);
                let lightness =
                    band.lightness_base + narrow(uniform_steps(rng, THEME_LIGHTNESS_SPAN)?);
                ColorSpec::hsl(hue, saturation, lightness)
            }
            ColorMode::Random => {
                let hue = uniform_steps(rng, RANDOM_HUE_SPAN)?;
                let saturation =
                    RANDOM_SATURATION_BASE + narrow(uniform_steps(rng, RANDOM_SATURATION_SPAN)?);
                let lightness =
                    RANDOM_LIGHTNESS_BASE + narrow(uniform_steps(rng, RANDOM_LIGHTNESS_SPAN)?);
                ColorSpec::hsl(hue, saturation, lightness)
            }
        }
    }

    fn cap<R: RandomSource + ?Sized>(&self, rng: &mut R) -> CoreResult<StrokeCap> {
        Ok(match self.params.line_cap {
            LineCap::Butt => StrokeCap::Butt,
            LineCap::Round => StrokeCap::Round,
            LineCap::Mixed => {
                if coin(rng)? {
                    StrokeCap::Butt
                } else {
                    StrokeCap::Round
                }
            }
        })
    }
}

/// Percent offsets are below 100 by construction.
fn narrow(step: u16) -> u8 {
    u8::try_from(step).unwrap_or(u8::MAX)
}

/// Generate a complete scene.
///
/// Returns a scene with exactly `params.count` strokes, drawn on the default
/// white background without grid; use [`generate_scene`] to choose the
/// background.
///
/// # Errors
///
/// Returns an error if the parameters fail validation. Individual stroke
/// failures are absorbed by the fallback stroke.
pub fn generate<R: RandomSource + ?Sized>(
    logical: Dimensions,
    params: LineStyleParams,
    rng: &mut R,
) -> CoreResult<Scene> {
    generate_scene(logical, params, Background::default(), false, rng)
}

/// Generate a complete scene with the given background and grid state.
///
/// # Errors
///
/// Returns an error if the parameters fail validation.
pub fn generate_scene<R: RandomSource + ?Sized>(
    logical: Dimensions,
    params: LineStyleParams,
    background: Background,
    show_grid: bool,
    rng: &mut R,
) -> CoreResult<Scene> {
    let generator = StrokeGenerator::new(logical, params)?;
    let strokes = generator.generate_strokes(rng);
    tracing::debug!(
        "Generated {} strokes for {} ({} / {} / {})",
        strokes.len(),
        logical,
        params.line_mode,
        params.color_mode,
        params.line_cap
    );
    Ok(Scene::new(logical, params, strokes, background, show_grid))
}

fn initial_capacity(count: usize) -> usize {
    count.min(MAX_PREALLOCATED_STROKES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ConstantRandom, ReplayRandom, StdRandom};
    use crate::CoreError;

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h).expect("dims")
    }

    fn through_black_butt(count: usize, width: f64) -> LineStyleParams {
        LineStyleParams {
            line_mode: LineMode::Through,
            color_mode: ColorMode::Black,
            min_width: width,
            max_width: width,
            curve_strength: 50,
            line_cap: LineCap::Butt,
            count,
        }
    }

    /// Returns NaN after `good` valid draws.
    struct Failing {
        good: usize,
    }

    impl RandomSource for Failing {
        fn next_unit(&mut self) -> f64 {
            if self.good == 0 {
                f64::NAN
            } else {
                self.good -= 1;
                0.25
            }
        }
    }

    #[test]
    fn test_constant_half_reference_stroke() {
        let mut rng = ConstantRandom::new(0.5).expect("rng");
        let scene =
            generate(dims(500, 500), through_black_butt(1, 2.0), &mut rng).expect("scene");
        assert_eq!(scene.stroke_count(), 1);
        let s = scene.strokes()[0];
        assert_eq!(s.start, Point::new(250.0, 0.0));
        assert_eq!(s.end, Point::new(250.0, 500.0));
        assert_eq!(s.control1, Point::new(250.0, 250.0));
        assert_eq!(s.control2, Point::new(250.0, 250.0));
        assert!((s.width - 2.0).abs() < f64::EPSILON);
        assert_eq!(s.color.to_string(), "#000000");
        assert_eq!(s.cap, StrokeCap::Butt);
    }

    #[test]
    fn test_horizontal_through_stroke() {
        // orientation, y0, y1, 4 offsets, width
        let mut rng =
            ReplayRandom::new(vec![0.9, 0.0, 0.999, 0.5, 0.5, 0.5, 0.5, 0.5]).expect("rng");
        let s = StrokeGenerator::new(dims(300, 100), through_black_butt(1, 1.0))
            .expect("generator")
            .generate_one(&mut rng)
            .expect("stroke");
        assert_eq!(s.start, Point::new(0.0, 0.0));
        assert_eq!(s.end, Point::new(300.0, 100.0));
        assert_eq!(rng.consumed(), 8);
    }

    #[test]
    fn test_zero_curve_strength_centers_controls() {
        let params = LineStyleParams {
            curve_strength: 0,
            ..through_black_butt(1, 1.0)
        };
        let mut rng = StdRandom::from_seed(7);
        let s = StrokeGenerator::new(dims(640, 480), params)
            .expect("generator")
            .generate_one(&mut rng)
            .expect("stroke");
        let mid = s.start.midpoint(s.end);
        assert_eq!(s.control1, mid);
        assert_eq!(s.control2, mid);
    }

    #[test]
    fn test_control_points_within_square() {
        let params = LineStyleParams {
            line_mode: LineMode::Random,
            curve_strength: 30,
            count: 200,
            ..LineStyleParams::default()
        };
        let logical = dims(400, 200);
        let max_offset = 400.0 * 0.3;
        let mut rng = StdRandom::from_seed(11);
        let scene = generate(logical, params, &mut rng).expect("scene");
        for s in scene.strokes() {
            let mid = s.start.midpoint(s.end);
            for c in [s.control1, s.control2] {
                assert!((c.x - mid.x).abs() <= max_offset);
                assert!((c.y - mid.y).abs() <= max_offset);
            }
        }
    }

    #[test]
    fn test_theme_colors_stay_in_bands() {
        let params = LineStyleParams {
            color_mode: ColorMode::Theme,
            count: 300,
            ..LineStyleParams::default()
        };
        let mut rng = StdRandom::from_seed(3);
        let scene = generate(dims(100, 100), params, &mut rng).expect("scene");
        for s in scene.strokes() {
            let ColorSpec::Hsl {
                hue,
                saturation,
                lightness,
            } = s.color
            else {
                panic!("theme colors are hsl");
            };
            assert!((70..90).contains(&saturation));
            match hue {
                200..=239 => assert!((45..60).contains(&lightness)),
                100..=139 => assert!((40..55).contains(&lightness)),
                280..=319 => assert!((45..60).contains(&lightness)),
                other => panic!("hue {other} outside theme bands"),
            }
        }
    }

    #[test]
    fn test_random_colors_ranges() {
        let params = LineStyleParams {
            color_mode: ColorMode::Random,
            count: 300,
            ..LineStyleParams::default()
        };
        let mut rng = StdRandom::from_seed(5);
        let scene = generate(dims(100, 100), params, &mut rng).expect("scene");
        for s in scene.strokes() {
            let ColorSpec::Hsl {
                hue,
                saturation,
                lightness,
            } = s.color
            else {
                panic!("random colors are hsl");
            };
            assert!(hue < 360);
            assert!((70..100).contains(&saturation));
            assert!((30..70).contains(&lightness));
        }
    }

    #[test]
    fn test_mixed_cap_and_mode_vary_per_stroke() {
        let params = LineStyleParams {
            line_mode: LineMode::Mixed,
            line_cap: LineCap::Mixed,
            count: 200,
            ..LineStyleParams::default()
        };
        let mut rng = StdRandom::from_seed(99);
        let scene = generate(dims(200, 200), params, &mut rng).expect("scene");
        let caps: Vec<_> = scene.strokes().iter().map(|s| s.cap).collect();
        assert!(caps.contains(&StrokeCap::Butt));
        assert!(caps.contains(&StrokeCap::Round));
    }

    #[test]
    fn test_zero_count_is_empty_scene() {
        let mut rng = StdRandom::from_seed(1);
        let scene = generate(dims(10, 10), through_black_butt(0, 1.0), &mut rng).expect("scene");
        assert!(scene.is_empty());
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let params = LineStyleParams {
            min_width: 3.0,
            max_width: 1.0,
            ..LineStyleParams::default()
        };
        let mut rng = StdRandom::from_seed(1);
        assert!(matches!(
            generate(dims(10, 10), params, &mut rng),
            Err(CoreError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_broken_source_substitutes_fallback() {
        // One valid draw (orientation), then NaN for everything.
        let mut rng = Failing { good: 1 };
        let scene = generate(dims(400, 300), through_black_butt(3, 4.0), &mut rng).expect("scene");
        assert_eq!(scene.stroke_count(), 3);
        for s in scene.strokes() {
            assert!(s.validate().is_ok());
            assert_eq!(s.start.x, 0.0);
            assert_eq!(s.end.x, 400.0);
            assert_eq!(s.start.y, s.end.y);
            assert!((s.width - FALLBACK_WIDTH).abs() < f64::EPSILON);
        }
        // Garbage draws put the fallback at mid-height.
        assert_eq!(scene.strokes()[2].start.y, 150.0);
    }

    #[test]
    fn test_huge_count_does_not_reserve_everything() {
        assert_eq!(initial_capacity(usize::MAX), MAX_PREALLOCATED_STROKES);
        assert_eq!(initial_capacity(12), 12);

        let mut rng = StdRandom::from_seed(3);
        let strokes = StrokeGenerator::new(dims(64, 64), through_black_butt(5000, 1.0))
            .expect("generator")
            .generate_strokes(&mut rng);
        assert_eq!(strokes.len(), 5000);
    }
}
