//! Injected randomness.
//!
//! The generator never reaches for an ambient RNG; it pulls uniform floats in
//! `[0, 1)` from a [`RandomSource`]. Production hosts use [`StdRandom`],
//! tests substitute [`ReplayRandom`] or [`ConstantRandom`] to get exactly
//! reproducible scenes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{CoreError, CoreResult};

/// A stream of uniform floats in `[0, 1)`.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl RandomSource for Box<dyn RandomSource> {
    fn next_unit(&mut self) -> f64 {
        self.as_mut().next_unit()
    }
}

/// Draw one value and check it honours the `[0, 1)` contract.
///
/// # Errors
///
/// Returns [`CoreError::InvalidRandom`] for NaN, infinities, negatives, or
/// values `>= 1`.
pub fn draw_unit<R: RandomSource + ?Sized>(rng: &mut R) -> CoreResult<f64> {
    let u = rng.next_unit();
    check_unit(u)
}

fn check_unit(u: f64) -> CoreResult<f64> {
    if (0.0..1.0).contains(&u) {
        Ok(u)
    } else {
        Err(CoreError::InvalidRandom(u))
    }
}

/// Uniform real in `[min, max)` (or exactly `min` when `min == max`).
///
/// # Errors
///
/// Propagates [`CoreError::InvalidRandom`] from the source.
pub fn uniform<R: RandomSource + ?Sized>(rng: &mut R, min: f64, max: f64) -> CoreResult<f64> {
    Ok(draw_unit(rng)?.mul_add(max - min, min))
}

/// Uniform integer in `[min, max]`, both ends inclusive.
///
/// # Errors
///
/// Propagates [`CoreError::InvalidRandom`] from the source.
pub fn uniform_int<R: RandomSource + ?Sized>(rng: &mut R, min: u32, max: u32) -> CoreResult<u32> {
    let span = f64::from(max - min) + 1.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let step = (draw_unit(rng)? * span).floor() as u32;
    Ok(min + step.min(max - min))
}

/// Whole-number offset `floor(u * span)`, i.e. uniform in `[0, span)`.
///
/// # Errors
///
/// Propagates [`CoreError::InvalidRandom`] from the source.
pub fn uniform_steps<R: RandomSource + ?Sized>(rng: &mut R, span: u16) -> CoreResult<u16> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let step = (draw_unit(rng)? * f64::from(span)).floor() as u16;
    Ok(step.min(span.saturating_sub(1)))
}

/// Fair coin: `true` when the draw is strictly above one half.
///
/// # Errors
///
/// Propagates [`CoreError::InvalidRandom`] from the source.
pub fn coin<R: RandomSource + ?Sized>(rng: &mut R) -> CoreResult<bool> {
    Ok(draw_unit(rng)? > 0.5)
}

/// Standard library RNG, seeded from OS entropy or from a fixed seed.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Create a source using randomness from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a source with a fixed seed, for reproducible artwork.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of values, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ReplayRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ReplayRandom {
    /// Create a replaying source.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRandom`] if any value lies outside
    /// `[0, 1)`, or [`CoreError::InvalidParams`] if the sequence is empty.
    pub fn new(values: Vec<f64>) -> CoreResult<Self> {
        if values.is_empty() {
            return Err(CoreError::InvalidParams(
                "replay sequence must not be empty".to_string(),
            ));
        }
        for &v in &values {
            check_unit(v)?;
        }
        Ok(Self { values, cursor: 0 })
    }

    /// How many values have been consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Start again from the first value.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl RandomSource for ReplayRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom(f64);

impl ConstantRandom {
    /// Create a constant source.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRandom`] if `value` lies outside `[0, 1)`.
    pub fn new(value: f64) -> CoreResult<Self> {
        Ok(Self(check_unit(value)?))
    }
}

impl RandomSource for ConstantRandom {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}
