//! Random range helpers
//!
//! Thin wrappers over any [`Rng`]; the simulation passes its seeded
//! generator so runs stay reproducible.

use rand::Rng;

/// Uniform integer in `[min, max]` (inclusive). Requires `min <= max`.
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    rng.random_range(min..=max)
}

/// Uniform float in `[min, max)`
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}
