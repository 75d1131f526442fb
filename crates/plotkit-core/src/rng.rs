//! Seeded randomness helpers.
//!
//! Everything random in a pipeline run derives from a `u64` seed through
//! [`seeded`], so identical seeds give bit-identical geometry.

use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform value in `[0, 1)`.
pub fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u32() as f64) / ((u32::MAX as f64) + 1.0)
}

/// Uniform value in `[min, max)`.
pub fn rand_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + rand01(rng) * (max - min)
}
