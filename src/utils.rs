//! Utility functions and traits.

use rand::prelude::*;

/// Utility trait that generalizes the floating-point types accepted by the host kernels.
pub trait BenchFloat: num::Float + Default + Send + Sync {}

impl BenchFloat for f32 {}
impl BenchFloat for f64 {}

/// Produces `n` evenly spaced values from `0` to `n`, both ends included.
///
/// Values are computed in double precision then narrowed to `f32`. A single-element buffer only
/// holds the start point.
pub fn linspace(n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![0.0; n];
    }

    let stop = n as f64;
    let step = stop / (n - 1) as f64;
    let mut values: Vec<f32> = (0..n).map(|i| (i as f64 * step) as f32).collect();
    // Pin the end point so it does not depend on rounding of `step`
    if let Some(last) = values.last_mut() {
        *last = stop as f32;
    }
    values
}

/// Produces a vector of length `n` filled with values in the range [0.0, n).
pub fn rand_vector(n: usize, seed: u64) -> Vec<f32> {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
    let upper = (n as f32).max(1.0);
    let between = rand::distributions::Uniform::new(0.0_f32, upper);
    (0..n).map(|_| between.sample(&mut rng)).collect()
}
