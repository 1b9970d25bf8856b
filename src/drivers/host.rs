//! Host kernel drivers.
//!
//! This module implements the driver functions responsible for profiling the in-process host
//! (CPU) strategies.

use crate::{config::BenchConfig, kernels::host, perf_report::*};

use tracing::debug;

use std::time::Instant;

/// Host driver for the in-process strategies.
///
/// This function selects the correct host kernel given `strategy` and profiles it, timing each
/// trial with the wall clock.
pub fn ceil(config: &BenchConfig, strategy: Strategy) -> PerfReport {
    // Match on given strategy
    let kernel = match strategy {
        Strategy::Sequential => host::ceil_passes::<f32>,
        Strategy::Threads => host::par_ceil_passes::<f32>,
        _ => unreachable!("{strategy:?} is not an in-process host strategy"),
    };

    // Measure execution time of kernel
    let mut durations = Vec::with_capacity(config.trials as usize);
    let mut output = Vec::new();
    for trial in 0..config.trials {
        let mut x = config.workload();

        let dur = Instant::now();
        kernel(&mut x, config.iterations);
        let elapsed = dur.elapsed().as_secs_f64();

        debug!(?strategy, trial, elapsed, "trial done");
        durations.push(elapsed);
        output = x;
    }

    PerfReport::new(
        strategy,
        config.buffer_len(),
        config.iterations,
        &mut durations,
        output,
    )
}
