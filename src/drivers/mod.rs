//! Strategy drivers.
//!
//! This module provides the API for appropriately initializing and profiling each execution
//! strategy, as well as post-processing the results. It acts as a layer abstracting over the
//! strategy's target: either the host (CPU, in-process or in a worker process) or the device
//! (GPU).
//!
//! # High-level approach for strategy profiling
//! ## 1. Data initialization
//! Every trial starts from a fresh workload buffer built from the [`BenchConfig`] (a ramp by
//! default). When targeting a device, the buffer is then copied to device memory, outside of the
//! timed region.
//!
//! ## 2. Performance evaluation
//! This step consists in measuring the execution time of the chosen strategy, repeated over a
//! number of trials (see [`crate::consts`] for the defaults and [`crate::cli`] for overriding them
//! from the command-line). Within a trial, the ceiling operation is reapplied `iterations` times:
//! inside the kernel for device strategies, as whole-buffer passes for host strategies.
//!
//! ## 3. Post-processing
//! The recorded durations are averaged into a [`PerfReport`], along with the output buffer of the
//! final trial. Reports are written to `stdout`, or a file if specified, either in a
//! human-readable form or as CSV.

mod device;
mod host;
pub mod process;

use crate::{
    cli::{CliArgs, OutputFormat},
    config::{BenchConfig, GridDims},
    error::Result,
    perf_report::*,
};

use device::{ClRuntime, CudaRuntime};
use tracing::info;

use std::{
    fs::OpenOptions,
    io::{stdout, Write},
};

/// Timing harness.
///
/// Owns the run configuration and the device runtimes, which are created on the first strategy
/// that needs them and then reused until the harness is dropped.
pub struct Harness {
    config: BenchConfig,
    cuda: Option<CudaRuntime>,
    cl: Option<ClRuntime>,
}

impl Harness {
    pub fn new(config: BenchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cuda: None,
            cl: None,
        })
    }

    fn cuda(slot: &mut Option<CudaRuntime>) -> Result<&CudaRuntime> {
        let runtime = match slot.take() {
            Some(runtime) => runtime,
            None => CudaRuntime::new()?,
        };
        Ok(&*slot.insert(runtime))
    }

    fn cl(slot: &mut Option<ClRuntime>, grid: GridDims) -> Result<&ClRuntime> {
        let runtime = match slot.take() {
            Some(runtime) => runtime,
            None => ClRuntime::new(grid)?,
        };
        Ok(&*slot.insert(runtime))
    }

    /// Runs every trial of `strategy` and reports their mean duration and the final output.
    pub fn run_strategy(&mut self, strategy: Strategy) -> Result<PerfReport> {
        info!(
            ?strategy,
            trials = self.config.trials,
            iterations = self.config.iterations,
            len = self.config.buffer_len(),
            "running strategy"
        );

        let report = match strategy {
            Strategy::CudaKernel => Self::cuda(&mut self.cuda)?.ceil_kernel(&self.config)?,
            Strategy::CudaArray => Self::cuda(&mut self.cuda)?.ceil_array(&self.config)?,
            Strategy::ClKernel => {
                Self::cl(&mut self.cl, self.config.grid)?.ceil_kernel(&self.config)?
            }
            Strategy::Process => process::ceil(&self.config)?,
            Strategy::Threads | Strategy::Sequential => host::ceil(&self.config, strategy),
        };

        info!(?strategy, mean = report.mean_time(), "strategy done");
        Ok(report)
    }

    /// Runs `strategies` one after the other, in the given order. The first failure ends the run.
    pub fn run_all(&mut self, strategies: &[Strategy]) -> Result<Vec<PerfReport>> {
        strategies
            .iter()
            .map(|&strategy| self.run_strategy(strategy))
            .collect()
    }
}

/// Driver function responsible for building the harness from the command-line arguments, running
/// the requested strategies and writing their reports.
pub fn run(args: &CliArgs) -> Result<()> {
    let config = BenchConfig::try_from(args)?;
    let mut harness = Harness::new(config)?;

    let mut output: Box<dyn Write> = match args.output_file {
        Some(ref name) => Box::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(name)?,
        ),
        None => Box::new(stdout()),
    };

    if args.format == OutputFormat::Csv {
        PerfReport::write_csv_header(&mut output)?;
    }

    // Reports are written as soon as available, so that a failing strategy still leaves the
    // results of the previous ones
    for &strategy in &args.strategies {
        let report = harness.run_strategy(strategy)?;
        match args.format {
            OutputFormat::Text => report.write_text(&mut output)?,
            OutputFormat::Csv => writeln!(output, "{report}")?,
        }
        output.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;

    #[test]
    fn harness_rejects_invalid_config() {
        let config = BenchConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(matches!(
            Harness::new(config),
            Err(BenchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn host_strategies_compute_the_same_function() {
        let config = BenchConfig {
            trials: 2,
            iterations: 3,
            grid: GridDims::new(8, 32),
            ..Default::default()
        };
        let mut harness = Harness::new(config).unwrap();
        let reports = harness
            .run_all(&[Strategy::Threads, Strategy::Sequential])
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].strategy(), Strategy::Threads);
        assert_eq!(reports[0].output(), reports[1].output());
        for report in &reports {
            assert!(report.mean_time().is_finite() && report.mean_time() >= 0.0);
        }
    }
}
