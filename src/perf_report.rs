//! Performance report related structures and functions.
//!
//! This module defines the data structures and functions needed to turn the recorded execution
//! times of a strategy into a report, and to print that report either in the human-readable
//! format (header line, then `<mean>s, <sample>`) or as CSV.

use crate::consts::EDGE_ITEMS;

use statistical::{mean, standard_deviation};

use std::{fmt, io::Write};

/// Enum defining the target of a strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetKind {
    Host,
    Device,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::Device => write!(f, "device"),
        }
    }
}

/// Execution strategies for the ceiling workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Custom CUDA kernel, each thread looping over its own element.
    CudaKernel,
    /// Single-pass CUDA ceiling primitive applied repeatedly to a device-resident array.
    CudaArray,
    /// Custom OpenCL kernel, compiled from source at runtime.
    ClKernel,
    /// One worker process sharing the buffer through a memory-mapped region.
    Process,
    /// Host threads (`rayon`), each owning a disjoint chunk of the buffer.
    Threads,
    /// Calling thread only.
    Sequential,
}

impl Strategy {
    /// Returns the platform this strategy executes on.
    pub fn target(&self) -> TargetKind {
        match self {
            Self::CudaKernel | Self::CudaArray | Self::ClKernel => TargetKind::Device,
            Self::Process | Self::Threads | Self::Sequential => TargetKind::Host,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CudaKernel => write!(f, "CUDA"),
            Self::CudaArray => write!(f, "CUDA Array"),
            Self::ClKernel => write!(f, "OpenCL"),
            Self::Process => write!(f, "Parallel CPU"),
            Self::Threads => write!(f, "Threaded CPU"),
            Self::Sequential => write!(f, "CPU"),
        }
    }
}

/// Abbreviated view over an output buffer.
///
/// Buffers longer than `2 * EDGE_ITEMS` elements only show their first and last `EDGE_ITEMS`
/// values, e.g. `[0.0, 2.0, 3.0, ..., 8190.0, 8191.0, 8192.0]`.
pub struct Sample<'a>(pub &'a [f32]);

impl fmt::Display for Sample<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.0;
        let shown: Vec<String> = if values.len() <= 2 * EDGE_ITEMS {
            values.iter().map(|v| format!("{v:?}")).collect()
        } else {
            let head = values[..EDGE_ITEMS].iter().map(|v| format!("{v:?}"));
            let tail = values[values.len() - EDGE_ITEMS..]
                .iter()
                .map(|v| format!("{v:?}"));
            head.chain(std::iter::once("...".to_string()))
                .chain(tail)
                .collect()
        };
        write!(f, "[{}]", shown.join(", "))
    }
}

/// Performance information and statistics of one strategy run.
pub struct PerfReport {
    /// Benchmarked strategy.
    strategy: Strategy,
    /// Number of elements in the workload buffer.
    nb_elems: usize,
    /// Ceiling passes per trial.
    iterations: u32,
    /// Number of measured trials.
    trials: usize,
    /// Minimum recorded runtime in milliseconds.
    min_time: f64,
    /// Median recorded runtime in milliseconds.
    median_time: f64,
    /// Maximum recorded runtime in milliseconds.
    max_time: f64,
    /// Average runtime in seconds.
    avg_time: f64,
    /// Runtime standard deviation in seconds.
    stddev_time: f64,
    /// Processed elements per second, counting every iteration, in billions.
    throughput: f64,
    /// Output buffer of the final trial.
    output: Vec<f32>,
}

impl PerfReport {
    pub fn write_csv_header(output: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            output,
            "target,strategy,elems,iterations,trials,min_runtime,median_runtime,max_runtime,avg_runtime,stddev,Gelem/s"
        )
    }

    /// Creates a new `PerfReport` given a strategy, the number of elements and iterations, the
    /// recorded per-trial execution times (in seconds) and the final trial's output.
    ///
    /// `durations` must hold at least one measurement.
    pub fn new(
        strategy: Strategy,
        nb_elems: usize,
        iterations: u32,
        durations: &mut [f64],
        output: Vec<f32>,
    ) -> Self {
        assert!(!durations.is_empty(), "no trial was recorded");

        // Sort durations to avoid having to do two passes to get both min and max elements
        durations.sort_by(f64::total_cmp);

        let min_time = durations[0] * 1e3;
        let median_time = durations[durations.len() / 2] * 1e3;
        let max_time = durations[durations.len() - 1] * 1e3;
        let avg_time = mean(durations);
        // `statistical` needs two samples to compute a variance
        let stddev_time = if durations.len() > 1 {
            standard_deviation(durations, Some(avg_time))
        } else {
            0.0
        };

        let throughput = if avg_time > 0.0 {
            (nb_elems as f64 * iterations as f64) / avg_time / 1e9
        } else {
            0.0
        };

        Self {
            strategy,
            nb_elems,
            iterations,
            trials: durations.len(),
            min_time,
            median_time,
            max_time,
            avg_time,
            stddev_time,
            throughput,
            output,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Mean trial duration in seconds.
    pub fn mean_time(&self) -> f64 {
        self.avg_time
    }

    pub fn stddev_time(&self) -> f64 {
        self.stddev_time
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Full output buffer of the final trial.
    pub fn output(&self) -> &[f32] {
        &self.output
    }

    pub fn sample(&self) -> Sample<'_> {
        Sample(&self.output)
    }

    /// Writes the human-readable form of the report: a header naming the strategy followed by
    /// the mean time and a sample of the results.
    pub fn write_text(&self, output: &mut dyn Write) -> std::io::Result<()> {
        writeln!(output, "{} time and results:", self.strategy)?;
        writeln!(output, "{:.3}s, {}", self.avg_time, self.sample())
    }
}

impl fmt::Display for PerfReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{:?},{},{},{},{:18.15},{:18.15},{:18.15},{:18.15},{},{}",
            self.strategy.target(),
            self.strategy,
            self.nb_elems,
            self.iterations,
            self.trials,
            self.min_time,
            self.median_time,
            self.max_time,
            self.avg_time * 1e3,
            self.stddev_time,
            self.throughput,
        )
    }
}
