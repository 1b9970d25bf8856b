//! Command-Line Interface related code.
//!
//! This module handles the parsing of CLI arguments using the [`clap`][1] crate.
//! It defines the available runtime options and the hidden `worker` subcommand used by the
//! process-parallel strategy.
//!
//! [1]: https://crates.io/crates/clap

use crate::{config::InputKind, consts, perf_report::Strategy};

use clap::{Parser, Subcommand, ValueEnum};

use std::path::PathBuf;

/// Parallel CPU and GPU processing benchmark.
///
/// Times a repeated elementwise ceiling over a ramp of 32-bit floats on the GPU (CUDA, OpenCL),
/// in a spawned worker process sharing memory with this one, and sequentially, then prints the
/// average time of each strategy along with a sample of its results.
#[derive(Clone, Debug, Parser)]
pub struct CliArgs {
    /// Number of trials averaged for each strategy.
    #[arg(
        short,
        long,
        value_name = "TRIALS",
        default_value_t = consts::TRIALS,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub trials: u32,

    /// Number of times the ceiling is reapplied within a trial.
    #[arg(
        short,
        long,
        value_name = "ITERATIONS",
        default_value_t = consts::ITERATIONS,
        value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64),
    )]
    pub iterations: u32,

    /// Number of thread blocks in the device grid.
    #[arg(
        short,
        long,
        default_value_t = consts::BLOCKS,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub blocks: u32,

    /// Number of threads per block. The buffer holds `blocks * threads_per_block` elements.
    #[arg(
        short = 'n',
        long,
        default_value_t = consts::THREADS_PER_BLOCK,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub threads_per_block: u32,

    /// Strategies to run, in order.
    #[arg(
        short,
        long,
        value_enum,
        num_args = 1..,
        default_values_t = consts::DEFAULT_STRATEGIES,
    )]
    pub strategies: Vec<Strategy>,

    /// Initial contents of the workload buffer.
    #[arg(long, value_enum, default_value_t = InputKind::Ramp)]
    pub input: InputKind,

    /// Seed for the random number generator (RNG), used with `--input random`.
    #[arg(long, value_name = "SEED", default_value_t = consts::SEED)]
    pub seed: u64,

    /// Report format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Output file, defaults to `stdout` if unspecified.
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset (e.g. `info`, `pcgp=debug`).
    #[arg(long, value_name = "FILTER", default_value = consts::LOG_LEVEL)]
    pub log_level: String,

    /// Program spawned by the process-parallel strategy, defaults to this executable.
    #[arg(long, hide = true)]
    pub worker_program: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Cmd>,
}

/// Report formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header line per strategy, then `<mean>s, <sample>`.
    Text,
    /// One CSV line per strategy with detailed statistics.
    Csv,
}

/// Internal subcommands.
#[derive(Clone, Debug, PartialEq, Subcommand)]
pub enum Cmd {
    /// Process-parallel worker: applies the ceiling passes to a shared buffer.
    #[command(hide = true)]
    Worker {
        /// Path of the memory-mapped buffer file.
        #[arg(long)]
        buffer: PathBuf,
        /// Number of `f32` elements in the buffer.
        #[arg(long)]
        len: usize,
        /// Ceiling passes to apply.
        #[arg(long)]
        iterations: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_use_defaults() {
        let args = CliArgs::try_parse_from(["pcgp"]).unwrap();
        assert_eq!(args.trials, consts::TRIALS);
        assert_eq!(args.iterations, consts::ITERATIONS);
        assert_eq!(args.strategies, consts::DEFAULT_STRATEGIES.to_vec());
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.command.is_none());
    }

    #[test]
    fn strategies_keep_given_order() {
        let args =
            CliArgs::try_parse_from(["pcgp", "-s", "sequential", "cl-kernel", "process"]).unwrap();
        assert_eq!(
            args.strategies,
            vec![Strategy::Sequential, Strategy::ClKernel, Strategy::Process]
        );
    }

    #[test]
    fn zero_trials_are_rejected() {
        assert!(CliArgs::try_parse_from(["pcgp", "--trials", "0"]).is_err());
    }

    #[test]
    fn worker_subcommand_parses() {
        let args = CliArgs::try_parse_from([
            "pcgp",
            "worker",
            "--buffer",
            "/tmp/buf",
            "--len",
            "16",
            "--iterations",
            "3",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Cmd::Worker {
                buffer: PathBuf::from("/tmp/buf"),
                len: 16,
                iterations: 3,
            })
        );
    }
}
