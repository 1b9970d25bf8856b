//! Harness configuration.
//!
//! [`BenchConfig`] gathers everything a run depends on (trial and iteration counts, grid shape,
//! workload contents) so that the harness never reads global state. It is built once from the
//! command-line (see [`crate::cli`]) and handed to [`crate::drivers::Harness`].

use crate::{
    cli::CliArgs,
    consts,
    error::{BenchError, Result},
    utils::{linspace, rand_vector},
};

use std::path::{Path, PathBuf};

/// Shape of the device grid, which also defines the workload buffer length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    /// Number of thread blocks.
    pub blocks: u32,
    /// Number of threads per block.
    pub threads_per_block: u32,
}

impl GridDims {
    pub const fn new(blocks: u32, threads_per_block: u32) -> Self {
        Self {
            blocks,
            threads_per_block,
        }
    }

    /// Total number of elements, one per device thread.
    pub fn len(&self) -> usize {
        self.blocks as usize * self.threads_per_block as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::new(consts::BLOCKS, consts::THREADS_PER_BLOCK)
    }
}

/// Initial contents of the workload buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InputKind {
    /// Linear ramp from `0` to the buffer length, end point included.
    #[default]
    Ramp,
    /// Seeded uniform values in `[0, len)`.
    Random,
}

/// Configuration of a benchmark run.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    /// Number of measured trials per strategy.
    pub trials: u32,
    /// Ceiling passes per trial.
    pub iterations: u32,
    pub grid: GridDims,
    pub input: InputKind,
    pub seed: u64,
    /// Program spawned by the process-parallel strategy. Must accept the hidden `worker`
    /// subcommand; set to the running executable when built from the command-line.
    pub worker_program: Option<PathBuf>,
    /// Log filter handed over to worker processes.
    pub log_level: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trials: consts::TRIALS,
            iterations: consts::ITERATIONS,
            grid: GridDims::default(),
            input: InputKind::default(),
            seed: consts::SEED,
            worker_program: None,
            log_level: consts::LOG_LEVEL.to_string(),
        }
    }
}

impl BenchConfig {
    /// Checks that every count is positive and that `iterations` fits a C `int`, as it is passed
    /// as such to the device kernels.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(BenchError::InvalidConfig("trials must be positive".into()));
        }
        if self.iterations == 0 || self.iterations > i32::MAX as u32 {
            return Err(BenchError::InvalidConfig(format!(
                "iterations must be in 1..={}, got {}",
                i32::MAX,
                self.iterations
            )));
        }
        if self.grid.is_empty() {
            return Err(BenchError::InvalidConfig(
                "blocks and threads per block must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Number of elements in the workload buffer.
    pub fn buffer_len(&self) -> usize {
        self.grid.len()
    }

    /// Builds a fresh workload buffer. Identical configurations always yield identical buffers.
    pub fn workload(&self) -> Vec<f32> {
        let len = self.buffer_len();
        match self.input {
            InputKind::Ramp => linspace(len),
            InputKind::Random => rand_vector(len, self.seed),
        }
    }

    /// Program used as the process-parallel worker.
    pub fn worker_program(&self) -> Result<&Path> {
        self.worker_program.as_deref().ok_or_else(|| {
            BenchError::InvalidConfig(
                "the process-parallel strategy needs a worker program".into(),
            )
        })
    }
}

impl TryFrom<&CliArgs> for BenchConfig {
    type Error = BenchError;

    fn try_from(args: &CliArgs) -> Result<Self> {
        let config = Self {
            trials: args.trials,
            iterations: args.iterations,
            grid: GridDims::new(args.blocks, args.threads_per_block),
            input: args.input,
            seed: args.seed,
            worker_program: match args.worker_program {
                Some(ref program) => Some(program.clone()),
                None => Some(std::env::current_exe()?),
            },
            log_level: args.log_level.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[test]
    fn defaults_are_valid() {
        let config = BenchConfig::default();
        config.validate().unwrap();
        assert_eq!(config.buffer_len(), 64 * 128);
        assert_eq!(config.trials, 10);
        assert_eq!(config.iterations, 1000);
    }

    #[test]
    fn rejects_zero_counts() {
        let zero_trials = BenchConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_trials.validate(),
            Err(BenchError::InvalidConfig(_))
        ));

        let zero_iterations = BenchConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(zero_iterations.validate().is_err());

        let empty_grid = BenchConfig {
            grid: GridDims::new(0, 128),
            ..Default::default()
        };
        assert!(empty_grid.validate().is_err());
    }

    #[test]
    fn rejects_iterations_above_c_int() {
        let config = BenchConfig {
            iterations: i32::MAX as u32 + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn workload_is_reproducible() {
        let config = BenchConfig {
            input: InputKind::Random,
            seed: 42,
            grid: GridDims::new(4, 32),
            ..Default::default()
        };
        assert_eq!(config.workload(), config.workload());
        assert_eq!(config.workload().len(), 128);
    }

    #[test]
    fn no_worker_program_by_default() {
        assert!(matches!(
            BenchConfig::default().worker_program(),
            Err(BenchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn command_line_defaults_to_running_executable() {
        let args = CliArgs::try_parse_from(["pcgp", "--log-level", "debug"]).unwrap();
        let config = BenchConfig::try_from(&args).unwrap();
        assert_eq!(
            config.worker_program().unwrap(),
            std::env::current_exe().unwrap()
        );
        assert_eq!(config.log_level, "debug");

        let args = CliArgs::try_parse_from(["pcgp", "--worker-program", "/opt/pcgp"]).unwrap();
        let config = BenchConfig::try_from(&args).unwrap();
        assert_eq!(config.worker_program().unwrap(), Path::new("/opt/pcgp"));
    }
}
