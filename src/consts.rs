//! Crate-level constants.

use crate::perf_report::Strategy;

/// Default number of trials averaged together for each strategy.
pub const TRIALS: u32 = 10;

/// Default number of times the ceiling operation is reapplied within one trial.
pub const ITERATIONS: u32 = 1000;

/// Default number of thread blocks in the device grid.
pub const BLOCKS: u32 = 64;

/// Default number of threads per block.
pub const THREADS_PER_BLOCK: u32 = 128;

/// Default seed used when the workload buffer is filled with random values.
pub const SEED: u64 = 0;

/// Number of leading and trailing elements kept when displaying an output sample.
pub const EDGE_ITEMS: usize = 3;

/// Default log filter, used when `RUST_LOG` is unset.
pub const LOG_LEVEL: &str = "warn";

/// Strategies run when none are given on the command-line, in execution order.
pub const DEFAULT_STRATEGIES: [Strategy; 4] = [
    Strategy::CudaKernel,
    Strategy::CudaArray,
    Strategy::Process,
    Strategy::Sequential,
];
