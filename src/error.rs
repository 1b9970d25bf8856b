//! Error types.
//!
//! Every failure originates from the execution environment (device runtimes, the worker process,
//! the shared-memory region) and is fatal to the run: there is no retry and no fallback to another
//! strategy.

use std::{io, path::PathBuf, process::ExitStatus};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CUDA error: {0}")]
    Cuda(#[from] cust::error::CudaError),

    #[error("OpenCL error: {0}")]
    OpenCl(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to start worker process `{}`: {source}", program.display())]
    WorkerSpawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("worker process exited unsuccessfully ({status})")]
    WorkerFailed { status: ExitStatus },

    #[error("shared buffer error: {0}")]
    SharedBuffer(String),
}

// `ocl::Error` is only guaranteed to be `Display`, so it is kept as its rendered message.
impl From<ocl::Error> for BenchError {
    fn from(err: ocl::Error) -> Self {
        Self::OpenCl(err.to_string())
    }
}
