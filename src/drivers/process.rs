//! Process-parallel driver.
//!
//! The workload buffer lives in a shared mapping of a temporary file, placed on `tmpfs` when
//! available, and mapped by both the parent and one worker process (the `pcgp` executable,
//! started with the hidden `worker` subcommand). The worker is the only writer while the parent
//! blocks on its exit, so no further synchronization is needed. The region is unmapped and its
//! file removed when the buffer is dropped.

use crate::{
    config::BenchConfig,
    error::{BenchError, Result},
    kernels::host,
    perf_report::*,
};

use memmap2::MmapMut;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use std::{
    fs::OpenOptions,
    mem::size_of,
    path::Path,
    process::Command,
    time::Instant,
};

/// Memory-backed filesystem tried first for the shared region's file.
const SHM_DIR: &str = "/dev/shm";

/// Memory-mapped `f32` buffer shared with a worker process through its backing file.
struct SharedBuffer {
    mmap: MmapMut,
    len: usize,
    // Dropped after `mmap`, which removes the file
    file: NamedTempFile,
}

impl SharedBuffer {
    /// Creates a shared region holding a copy of `values`.
    fn from_slice(values: &[f32]) -> Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("pcgp-");
        let file = match builder.tempfile_in(SHM_DIR) {
            Ok(file) => file,
            Err(err) => {
                debug!(%err, "no shared memory filesystem, using the default temporary directory");
                builder.tempfile()?
            }
        };
        file.as_file().set_len(byte_len(values.len()))?;

        // SAFETY: the file was just created by us and is only resized by us, above.
        let mmap = unsafe { MmapMut::map_mut(file.as_file())? };

        let mut buffer = Self {
            mmap,
            len: values.len(),
            file,
        };
        buffer.as_mut_slice()?.copy_from_slice(values);
        Ok(buffer)
    }

    /// Path of the backing file, to hand over to the worker.
    fn path(&self) -> &Path {
        self.file.path()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn as_slice(&self) -> Result<&[f32]> {
        cast(&self.mmap[..], self.len)
    }

    fn as_mut_slice(&mut self) -> Result<&mut [f32]> {
        cast_mut(&mut self.mmap[..], self.len)
    }
}

fn byte_len(len: usize) -> u64 {
    (len * size_of::<f32>()) as u64
}

fn cast(bytes: &[u8], len: usize) -> Result<&[f32]> {
    // An empty mapping has no meaningful address to cast from
    if len == 0 {
        return Ok(Default::default());
    }
    bytemuck::try_cast_slice(&bytes[..len * size_of::<f32>()])
        .map_err(|e| BenchError::SharedBuffer(format!("{e:?}")))
}

fn cast_mut(bytes: &mut [u8], len: usize) -> Result<&mut [f32]> {
    if len == 0 {
        return Ok(Default::default());
    }
    bytemuck::try_cast_slice_mut(&mut bytes[..len * size_of::<f32>()])
        .map_err(|e| BenchError::SharedBuffer(format!("{e:?}")))
}

/// Process-parallel driver.
///
/// For each trial, a fresh buffer is placed in shared memory and one worker process is spawned
/// to apply the ceiling passes to it. The wall clock runs from spawn to worker exit. A worker that
/// cannot be started or that exits unsuccessfully fails the whole run.
pub fn ceil(config: &BenchConfig) -> Result<PerfReport> {
    let program = config.worker_program()?;
    info!(program = %program.display(), "process-parallel worker");

    let mut durations = Vec::with_capacity(config.trials as usize);
    let mut output = Vec::new();
    for trial in 0..config.trials {
        let shared = SharedBuffer::from_slice(&config.workload())?;

        let dur = Instant::now();
        spawn_worker(program, &shared, config)?;
        let elapsed = dur.elapsed().as_secs_f64();

        debug!(trial, elapsed, "trial done");
        durations.push(elapsed);
        output = shared.as_slice()?.to_vec();
    }

    Ok(PerfReport::new(
        Strategy::Process,
        config.buffer_len(),
        config.iterations,
        &mut durations,
        output,
    ))
}

/// Starts one worker on `shared` and blocks until it exits.
fn spawn_worker(program: &Path, shared: &SharedBuffer, config: &BenchConfig) -> Result<()> {
    let status = Command::new(program)
        .arg("--log-level")
        .arg(&config.log_level)
        .arg("worker")
        .arg("--buffer")
        .arg(shared.path())
        .arg("--len")
        .arg(shared.len().to_string())
        .arg("--iterations")
        .arg(config.iterations.to_string())
        .status()
        .map_err(|source| BenchError::WorkerSpawn {
            program: program.to_path_buf(),
            source,
        })?;

    if !status.success() {
        return Err(BenchError::WorkerFailed { status });
    }
    Ok(())
}

/// Worker entry point: maps the buffer at `path` and applies `iterations` ceiling passes to it.
///
/// Writes go to the shared pages, which the parent sees once the worker exits. Nothing is synced
/// to the backing file.
pub fn worker(path: &Path, len: usize, iterations: u32) -> Result<()> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    let file_len = file.metadata()?.len();
    if file_len < byte_len(len) {
        return Err(BenchError::SharedBuffer(format!(
            "`{}` holds {file_len} bytes, expected at least {}",
            path.display(),
            byte_len(len)
        )));
    }

    // SAFETY: the parent created this file for us and does not touch it until we exit.
    let mut mmap = unsafe { MmapMut::map_mut(&file)? };
    let values = cast_mut(&mut mmap[..], len)?;

    debug!(len, iterations, "worker started");
    host::ceil_passes(values, iterations);
    Ok(())
}
