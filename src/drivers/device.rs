//! Device kernel drivers.
//!
//! This module implements the driver functions responsible for profiling the ceiling workload on
//! available devices (GPUs).
//!
//! # Crates used for calling kernels on a device
//! - [`cust`][1] for an ecosystem of libraries and tools enabling the launch of CUDA kernels from
//!   Rust;
//! - [`ocl`][2] for an idiomatic Rust implementation of OpenCL bindings.
//!
//! Both runtimes are built once per [`crate::drivers::Harness`] (context, loaded module or
//! compiled program, queue) and reused for every trial; their resources are released on drop.
//!
//! [1]: https://crates.io/crates/cust
//! [2]: https://crates.io/crates/ocl

use crate::{
    config::{BenchConfig, GridDims},
    error::Result,
    kernels::device::*,
    perf_report::*,
};

use cust::{
    event::{Event, EventFlags},
    function::{BlockSize, GridSize},
    launch,
    prelude::*,
};
use ocl::ProQue;
use tracing::{debug, info};

use std::time::Instant;

/// CUDA context, module and stream shared by the CUDA strategies.
pub struct CudaRuntime {
    // Field order matters: the stream and module must be released before the context
    stream: Stream,
    module: Module,
    _ctx: Context,
}

impl CudaRuntime {
    /// Initializes the CUDA context and loads the ceiling PTX module.
    pub fn new() -> Result<Self> {
        // Initialize CUDA context
        let ctx = cust::quick_init()?;

        // Create CUDA module from compiled PTX
        let module = Module::from_ptx(CUDA_CEIL_PTX, &[])?;

        // Create CUDA stream
        let stream = Stream::new(StreamFlags::NON_BLOCKING, None)?;

        info!("CUDA runtime ready");
        Ok(Self {
            stream,
            module,
            _ctx: ctx,
        })
    }

    /// Launch dimensions covering `grid.len()` elements, one per thread.
    fn dims(grid: GridDims) -> (GridSize, BlockSize) {
        (
            GridSize::x(grid.blocks),
            BlockSize::x(grid.threads_per_block),
        )
    }

    /// Times the recorded interval between two events, in seconds.
    fn elapsed(start: &Event, stop: &Event) -> Result<f64> {
        stop.synchronize()?;
        Ok(stop.elapsed_time_f32(start)? as f64 * 1e-3)
    }

    /// NVIDIA CUDA device driver for the custom kernel, each thread looping over its element.
    pub fn ceil_kernel(&self, config: &BenchConfig) -> Result<PerfReport> {
        let kernel = self.module.get_function(CUDA_CEIL_ITER.name())?;
        let stream = &self.stream;
        let (grid_size, block_size) = Self::dims(config.grid);
        let len = config.buffer_len();
        let iterations = config.iterations as i32;

        let start = Event::new(EventFlags::DEFAULT)?;
        let stop = Event::new(EventFlags::DEFAULT)?;

        // Measure execution time of kernel
        let mut durations = Vec::with_capacity(config.trials as usize);
        let mut h_values = vec![0.0_f32; len];
        for trial in 0..config.trials {
            let h_a = config.workload();

            // Create device-side vectors
            let d_a = DeviceBuffer::from_slice(&h_a)?;
            let d_values = DeviceBuffer::<f32>::zeroed(len)?;

            start.record(stream)?;
            unsafe {
                launch!(
                    kernel<<<grid_size, block_size, 0, stream>>>(
                        d_a.as_device_ptr(),
                        d_values.as_device_ptr(),
                        iterations,
                        len,
                    )
                )?;
            }
            stop.record(stream)?;
            let elapsed = Self::elapsed(&start, &stop)?;

            d_values.copy_to(&mut h_values)?;
            debug!(trial, elapsed, "CUDA kernel trial done");
            durations.push(elapsed);
        }

        Ok(PerfReport::new(
            Strategy::CudaKernel,
            len,
            config.iterations,
            &mut durations,
            h_values,
        ))
    }

    /// NVIDIA CUDA device driver for the array path: a single-pass ceiling primitive applied
    /// `iterations` times to a device-resident array, copied back to the host after the final
    /// trial only.
    pub fn ceil_array(&self, config: &BenchConfig) -> Result<PerfReport> {
        let kernel = self.module.get_function(CUDA_CEIL_INPLACE.name())?;
        let stream = &self.stream;
        let (grid_size, block_size) = Self::dims(config.grid);
        let len = config.buffer_len();

        let start = Event::new(EventFlags::DEFAULT)?;
        let stop = Event::new(EventFlags::DEFAULT)?;

        let mut durations = Vec::with_capacity(config.trials as usize);
        let mut h_a = Vec::new();
        for trial in 0..config.trials {
            h_a = config.workload();
            let d_a = DeviceBuffer::from_slice(&h_a)?;

            start.record(stream)?;
            for _ in 0..config.iterations {
                unsafe {
                    launch!(
                        kernel<<<grid_size, block_size, 0, stream>>>(
                            d_a.as_device_ptr(),
                            len,
                        )
                    )?;
                }
            }
            stop.record(stream)?;
            let elapsed = Self::elapsed(&start, &stop)?;

            if trial + 1 == config.trials {
                d_a.copy_to(&mut h_a)?;
            }
            debug!(trial, elapsed, "CUDA array trial done");
            durations.push(elapsed);
        }

        Ok(PerfReport::new(
            Strategy::CudaArray,
            len,
            config.iterations,
            &mut durations,
            h_a,
        ))
    }
}

/// OpenCL program-queue shared by the OpenCL strategies.
pub struct ClRuntime {
    pro_que: ProQue,
}

impl ClRuntime {
    /// Creates the OpenCL context and queue, and compiles the ceiling program for buffers of
    /// `grid.len()` elements.
    pub fn new(grid: GridDims) -> Result<Self> {
        // Create OpenCL program-queue object
        let pro_que = ProQue::builder()
            .src(CL_CEIL_ITER.source())
            .dims(grid.len())
            .build()?;

        info!(len = grid.len(), "OpenCL runtime ready");
        Ok(Self { pro_que })
    }

    /// OpenCL device driver for the custom kernel, timed by wall clock around enqueue and
    /// completion of the queue.
    pub fn ceil_kernel(&self, config: &BenchConfig) -> Result<PerfReport> {
        let pro_que = &self.pro_que;
        let len = config.buffer_len();

        let mut durations = Vec::with_capacity(config.trials as usize);
        let mut h_values = vec![0.0_f32; len];
        for trial in 0..config.trials {
            let h_a = config.workload();

            // Create device vectors
            let d_a = pro_que.buffer_builder().copy_host_slice(&h_a).build()?;
            let d_values = pro_que.create_buffer::<f32>()?;

            // Declare OpenCL kernel object
            let kernel = pro_que
                .kernel_builder(CL_CEIL_ITER.name())
                .arg(&d_a)
                .arg(&d_values)
                .arg(config.iterations as i32)
                .local_work_size(config.grid.threads_per_block as usize)
                .build()?;

            let dur = Instant::now();
            unsafe {
                kernel.enq()?;
            }
            pro_que.queue().finish()?;
            let elapsed = dur.elapsed().as_secs_f64();

            d_values.read(&mut h_values).enq()?;
            debug!(trial, elapsed, "OpenCL kernel trial done");
            durations.push(elapsed);
        }

        Ok(PerfReport::new(
            Strategy::ClKernel,
            len,
            config.iterations,
            &mut durations,
            h_values,
        ))
    }
}
