//! Kernel implementations.
//!
//! This modules contains the actual implementation of the host kernels and the descriptors of the
//! device kernels.

pub mod device {
    //! Device kernel descriptors.

    /// Represents a device kernel.
    ///
    /// As there is no generic way of writing of function that will execute on an accelerator in
    /// Rust, kernels are written in the syntax of the target framework (OpenCL C or NVIDIA CUDA
    /// C++) in versioned files under `kernels/`, and their source (or pre-compiled PTX) is
    /// embedded as raw text.
    pub struct DeviceKernel {
        kernel_name: &'static str,
        kernel_source: &'static str,
    }

    impl DeviceKernel {
        /// Creates a `DeviceKernel` from a kernel name (actual name of the kernel function in the
        /// source code) and a kernel source code (generally a file's contents).
        pub const fn new(kernel_name: &'static str, kernel_source: &'static str) -> Self {
            Self {
                kernel_name,
                kernel_source,
            }
        }

        /// Returns the function name of the given kernel.
        pub fn name(&self) -> &'static str {
            self.kernel_name
        }

        /// Returns the source code for the given kernel.
        pub fn source(&self) -> &'static str {
            self.kernel_source
        }
    }

    /// PTX module shared by every CUDA ceiling kernel.
    pub const CUDA_CEIL_PTX: &str = include_str!("../kernels/cuda_cpp/ceil.ptx");

    /// CUDA kernel looping `iterations` times per thread (pre-compiled PTX).
    pub static CUDA_CEIL_ITER: DeviceKernel = DeviceKernel::new("ceil_iter", CUDA_CEIL_PTX);

    /// Single-pass in-place CUDA ceiling (pre-compiled PTX).
    pub static CUDA_CEIL_INPLACE: DeviceKernel =
        DeviceKernel::new("ceil_inplace", CUDA_CEIL_PTX);

    /// OpenCL kernel looping `iterations` times per work-item.
    pub static CL_CEIL_ITER: DeviceKernel =
        DeviceKernel::new("ceil_iter", include_str!("../kernels/opencl/ceil.cl"));

}

pub mod host {
    //! Host kernel implementations.
    //!
    //! The parallel implementation relies on the [`rayon`][1] crate.
    //!
    //! [1]: https://crates.io/crates/rayon

    use rayon::prelude::*;

    use crate::utils::BenchFloat;

    use std::hint::black_box;

    /// Number of elements handed to a `rayon` task at once.
    const PAR_CHUNK_LEN: usize = 1024;

    // Applies `iterations` whole-buffer ceiling passes (using iterators).
    pub fn ceil_passes<T: BenchFloat>(x: &mut [T], iterations: u32) {
        for _ in 0..iterations {
            x.iter_mut().for_each(|xi| *xi = xi.ceil());
            // Keep every pass: ceiling is idempotent and would otherwise be folded into one
            black_box(&mut *x);
        }
    }

    // Parallel implementation (using `rayon`'s parallel iterators), each task repeating the
    // passes on its own chunk.
    pub fn par_ceil_passes<T: BenchFloat>(x: &mut [T], iterations: u32) {
        x.par_chunks_mut(PAR_CHUNK_LEN)
            .for_each(|chunk| ceil_passes(chunk, iterations));
    }

}
