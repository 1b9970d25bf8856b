//! PCGP - Parallel CPU & GPU Profiling
//!
//! # About
//! PCGP times a deliberately trivial workload, an elementwise ceiling reapplied many times over a
//! buffer of 32-bit floats, across several execution strategies, to compare what offloading
//! costs and brings:
//! - a custom CUDA kernel, each GPU thread looping over its own element;
//! - a CUDA "array" path, where a single-pass ceiling primitive is launched repeatedly on a
//!   device-resident buffer;
//! - a custom OpenCL kernel, compiled from source at runtime;
//! - one worker process sharing the buffer with the caller through memory-mapped memory;
//! - host threads (using [`rayon`][1]);
//! - the calling thread alone.
//!
//! Each strategy is run for a number of trials and the average time is printed along with a
//! sample of the resulting buffer.
//!
//! # Quickstart
//! ## Pre-requisites
//! The CUDA strategies need the [NVIDIA CUDA driver][2], the OpenCL one an [OpenCL][3] library.
//! Host strategies run anywhere.
//!
//! ## Build
//! ```sh
//! cargo build --release
//! ```
//!
//! ## Example run
//! Running without arguments profiles the CUDA kernel, the CUDA array path, the worker process
//! and the sequential loop, 10 trials of 1000 iterations over 64 x 128 elements:
//! ```sh
//! cargo run --release
//!
//! CUDA time and results:
//! 0.004s, [0.0, 2.0, 3.0, ..., 8190.0, 8191.0, 8192.0]
//! CUDA Array time and results:
//! ...
//! ```
//!
//! To only profile host strategies, with CSV output:
//! ```sh
//! cargo run --release -- --strategies process threads sequential --format csv
//! ```
//!
//! Logs go to `stderr` and are controlled by `RUST_LOG` or `--log-level`.
//!
//! [1]: https://crates.io/crates/rayon
//! [2]: https://developer.nvidia.com/cuda-downloads
//! [3]: https://www.khronos.org/opencl/

pub mod cli;
pub mod config;
pub mod consts;
pub mod drivers;
pub mod error;
pub mod kernels;
pub mod perf_report;
pub mod utils;
