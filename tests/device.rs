//! Device strategies. These need a CUDA (or OpenCL) capable machine:
//! `cargo test --test device -- --ignored`.

use pcgp::{
    config::{BenchConfig, GridDims, InputKind},
    drivers::Harness,
    perf_report::Strategy,
};

fn config() -> BenchConfig {
    BenchConfig {
        trials: 3,
        iterations: 100,
        grid: GridDims::new(64, 128),
        input: InputKind::Random,
        ..Default::default()
    }
}

#[test]
#[ignore = "requires a CUDA device"]
fn cuda_strategies_match_sequential() {
    let mut harness = Harness::new(config()).unwrap();
    let reports = harness
        .run_all(&[Strategy::CudaKernel, Strategy::CudaArray, Strategy::Sequential])
        .unwrap();

    assert_eq!(reports[0].output(), reports[2].output());
    assert_eq!(reports[1].output(), reports[2].output());
    for report in &reports {
        assert!(report.mean_time().is_finite() && report.mean_time() >= 0.0);
    }
}

#[test]
#[ignore = "requires an OpenCL device"]
fn opencl_kernel_matches_sequential() {
    let mut harness = Harness::new(config()).unwrap();
    let reports = harness
        .run_all(&[Strategy::ClKernel, Strategy::Sequential])
        .unwrap();

    assert_eq!(reports[0].output(), reports[1].output());
}
