use pcgp::{
    config::{BenchConfig, GridDims, InputKind},
    drivers::Harness,
    perf_report::Strategy,
};

use std::path::PathBuf;

fn config(trials: u32, iterations: u32, input: InputKind) -> BenchConfig {
    BenchConfig {
        trials,
        iterations,
        grid: GridDims::new(64, 128),
        input,
        seed: 11,
        worker_program: Some(PathBuf::from(env!("CARGO_BIN_EXE_pcgp"))),
        log_level: "warn".into(),
    }
}

#[test]
fn ramp_end_to_end() {
    let config = config(1, 1, InputKind::Ramp);
    let input = config.workload();
    let report = Harness::new(config).unwrap().run_strategy(Strategy::Process).unwrap();

    let output = report.output();
    assert_eq!(output.len(), 8192);
    for (x, y) in input.iter().zip(output) {
        assert_eq!(x.ceil(), *y);
    }
    assert_eq!(output[0], 0.0);
    assert_eq!(output[8191], 8192.0);
    assert!(report.mean_time().is_finite() && report.mean_time() >= 0.0);
}

#[test]
fn worker_matches_in_process_strategies() {
    let mut harness = Harness::new(config(2, 20, InputKind::Random)).unwrap();
    let reports = harness
        .run_all(&[Strategy::Process, Strategy::Threads, Strategy::Sequential])
        .unwrap();

    assert_eq!(reports[0].output(), reports[1].output());
    assert_eq!(reports[0].output(), reports[2].output());
}

#[test]
fn more_trials_keep_the_same_output() {
    let one = Harness::new(config(1, 3, InputKind::Random))
        .unwrap()
        .run_strategy(Strategy::Process)
        .unwrap();
    let three = Harness::new(config(3, 3, InputKind::Random))
        .unwrap()
        .run_strategy(Strategy::Process)
        .unwrap();

    assert_eq!(one.output(), three.output());
    assert_eq!(three.trials(), 3);
}
