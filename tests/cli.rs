use assert_cmd::prelude::*;
use predicates::prelude::*;

use std::process::Command;

fn pcgp() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pcgp"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn host_strategies_print_header_and_result_lines() {
    let line = r"[0-9]+\.[0-9]{3}s, \[0\.0, 2\.0, 3\.0, \.\.\., [0-9.]+, [0-9.]+, 8192\.0\]";
    let expected = format!(
        r"^Parallel CPU time and results:\n{line}\nCPU time and results:\n{line}\n$"
    );

    pcgp()
        .args(["--trials", "2", "--iterations", "5"])
        .args(["--strategies", "process", "sequential"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(expected).unwrap());
}

#[test]
fn csv_report_has_one_line_per_strategy() {
    let output = pcgp()
        .args(["-t", "2", "-i", "3", "-b", "4", "-n", "32", "-f", "csv"])
        .args(["-s", "threads", "sequential"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("target,strategy,elems,"));
    assert!(lines[1].starts_with("host,Threads,128,3,2,"));
    assert!(lines[2].starts_with("host,Sequential,128,3,2,"));
}

#[test]
fn report_goes_to_output_file() {
    let out = tempfile::NamedTempFile::new().unwrap();

    pcgp()
        .args(["-t", "1", "-i", "1", "-s", "sequential", "-o"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = std::fs::read_to_string(out.path()).unwrap();
    assert!(report.starts_with("CPU time and results:\n"));
}

#[test]
fn missing_worker_program_fails_the_run() {
    pcgp()
        .args(["-t", "1", "-i", "1", "-s", "process"])
        .args(["--worker-program", "/nonexistent/pcgp-worker"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to start worker process"));
}

#[test]
fn zero_trials_are_rejected() {
    pcgp().args(["--trials", "0"]).assert().failure();
}

#[test]
fn worker_inherits_log_level() {
    pcgp()
        .args(["-t", "1", "-i", "1", "-b", "1", "-n", "32", "-s", "process"])
        .args(["--log-level", "debug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("worker started"));

    pcgp()
        .args(["-t", "1", "-i", "1", "-b", "1", "-n", "32", "-s", "process"])
        .assert()
        .success()
        .stderr(predicate::str::contains("worker started").not());
}
