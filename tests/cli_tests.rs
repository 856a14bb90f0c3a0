//! tests/cli_tests.rs
//! The benchmarktest binary: usage, name validation, and a short real run

use assert_cmd::Command;
use predicates::prelude::*;

fn benchmarktest() -> Command {
    Command::cargo_bin("benchmarktest").unwrap()
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    benchmarktest()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("aes-block-encrypt"))
        .stdout(predicate::str::contains("read-samples-pdcf-ctr"));
}

#[test]
fn unknown_test_name_is_rejected_before_running() {
    benchmarktest()
        .args(["aes-ctr-stream", "bogus"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown test name (bogus)"));
}

#[test]
fn unknown_option_is_an_error_with_exit_code_one() {
    benchmarktest()
        .args(["--test-file-foo=x", "aes-ctr-stream"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("ERROR: "));
}

#[test]
fn non_numeric_iterations_fail() {
    benchmarktest()
        .args(["--iterations=abc", "aes-ctr-stream"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn options_without_test_names_print_usage() {
    benchmarktest()
        .arg("--iterations=3")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Test names:"));
}

#[test]
fn writes_test_files_and_runs_selected_workloads() {
    let dir = tempfile::tempdir().unwrap();
    let output = benchmarktest()
        .arg(format!("--write-test-files={}", dir.path().display()))
        .args(["--iterations=2", "--repeats=1", "read-samples", "aes-ctr-stream"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    // execution order, not argument order
    assert_eq!(lines.len(), 2, "{stdout}");
    assert!(lines[0].starts_with("AES CTR Stream: "));
    assert!(lines[1].starts_with("Read Samples: "));
    assert!(lines.iter().all(|l| l.ends_with(", 2 iterations)")));

    for name in [
        "test-001.mp4",
        "test-001.mp4.cbc.odf",
        "test-001.mp4.ctr.odf",
        "test-001.cbc.pdcf.mp4",
        "test-001.ctr.pdcf.mp4",
    ] {
        assert!(dir.path().join(name).is_file(), "{name} missing");
    }
}

#[test]
fn write_test_files_alone_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    benchmarktest()
        .arg(format!("--write-test-files={}", dir.path().display()))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(dir.path().join("test-001.mp4").is_file());
}

#[test]
fn missing_input_file_reports_zero_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.mp4");
    benchmarktest()
        .arg(format!("--test-file-mp4={}", missing.display()))
        .args(["--iterations=1", "read-samples"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Read Samples: "))
        .stdout(predicate::str::contains("(0.000000 MB in"));
}
