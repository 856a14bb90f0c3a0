//! tests/runner_tests.rs
//! Timing loop: budgets, disabled workloads, report output

mod common;
use common::StepClock;

use mp4bench::{BenchConfig, BenchConfigBuilder, BenchError, Runner};

#[test]
fn iteration_cap_stops_at_exactly_the_cap() {
    let config = BenchConfigBuilder::new()
        .with_max_iterations(1000)
        .build()
        .unwrap();
    // 1000 iterations take 1 simulated second, far below the 30 s budget
    let clock = StepClock::new(0.001);
    let mut runner = Runner::with_parts(&clock, Vec::new(), &config);

    let mut calls = 0u64;
    let result = runner
        .run("Capped", true, || {
            calls += 1;
            Ok(16)
        })
        .unwrap();

    assert_eq!(result.iterations, 1000);
    assert_eq!(calls, 1000);
    assert_eq!(result.total_bytes, 16_000);
}

#[test]
fn default_cap_runs_until_the_time_budget() {
    let config = BenchConfig {
        max_time: 2.0,
        ..BenchConfig::default()
    };
    let clock = StepClock::new(0.25);
    let mut runner = Runner::with_parts(&clock, Vec::new(), &config);

    let result = runner.run("Timed", true, || Ok(1)).unwrap();
    assert_eq!(result.iterations, 8);
    assert!(result.elapsed_seconds >= config.max_time);
    // the start reading plus one per iteration
    assert_eq!(clock.readings(), 9);
}

#[test]
fn iterations_never_exceed_the_cap() {
    for cap in [1u64, 2, 7, 50] {
        let config = BenchConfigBuilder::new()
            .with_max_iterations(cap)
            .with_max_time(1.0)
            .build()
            .unwrap();
        let clock = StepClock::new(0.125);
        let mut runner = Runner::with_parts(&clock, Vec::new(), &config);
        let result = runner.run("Bounded", true, || Ok(0)).unwrap();
        assert!(result.iterations <= cap);
        assert_eq!(result.iterations, cap.min(8));
    }
}

#[test]
fn disabled_workload_neither_runs_nor_reports() {
    let clock = StepClock::new(1.0);
    let mut runner = Runner::with_parts(&clock, Vec::new(), &BenchConfig::default());
    assert!(runner.run("Skipped", false, || Ok(1)).is_none());
    assert_eq!(clock.readings(), 0);
    assert!(runner.into_output().is_empty());
}

#[test]
fn errors_count_as_empty_iterations() {
    let config = BenchConfigBuilder::new()
        .with_max_iterations(3)
        .build()
        .unwrap();
    let clock = StepClock::new(0.5);
    let mut runner = Runner::with_parts(&clock, Vec::new(), &config);
    let result = runner
        .run("Broken", true, || Err(BenchError::Crypto("always fails".into())))
        .unwrap();
    assert_eq!(result.iterations, 3);
    assert_eq!(result.total_bytes, 0);
}

#[test]
fn report_line_has_six_decimals() {
    let config = BenchConfigBuilder::new()
        .with_max_iterations(4)
        .build()
        .unwrap();
    let clock = StepClock::new(0.5);
    let mut runner = Runner::with_parts(&clock, Vec::new(), &config);
    runner.run("AES Block Encryption", true, || Ok(262_144)).unwrap();

    let out = String::from_utf8(runner.into_output()).unwrap();
    assert_eq!(
        out,
        "AES Block Encryption: 0.500000 MB/s (1.000000 MB in 2.000000 seconds, 4 iterations)\n"
    );
}

#[test]
fn zero_cap_runs_nothing_but_still_reports() {
    let config = BenchConfigBuilder::new()
        .with_max_iterations(0)
        .build()
        .unwrap();
    let clock = StepClock::new(0.5);
    let mut runner = Runner::with_parts(&clock, Vec::new(), &config);

    let mut calls = 0u64;
    let result = runner
        .run("Zero cap", true, || {
            calls += 1;
            Ok(16)
        })
        .unwrap();
    assert_eq!(result.iterations, 0);
    assert_eq!(calls, 0);
    assert_eq!(result.total_bytes, 0);

    let out = String::from_utf8(runner.into_output()).unwrap();
    assert_eq!(out.lines().count(), 1);
    assert!(out.ends_with("0 iterations)\n"), "{out}");
}
