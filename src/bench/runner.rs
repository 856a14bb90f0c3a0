//! src/bench/runner.rs
//! The timing loop shared by every workload.

use crate::bench::clock::{Clock, MonotonicClock};
use crate::bench::report::{Report, RunResult};
use crate::config::BenchConfig;
use crate::error::BenchError;
use std::io::{self, Write};
use tracing::{debug, error, warn};

/// Runs one closure under a time and iteration budget and reports the
/// throughput to `out`.
pub struct Runner<C = MonotonicClock, W = io::Stdout> {
    clock: C,
    out: W,
    max_time: f64,
    max_iterations: u64,
}

impl Runner {
    /// Monotonic clock, reports on stdout.
    pub fn new(config: &BenchConfig) -> Self {
        Self::with_parts(MonotonicClock::new(), io::stdout(), config)
    }
}

impl<C: Clock, W: Write> Runner<C, W> {
    pub fn with_parts(clock: C, out: W, config: &BenchConfig) -> Self {
        Self {
            clock,
            out,
            max_time: config.max_time,
            max_iterations: config.max_iterations,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Time repeated calls of `f` and print one report line.
    ///
    /// Disabled workloads return `None` without touching the clock or the
    /// output. The iteration cap is checked before the time budget, and the
    /// last call may overshoot the budget. A failing call is logged and
    /// counts as an iteration of zero bytes.
    pub fn run<F>(&mut self, label: &str, enabled: bool, mut f: F) -> Option<RunResult>
    where
        F: FnMut() -> Result<u64, BenchError>,
    {
        if !enabled {
            return None;
        }

        let start = self.clock.now();
        let mut result = RunResult::default();
        while result.iterations < self.max_iterations && result.elapsed_seconds < self.max_time {
            match f() {
                Ok(bytes) => result.total_bytes += bytes,
                Err(e) => error!(workload = label, "{e}"),
            }
            result.iterations += 1;
            result.elapsed_seconds = self.clock.now() - start;
        }

        if result.elapsed_seconds <= 0.0 {
            warn!(
                workload = label,
                iterations = result.iterations,
                "no measurable time elapsed; throughput is not finite"
            );
        }
        debug!(
            workload = label,
            bytes = result.total_bytes,
            iterations = result.iterations,
            "run finished"
        );

        let report = Report {
            label,
            result: &result,
        };
        if let Err(e) = writeln!(self.out, "{report}").and_then(|()| self.out.flush()) {
            error!(workload = label, "cannot write report: {e}");
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Advances by `step` seconds on every reading.
    struct SteppingClock {
        now: Cell<f64>,
        step: f64,
    }

    impl Clock for SteppingClock {
        fn now(&self) -> f64 {
            let now = self.now.get();
            self.now.set(now + self.step);
            now
        }
    }

    fn runner(step: f64, config: &BenchConfig) -> Runner<SteppingClock, Vec<u8>> {
        let clock = SteppingClock {
            now: Cell::new(0.0),
            step,
        };
        Runner::with_parts(clock, Vec::new(), config)
    }

    #[test]
    fn disabled_run_does_nothing() {
        let mut runner = runner(1.0, &BenchConfig::default());
        let mut calls = 0;
        let result = runner.run("Off", false, || {
            calls += 1;
            Ok(1)
        });
        assert!(result.is_none());
        assert_eq!(calls, 0);
        assert!(runner.into_output().is_empty());
    }

    #[test]
    fn time_budget_stops_the_loop() {
        let config = BenchConfig {
            max_time: 3.0,
            ..BenchConfig::default()
        };
        let mut runner = runner(1.0, &config);
        let result = runner.run("Timed", true, || Ok(10)).unwrap();
        assert_eq!(result.iterations, 3);
        assert_eq!(result.total_bytes, 30);
        assert_eq!(result.elapsed_seconds, 3.0);
    }

    #[test]
    fn failed_iterations_count_zero_bytes() {
        let mut runner = runner(
            1.0,
            &BenchConfig {
                max_iterations: 4,
                ..BenchConfig::default()
            },
        );
        let mut n = 0u64;
        let result = runner
            .run("Flaky", true, || {
                n += 1;
                if n % 2 == 0 {
                    Err(BenchError::Crypto("boom".into()))
                } else {
                    Ok(100)
                }
            })
            .unwrap();
        assert_eq!(result.iterations, 4);
        assert_eq!(result.total_bytes, 200);

        let out = String::from_utf8(runner.into_output()).unwrap();
        assert!(out.starts_with("Flaky: "));
        assert!(out.ends_with(", 4 iterations)\n"));
    }
}
