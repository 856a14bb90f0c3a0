// src/bench/mod.rs

//! The benchmark harness: clock, runner, workloads, and reporting.
//!
//! [`run_workloads`] drives a whole selection in the fixed execution order.

pub mod cipher;
pub mod clock;
pub mod report;
pub mod runner;
pub mod samples;
pub mod workload;

pub use cipher::CipherWorkloads;
pub use clock::{Clock, MonotonicClock};
pub use report::{Report, RunResult};
pub use runner::Runner;
pub use samples::{load_all_samples, load_samples};
pub use workload::{TestFiles, Workload, WorkloadSelection};

use crate::config::BenchConfig;
use crate::error::BenchError;
use std::io::Write;

/// Run every selected workload once through `runner`, in execution order.
///
/// Returns the result of each workload that ran.
pub fn run_workloads<C: Clock, W: Write>(
    runner: &mut Runner<C, W>,
    selection: &WorkloadSelection,
    files: &TestFiles,
    config: &BenchConfig,
) -> Result<Vec<(Workload, RunResult)>, BenchError> {
    let mut ciphers = CipherWorkloads::new(config)?;
    let mut results = Vec::new();

    for workload in Workload::ALL {
        let enabled = selection.is_enabled(workload);
        let result = match files.path_for(workload) {
            Some(path) => runner.run(workload.label(), enabled, || {
                Ok(load_all_samples(path, config))
            }),
            None => runner.run(workload.label(), enabled, || {
                ciphers.run(workload).unwrap_or(Ok(0))
            }),
        };
        if let Some(result) = result {
            results.push((workload, result));
        }
    }
    Ok(results)
}
