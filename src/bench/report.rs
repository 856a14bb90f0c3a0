//! src/bench/report.rs
//! Run totals and the one-line throughput report.

use crate::utils::bytes_to_mb;
use std::fmt;

/// Totals of one workload run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunResult {
    pub total_bytes: u64,
    pub elapsed_seconds: f64,
    pub iterations: u64,
}

impl RunResult {
    pub fn megabytes(&self) -> f64 {
        bytes_to_mb(self.total_bytes)
    }

    /// MB per second. Not finite when no time elapsed.
    pub fn throughput_mbps(&self) -> f64 {
        self.megabytes() / self.elapsed_seconds
    }
}

/// `<label>: <mbps> MB/s (<mb> MB in <seconds> seconds, <n> iterations)`
pub struct Report<'a> {
    pub label: &'a str,
    pub result: &'a RunResult,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.6} MB/s ({:.6} MB in {:.6} seconds, {} iterations)",
            self.label,
            self.result.throughput_mbps(),
            self.result.megabytes(),
            self.result.elapsed_seconds,
            self.result.iterations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format() {
        let result = RunResult {
            total_bytes: 3 * 1024 * 1024,
            elapsed_seconds: 1.5,
            iterations: 12,
        };
        let line = Report {
            label: "AES CTR Stream",
            result: &result,
        }
        .to_string();
        assert_eq!(
            line,
            "AES CTR Stream: 2.000000 MB/s (3.000000 MB in 1.500000 seconds, 12 iterations)"
        );
    }

    #[test]
    fn zero_elapsed_is_not_masked() {
        let result = RunResult {
            total_bytes: 16,
            elapsed_seconds: 0.0,
            iterations: 1,
        };
        assert!(result.throughput_mbps().is_infinite());
        assert!(RunResult::default().throughput_mbps().is_nan());
    }
}
