//! # Configuration
//!
//! [`BenchConfig`] carries the time and iteration budget plus the fixed keys
//! and buffer sizes the workloads use. Build customised values with
//! [`BenchConfigBuilder`](crate::builders::BenchConfigBuilder).

use crate::aliases::Key16;
use crate::consts::{
    BLOCK_OPS_PER_ITERATION, DEFAULT_CIPHER_KEY, DEFAULT_CONTENT_KEY, DEFAULT_MAX_ITERATIONS,
    DEFAULT_MAX_TIME_SECS, DEFAULT_SAMPLE_REPEATS, STREAM_BUFFER_HEADROOM, STREAM_BUFFER_SIZE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Time budget per workload, in seconds.
    pub max_time: f64,
    /// Iteration cap per workload.
    pub max_iterations: u64,
    /// Key for the block, CBC and CTR workloads.
    pub cipher_key: Key16,
    /// Content key for DCF and PDCF files.
    pub content_key: Key16,
    pub block_ops_per_iteration: usize,
    pub stream_buffer_size: usize,
    pub stream_headroom: usize,
    /// Passes over every track per file-workload iteration.
    pub sample_repeats: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            max_time: DEFAULT_MAX_TIME_SECS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            cipher_key: DEFAULT_CIPHER_KEY,
            content_key: DEFAULT_CONTENT_KEY,
            block_ops_per_iteration: BLOCK_OPS_PER_ITERATION,
            stream_buffer_size: STREAM_BUFFER_SIZE,
            stream_headroom: STREAM_BUFFER_HEADROOM,
            sample_repeats: DEFAULT_SAMPLE_REPEATS,
        }
    }
}

impl BenchConfig {
    /// Output buffer size for the stream workloads.
    #[must_use]
    pub fn stream_output_size(&self) -> usize {
        self.stream_buffer_size + self.stream_headroom
    }
}
