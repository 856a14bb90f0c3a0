//! src/builders/bench_config_builder.rs
//! Fluent construction of a validated [`BenchConfig`].

use crate::aliases::Key16;
use crate::config::BenchConfig;
use crate::consts::AES_BLOCK_SIZE;
use crate::error::BenchError;

/// Builder for [`BenchConfig`].
///
/// Starts from [`BenchConfig::default`]: 30 second budget, no iteration cap,
/// 16 sample passes.
#[derive(Debug, Clone, Default)]
pub struct BenchConfigBuilder {
    config: BenchConfig,
}

impl BenchConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time budget in seconds. Validated by [`build`](Self::build).
    #[must_use]
    pub fn with_max_time(mut self, seconds: f64) -> Self {
        self.config.max_time = seconds;
        self
    }

    /// Iteration cap. Zero runs no iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.config.max_iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_cipher_key(mut self, key: impl Into<Key16>) -> Self {
        self.config.cipher_key = key.into();
        self
    }

    #[must_use]
    pub fn with_content_key(mut self, key: impl Into<Key16>) -> Self {
        self.config.content_key = key.into();
        self
    }

    /// Block transforms per block-cipher iteration (minimum 1)
    #[must_use]
    pub fn with_block_ops_per_iteration(mut self, ops: usize) -> Self {
        self.config.block_ops_per_iteration = ops.max(1);
        self
    }

    /// Stream workload input size. Must be a non-zero multiple of 16.
    #[must_use]
    pub fn with_stream_buffer_size(mut self, size: usize) -> Self {
        self.config.stream_buffer_size = size;
        self
    }

    #[must_use]
    pub fn with_stream_headroom(mut self, headroom: usize) -> Self {
        self.config.stream_headroom = headroom;
        self
    }

    /// Passes over every track per iteration (minimum 1)
    #[must_use]
    pub fn with_sample_repeats(mut self, repeats: u32) -> Self {
        self.config.sample_repeats = repeats.max(1);
        self
    }

    /// Current iteration cap
    #[must_use]
    pub const fn max_iterations(&self) -> u64 {
        self.config.max_iterations
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<BenchConfig, BenchError> {
        let config = self.config;
        if config.max_time.is_nan() || config.max_time < 0.0 {
            return Err(BenchError::Config(format!(
                "max time must be a non-negative number of seconds, got {}",
                config.max_time
            )));
        }
        if config.stream_buffer_size == 0 || config.stream_buffer_size % AES_BLOCK_SIZE != 0 {
            return Err(BenchError::Config(format!(
                "stream buffer size {} is not a non-zero multiple of {AES_BLOCK_SIZE}",
                config.stream_buffer_size
            )));
        }
        Ok(config)
    }
}
