//! # Error Types
//!
//! This module defines the error type used throughout the crate.
//! All fallible operations return [`Result<T, BenchError>`](BenchError).
//!
//! Workload drivers never let a `BenchError` escape: they log it and turn it
//! into a zero byte contribution, so one broken input file cannot stop the
//! remaining benchmarks.

use thiserror::Error;

/// The error type for all harness, cipher, and container operations.
#[derive(Error, Debug)]
pub enum BenchError {
    /// I/O error while opening or reading an input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cipher operation failed.
    ///
    /// Covers wrong key or IV lengths, undersized output buffers, a missing
    /// final block, and corrupt padding.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// An atom could not be parsed or a required atom is missing.
    #[error("Atom error: {0}")]
    Atom(String),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// A positional test name outside the fixed vocabulary.
    #[error("unknown test name ({0})")]
    UnknownWorkload(String),

    /// OMA encryption method byte that this crate cannot decrypt.
    #[error("Unsupported encryption method: {0}")]
    UnsupportedEncryptionMethod(u8),

    /// Protection scheme other than OMA `odkm`.
    #[error("Unsupported protection scheme: {0}")]
    UnsupportedScheme(String),

    /// Sample index past the end of the track.
    ///
    /// This is the normal end-of-track signal for the sample loops.
    #[error("Sample index out of range: {0}")]
    SampleOutOfRange(u32),
}

impl BenchError {
    /// `true` when the error only signals that a track has no more samples.
    #[must_use]
    pub fn is_end_of_track(&self) -> bool {
        matches!(self, BenchError::SampleOutOfRange(_))
    }
}

impl From<BenchError> for std::io::Error {
    fn from(err: BenchError) -> Self {
        match err {
            BenchError::Io(inner) => inner,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}
