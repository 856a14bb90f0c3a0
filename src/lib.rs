// src/lib.rs

pub mod aliases;
pub mod atom;
pub mod bench;
pub mod builders;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod decryptor;
pub mod error;
pub mod movie;
pub mod packager;
pub mod utils;

// High-level API: what the benchmarktest binary drives
pub use bench::{
    load_all_samples, load_samples, run_workloads, CipherWorkloads, RunResult, Runner, TestFiles,
    Workload, WorkloadSelection,
};
pub use builders::BenchConfigBuilder;
pub use config::BenchConfig;
pub use error::BenchError;

// Container and DRM layers, for callers that inspect files directly
pub use decryptor::{create_dcf_decrypter, DecryptingStream};
pub use movie::{Mp4File, SampleSource};
pub use packager::{write_test_files, IvSource};
