//! # Builders
//!
//! Fluent builders with defaults and validation.
//!
//! ## Modules
//!
//! - [`bench_config_builder`] - Builder for [`BenchConfig`](crate::config::BenchConfig)

pub mod bench_config_builder;

pub use bench_config_builder::BenchConfigBuilder;
