//! # Constants
//!
//! This module defines the defaults for the benchmark configuration, the OMA
//! DRM enumerations, and the default input file names.

use crate::aliases::Key16;

/// Default time budget per workload, in seconds.
pub const DEFAULT_MAX_TIME_SECS: f64 = 30.0;

/// Default iteration cap per workload (effectively unbounded).
pub const DEFAULT_MAX_ITERATIONS: u64 = u64::MAX;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// AES-128 key length in bytes.
pub const AES_128_KEY_SIZE: usize = 16;

/// Block transforms performed by one block-cipher iteration.
pub const BLOCK_OPS_PER_ITERATION: usize = 16384;

/// Input buffer size for the CBC/CTR stream workloads (128 KiB).
pub const STREAM_BUFFER_SIZE: usize = 1024 * 128;

/// Extra output room for the stream workloads (padding headroom).
pub const STREAM_BUFFER_HEADROOM: usize = 32;

/// How many times each file workload walks every track per iteration.
pub const DEFAULT_SAMPLE_REPEATS: u32 = 16;

/// Counter width used by the CTR workload.
pub const DEFAULT_CTR_COUNTER_SIZE: usize = 16;

/// Key used by the five cipher workloads. Not a secret.
pub const DEFAULT_CIPHER_KEY: Key16 = [
    0xc4, 0x56, 0x09, 0xfb, 0xe6, 0xa5, 0xde, 0xfd, 0xb0, 0x23, 0x10, 0x06, 0x08, 0xbf, 0x3e, 0xbd,
];

/// Content key the DCF and PDCF test files are encrypted with.
pub const DEFAULT_CONTENT_KEY: Key16 = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];

// ─────────────────────────────────────────────────────────────────────────────
// Default input files
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_TEST_FILE_MP4: &str = "test-001.mp4";
pub const DEFAULT_TEST_FILE_DCF_CBC: &str = "test-001.mp4.cbc.odf";
pub const DEFAULT_TEST_FILE_DCF_CTR: &str = "test-001.mp4.ctr.odf";
pub const DEFAULT_TEST_FILE_PDCF_CBC: &str = "test-001.cbc.pdcf.mp4";
pub const DEFAULT_TEST_FILE_PDCF_CTR: &str = "test-001.ctr.pdcf.mp4";

// ─────────────────────────────────────────────────────────────────────────────
// OMA DRM (DCF / PDCF)
// ─────────────────────────────────────────────────────────────────────────────

/// `ohdr` encryption method: content stored in the clear.
pub const OMA_ENCRYPTION_METHOD_NULL: u8 = 0;
/// `ohdr` encryption method: AES-128 CBC.
pub const OMA_ENCRYPTION_METHOD_AES_CBC: u8 = 1;
/// `ohdr` encryption method: AES-128 CTR.
pub const OMA_ENCRYPTION_METHOD_AES_CTR: u8 = 2;

/// `ohdr` padding scheme: none.
pub const OMA_PADDING_SCHEME_NONE: u8 = 0;
/// `ohdr` padding scheme: RFC 2630 (PKCS#7 style).
pub const OMA_PADDING_SCHEME_RFC_2630: u8 = 1;

/// `schm` version written for the `odkm` scheme.
pub const OMA_ODKM_SCHEME_VERSION: u32 = 0x0000_0200;

/// `odaf` flag bit: each access unit carries a selective-encryption byte.
pub const OMA_ODAF_SELECTIVE_ENCRYPTION: u8 = 0x80;
