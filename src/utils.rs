// ============================================================================
// FILE: src/utils.rs
// ============================================================================

//! Utility functions used across the crate.

use crate::aliases::{FourCc, Key16};
use crate::consts::AES_128_KEY_SIZE;
use crate::error::BenchError;

/// Bytes per MB for throughput reporting.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// XORs two 16-byte blocks and writes the result to `output`.
///
/// Used by the CBC chaining on both the encrypt and decrypt side.
///
/// # Panics (by contract)
///
/// Panics if any slice is shorter than 16 bytes. Callers always pass whole
/// AES blocks.
#[inline(always)]
pub const fn xor_blocks(block_a: &[u8], block_b: &[u8], output: &mut [u8]) {
    let mut i = 0;
    while i < 16 {
        output[i] = block_a[i] ^ block_b[i];
        i += 1;
    }
}

/// Convert a byte count to MB (1 MB = 1 048 576 bytes).
#[inline]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Copy a 16-byte key out of a slice, rejecting any other length.
#[inline]
pub fn key_from_slice(key: &[u8]) -> Result<Key16, BenchError> {
    key.try_into().map_err(|_| {
        BenchError::Crypto(format!(
            "invalid key length {} (expected {AES_128_KEY_SIZE})",
            key.len()
        ))
    })
}

/// Printable form of an atom type code.
pub fn fourcc_to_string(fourcc: &FourCc) -> String {
    fourcc
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}
