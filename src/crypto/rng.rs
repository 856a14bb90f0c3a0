// src/crypto/rng.rs
//! Random IVs for the packager.
//!
//! Uses a thread-local `OsRng`; only the write side needs fresh randomness.

use crate::error::BenchError;
use rand::{rngs::OsRng, TryRngCore};
use std::cell::RefCell;

/// Extension trait giving `.random()` to fixed-size byte arrays.
pub trait RandomBytesExt: Sized {
    /// Fill a new value from the operating system RNG.
    fn random() -> Result<Self, BenchError>;
}

thread_local! {
    static RNG: RefCell<OsRng> = const { RefCell::new(OsRng) };
}

impl<const N: usize> RandomBytesExt for [u8; N] {
    #[inline(always)]
    fn random() -> Result<Self, BenchError> {
        RNG.with(|rng_cell| {
            let mut bytes = [0u8; N];
            rng_cell
                .borrow_mut()
                .try_fill_bytes(&mut bytes)
                .map_err(|e| BenchError::Crypto(format!("OS RNG failure: {e}")))?;
            Ok(bytes)
        })
    }
}
