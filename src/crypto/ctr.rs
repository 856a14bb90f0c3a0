//! src/crypto/ctr.rs
//! AES-128 counter mode on top of the RustCrypto `ctr` crate.

use crate::aliases::{Aes128Ctr128, Aes128Ctr64, Iv16, Key16};
use crate::error::BenchError;
use crate::utils::key_from_slice;
use ctr::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};

enum CtrInner {
    Counter128(Aes128Ctr128),
    Counter64(Aes128Ctr64),
}

impl CtrInner {
    fn new(key: &Key16, iv: &Iv16, counter_size: usize) -> Self {
        match counter_size {
            8 => CtrInner::Counter64(Aes128Ctr64::new(key.into(), iv.into())),
            _ => CtrInner::Counter128(Aes128Ctr128::new(key.into(), iv.into())),
        }
    }
}

/// AES-128 CTR stream cipher.
///
/// `counter_size` is how many trailing bytes of the counter block increment:
/// 16 (whole block) or 8 (low half, high half is a fixed nonce).
pub struct CtrStreamCipher {
    key: Key16,
    counter_size: usize,
    inner: CtrInner,
}

impl CtrStreamCipher {
    /// `iv == None` starts from an all-zero counter block.
    pub fn new(key: &[u8], iv: Option<&Iv16>, counter_size: usize) -> Result<Self, BenchError> {
        if counter_size != 8 && counter_size != 16 {
            return Err(BenchError::Crypto(format!(
                "unsupported CTR counter size {counter_size} (expected 8 or 16)"
            )));
        }
        let key = key_from_slice(key)?;
        let iv = iv.copied().unwrap_or([0u8; 16]);
        Ok(Self {
            key,
            counter_size,
            inner: CtrInner::new(&key, &iv, counter_size),
        })
    }

    pub fn counter_size(&self) -> usize {
        self.counter_size
    }

    /// Restart the keystream at `iv` (all zeros when `None`).
    pub fn set_iv(&mut self, iv: Option<&Iv16>) {
        let iv = iv.copied().unwrap_or([0u8; 16]);
        self.inner = CtrInner::new(&self.key, &iv, self.counter_size);
    }

    /// Position the keystream `offset` bytes past the current IV.
    pub fn seek(&mut self, offset: u64) -> Result<(), BenchError> {
        let result = match &mut self.inner {
            CtrInner::Counter128(c) => c.try_seek(offset),
            CtrInner::Counter64(c) => c.try_seek(offset),
        };
        result.map_err(|_| BenchError::Crypto(format!("CTR seek to {offset} out of range")))
    }

    /// XOR `input` with the keystream into `output`; returns `input.len()`.
    ///
    /// CTR needs no padding, so `is_final` only exists to match the CBC call
    /// shape.
    pub fn process_buffer(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        _is_final: bool,
    ) -> Result<usize, BenchError> {
        if output.len() < input.len() {
            return Err(BenchError::Crypto(format!(
                "output buffer too small: {} < {}",
                output.len(),
                input.len()
            )));
        }
        let out = &mut output[..input.len()];
        let result = match &mut self.inner {
            CtrInner::Counter128(c) => c.apply_keystream_b2b(input, out),
            CtrInner::Counter64(c) => c.apply_keystream_b2b(input, out),
        };
        result.map_err(|_| BenchError::Crypto("CTR keystream exhausted".into()))?;
        Ok(input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A F.5.1, first block
    #[test]
    fn sp800_38a_first_block() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv: Iv16 = hex::decode("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff")
            .unwrap()
            .try_into()
            .unwrap();
        let plain = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let expected = hex::decode("874d6191b620e3261bef6864990db6ce").unwrap();

        let mut ctr = CtrStreamCipher::new(&key, Some(&iv), 16).unwrap();
        let mut out = [0u8; 16];
        ctr.process_buffer(&plain, &mut out, false).unwrap();
        assert_eq!(out.as_slice(), expected.as_slice());
    }

    #[test]
    fn seek_matches_sequential() {
        let key = [3u8; 16];
        let data = [0u8; 64];

        let mut sequential = CtrStreamCipher::new(&key, None, 16).unwrap();
        let mut full = [0u8; 64];
        sequential.process_buffer(&data, &mut full, false).unwrap();

        let mut seeking = CtrStreamCipher::new(&key, None, 16).unwrap();
        seeking.seek(37).unwrap();
        let mut tail = [0u8; 27];
        seeking.process_buffer(&data[37..], &mut tail, false).unwrap();
        assert_eq!(&full[37..], &tail[..]);
    }

    #[test]
    fn rejects_odd_counter_size() {
        assert!(CtrStreamCipher::new(&[0u8; 16], None, 4).is_err());
    }
}
