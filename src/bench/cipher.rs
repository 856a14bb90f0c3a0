//! src/bench/cipher.rs
//! The five cipher workloads: one call is one timed iteration.

use crate::aliases::Block16;
use crate::bench::workload::Workload;
use crate::config::BenchConfig;
use crate::consts::{AES_BLOCK_SIZE, DEFAULT_CTR_COUNTER_SIZE};
use crate::crypto::{AesBlockCipher, CbcStreamCipher, CipherDirection, CtrStreamCipher};
use crate::error::BenchError;
use std::hint::black_box;

/// Cipher handles and scratch buffers, allocated once and reused by every
/// iteration.
pub struct CipherWorkloads {
    block_encrypt: AesBlockCipher,
    block_decrypt: AesBlockCipher,
    cbc_encrypt: CbcStreamCipher,
    cbc_decrypt: CbcStreamCipher,
    ctr: CtrStreamCipher,
    block_ops: usize,
    input: Vec<u8>,
    output: Vec<u8>,
}

impl CipherWorkloads {
    pub fn new(config: &BenchConfig) -> Result<Self, BenchError> {
        let key = &config.cipher_key;
        Ok(Self {
            block_encrypt: AesBlockCipher::new(CipherDirection::Encrypt, key)?,
            block_decrypt: AesBlockCipher::new(CipherDirection::Decrypt, key)?,
            cbc_encrypt: CbcStreamCipher::new(AesBlockCipher::new(CipherDirection::Encrypt, key)?),
            cbc_decrypt: CbcStreamCipher::new(AesBlockCipher::new(CipherDirection::Decrypt, key)?),
            ctr: CtrStreamCipher::new(key, None, DEFAULT_CTR_COUNTER_SIZE)?,
            block_ops: config.block_ops_per_iteration,
            input: vec![0u8; config.stream_buffer_size],
            output: vec![0u8; config.stream_output_size()],
        })
    }

    /// Bytes one stream iteration consumes.
    pub fn stream_buffer_size(&self) -> usize {
        self.input.len()
    }

    /// Run one iteration of a cipher workload. `None` for sample workloads.
    pub fn run(&mut self, workload: Workload) -> Option<Result<u64, BenchError>> {
        let result = match workload {
            Workload::AesBlockEncrypt => Ok(self.block_encrypt()),
            Workload::AesBlockDecrypt => Ok(self.block_decrypt()),
            Workload::AesCbcStreamEncrypt => self.cbc_encrypt(),
            Workload::AesCbcStreamDecrypt => self.cbc_decrypt(),
            Workload::AesCtrStream => self.ctr(),
            _ => return None,
        };
        Some(result)
    }

    pub fn block_encrypt(&mut self) -> u64 {
        Self::blocks(&self.block_encrypt, self.block_ops)
    }

    pub fn block_decrypt(&mut self) -> u64 {
        Self::blocks(&self.block_decrypt, self.block_ops)
    }

    #[inline(always)]
    fn blocks(cipher: &AesBlockCipher, ops: usize) -> u64 {
        let block_in: Block16 = [0u8; 16];
        let mut block_out: Block16 = [0u8; 16];
        for _ in 0..ops {
            cipher.process_block(black_box(&block_in), &mut block_out);
            black_box(&mut block_out);
        }
        (ops * AES_BLOCK_SIZE) as u64
    }

    /// One non-final CBC call over the whole input buffer.
    pub fn cbc_encrypt(&mut self) -> Result<u64, BenchError> {
        let written = self
            .cbc_encrypt
            .process_buffer(&self.input, &mut self.output, false)?;
        Ok(written as u64)
    }

    pub fn cbc_decrypt(&mut self) -> Result<u64, BenchError> {
        let written = self
            .cbc_decrypt
            .process_buffer(&self.input, &mut self.output, false)?;
        Ok(written as u64)
    }

    pub fn ctr(&mut self) -> Result<u64, BenchError> {
        let written = self.ctr.process_buffer(&self.input, &mut self.output, false)?;
        Ok(written as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::BenchConfigBuilder;

    #[test]
    fn every_iteration_reports_the_buffer_size() {
        let config = BenchConfigBuilder::new()
            .with_block_ops_per_iteration(8)
            .with_stream_buffer_size(4096)
            .build()
            .unwrap();
        let mut workloads = CipherWorkloads::new(&config).unwrap();
        for _ in 0..3 {
            assert_eq!(workloads.block_encrypt(), 128);
            assert_eq!(workloads.block_decrypt(), 128);
            assert_eq!(workloads.cbc_encrypt().unwrap(), 4096);
            assert_eq!(workloads.cbc_decrypt().unwrap(), 4096);
            assert_eq!(workloads.ctr().unwrap(), 4096);
        }
        assert!(workloads.run(Workload::ReadSamples).is_none());
    }

    #[test]
    fn undersized_output_is_an_error_not_a_panic() {
        let config = BenchConfig {
            stream_buffer_size: 64,
            stream_headroom: 0,
            ..BenchConfig::default()
        };
        let mut workloads = CipherWorkloads::new(&config).unwrap();
        workloads.output.truncate(32);
        assert!(workloads.cbc_encrypt().is_err());
        assert!(workloads.ctr().is_err());
    }
}
