//! src/crypto/cbc.rs
//! AES-128 CBC over arbitrary-length buffers.
//!
//! Partial blocks are carried between calls. The final call pads (encrypt) or
//! strips and validates RFC 2630 padding (decrypt).

use crate::aliases::{Block16, Iv16};
use crate::consts::AES_BLOCK_SIZE;
use crate::crypto::block::{AesBlockCipher, CipherDirection};
use crate::error::BenchError;
use crate::utils::xor_blocks;

pub struct CbcStreamCipher {
    cipher: AesBlockCipher,
    chain_block: Block16,
    pending: Block16,
    pending_len: usize,
}

impl CbcStreamCipher {
    /// Wrap a block cipher. The chaining value starts as an all-zero IV.
    pub fn new(cipher: AesBlockCipher) -> Self {
        Self {
            cipher,
            chain_block: [0u8; 16],
            pending: [0u8; 16],
            pending_len: 0,
        }
    }

    pub fn direction(&self) -> CipherDirection {
        self.cipher.direction()
    }

    /// Restart the chain from `iv`, dropping any buffered partial block.
    pub fn set_iv(&mut self, iv: &Iv16) {
        self.chain_block = *iv;
        self.pending_len = 0;
    }

    /// Output bytes a call with `input_len` bytes may write at most.
    pub fn max_output_len(&self, input_len: usize, is_final: bool) -> usize {
        let blocks = (self.pending_len + input_len) / AES_BLOCK_SIZE;
        let padding = match (self.direction(), is_final) {
            (CipherDirection::Encrypt, true) => AES_BLOCK_SIZE,
            _ => 0,
        };
        blocks * AES_BLOCK_SIZE + padding
    }

    /// Process `input` into `output`, returning the number of bytes written.
    ///
    /// Non-final calls only emit whole blocks; leftovers wait for the next
    /// call. On the final call the encrypt side appends padding and the
    /// decrypt side removes it, so the final decrypt call must complete the
    /// last ciphertext block.
    pub fn process_buffer(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        is_final: bool,
    ) -> Result<usize, BenchError> {
        let needed = self.max_output_len(input.len(), is_final);
        if output.len() < needed {
            return Err(BenchError::Crypto(format!(
                "output buffer too small: {} < {needed}",
                output.len()
            )));
        }

        let mut written = 0;
        let mut rest = input;

        // top up a carried partial block first
        if self.pending_len > 0 {
            let take = rest.len().min(AES_BLOCK_SIZE - self.pending_len);
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&rest[..take]);
            self.pending_len += take;
            rest = &rest[take..];
            if self.pending_len == AES_BLOCK_SIZE {
                let block = self.pending;
                self.process_one(&block, &mut output[..AES_BLOCK_SIZE]);
                written += AES_BLOCK_SIZE;
                self.pending_len = 0;
            }
        }

        let mut chunks = rest.chunks_exact(AES_BLOCK_SIZE);
        for chunk in &mut chunks {
            let mut block = [0u8; 16];
            block.copy_from_slice(chunk);
            self.process_one(&block, &mut output[written..written + AES_BLOCK_SIZE]);
            written += AES_BLOCK_SIZE;
        }
        let tail = chunks.remainder();
        if !tail.is_empty() {
            self.pending[..tail.len()].copy_from_slice(tail);
            self.pending_len = tail.len();
        }

        if is_final {
            written = match self.direction() {
                CipherDirection::Encrypt => self.finish_encrypt(output, written),
                CipherDirection::Decrypt => self.finish_decrypt(output, written)?,
            };
        }
        Ok(written)
    }

    #[inline(always)]
    fn process_one(&mut self, block: &Block16, out: &mut [u8]) {
        let mut result = [0u8; 16];
        match self.direction() {
            CipherDirection::Encrypt => {
                let mut mixed = [0u8; 16];
                xor_blocks(block, &self.chain_block, &mut mixed);
                self.cipher.process_block(&mixed, &mut result);
                self.chain_block = result;
            }
            CipherDirection::Decrypt => {
                let mut decrypted = [0u8; 16];
                self.cipher.process_block(block, &mut decrypted);
                xor_blocks(&decrypted, &self.chain_block, &mut result);
                self.chain_block = *block;
            }
        }
        out.copy_from_slice(&result);
    }

    fn finish_encrypt(&mut self, output: &mut [u8], written: usize) -> usize {
        let pad = (AES_BLOCK_SIZE - self.pending_len) as u8;
        let mut block = self.pending;
        block[self.pending_len..].fill(pad);
        self.pending_len = 0;
        self.process_one(&block, &mut output[written..written + AES_BLOCK_SIZE]);
        written + AES_BLOCK_SIZE
    }

    fn finish_decrypt(&mut self, output: &[u8], written: usize) -> Result<usize, BenchError> {
        if self.pending_len != 0 {
            self.pending_len = 0;
            return Err(BenchError::Crypto(
                "ciphertext is not a multiple of the block size".into(),
            ));
        }
        if written < AES_BLOCK_SIZE {
            return Err(BenchError::Crypto("missing final ciphertext block".into()));
        }

        let last = &output[written - AES_BLOCK_SIZE..written];
        let padding = last[AES_BLOCK_SIZE - 1];
        if padding == 0 || padding as usize > AES_BLOCK_SIZE {
            return Err(BenchError::Crypto("invalid RFC 2630 padding".into()));
        }
        if last[AES_BLOCK_SIZE - padding as usize..]
            .iter()
            .any(|&b| b != padding)
        {
            return Err(BenchError::Crypto("corrupt RFC 2630 padding".into()));
        }
        Ok(written - padding as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 16] = [7u8; 16];

    fn pair() -> (CbcStreamCipher, CbcStreamCipher) {
        let enc = AesBlockCipher::new(CipherDirection::Encrypt, &KEY).unwrap();
        let dec = AesBlockCipher::new(CipherDirection::Decrypt, &KEY).unwrap();
        (CbcStreamCipher::new(enc), CbcStreamCipher::new(dec))
    }

    // NIST SP 800-38A F.2.1, first block
    #[test]
    fn sp800_38a_first_block() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv: Iv16 = hex::decode("000102030405060708090a0b0c0d0e0f")
            .unwrap()
            .try_into()
            .unwrap();
        let plain = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let expected = hex::decode("7649abac8119b246cee98e9b12e9197d").unwrap();

        let mut cbc =
            CbcStreamCipher::new(AesBlockCipher::new(CipherDirection::Encrypt, &key).unwrap());
        cbc.set_iv(&iv);
        let mut out = [0u8; 16];
        assert_eq!(cbc.process_buffer(&plain, &mut out, false).unwrap(), 16);
        assert_eq!(out.as_slice(), expected.as_slice());
    }

    #[test]
    fn odd_sized_pieces_round_trip() {
        let (mut enc, mut dec) = pair();
        let plain: Vec<u8> = (0..100u8).collect();

        let mut cipher = vec![0u8; 128];
        let mut n = enc.process_buffer(&plain[..7], &mut cipher, false).unwrap();
        n += enc.process_buffer(&plain[7..40], &mut cipher[n..], false).unwrap();
        n += enc.process_buffer(&plain[40..], &mut cipher[n..], true).unwrap();
        assert_eq!(n, 112);

        let mut back = vec![0u8; 112];
        let m = dec.process_buffer(&cipher[..n], &mut back, true).unwrap();
        assert_eq!(&back[..m], plain.as_slice());
    }

    #[test]
    fn final_decrypt_needs_a_block() {
        let (_, mut dec) = pair();
        let mut out = [0u8; 16];
        assert!(dec.process_buffer(&[], &mut out, true).is_err());
    }

    #[test]
    fn small_output_is_rejected() {
        let (mut enc, _) = pair();
        let mut out = [0u8; 16];
        assert!(enc.process_buffer(&[0u8; 16], &mut out, true).is_err());
    }
}
