//! src/packager/encrypt.rs
//! Payload encryption shared by the DCF and PDCF writers.

use crate::aliases::Iv16;
use crate::consts::{
    OMA_ENCRYPTION_METHOD_AES_CBC, OMA_ENCRYPTION_METHOD_AES_CTR, OMA_PADDING_SCHEME_NONE,
    OMA_PADDING_SCHEME_RFC_2630,
};
use crate::crypto::{AesBlockCipher, CbcStreamCipher, CipherDirection, CtrStreamCipher};
use crate::error::BenchError;

/// OMA content encryption method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmaMethod {
    /// AES-128 CBC with RFC 2630 padding.
    AesCbc,
    /// AES-128 CTR with the IV as the initial counter block.
    AesCtr,
}

impl OmaMethod {
    /// `ohdr` encryption method byte.
    pub const fn code(self) -> u8 {
        match self {
            OmaMethod::AesCbc => OMA_ENCRYPTION_METHOD_AES_CBC,
            OmaMethod::AesCtr => OMA_ENCRYPTION_METHOD_AES_CTR,
        }
    }

    /// `ohdr` padding scheme byte.
    pub const fn padding_scheme(self) -> u8 {
        match self {
            OmaMethod::AesCbc => OMA_PADDING_SCHEME_RFC_2630,
            OmaMethod::AesCtr => OMA_PADDING_SCHEME_NONE,
        }
    }
}

enum PayloadCipher {
    Cbc(CbcStreamCipher),
    Ctr(CtrStreamCipher),
}

/// Encrypts whole payloads, restarting from a fresh IV each time.
pub struct PayloadEncrypter {
    cipher: PayloadCipher,
}

impl PayloadEncrypter {
    pub fn new(method: OmaMethod, key: &[u8]) -> Result<Self, BenchError> {
        let cipher = match method {
            OmaMethod::AesCbc => PayloadCipher::Cbc(CbcStreamCipher::new(AesBlockCipher::new(
                CipherDirection::Encrypt,
                key,
            )?)),
            OmaMethod::AesCtr => PayloadCipher::Ctr(CtrStreamCipher::new(key, None, 16)?),
        };
        Ok(Self { cipher })
    }

    /// Append the ciphertext of `plain` under `iv` to `out`.
    pub fn encrypt(&mut self, iv: &Iv16, plain: &[u8], out: &mut Vec<u8>) -> Result<(), BenchError> {
        let start = out.len();
        match &mut self.cipher {
            PayloadCipher::Cbc(cbc) => {
                cbc.set_iv(iv);
                out.resize(start + cbc.max_output_len(plain.len(), true), 0);
                let written = cbc.process_buffer(plain, &mut out[start..], true)?;
                out.truncate(start + written);
            }
            PayloadCipher::Ctr(ctr) => {
                ctr.set_iv(Some(iv));
                out.resize(start + plain.len(), 0);
                ctr.process_buffer(plain, &mut out[start..], true)?;
            }
        }
        Ok(())
    }
}
