//! src/decryptor/sample.rs
//! Per-sample decryption for OMA PDCF tracks.
//!
//! Sample layout: an optional selective-encryption byte (`odaf` flag), the
//! key indicator, the IV, then the ciphertext. An unset high bit in the
//! selective byte means the rest of the sample is in the clear.

use crate::aliases::Iv16;
use crate::consts::{
    AES_BLOCK_SIZE, OMA_ENCRYPTION_METHOD_AES_CBC, OMA_ENCRYPTION_METHOD_AES_CTR,
    OMA_ODAF_SELECTIVE_ENCRYPTION,
};
use crate::crypto::{AesBlockCipher, CbcStreamCipher, CipherDirection, CtrStreamCipher};
use crate::atom::types;
use crate::error::BenchError;
use crate::movie::ProtectedSampleDescription;
use crate::utils::fourcc_to_string;

/// Turns the stored bytes of one protected sample into its cleartext.
pub trait SampleDecrypter {
    /// Decrypt `input` into `output`, replacing its contents.
    fn decrypt_sample_data(&mut self, input: &[u8], output: &mut Vec<u8>)
        -> Result<(), BenchError>;
}

enum SampleCipher {
    Cbc(CbcStreamCipher),
    Ctr(CtrStreamCipher),
}

/// [`SampleDecrypter`] for the OMA `odkm` scheme, CBC or CTR.
pub struct OmaSampleDecrypter {
    cipher: SampleCipher,
    selective_encryption: bool,
    key_indicator_length: usize,
}

impl OmaSampleDecrypter {
    /// Build a decrypter for `description` keyed with `key`.
    ///
    /// Fails for schemes other than `odkm`, for missing `odkm/ohdr`, for
    /// methods other than CBC and CTR, for IVs that are not one block, and
    /// for keys that are not 16 bytes.
    pub fn create(description: &ProtectedSampleDescription, key: &[u8]) -> Result<Self, BenchError> {
        if description.scheme_type != types::SCHEME_ODKM {
            return Err(BenchError::UnsupportedScheme(fourcc_to_string(
                &description.scheme_type,
            )));
        }
        let info = description
            .scheme_info
            .as_ref()
            .ok_or_else(|| BenchError::Atom("odkm scheme without odkm/ohdr".into()))?;
        if usize::from(info.odaf.iv_length) != AES_BLOCK_SIZE {
            return Err(BenchError::Crypto(format!(
                "unsupported PDCF IV length {}",
                info.odaf.iv_length
            )));
        }

        let cipher = match info.ohdr.encryption_method {
            OMA_ENCRYPTION_METHOD_AES_CBC => SampleCipher::Cbc(CbcStreamCipher::new(
                AesBlockCipher::new(CipherDirection::Decrypt, key)?,
            )),
            OMA_ENCRYPTION_METHOD_AES_CTR => {
                SampleCipher::Ctr(CtrStreamCipher::new(key, None, AES_BLOCK_SIZE)?)
            }
            other => return Err(BenchError::UnsupportedEncryptionMethod(other)),
        };

        Ok(Self {
            cipher,
            selective_encryption: info.odaf.selective_encryption,
            key_indicator_length: usize::from(info.odaf.key_indicator_length),
        })
    }
}

impl SampleDecrypter for OmaSampleDecrypter {
    fn decrypt_sample_data(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
    ) -> Result<(), BenchError> {
        let mut data = input;
        if self.selective_encryption {
            let (&flags, rest) = data
                .split_first()
                .ok_or_else(|| BenchError::Crypto("empty selectively encrypted sample".into()))?;
            data = rest;
            if flags & OMA_ODAF_SELECTIVE_ENCRYPTION == 0 {
                output.clear();
                output.extend_from_slice(data);
                return Ok(());
            }
        }

        let header_size = self.key_indicator_length + AES_BLOCK_SIZE;
        if data.len() < header_size {
            return Err(BenchError::Crypto(format!(
                "sample of {} bytes is shorter than its {header_size}-byte header",
                data.len()
            )));
        }
        let mut iv: Iv16 = [0u8; 16];
        iv.copy_from_slice(&data[self.key_indicator_length..header_size]);
        let payload = &data[header_size..];

        match &mut self.cipher {
            SampleCipher::Cbc(cbc) => {
                if payload.is_empty() || payload.len() % AES_BLOCK_SIZE != 0 {
                    return Err(BenchError::Crypto(format!(
                        "CBC sample payload of {} bytes is not whole blocks",
                        payload.len()
                    )));
                }
                cbc.set_iv(&iv);
                output.resize(payload.len(), 0);
                let written = cbc.process_buffer(payload, output, true)?;
                output.truncate(written);
            }
            SampleCipher::Ctr(ctr) => {
                ctr.set_iv(Some(&iv));
                output.resize(payload.len(), 0);
                ctr.process_buffer(payload, output, true)?;
            }
        }
        Ok(())
    }
}
