//! src/crypto/block.rs
//! AES-128 single-block primitive, fixed to one direction at construction.

use crate::aliases::{Aes128Decryptor, Aes128Encryptor, Block16};
use crate::error::BenchError;
use crate::utils::key_from_slice;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Block as AesBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherDirection {
    Encrypt,
    Decrypt,
}

#[derive(Clone)]
enum BlockInner {
    Encrypt(Aes128Encryptor),
    Decrypt(Aes128Decryptor),
}

/// AES-128 block cipher bound to a key and a direction.
#[derive(Clone)]
pub struct AesBlockCipher {
    inner: BlockInner,
}

impl AesBlockCipher {
    /// Expand `key` (must be 16 bytes) for the given direction.
    pub fn new(direction: CipherDirection, key: &[u8]) -> Result<Self, BenchError> {
        let key = key_from_slice(key)?;
        let inner = match direction {
            CipherDirection::Encrypt => BlockInner::Encrypt(Aes128Encryptor::new(&key.into())),
            CipherDirection::Decrypt => BlockInner::Decrypt(Aes128Decryptor::new(&key.into())),
        };
        Ok(Self { inner })
    }

    pub fn direction(&self) -> CipherDirection {
        match self.inner {
            BlockInner::Encrypt(_) => CipherDirection::Encrypt,
            BlockInner::Decrypt(_) => CipherDirection::Decrypt,
        }
    }

    /// Transform one block from `input` into `output`.
    #[inline(always)]
    pub fn process_block(&self, input: &Block16, output: &mut Block16) {
        let mut aes_block = AesBlock::from(*input);
        match &self.inner {
            BlockInner::Encrypt(cipher) => cipher.encrypt_block(&mut aes_block),
            BlockInner::Decrypt(cipher) => cipher.decrypt_block(&mut aes_block),
        }
        output.copy_from_slice(aes_block.as_slice());
    }
}

impl std::fmt::Debug for AesBlockCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesBlockCipher")
            .field("direction", &self.direction())
            .finish()
    }
}
