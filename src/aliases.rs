//! # Type Aliases
//!
//! Fixed-size byte arrays used across the cipher and container layers.
//!
//! The harness keys are public benchmark constants, so these are plain arrays
//! rather than zeroizing wrappers.

use aes::{Aes128Dec, Aes128Enc};

// ─────────────────────────────────────────────────────────────────────────────
// Fixed-size buffers
// ─────────────────────────────────────────────────────────────────────────────

/// AES-128 key.
pub type Key16 = [u8; 16];

/// CBC initialization vector or CTR initial counter block.
pub type Iv16 = [u8; 16];

/// One AES block.
pub type Block16 = [u8; 16];

/// Four-character atom type code (`b"moov"`, `b"odrm"`, ...).
pub type FourCc = [u8; 4];

// ─────────────────────────────────────────────────────────────────────────────
// Block cipher primitives
// ─────────────────────────────────────────────────────────────────────────────

pub type Aes128Encryptor = Aes128Enc;
pub type Aes128Decryptor = Aes128Dec;

/// AES-128 in CTR mode with the whole 16-byte block as a big-endian counter.
pub type Aes128Ctr128 = ctr::Ctr128BE<aes::Aes128>;

/// AES-128 in CTR mode with the low 8 bytes as a big-endian counter.
pub type Aes128Ctr64 = ctr::Ctr64BE<aes::Aes128>;
