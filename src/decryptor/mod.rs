// src/decryptor/mod.rs

//! OMA DRM decryption.
//!
//! DCF: [`create_dcf_decrypter`] finds the `odrm` wrapper and yields a
//! seekable plaintext stream. PDCF: [`OmaSampleDecrypter`] decrypts one
//! sample at a time.

pub mod dcf;
pub mod sample;

pub use dcf::{create_dcf_decrypter, DecryptingStream};
pub use sample::{OmaSampleDecrypter, SampleDecrypter};
