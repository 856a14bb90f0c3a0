// src/crypto/mod.rs

//! AES-128 primitives driven by the cipher workloads and the OMA decrypters.
//!
//! - [`AesBlockCipher`]: one block in, one block out.
//! - [`CbcStreamCipher`]: chained blocks over arbitrary-length buffers with
//!   RFC 2630 padding on the final call.
//! - [`CtrStreamCipher`]: counter mode with 8- or 16-byte counters and seeking.

pub mod block;
pub mod cbc;
pub mod ctr;
#[cfg(feature = "rand")]
pub mod rng;

pub use block::{AesBlockCipher, CipherDirection};
pub use cbc::CbcStreamCipher;
pub use ctr::CtrStreamCipher;
