//! src/packager/dcf.rs
//! DCF writer: a whole file encrypted into one `odrm` atom.

use crate::aliases::Iv16;
use crate::atom::{types, AtomWriter};
use crate::consts::AES_BLOCK_SIZE;
use crate::error::BenchError;
use crate::packager::encrypt::{OmaMethod, PayloadEncrypter};
use crate::packager::write_ohdr;

/// Encrypt `content` and wrap it as `ftyp(odcf)` + `odrm`.
pub fn wrap_dcf(
    content: &[u8],
    content_type: &str,
    method: OmaMethod,
    key: &[u8],
    iv: &Iv16,
) -> Result<Vec<u8>, BenchError> {
    let content_type_length = u8::try_from(content_type.len()).map_err(|_| {
        BenchError::Atom(format!("content type of {} bytes is too long", content_type.len()))
    })?;

    let mut payload = Vec::with_capacity(AES_BLOCK_SIZE + content.len() + AES_BLOCK_SIZE);
    payload.extend_from_slice(iv);
    PayloadEncrypter::new(method, key)?.encrypt(iv, content, &mut payload)?;

    let mut w = AtomWriter::new();
    w.begin(types::FTYP)
        .fourcc(types::BRAND_ODCF)
        .u32(2)
        .fourcc(types::BRAND_ODCF)
        .end()?;

    w.begin_full(types::ODRM, 0, 0);
    w.begin_full(types::ODHE, 0, 0)
        .u8(content_type_length)
        .bytes(content_type.as_bytes());
    write_ohdr(&mut w, method, content.len() as u64, "cid:mp4bench")?;
    w.end()?;
    w.begin_full(types::ODDA, 0, 0)
        .u64(payload.len() as u64)
        .bytes(&payload)
        .end()?;
    w.end()?;
    w.into_bytes()
}
