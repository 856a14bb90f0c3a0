//! src/decryptor/dcf.rs
//! DCF (`odrm` wrapped) files: detection and a seekable plaintext view.
//!
//! The `odda` payload is a 16-byte IV followed by the ciphertext. CBC content
//! is padded per RFC 2630 when `ohdr` says so; CTR content uses the IV as the
//! initial counter block.

use crate::aliases::Iv16;
use crate::atom::read::read_exact_span;
use crate::atom::{types, Atom, OddaAtom, OhdrAtom};
use crate::consts::{
    AES_BLOCK_SIZE, OMA_ENCRYPTION_METHOD_AES_CBC, OMA_ENCRYPTION_METHOD_AES_CTR,
    OMA_ENCRYPTION_METHOD_NULL, OMA_PADDING_SCHEME_RFC_2630,
};
use crate::crypto::{AesBlockCipher, CbcStreamCipher, CipherDirection, CtrStreamCipher};
use crate::error::BenchError;
use std::io::{self, Read, Seek, SeekFrom};
use tracing::{debug, warn};

/// Ciphertext decrypted per refill. A multiple of the block size.
const REFILL_SIZE: u64 = 64 * 1024;

const BLOCK: u64 = AES_BLOCK_SIZE as u64;

/// Find the first usable `odrm` among `atoms` and wrap `source` with it.
///
/// Candidates missing `odhe/ohdr` or `odda`, and candidates stored with the
/// NULL method, are skipped. A candidate whose stream cannot be built (bad
/// method, key length, or payload) is skipped as well. `None` when nothing
/// qualifies.
pub fn create_dcf_decrypter<R: Read + Seek>(
    atoms: &[Atom],
    mut source: R,
    key: &[u8],
) -> Option<DecryptingStream<R>> {
    let candidates = atoms.iter().filter(|atom| atom.kind() == types::ODRM);
    for (index, odrm) in candidates.enumerate() {
        let Some(ohdr) = odrm.find(&[types::ODHE, types::OHDR]).and_then(Atom::as_ohdr) else {
            debug!(index, "odrm without odhe/ohdr, skipped");
            continue;
        };
        let Some(odda) = odrm.child(&types::ODDA).and_then(Atom::as_odda) else {
            debug!(index, "odrm without odda, skipped");
            continue;
        };
        if ohdr.encryption_method == OMA_ENCRYPTION_METHOD_NULL {
            debug!(index, "odrm stored in the clear, skipped");
            continue;
        }

        match DcfLayout::prepare(ohdr, odda, key, &mut source) {
            Ok(layout) => {
                debug!(
                    index,
                    method = ohdr.encryption_method,
                    plaintext_size = layout.plaintext_size,
                    "using odrm"
                );
                return Some(DecryptingStream::from_layout(source, layout));
            }
            Err(e) => warn!(index, "odrm rejected: {e}"),
        }
    }
    None
}

enum DcfCipher {
    Cbc(CbcStreamCipher),
    Ctr(CtrStreamCipher),
}

/// Everything needed to decrypt one `odda` payload.
struct DcfLayout {
    cipher: DcfCipher,
    iv: Iv16,
    padded: bool,
    ciphertext_offset: u64,
    ciphertext_size: u64,
    plaintext_size: u64,
}

impl DcfLayout {
    fn prepare<R: Read + Seek>(
        ohdr: &OhdrAtom,
        odda: &OddaAtom,
        key: &[u8],
        source: &mut R,
    ) -> Result<Self, BenchError> {
        if odda.encrypted_data_length < BLOCK {
            return Err(BenchError::Atom(format!(
                "odda payload of {} bytes has no room for an IV",
                odda.encrypted_data_length
            )));
        }
        source.seek(SeekFrom::Start(odda.data_offset))?;
        let iv: Iv16 = read_exact_span(source)?;
        let ciphertext_offset = odda.data_offset + BLOCK;
        let ciphertext_size = odda.encrypted_data_length - BLOCK;
        let padded = ohdr.padding_scheme == OMA_PADDING_SCHEME_RFC_2630;
        let declared = (ohdr.plaintext_length != 0).then_some(ohdr.plaintext_length);

        let (cipher, plaintext_size) = match ohdr.encryption_method {
            OMA_ENCRYPTION_METHOD_AES_CBC => {
                if ciphertext_size % BLOCK != 0 || (padded && ciphertext_size == 0) {
                    return Err(BenchError::Crypto(format!(
                        "CBC payload of {ciphertext_size} bytes is not whole blocks"
                    )));
                }
                let mut cbc =
                    CbcStreamCipher::new(AesBlockCipher::new(CipherDirection::Decrypt, key)?);
                let plaintext_size = match declared {
                    Some(size) => size,
                    None if padded => unpadded_size(
                        &mut cbc,
                        source,
                        &iv,
                        ciphertext_offset,
                        ciphertext_size,
                    )?,
                    None => ciphertext_size,
                };
                (DcfCipher::Cbc(cbc), plaintext_size)
            }
            OMA_ENCRYPTION_METHOD_AES_CTR => {
                let ctr = CtrStreamCipher::new(key, Some(&iv), AES_BLOCK_SIZE)?;
                (DcfCipher::Ctr(ctr), declared.unwrap_or(ciphertext_size))
            }
            other => return Err(BenchError::UnsupportedEncryptionMethod(other)),
        };

        if plaintext_size > ciphertext_size {
            return Err(BenchError::Atom(format!(
                "plaintext length {plaintext_size} exceeds ciphertext length {ciphertext_size}"
            )));
        }
        Ok(Self {
            cipher,
            iv,
            padded,
            ciphertext_offset,
            ciphertext_size,
            plaintext_size,
        })
    }
}

/// Plaintext size of padded CBC content, from its last block.
fn unpadded_size<R: Read + Seek>(
    cbc: &mut CbcStreamCipher,
    source: &mut R,
    iv: &Iv16,
    ciphertext_offset: u64,
    ciphertext_size: u64,
) -> Result<u64, BenchError> {
    let last_start = ciphertext_size - BLOCK;
    let chain: Iv16 = if last_start == 0 {
        *iv
    } else {
        source.seek(SeekFrom::Start(ciphertext_offset + last_start - BLOCK))?;
        read_exact_span(source)?
    };
    source.seek(SeekFrom::Start(ciphertext_offset + last_start))?;
    let last: [u8; AES_BLOCK_SIZE] = read_exact_span(source)?;

    cbc.set_iv(&chain);
    let mut out = [0u8; AES_BLOCK_SIZE];
    let kept = cbc.process_buffer(&last, &mut out, true)?;
    Ok(last_start + kept as u64)
}

/// Read-only, seekable plaintext view of a DCF payload.
///
/// Reads decrypt a window of up to 64 KiB around the current position, so
/// seeks anywhere in the content cost at most one refill.
pub struct DecryptingStream<R> {
    source: R,
    layout: DcfLayout,
    position: u64,
    window: Vec<u8>,
    window_start: u64,
    encrypted: Vec<u8>,
}

impl<R: Read + Seek> DecryptingStream<R> {
    /// Wrap `source` for the payload described by `ohdr` and `odda`.
    pub fn new(
        mut source: R,
        ohdr: &OhdrAtom,
        odda: &OddaAtom,
        key: &[u8],
    ) -> Result<Self, BenchError> {
        let layout = DcfLayout::prepare(ohdr, odda, key, &mut source)?;
        Ok(Self::from_layout(source, layout))
    }

    fn from_layout(source: R, layout: DcfLayout) -> Self {
        Self {
            source,
            layout,
            position: 0,
            window: Vec::new(),
            window_start: 0,
            encrypted: Vec::new(),
        }
    }

    /// Length of the decrypted content.
    pub fn plaintext_size(&self) -> u64 {
        self.layout.plaintext_size
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    fn window_holds(&self, position: u64) -> bool {
        position >= self.window_start && position < self.window_start + self.window.len() as u64
    }

    fn refill(&mut self) -> Result<(), BenchError> {
        let iv = self.layout.iv;
        let ciphertext_offset = self.layout.ciphertext_offset;
        let ciphertext_size = self.layout.ciphertext_size;

        match &mut self.layout.cipher {
            DcfCipher::Cbc(cbc) => {
                let start = self.position / BLOCK * BLOCK;
                let end = (start + REFILL_SIZE).min(ciphertext_size);
                let chain: Iv16 = if start == 0 {
                    iv
                } else {
                    self.source
                        .seek(SeekFrom::Start(ciphertext_offset + start - BLOCK))?;
                    read_exact_span(&mut self.source)?
                };
                self.source.seek(SeekFrom::Start(ciphertext_offset + start))?;
                self.encrypted.resize((end - start) as usize, 0);
                self.source.read_exact(&mut self.encrypted)?;

                let is_final = self.layout.padded && end == ciphertext_size;
                cbc.set_iv(&chain);
                self.window.resize(self.encrypted.len(), 0);
                let written = cbc.process_buffer(&self.encrypted, &mut self.window, is_final)?;
                self.window.truncate(written);
                self.window_start = start;
            }
            DcfCipher::Ctr(ctr) => {
                let start = self.position;
                let end = (start + REFILL_SIZE).min(self.layout.plaintext_size);
                self.source.seek(SeekFrom::Start(ciphertext_offset + start))?;
                self.encrypted.resize((end - start) as usize, 0);
                self.source.read_exact(&mut self.encrypted)?;

                ctr.set_iv(Some(&iv));
                ctr.seek(start)?;
                self.window.resize(self.encrypted.len(), 0);
                ctr.process_buffer(&self.encrypted, &mut self.window, false)?;
                self.window_start = start;
            }
        }

        let limit = self.layout.plaintext_size.saturating_sub(self.window_start);
        if self.window.len() as u64 > limit {
            self.window.truncate(limit as usize);
        }
        Ok(())
    }
}

impl<R: Read + Seek> Read for DecryptingStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.position >= self.layout.plaintext_size {
            return Ok(0);
        }
        if !self.window_holds(self.position) {
            self.refill()?;
            if !self.window_holds(self.position) {
                // declared plaintext length runs past the padded content
                return Ok(0);
            }
        }

        let offset = (self.position - self.window_start) as usize;
        let count = (self.window.len() - offset).min(buf.len());
        buf[..count].copy_from_slice(&self.window[offset..offset + count]);
        self.position += count as u64;
        Ok(count)
    }
}

impl<R: Read + Seek> Seek for DecryptingStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.layout.plaintext_size.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };
        let target = target.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before the start of the decrypted stream",
            )
        })?;
        self.position = target;
        Ok(target)
    }
}
