//! src/atom/write.rs
//! Atom serialization for the packager.
//!
//! Atoms are opened with [`AtomWriter::begin`] / [`AtomWriter::begin_full`]
//! and closed with [`AtomWriter::end`], which patches the 32-bit size field.

use crate::aliases::FourCc;
use crate::error::BenchError;
use crate::utils::fourcc_to_string;
use std::io::Write;

#[inline]
pub fn write_octets<W: Write>(writer: &mut W, data: &[u8]) -> Result<(), BenchError> {
    writer.write_all(data).map_err(BenchError::Io)
}

#[derive(Debug, Default)]
pub struct AtomWriter {
    buf: Vec<u8>,
    open: Vec<usize>,
}

impl AtomWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far, including unfinished atoms.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn begin(&mut self, kind: FourCc) -> &mut Self {
        self.open.push(self.buf.len());
        self.buf.extend_from_slice(&0u32.to_be_bytes());
        self.buf.extend_from_slice(&kind);
        self
    }

    pub fn begin_full(&mut self, kind: FourCc, version: u8, flags: u32) -> &mut Self {
        self.begin(kind);
        self.u32((u32::from(version) << 24) | (flags & 0x00ff_ffff))
    }

    /// Close the innermost open atom.
    pub fn end(&mut self) -> Result<&mut Self, BenchError> {
        let start = self
            .open
            .pop()
            .ok_or_else(|| BenchError::Atom("end() without an open atom".into()))?;
        let size = u32::try_from(self.buf.len() - start).map_err(|_| {
            BenchError::Atom(format!(
                "atom '{}' exceeds 4 GiB",
                fourcc_to_string(&self.buf[start + 4..start + 8].try_into().unwrap_or([0; 4]))
            ))
        })?;
        self.buf[start..start + 4].copy_from_slice(&size.to_be_bytes());
        Ok(self)
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn fourcc(&mut self, value: FourCc) -> &mut Self {
        self.bytes(&value)
    }

    pub fn zeros(&mut self, count: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + count, 0);
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Finished bytes; fails if an atom was left open.
    pub fn into_bytes(self) -> Result<Vec<u8>, BenchError> {
        if !self.open.is_empty() {
            return Err(BenchError::Atom(format!(
                "{} atom(s) left open",
                self.open.len()
            )));
        }
        Ok(self.buf)
    }
}
