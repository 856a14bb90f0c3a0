//! src/atom/read.rs
//! Big-endian field readers and atom header parsing.

use crate::aliases::FourCc;
use crate::error::BenchError;
use std::io::{Read, Seek, SeekFrom};

/// Read exactly `N` bytes into a stack array.
#[inline(always)]
pub fn read_exact_span<R, const N: usize>(reader: &mut R) -> Result<[u8; N], BenchError>
where
    R: Read,
{
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(BenchError::Io)?;
    Ok(buf)
}

#[inline(always)]
pub fn read_u8<R: Read>(reader: &mut R) -> Result<u8, BenchError> {
    Ok(read_exact_span::<_, 1>(reader)?[0])
}

#[inline(always)]
pub fn read_u16<R: Read>(reader: &mut R) -> Result<u16, BenchError> {
    Ok(u16::from_be_bytes(read_exact_span(reader)?))
}

#[inline(always)]
pub fn read_u32<R: Read>(reader: &mut R) -> Result<u32, BenchError> {
    Ok(u32::from_be_bytes(read_exact_span(reader)?))
}

#[inline(always)]
pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64, BenchError> {
    Ok(u64::from_be_bytes(read_exact_span(reader)?))
}

#[inline(always)]
pub fn read_fourcc<R: Read>(reader: &mut R) -> Result<FourCc, BenchError> {
    read_exact_span(reader)
}

/// Read `len` bytes into a fresh vector, refusing lengths past `limit`.
pub fn read_vec<R: Read>(reader: &mut R, len: u64, limit: u64) -> Result<Vec<u8>, BenchError> {
    if len > limit {
        return Err(BenchError::Atom(format!(
            "field of {len} bytes exceeds the {limit} bytes left in its atom"
        )));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Version byte and 24-bit flags of a full atom.
#[inline(always)]
pub fn read_version_and_flags<R: Read>(reader: &mut R) -> Result<(u8, u32), BenchError> {
    let raw = read_u32(reader)?;
    Ok(((raw >> 24) as u8, raw & 0x00ff_ffff))
}

/// Position and extent of one atom in its source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomHeader {
    pub kind: FourCc,
    /// Absolute offset of the size field.
    pub offset: u64,
    /// 8, or 16 with a 64-bit size.
    pub header_size: u64,
    /// Total size including the header.
    pub size: u64,
}

impl AtomHeader {
    pub fn payload_size(&self) -> u64 {
        self.size - self.header_size
    }

    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// Read the header at the current position.
    ///
    /// Returns `Ok(None)` at a clean end of stream. `limit` is the end of the
    /// enclosing atom (or the stream length) and bounds the size field.
    pub fn read<R: Read + Seek>(reader: &mut R, limit: u64) -> Result<Option<Self>, BenchError> {
        let offset = reader.stream_position()?;
        if offset >= limit {
            return Ok(None);
        }
        if limit - offset < 8 {
            return Err(BenchError::Atom(format!(
                "truncated atom header at offset {offset}"
            )));
        }

        let size32 = read_u32(reader)?;
        let kind = read_fourcc(reader)?;
        let (header_size, size) = match size32 {
            0 => (8, limit - offset),
            1 => (16, read_u64(reader)?),
            n => (8, u64::from(n)),
        };

        let fits = offset.checked_add(size).is_some_and(|end| end <= limit);
        if size < header_size || !fits {
            return Err(BenchError::Atom(format!(
                "atom '{}' at offset {offset} has invalid size {size}",
                crate::utils::fourcc_to_string(&kind)
            )));
        }
        Ok(Some(Self {
            kind,
            offset,
            header_size,
            size,
        }))
    }

    /// Bytes between the reader position and the end of this atom.
    ///
    /// Fails when fixed fields have already been read past the end.
    pub fn bytes_left<R: Seek>(&self, reader: &mut R) -> Result<u64, BenchError> {
        let position = reader.stream_position()?;
        self.end().checked_sub(position).ok_or_else(|| {
            BenchError::Atom(format!(
                "'{}' at offset {} is too short for its fields ({} bytes)",
                crate::utils::fourcc_to_string(&self.kind),
                self.offset,
                self.size
            ))
        })
    }

    /// Move the reader to the first byte after this atom.
    pub fn skip_to_end<R: Seek>(&self, reader: &mut R) -> Result<(), BenchError> {
        reader.seek(SeekFrom::Start(self.end()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_compact_and_large_headers() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&12u32.to_be_bytes());
        bytes.extend_from_slice(b"free");
        bytes.extend_from_slice(&[0u8; 4]);
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(b"mdat");
        bytes.extend_from_slice(&20u64.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 4]);

        let len = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes);

        let first = AtomHeader::read(&mut cursor, len).unwrap().unwrap();
        assert_eq!(&first.kind, b"free");
        assert_eq!(first.size, 12);
        first.skip_to_end(&mut cursor).unwrap();

        let second = AtomHeader::read(&mut cursor, len).unwrap().unwrap();
        assert_eq!(&second.kind, b"mdat");
        assert_eq!(second.header_size, 16);
        assert_eq!(second.payload_size(), 4);
        second.skip_to_end(&mut cursor).unwrap();

        assert!(AtomHeader::read(&mut cursor, len).unwrap().is_none());
    }

    #[test]
    fn rejects_atom_past_parent() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&64u32.to_be_bytes());
        bytes.extend_from_slice(b"moov");
        let mut cursor = Cursor::new(bytes);
        assert!(AtomHeader::read(&mut cursor, 8).is_err());
    }
}
