//! src/atom/oma.rs
//! OMA DRM atoms: `odhe`, `ohdr`, `odda`, `odaf`.

use crate::atom::parse::parse_children;
use crate::atom::read::{
    read_u16, read_u64, read_u8, read_vec, read_version_and_flags, AtomHeader,
};
use crate::atom::Atom;
use crate::consts::OMA_ODAF_SELECTIVE_ENCRYPTION;
use crate::error::BenchError;
use std::io::{Read, Seek};

/// `odhe`: discrete headers, holding the content type and an `ohdr`.
#[derive(Debug, Clone, PartialEq)]
pub struct OdheAtom {
    pub content_type: String,
    pub children: Vec<Atom>,
}

impl OdheAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
        depth: usize,
    ) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        let len = read_u8(reader)?;
        let remaining = header.bytes_left(reader)?;
        let content_type = read_vec(reader, u64::from(len), remaining)?;
        let children = parse_children(reader, header.end(), depth + 1)?;
        Ok(Self {
            content_type: String::from_utf8_lossy(&content_type).into_owned(),
            children,
        })
    }
}

/// `ohdr`: how the payload is encrypted and how large the cleartext is.
#[derive(Debug, Clone, PartialEq)]
pub struct OhdrAtom {
    pub encryption_method: u8,
    pub padding_scheme: u8,
    pub plaintext_length: u64,
    pub content_id: String,
    pub rights_issuer_url: String,
    pub textual_headers: Vec<u8>,
    pub children: Vec<Atom>,
}

impl OhdrAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
        depth: usize,
    ) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        let encryption_method = read_u8(reader)?;
        let padding_scheme = read_u8(reader)?;
        let plaintext_length = read_u64(reader)?;
        let content_id_length = read_u16(reader)?;
        let rights_issuer_url_length = read_u16(reader)?;
        let textual_headers_length = read_u16(reader)?;

        let mut remaining = header.bytes_left(reader)?;
        let content_id = read_vec(reader, u64::from(content_id_length), remaining)?;
        remaining -= u64::from(content_id_length);
        let rights_issuer_url = read_vec(reader, u64::from(rights_issuer_url_length), remaining)?;
        remaining -= u64::from(rights_issuer_url_length);
        let textual_headers = read_vec(reader, u64::from(textual_headers_length), remaining)?;

        let children = parse_children(reader, header.end(), depth + 1)?;
        Ok(Self {
            encryption_method,
            padding_scheme,
            plaintext_length,
            content_id: String::from_utf8_lossy(&content_id).into_owned(),
            rights_issuer_url: String::from_utf8_lossy(&rights_issuer_url).into_owned(),
            textual_headers,
            children,
        })
    }
}

/// `odda`: the encrypted payload. Only its location is recorded; the bytes
/// stay in the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OddaAtom {
    pub encrypted_data_length: u64,
    /// Absolute offset of the first payload byte in the source stream.
    pub data_offset: u64,
}

impl OddaAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
    ) -> Result<Self, BenchError> {
        let (version, _) = read_version_and_flags(reader)?;
        if version != 0 {
            return Err(BenchError::Atom(format!("unsupported odda version {version}")));
        }
        let encrypted_data_length = read_u64(reader)?;
        let remaining = header.bytes_left(reader)?;
        if encrypted_data_length > remaining {
            return Err(BenchError::Atom(format!(
                "odda declares {encrypted_data_length} bytes but only {remaining} remain"
            )));
        }
        let data_offset = reader.stream_position()?;
        Ok(Self {
            encrypted_data_length,
            data_offset,
        })
    }
}

/// `odaf`: per-access-unit layout of PDCF samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OdafAtom {
    pub selective_encryption: bool,
    pub key_indicator_length: u8,
    pub iv_length: u8,
}

impl OdafAtom {
    pub(crate) fn parse<R: Read>(reader: &mut R) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        let flags = read_u8(reader)?;
        let key_indicator_length = read_u8(reader)?;
        let iv_length = read_u8(reader)?;
        Ok(Self {
            selective_encryption: flags & OMA_ODAF_SELECTIVE_ENCRYPTION != 0,
            key_indicator_length,
            iv_length,
        })
    }
}

impl Default for OdafAtom {
    fn default() -> Self {
        Self {
            selective_encryption: false,
            key_indicator_length: 0,
            iv_length: 16,
        }
    }
}
