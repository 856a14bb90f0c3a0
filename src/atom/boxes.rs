//! src/atom/boxes.rs
//! Small fixed-layout atoms: `ftyp`, `tkhd`, `hdlr`, `schm`, `frma`.

use crate::aliases::FourCc;
use crate::atom::read::{read_fourcc, read_u32, read_u64, read_version_and_flags, AtomHeader};
use crate::error::BenchError;
use std::io::{Read, Seek};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtypAtom {
    pub major_brand: FourCc,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCc>,
}

impl FtypAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
    ) -> Result<Self, BenchError> {
        let major_brand = read_fourcc(reader)?;
        let minor_version = read_u32(reader)?;
        let mut compatible_brands = Vec::new();
        while header.bytes_left(reader)? >= 4 {
            compatible_brands.push(read_fourcc(reader)?);
        }
        Ok(Self {
            major_brand,
            minor_version,
            compatible_brands,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TkhdAtom {
    pub version: u8,
    pub track_id: u32,
}

impl TkhdAtom {
    pub(crate) fn parse<R: Read>(reader: &mut R) -> Result<Self, BenchError> {
        let (version, _) = read_version_and_flags(reader)?;
        // creation and modification times
        if version == 1 {
            read_u64(reader)?;
            read_u64(reader)?;
        } else {
            read_u32(reader)?;
            read_u32(reader)?;
        }
        let track_id = read_u32(reader)?;
        Ok(Self { version, track_id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdlrAtom {
    pub handler_type: FourCc,
    pub name: String,
}

impl HdlrAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
    ) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        read_u32(reader)?; // pre_defined
        let handler_type = read_fourcc(reader)?;
        let mut reserved = [0u8; 12];
        reader.read_exact(&mut reserved)?;

        let remaining = header.bytes_left(reader)?;
        let mut name = Vec::new();
        reader.by_ref().take(remaining).read_to_end(&mut name)?;
        if let Some(nul) = name.iter().position(|&b| b == 0) {
            name.truncate(nul);
        }
        Ok(Self {
            handler_type,
            name: String::from_utf8_lossy(&name).into_owned(),
        })
    }
}

/// `schm`: protection scheme type and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchmAtom {
    pub scheme_type: FourCc,
    pub scheme_version: u32,
}

impl SchmAtom {
    pub(crate) fn parse<R: Read>(reader: &mut R) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        Ok(Self {
            scheme_type: read_fourcc(reader)?,
            scheme_version: read_u32(reader)?,
        })
    }
}

/// `frma`: sample entry type before protection was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrmaAtom {
    pub original_format: FourCc,
}

impl FrmaAtom {
    pub(crate) fn parse<R: Read>(reader: &mut R) -> Result<Self, BenchError> {
        Ok(Self {
            original_format: read_fourcc(reader)?,
        })
    }
}
