//! src/atom/sample_table.rs
//! Sample table atoms: `stsd`, `stsz`, `stsc`, `stco` / `co64`.

use crate::aliases::FourCc;
use crate::atom::parse::parse_children;
use crate::atom::read::{read_u16, read_u32, read_u64, read_version_and_flags, AtomHeader};
use crate::atom::Atom;
use crate::error::BenchError;
use std::io::{Read, Seek, SeekFrom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEntryCategory {
    Audio,
    Video,
    Other,
}

impl SampleEntryCategory {
    pub fn of(kind: &FourCc) -> Self {
        match kind {
            b"mp4a" | b"enca" | b"samr" | b"sawb" | b"ac-3" | b"ec-3" | b"alac" | b"Opus"
            | b"fLaC" | b".mp3" => SampleEntryCategory::Audio,
            b"avc1" | b"avc2" | b"avc3" | b"avc4" | b"encv" | b"hvc1" | b"hev1" | b"mp4v"
            | b"s263" | b"vp08" | b"vp09" | b"av01" | b"jpeg" => SampleEntryCategory::Video,
            _ => SampleEntryCategory::Other,
        }
    }

    /// Bytes between the data reference index and the first child atom.
    fn fixed_fields_size(self, audio_version: u16) -> u64 {
        match self {
            SampleEntryCategory::Audio => match audio_version {
                1 => 20 + 16,
                2 => 20 + 36,
                _ => 20,
            },
            SampleEntryCategory::Video => 70,
            SampleEntryCategory::Other => 0,
        }
    }
}

/// One entry of an `stsd` atom.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleEntry {
    pub kind: FourCc,
    pub category: SampleEntryCategory,
    pub data_reference_index: u16,
    /// Child atoms of audio and video entries (`esds`, `avcC`, `sinf`, ...).
    pub children: Vec<Atom>,
}

impl SampleEntry {
    fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
        depth: usize,
    ) -> Result<Self, BenchError> {
        let category = SampleEntryCategory::of(&header.kind);
        let mut reserved = [0u8; 6];
        reader.read_exact(&mut reserved)?;
        let data_reference_index = read_u16(reader)?;

        let mut children = Vec::new();
        if category != SampleEntryCategory::Other {
            let fields_start = reader.stream_position()?;
            let audio_version = if category == SampleEntryCategory::Audio {
                let version = read_u16(reader)?;
                reader.seek(SeekFrom::Start(fields_start))?;
                version
            } else {
                0
            };
            let children_start = fields_start + category.fixed_fields_size(audio_version);
            if children_start <= header.end() {
                reader.seek(SeekFrom::Start(children_start))?;
                children = parse_children(reader, header.end(), depth + 1)?;
            }
        }

        Ok(Self {
            kind: header.kind,
            category,
            data_reference_index,
            children,
        })
    }

    pub fn child(&self, kind: &FourCc) -> Option<&Atom> {
        self.children.iter().find(|atom| atom.kind() == *kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StsdAtom {
    pub entries: Vec<SampleEntry>,
}

impl StsdAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
        depth: usize,
    ) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        let entry_count = read_u32(reader)?;
        let mut entries = Vec::new();
        for index in 0..entry_count {
            let entry_header = AtomHeader::read(reader, header.end())?.ok_or_else(|| {
                BenchError::Atom(format!(
                    "stsd declares {entry_count} entries but ends after {index}"
                ))
            })?;
            entries.push(SampleEntry::parse(reader, &entry_header, depth)?);
            entry_header.skip_to_end(reader)?;
        }
        Ok(Self { entries })
    }
}

/// Refuse tables whose declared count cannot fit in the atom.
fn check_table_fits(
    count: u32,
    entry_size: u64,
    position: u64,
    header: &AtomHeader,
) -> Result<(), BenchError> {
    let remaining = header.end().saturating_sub(position);
    if u64::from(count) * entry_size > remaining {
        return Err(BenchError::Atom(format!(
            "'{}' declares {count} entries but holds only {remaining} bytes",
            crate::utils::fourcc_to_string(&header.kind)
        )));
    }
    Ok(())
}

/// `stsz`: sample sizes, either one constant or a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StszAtom {
    pub sample_size: u32,
    pub sample_count: u32,
    pub entries: Vec<u32>,
}

impl StszAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
    ) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        let sample_size = read_u32(reader)?;
        let sample_count = read_u32(reader)?;
        let mut entries = Vec::new();
        if sample_size == 0 {
            check_table_fits(sample_count, 4, reader.stream_position()?, header)?;
            entries.reserve(sample_count as usize);
            for _ in 0..sample_count {
                entries.push(read_u32(reader)?);
            }
        }
        Ok(Self {
            sample_size,
            sample_count,
            entries,
        })
    }

    pub fn size_of(&self, index: usize) -> Option<u32> {
        if self.sample_size != 0 {
            (index < self.sample_count as usize).then_some(self.sample_size)
        } else {
            self.entries.get(index).copied()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StscEntry {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_index: u32,
}

/// `stsc`: runs of chunks sharing a samples-per-chunk count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StscAtom {
    pub entries: Vec<StscEntry>,
}

impl StscAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
    ) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        let entry_count = read_u32(reader)?;
        check_table_fits(entry_count, 12, reader.stream_position()?, header)?;
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            entries.push(StscEntry {
                first_chunk: read_u32(reader)?,
                samples_per_chunk: read_u32(reader)?,
                sample_description_index: read_u32(reader)?,
            });
        }
        Ok(Self { entries })
    }
}

/// `stco` or `co64`: absolute chunk offsets, widened to 64 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StcoAtom {
    /// Parsed from `co64`.
    pub wide: bool,
    pub chunk_offsets: Vec<u64>,
}

impl StcoAtom {
    pub(crate) fn parse<R: Read + Seek>(
        reader: &mut R,
        header: &AtomHeader,
    ) -> Result<Self, BenchError> {
        read_version_and_flags(reader)?;
        let entry_count = read_u32(reader)?;
        let wide = &header.kind == b"co64";
        let entry_size = if wide { 8 } else { 4 };
        check_table_fits(entry_count, entry_size, reader.stream_position()?, header)?;
        let mut chunk_offsets = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            chunk_offsets.push(if wide {
                read_u64(reader)?
            } else {
                u64::from(read_u32(reader)?)
            });
        }
        Ok(Self {
            wide,
            chunk_offsets,
        })
    }
}
