//! src/movie/track.rs
//! Tracks, sample descriptions, and the resolved sample table.

use crate::aliases::FourCc;
use crate::atom::{
    types, Atom, OdafAtom, OhdrAtom, SampleEntry, SampleEntryCategory, StcoAtom, StscAtom,
    StszAtom,
};
use crate::error::BenchError;
use crate::utils::fourcc_to_string;
use std::io::{Read, Seek, SeekFrom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
    Hint,
    Text,
    Other,
}

impl TrackKind {
    pub fn from_handler(handler_type: &FourCc) -> Self {
        match *handler_type {
            types::HANDLER_SOUND => TrackKind::Audio,
            types::HANDLER_VIDEO => TrackKind::Video,
            types::HANDLER_HINT => TrackKind::Hint,
            types::HANDLER_TEXT | types::HANDLER_SUBTITLE => TrackKind::Text,
            _ => TrackKind::Other,
        }
    }

    /// Only audio and video tracks are measured.
    pub fn is_audio_or_video(self) -> bool {
        matches!(self, TrackKind::Audio | TrackKind::Video)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDescriptionKind {
    Plain,
    Protected,
}

/// OMA key-management info from `schi/odkm`.
#[derive(Debug, Clone, PartialEq)]
pub struct OmaSchemeInfo {
    pub ohdr: OhdrAtom,
    /// `odaf`, or the defaults when the atom is absent.
    pub odaf: OdafAtom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtectedSampleDescription {
    /// Entry type as stored (`encv`, `enca`, ...).
    pub format: FourCc,
    /// `frma` value, the format before protection.
    pub original_format: FourCc,
    pub scheme_type: FourCc,
    pub scheme_version: u32,
    pub scheme_info: Option<OmaSchemeInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleDescription {
    Plain {
        format: FourCc,
        category: SampleEntryCategory,
    },
    Protected(ProtectedSampleDescription),
}

impl SampleDescription {
    pub fn kind(&self) -> SampleDescriptionKind {
        match self {
            SampleDescription::Plain { .. } => SampleDescriptionKind::Plain,
            SampleDescription::Protected(_) => SampleDescriptionKind::Protected,
        }
    }

    pub fn as_protected(&self) -> Option<&ProtectedSampleDescription> {
        match self {
            SampleDescription::Protected(p) => Some(p),
            SampleDescription::Plain { .. } => None,
        }
    }

    /// Classify one `stsd` entry. An entry carrying `sinf` is protected.
    pub fn from_entry(entry: &SampleEntry) -> Self {
        let Some(sinf) = entry.child(&types::SINF) else {
            return SampleDescription::Plain {
                format: entry.kind,
                category: entry.category,
            };
        };

        let original_format = sinf
            .child(&types::FRMA)
            .and_then(Atom::as_frma)
            .map_or(entry.kind, |frma| frma.original_format);
        let (scheme_type, scheme_version) = sinf
            .child(&types::SCHM)
            .and_then(Atom::as_schm)
            .map_or(([0u8; 4], 0), |schm| (schm.scheme_type, schm.scheme_version));
        let scheme_info = sinf.find(&[types::SCHI, types::ODKM]).and_then(|odkm| {
            let ohdr = odkm.child(&types::OHDR).and_then(Atom::as_ohdr)?.clone();
            let odaf = odkm
                .child(&types::ODAF)
                .and_then(Atom::as_odaf)
                .copied()
                .unwrap_or_default();
            Some(OmaSchemeInfo { ohdr, odaf })
        });

        SampleDescription::Protected(ProtectedSampleDescription {
            format: entry.kind,
            original_format,
            scheme_type,
            scheme_version,
            scheme_info,
        })
    }
}

/// Location of one sample in the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub offset: u64,
    pub size: u32,
    /// 1-based index into the track's sample descriptions.
    pub description_index: u32,
}

/// `stsz` + `stsc` + `stco` resolved into one entry per sample.
///
/// Every sample must lie inside a stream of the given length, which also
/// bounds how many entries a constant-size `stsz` can declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleTable {
    samples: Vec<Sample>,
}

impl SampleTable {
    pub fn from_atoms(
        stsz: &StszAtom,
        stsc: &StscAtom,
        stco: &StcoAtom,
        stream_length: u64,
    ) -> Result<Self, BenchError> {
        let sample_count = stsz.sample_count as usize;
        let declared_bytes = u64::from(stsz.sample_size) * u64::from(stsz.sample_count);
        if declared_bytes > stream_length {
            return Err(BenchError::Atom(format!(
                "stsz declares {} samples of {} bytes in a {stream_length}-byte stream",
                stsz.sample_count, stsz.sample_size
            )));
        }
        let chunk_count = stco.chunk_offsets.len() as u32;
        let mut samples = Vec::new();

        for (i, entry) in stsc.entries.iter().enumerate() {
            let next_first_chunk = stsc
                .entries
                .get(i + 1)
                .map_or(chunk_count + 1, |next| next.first_chunk);
            if entry.first_chunk == 0 || next_first_chunk < entry.first_chunk {
                return Err(BenchError::Atom(format!(
                    "stsc entry {i} has invalid first chunk {}",
                    entry.first_chunk
                )));
            }

            for chunk in entry.first_chunk..next_first_chunk.min(chunk_count + 1) {
                let mut offset = stco.chunk_offsets[(chunk - 1) as usize];
                for _ in 0..entry.samples_per_chunk {
                    let Some(size) = stsz.size_of(samples.len()) else {
                        break;
                    };
                    let end = offset
                        .checked_add(u64::from(size))
                        .filter(|&end| end <= stream_length)
                        .ok_or_else(|| {
                            BenchError::Atom(format!(
                                "sample {} at offset {offset} runs past the end of the stream",
                                samples.len()
                            ))
                        })?;
                    samples.push(Sample {
                        offset,
                        size,
                        description_index: entry.sample_description_index,
                    });
                    offset = end;
                }
            }
        }

        if samples.len() != sample_count {
            return Err(BenchError::Atom(format!(
                "chunk map covers {} of {sample_count} samples",
                samples.len()
            )));
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Sample> {
        self.samples.get(index as usize)
    }

    /// Sum of all sample sizes.
    pub fn total_size(&self) -> u64 {
        self.samples.iter().map(|s| u64::from(s.size)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: u32,
    pub kind: TrackKind,
    pub handler_type: FourCc,
    pub sample_descriptions: Vec<SampleDescription>,
    pub sample_table: SampleTable,
}

impl Track {
    /// Build a track from a `trak` atom of a `stream_length`-byte stream.
    ///
    /// Missing `tkhd`/`hdlr` degrade to id 0 and [`TrackKind::Other`]; a
    /// track without a complete sample table has no samples.
    pub fn from_trak(trak: &Atom, stream_length: u64) -> Result<Self, BenchError> {
        let id = trak
            .child(&types::TKHD)
            .and_then(Atom::as_tkhd)
            .map_or(0, |tkhd| tkhd.track_id);
        let handler_type = trak
            .find(&[types::MDIA, types::HDLR])
            .and_then(Atom::as_hdlr)
            .map_or([0u8; 4], |hdlr| hdlr.handler_type);

        let stbl = trak.find(&[types::MDIA, types::MINF, types::STBL]);
        let sample_descriptions = stbl
            .and_then(|stbl| stbl.child(&types::STSD))
            .and_then(Atom::as_stsd)
            .map(|stsd| stsd.entries.iter().map(SampleDescription::from_entry).collect())
            .unwrap_or_default();

        let tables = stbl.and_then(|stbl| {
            let stsz = stbl.child(&types::STSZ).and_then(Atom::as_stsz)?;
            let stsc = stbl.child(&types::STSC).and_then(Atom::as_stsc)?;
            let stco = stbl
                .child(&types::STCO)
                .or_else(|| stbl.child(&types::CO64))
                .and_then(Atom::as_stco)?;
            Some((stsz, stsc, stco))
        });
        let sample_table = match tables {
            Some((stsz, stsc, stco)) => SampleTable::from_atoms(stsz, stsc, stco, stream_length)?,
            None => SampleTable::default(),
        };

        Ok(Self {
            id,
            kind: TrackKind::from_handler(&handler_type),
            handler_type,
            sample_descriptions,
            sample_table,
        })
    }

    pub fn sample_count(&self) -> usize {
        self.sample_table.len()
    }

    pub fn sample_description(&self, index: usize) -> Option<&SampleDescription> {
        self.sample_descriptions.get(index)
    }

    /// Read sample `index` (0-based) into `data`, replacing its contents.
    ///
    /// Past the last sample this returns [`BenchError::SampleOutOfRange`].
    pub fn read_sample<R: Read + Seek>(
        &self,
        reader: &mut R,
        index: u32,
        data: &mut Vec<u8>,
    ) -> Result<Sample, BenchError> {
        let sample = *self
            .sample_table
            .get(index)
            .ok_or(BenchError::SampleOutOfRange(index))?;
        reader.seek(SeekFrom::Start(sample.offset))?;
        data.resize(sample.size as usize, 0);
        reader.read_exact(data).map_err(|e| {
            BenchError::Atom(format!(
                "track {} ({}): sample {index} at offset {} unreadable: {e}",
                self.id,
                fourcc_to_string(&self.handler_type),
                sample.offset
            ))
        })?;
        Ok(sample)
    }
}
