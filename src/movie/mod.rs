// src/movie/mod.rs

//! File, movie and track model over a parsed atom tree.
//!
//! [`Mp4File`] owns the source stream next to the parsed tree so that track
//! readers can borrow both at once.

mod track;

pub use track::{
    OmaSchemeInfo, ProtectedSampleDescription, Sample, SampleDescription,
    SampleDescriptionKind, SampleTable, Track, TrackKind,
};

use crate::aliases::FourCc;
use crate::atom::{find_child, parse_atoms, types, Atom, FtypAtom};
use crate::error::BenchError;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// What the sample loader needs from a track.
pub trait SampleSource {
    fn kind(&self) -> TrackKind;

    fn sample_description(&self, index: usize) -> Option<&SampleDescription>;

    /// Read sample `index` into `data`. Past the end of the track this fails
    /// with [`BenchError::SampleOutOfRange`].
    fn read_sample(&mut self, index: u32, data: &mut Vec<u8>) -> Result<Sample, BenchError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Movie {
    pub tracks: Vec<Track>,
}

impl Movie {
    /// Tracks of `moov`, with sample tables checked against `stream_length`.
    pub fn from_moov(moov: &Atom, stream_length: u64) -> Result<Self, BenchError> {
        let tracks = moov
            .children()
            .unwrap_or_default()
            .iter()
            .filter(|atom| atom.kind() == types::TRAK)
            .map(|trak| Track::from_trak(trak, stream_length))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tracks })
    }

    pub fn track_by_id(&self, id: u32) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }
}

pub struct Mp4File<R> {
    reader: R,
    length: u64,
    atoms: Vec<Atom>,
    movie: Option<Movie>,
}

impl<R: Read + Seek> Mp4File<R> {
    /// Parse every top-level atom of `reader`, from its start to its end.
    pub fn parse(mut reader: R) -> Result<Self, BenchError> {
        let length = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        let atoms = parse_atoms(&mut reader, length)?;
        let movie = find_child(&atoms, &types::MOOV)
            .map(|moov| Movie::from_moov(moov, length))
            .transpose()?;

        debug!(
            length,
            atoms = atoms.len(),
            tracks = movie.as_ref().map_or(0, |m| m.tracks.len()),
            "parsed mp4 file"
        );
        Ok(Self {
            reader,
            length,
            atoms,
            movie,
        })
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn file_type(&self) -> Option<&FtypAtom> {
        find_child(&self.atoms, &types::FTYP).and_then(Atom::as_ftyp)
    }

    pub fn major_brand(&self) -> Option<FourCc> {
        self.file_type().map(|ftyp| ftyp.major_brand)
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn track_count(&self) -> usize {
        self.movie.as_ref().map_or(0, |m| m.tracks.len())
    }

    /// Reader over track `index` (position in `moov`, not track id).
    pub fn track_reader(&mut self, index: usize) -> Option<TrackReader<'_, R>> {
        let track = self.movie.as_ref()?.tracks.get(index)?;
        Some(TrackReader {
            track,
            reader: &mut self.reader,
        })
    }

    /// Atoms and stream, for callers that wrap the stream after inspecting
    /// the tree.
    pub fn into_parts(self) -> (Vec<Atom>, R) {
        (self.atoms, self.reader)
    }
}

/// A track paired with the stream its samples live in.
pub struct TrackReader<'a, R> {
    track: &'a Track,
    reader: &'a mut R,
}

impl<R> TrackReader<'_, R> {
    pub fn track(&self) -> &Track {
        self.track
    }
}

impl<R: Read + Seek> SampleSource for TrackReader<'_, R> {
    fn kind(&self) -> TrackKind {
        self.track.kind
    }

    fn sample_description(&self, index: usize) -> Option<&SampleDescription> {
        self.track.sample_description(index)
    }

    fn read_sample(&mut self, index: u32, data: &mut Vec<u8>) -> Result<Sample, BenchError> {
        self.track.read_sample(self.reader, index, data)
    }
}
