// src/packager/mod.rs

//! Write side: synthesises plain MP4, DCF and PDCF inputs for the sample
//! workloads.
//!
//! Core API: `write_test_files(dir, key, &mut ivs)?` writes the five default
//! inputs. `build_mp4`, `wrap_dcf` and `build_pdcf` produce single files.

pub(crate) mod dcf;
pub(crate) mod encrypt;
pub(crate) mod mp4;
pub(crate) mod pdcf;

pub use dcf::wrap_dcf;
pub use encrypt::{OmaMethod, PayloadEncrypter};
pub use mp4::build_mp4;
pub use pdcf::build_pdcf;

use crate::aliases::{FourCc, Iv16};
use crate::atom::{types, AtomWriter};
use crate::bench::TestFiles;
use crate::error::BenchError;
use crate::movie::TrackKind;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

#[cfg(feature = "rand")]
use crate::crypto::rng::RandomBytesExt;

/// Samples of one track to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSpec {
    pub id: u32,
    pub kind: TrackKind,
    pub samples: Vec<Vec<u8>>,
}

impl TrackSpec {
    pub fn new(id: u32, kind: TrackKind, samples: Vec<Vec<u8>>) -> Self {
        Self { id, kind, samples }
    }

    /// `hdlr` type for this track's kind.
    pub fn handler_type(&self) -> FourCc {
        match self.kind {
            TrackKind::Audio => types::HANDLER_SOUND,
            TrackKind::Video => types::HANDLER_VIDEO,
            TrackKind::Hint => types::HANDLER_HINT,
            TrackKind::Text => types::HANDLER_TEXT,
            TrackKind::Other => *b"meta",
        }
    }

    /// Sample entry type before any protection.
    pub fn format(&self) -> FourCc {
        match self.kind {
            TrackKind::Audio => *b"mp4a",
            TrackKind::Video => *b"avc1",
            TrackKind::Text => *b"tx3g",
            TrackKind::Hint => *b"rtp ",
            TrackKind::Other => *b"mett",
        }
    }

    /// Sum of all sample sizes.
    pub fn payload_size(&self) -> u64 {
        self.samples.iter().map(|s| s.len() as u64).sum()
    }
}

/// Where the packager takes IVs from.
#[derive(Debug, Clone)]
pub enum IvSource {
    /// Big-endian counter, incremented per IV. Reproducible output.
    Counter(u128),
    /// Operating system RNG.
    #[cfg(feature = "rand")]
    Random,
}

impl Default for IvSource {
    fn default() -> Self {
        #[cfg(feature = "rand")]
        {
            IvSource::Random
        }
        #[cfg(not(feature = "rand"))]
        {
            IvSource::Counter(0)
        }
    }
}

impl IvSource {
    pub fn next_iv(&mut self) -> Result<Iv16, BenchError> {
        match self {
            IvSource::Counter(counter) => {
                let iv = counter.to_be_bytes();
                *counter = counter.wrapping_add(1);
                Ok(iv)
            }
            #[cfg(feature = "rand")]
            IvSource::Random => <Iv16 as RandomBytesExt>::random(),
        }
    }
}

/// `ohdr` as written by both the DCF and the PDCF writers.
pub(crate) fn write_ohdr(
    w: &mut AtomWriter,
    method: OmaMethod,
    plaintext_length: u64,
    content_id: &str,
) -> Result<(), BenchError> {
    let content_id_length = u16::try_from(content_id.len())
        .map_err(|_| BenchError::Atom("content id longer than 65535 bytes".into()))?;
    w.begin_full(types::OHDR, 0, 0)
        .u8(method.code())
        .u8(method.padding_scheme())
        .u64(plaintext_length)
        .u16(content_id_length)
        .u16(0)
        .u16(0)
        .bytes(content_id.as_bytes())
        .end()?;
    Ok(())
}

/// A small video, audio and text movie. Sample sizes vary so that CBC
/// padding is exercised at every remainder.
pub fn demo_tracks() -> Vec<TrackSpec> {
    let sample = |index: usize, size: usize| -> Vec<u8> {
        (0..size).map(|i| (i.wrapping_mul(31) ^ index) as u8).collect()
    };
    let video = (0..48).map(|i| sample(i, 1200 + i * 37)).collect();
    let audio = (0..64).map(|i| sample(i, 180 + i % 17)).collect();
    let text = (0..4).map(|i| sample(i, 24)).collect();
    vec![
        TrackSpec::new(1, TrackKind::Video, video),
        TrackSpec::new(2, TrackKind::Audio, audio),
        TrackSpec::new(3, TrackKind::Text, text),
    ]
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), BenchError> {
    let mut out = BufWriter::new(File::create(path)?);
    crate::atom::write::write_octets(&mut out, bytes)?;
    out.flush()?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote test file");
    Ok(())
}

/// Write the five default-named inputs for [`demo_tracks`] into `dir`,
/// encrypting the DCF and PDCF variants with `key`.
pub fn write_test_files(
    dir: &Path,
    key: &[u8],
    ivs: &mut IvSource,
) -> Result<TestFiles, BenchError> {
    let files = TestFiles::in_dir(dir);
    let tracks = demo_tracks();

    let mp4 = build_mp4(&tracks)?;
    write_file(&files.mp4, &mp4)?;
    let iv = ivs.next_iv()?;
    write_file(&files.dcf_cbc, &wrap_dcf(&mp4, "video/mp4", OmaMethod::AesCbc, key, &iv)?)?;
    let iv = ivs.next_iv()?;
    write_file(&files.dcf_ctr, &wrap_dcf(&mp4, "video/mp4", OmaMethod::AesCtr, key, &iv)?)?;
    write_file(&files.pdcf_cbc, &build_pdcf(&tracks, OmaMethod::AesCbc, key, ivs)?)?;
    write_file(&files.pdcf_ctr, &build_pdcf(&tracks, OmaMethod::AesCtr, key, ivs)?)?;
    Ok(files)
}
