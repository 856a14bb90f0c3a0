//! src/packager/mp4.rs
//! Minimal movie writer: `ftyp`, one `mdat`, then `moov`.
//!
//! Every track stores its samples as one chunk, so chunk offsets are known
//! when `moov` is written.

use crate::aliases::FourCc;
use crate::atom::{types, AtomWriter, SampleEntryCategory};
use crate::error::BenchError;
use crate::movie::TrackKind;
use crate::packager::encrypt::OmaMethod;
use crate::packager::pdcf::write_sinf;
use crate::packager::TrackSpec;

const TIMESCALE: u32 = 1000;
const SAMPLE_DURATION: u32 = 40;
const VIDEO_WIDTH: u16 = 320;
const VIDEO_HEIGHT: u16 = 240;

pub(crate) const BRAND_ISOM: FourCc = *b"isom";
pub(crate) const BRAND_MP42: FourCc = *b"mp42";

/// One track as stored: sample bytes plus optional PDCF protection.
pub(crate) struct TrackLayout<'a> {
    pub spec: &'a TrackSpec,
    pub samples: Vec<Vec<u8>>,
    pub protection: Option<OmaMethod>,
}

impl<'a> TrackLayout<'a> {
    pub fn plain(spec: &'a TrackSpec) -> Self {
        Self {
            spec,
            samples: spec.samples.clone(),
            protection: None,
        }
    }
}

/// Write a plain, unprotected MP4 file holding `tracks`.
pub fn build_mp4(tracks: &[TrackSpec]) -> Result<Vec<u8>, BenchError> {
    let layouts: Vec<_> = tracks.iter().map(TrackLayout::plain).collect();
    write_movie(BRAND_ISOM, &[BRAND_ISOM, BRAND_MP42], &layouts)
}

pub(crate) fn write_movie(
    brand: FourCc,
    compatible_brands: &[FourCc],
    tracks: &[TrackLayout<'_>],
) -> Result<Vec<u8>, BenchError> {
    let mut w = AtomWriter::new();
    w.begin(types::FTYP).fourcc(brand).u32(0);
    for compatible in compatible_brands {
        w.fourcc(*compatible);
    }
    w.end()?;

    let mut chunk_offsets = Vec::with_capacity(tracks.len());
    w.begin(types::MDAT);
    for track in tracks {
        chunk_offsets.push(w.position() as u64);
        for sample in &track.samples {
            w.bytes(sample);
        }
    }
    w.end()?;

    w.begin(types::MOOV);
    let next_track_id = tracks.iter().map(|t| t.spec.id).max().unwrap_or(0) + 1;
    write_mvhd(&mut w, next_track_id)?;
    for (track, chunk_offset) in tracks.iter().zip(chunk_offsets) {
        write_trak(&mut w, track, chunk_offset)?;
    }
    w.end()?;
    w.into_bytes()
}

fn write_matrix(w: &mut AtomWriter) {
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        w.u32(value);
    }
}

fn write_mvhd(w: &mut AtomWriter, next_track_id: u32) -> Result<(), BenchError> {
    w.begin_full(*b"mvhd", 0, 0)
        .u32(0)
        .u32(0)
        .u32(TIMESCALE)
        .u32(0)
        .u32(0x0001_0000)
        .u16(0x0100)
        .zeros(10);
    write_matrix(w);
    w.zeros(24).u32(next_track_id).end()?;
    Ok(())
}

fn write_trak(
    w: &mut AtomWriter,
    track: &TrackLayout<'_>,
    chunk_offset: u64,
) -> Result<(), BenchError> {
    let spec = track.spec;
    let count = u32::try_from(track.samples.len())
        .map_err(|_| BenchError::Atom(format!("track {} has too many samples", spec.id)))?;
    let duration = count.saturating_mul(SAMPLE_DURATION);
    let (width, height) = match spec.kind {
        TrackKind::Video => (VIDEO_WIDTH, VIDEO_HEIGHT),
        _ => (0, 0),
    };

    w.begin(types::TRAK);
    w.begin_full(types::TKHD, 0, 0x000007)
        .u32(0)
        .u32(0)
        .u32(spec.id)
        .u32(0)
        .u32(duration)
        .zeros(8)
        .u16(0)
        .u16(0)
        .u16(if spec.kind == TrackKind::Audio { 0x0100 } else { 0 })
        .u16(0);
    write_matrix(w);
    w.u32(u32::from(width) << 16).u32(u32::from(height) << 16).end()?;

    w.begin(types::MDIA);
    w.begin_full(*b"mdhd", 0, 0)
        .u32(0)
        .u32(0)
        .u32(TIMESCALE)
        .u32(duration)
        .u16(0x55c4)
        .u16(0)
        .end()?;
    w.begin_full(types::HDLR, 0, 0)
        .u32(0)
        .fourcc(spec.handler_type())
        .zeros(12)
        .bytes(b"mp4bench\0")
        .end()?;

    w.begin(types::MINF);
    match spec.kind {
        TrackKind::Video => w.begin_full(*b"vmhd", 0, 1).zeros(8).end()?,
        TrackKind::Audio => w.begin_full(*b"smhd", 0, 0).zeros(4).end()?,
        _ => w.begin_full(*b"nmhd", 0, 0).end()?,
    };
    w.begin(*b"dinf");
    w.begin_full(*b"dref", 0, 0).u32(1);
    w.begin_full(*b"url ", 0, 1).end()?;
    w.end()?;
    w.end()?;

    w.begin(types::STBL);
    w.begin_full(types::STSD, 0, 0).u32(1);
    write_sample_entry(w, track)?;
    w.end()?;

    w.begin_full(*b"stts", 0, 0);
    if count > 0 {
        w.u32(1).u32(count).u32(SAMPLE_DURATION);
    } else {
        w.u32(0);
    }
    w.end()?;

    w.begin_full(types::STSC, 0, 0);
    if count > 0 {
        w.u32(1).u32(1).u32(count).u32(1);
    } else {
        w.u32(0);
    }
    w.end()?;

    w.begin_full(types::STSZ, 0, 0).u32(0).u32(count);
    for sample in &track.samples {
        w.u32(sample.len() as u32);
    }
    w.end()?;

    let chunk_count = u32::from(count > 0);
    match u32::try_from(chunk_offset) {
        Ok(offset) => {
            w.begin_full(types::STCO, 0, 0).u32(chunk_count);
            if count > 0 {
                w.u32(offset);
            }
        }
        Err(_) => {
            w.begin_full(types::CO64, 0, 0).u32(chunk_count);
            if count > 0 {
                w.u64(chunk_offset);
            }
        }
    }
    w.end()?;

    // stbl, minf, mdia, trak
    for _ in 0..4 {
        w.end()?;
    }
    Ok(())
}

fn write_sample_entry(w: &mut AtomWriter, track: &TrackLayout<'_>) -> Result<(), BenchError> {
    let format = track.spec.format();
    let category = SampleEntryCategory::of(&format);
    let kind = match (track.protection, category) {
        (Some(_), SampleEntryCategory::Audio) => *b"enca",
        (Some(_), SampleEntryCategory::Video) => *b"encv",
        _ => format,
    };

    w.begin(kind).zeros(6).u16(1);
    match category {
        SampleEntryCategory::Audio => {
            w.u16(0)
                .u16(0)
                .u32(0)
                .u16(2)
                .u16(16)
                .u16(0)
                .u16(0)
                .u32(44_100 << 16);
        }
        SampleEntryCategory::Video => {
            w.u16(0)
                .u16(0)
                .zeros(12)
                .u16(VIDEO_WIDTH)
                .u16(VIDEO_HEIGHT)
                .u32(0x0048_0000)
                .u32(0x0048_0000)
                .u32(0)
                .u16(1)
                .zeros(32)
                .u16(0x0018)
                .u16(0xffff);
        }
        SampleEntryCategory::Other => {}
    }
    if let Some(method) = track.protection {
        write_sinf(w, format, method)?;
    }
    w.end()?;
    Ok(())
}
