//! src/packager/pdcf.rs
//! PDCF writer: audio and video samples encrypted one by one under the OMA
//! `odkm` scheme.

use crate::aliases::FourCc;
use crate::atom::{types, AtomWriter};
use crate::consts::{AES_BLOCK_SIZE, OMA_ODAF_SELECTIVE_ENCRYPTION, OMA_ODKM_SCHEME_VERSION};
use crate::error::BenchError;
use crate::packager::encrypt::{OmaMethod, PayloadEncrypter};
use crate::packager::mp4::{write_movie, TrackLayout, BRAND_ISOM};
use crate::packager::{write_ohdr, IvSource, TrackSpec};

/// Write a PDCF file. Audio and video tracks are protected; other tracks are
/// stored in the clear.
///
/// Each protected sample is stored as the selective-encryption byte, a fresh
/// IV, and the ciphertext.
pub fn build_pdcf(
    tracks: &[TrackSpec],
    method: OmaMethod,
    key: &[u8],
    ivs: &mut IvSource,
) -> Result<Vec<u8>, BenchError> {
    let mut encrypter = PayloadEncrypter::new(method, key)?;
    let mut layouts = Vec::with_capacity(tracks.len());
    for spec in tracks {
        if !spec.kind.is_audio_or_video() {
            layouts.push(TrackLayout::plain(spec));
            continue;
        }
        let mut samples = Vec::with_capacity(spec.samples.len());
        for plain in &spec.samples {
            let iv = ivs.next_iv()?;
            let mut stored = Vec::with_capacity(1 + AES_BLOCK_SIZE + plain.len() + AES_BLOCK_SIZE);
            stored.push(OMA_ODAF_SELECTIVE_ENCRYPTION);
            stored.extend_from_slice(&iv);
            encrypter.encrypt(&iv, plain, &mut stored)?;
            samples.push(stored);
        }
        layouts.push(TrackLayout {
            spec,
            samples,
            protection: Some(method),
        });
    }
    write_movie(types::BRAND_OPF2, &[types::BRAND_OPF2, BRAND_ISOM], &layouts)
}

/// `sinf` for a protected sample entry whose original type is
/// `original_format`.
pub(crate) fn write_sinf(
    w: &mut AtomWriter,
    original_format: FourCc,
    method: OmaMethod,
) -> Result<(), BenchError> {
    w.begin(types::SINF);
    w.begin(types::FRMA).fourcc(original_format).end()?;
    w.begin_full(types::SCHM, 0, 0)
        .fourcc(types::SCHEME_ODKM)
        .u32(OMA_ODKM_SCHEME_VERSION)
        .end()?;
    w.begin(types::SCHI);
    w.begin_full(types::ODKM, 0, 0);
    write_ohdr(w, method, 0, "")?;
    w.begin_full(types::ODAF, 0, 0)
        .u8(OMA_ODAF_SELECTIVE_ENCRYPTION)
        .u8(0)
        .u8(AES_BLOCK_SIZE as u8)
        .end()?;
    // odkm, schi, sinf
    w.end()?;
    w.end()?;
    w.end()?;
    Ok(())
}
