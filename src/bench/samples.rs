//! src/bench/samples.rs
//! Sample loading: the measured operation of the five file workloads.
//!
//! Nothing here returns an error. Failures are logged and contribute zero
//! bytes, so one broken input never stops the other workloads.

use crate::atom::types;
use crate::config::BenchConfig;
use crate::decryptor::{create_dcf_decrypter, OmaSampleDecrypter, SampleDecrypter};
use crate::error::BenchError;
use crate::movie::{Mp4File, SampleDescription, SampleSource};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, error, warn};

/// Bytes produced by reading every sample of `source`, `repeats` times.
///
/// Protected tracks are decrypted and count decrypted bytes; plain tracks
/// other than audio and video are skipped without reading. The first failed
/// read ends a pass.
pub fn load_samples<S>(source: &mut S, key: &[u8], repeats: u32) -> u64
where
    S: SampleSource + ?Sized,
{
    let decrypter = match source.sample_description(0) {
        Some(SampleDescription::Protected(description)) => {
            Some(OmaSampleDecrypter::create(description, key))
        }
        _ => None,
    };

    match decrypter {
        Some(Ok(mut decrypter)) => load_and_decrypt_samples(source, &mut decrypter, repeats),
        Some(Err(e)) => {
            error!("cannot create sample decrypter: {e}");
            0
        }
        None if !source.kind().is_audio_or_video() => 0,
        None => load_plain_samples(source, repeats),
    }
}

fn load_plain_samples<S>(source: &mut S, repeats: u32) -> u64
where
    S: SampleSource + ?Sized,
{
    let mut data = Vec::new();
    let mut total = 0u64;
    for _ in 0..repeats {
        let mut index = 0;
        loop {
            match source.read_sample(index, &mut data) {
                Ok(sample) => total += u64::from(sample.size),
                Err(e) => {
                    note_end_of_pass(index, &e);
                    break;
                }
            }
            index += 1;
        }
    }
    total
}

fn load_and_decrypt_samples<S, D>(source: &mut S, decrypter: &mut D, repeats: u32) -> u64
where
    S: SampleSource + ?Sized,
    D: SampleDecrypter + ?Sized,
{
    let mut encrypted = Vec::new();
    let mut decrypted = Vec::new();
    let mut total = 0u64;
    for _ in 0..repeats {
        let mut index = 0;
        loop {
            if let Err(e) = source.read_sample(index, &mut encrypted) {
                note_end_of_pass(index, &e);
                break;
            }
            if let Err(e) = decrypter.decrypt_sample_data(&encrypted, &mut decrypted) {
                error!(sample = index, "failed to decrypt sample: {e}");
                return 0;
            }
            total += decrypted.len() as u64;
            index += 1;
        }
    }
    total
}

fn note_end_of_pass(index: u32, e: &BenchError) {
    if !e.is_end_of_track() {
        warn!(sample = index, "sample read failed: {e}");
    }
}

/// Open `path`, unwrap DCF content if needed, and load every track with
/// `config.sample_repeats` passes.
pub fn load_all_samples(path: &Path, config: &BenchConfig) -> u64 {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("cannot open input file ({}): {e}", path.display());
            return 0;
        }
    };
    let mp4 = match Mp4File::parse(BufReader::new(file)) {
        Ok(mp4) => mp4,
        Err(e) => {
            error!("cannot parse input file ({}): {e}", path.display());
            return 0;
        }
    };

    if mp4.major_brand() != Some(types::BRAND_ODCF) {
        return load_movie_samples(mp4, config);
    }

    let (atoms, reader) = mp4.into_parts();
    let Some(stream) = create_dcf_decrypter(&atoms, reader, &config.content_key) else {
        error!("no decryptable odrm in {}", path.display());
        return 0;
    };
    match Mp4File::parse(stream) {
        Ok(inner) => load_movie_samples(inner, config),
        Err(e) => {
            error!("cannot parse decrypted content of {}: {e}", path.display());
            0
        }
    }
}

fn load_movie_samples<R: Read + Seek>(mut mp4: Mp4File<R>, config: &BenchConfig) -> u64 {
    let mut total = 0;
    for index in 0..mp4.track_count() {
        if let Some(mut reader) = mp4.track_reader(index) {
            let bytes = load_samples(&mut reader, &config.content_key, config.sample_repeats);
            debug!(track = reader.track().id, bytes, "track loaded");
            total += bytes;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::{Sample, TrackKind};

    struct FixedTrack {
        kind: TrackKind,
        sizes: Vec<u32>,
        reads: usize,
    }

    impl SampleSource for FixedTrack {
        fn kind(&self) -> TrackKind {
            self.kind
        }

        fn sample_description(&self, _index: usize) -> Option<&SampleDescription> {
            None
        }

        fn read_sample(&mut self, index: u32, data: &mut Vec<u8>) -> Result<Sample, BenchError> {
            self.reads += 1;
            let size = *self
                .sizes
                .get(index as usize)
                .ok_or(BenchError::SampleOutOfRange(index))?;
            data.resize(size as usize, 0);
            Ok(Sample {
                offset: 0,
                size,
                description_index: 1,
            })
        }
    }

    #[test]
    fn repeats_multiply_plain_totals() {
        let mut track = FixedTrack {
            kind: TrackKind::Video,
            sizes: vec![10, 20, 30],
            reads: 0,
        };
        assert_eq!(load_samples(&mut track, &[0u8; 16], 4), 240);
        // three samples plus the end-of-track read, per pass
        assert_eq!(track.reads, 16);
    }

    #[test]
    fn text_track_is_never_read() {
        let mut track = FixedTrack {
            kind: TrackKind::Text,
            sizes: vec![10],
            reads: 0,
        };
        assert_eq!(load_samples(&mut track, &[0u8; 16], 16), 0);
        assert_eq!(track.reads, 0);
    }

    #[test]
    fn missing_file_counts_zero() {
        let total = load_all_samples(Path::new("/nonexistent/input.mp4"), &BenchConfig::default());
        assert_eq!(total, 0);
    }
}
