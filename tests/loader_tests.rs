//! tests/loader_tests.rs
//! Sample loading over plain, DCF and PDCF inputs

mod common;
use common::{demo_av_payload, fixture_files, test_config, TEST_REPEATS};

use mp4bench::atom::{types, OdafAtom, OhdrAtom, SampleEntryCategory};
use mp4bench::consts::{DEFAULT_CONTENT_KEY, OMA_ENCRYPTION_METHOD_AES_CBC};
use mp4bench::movie::{
    OmaSchemeInfo, ProtectedSampleDescription, Sample, SampleDescription, TrackKind,
};
use mp4bench::{load_all_samples, load_samples, BenchError, SampleSource, Workload};
use std::path::Path;

/// In-memory track: every sample is `sizes[i]` bytes of `fill`.
struct MemoryTrack {
    kind: TrackKind,
    description: SampleDescription,
    sizes: Vec<u32>,
    fill: u8,
    reads: u32,
}

impl MemoryTrack {
    fn plain(kind: TrackKind, sizes: Vec<u32>) -> Self {
        Self {
            kind,
            description: SampleDescription::Plain {
                format: *b"mp4v",
                category: SampleEntryCategory::Video,
            },
            sizes,
            fill: 0,
            reads: 0,
        }
    }

    fn protected_cbc(sizes: Vec<u32>) -> Self {
        let ohdr = OhdrAtom {
            encryption_method: OMA_ENCRYPTION_METHOD_AES_CBC,
            padding_scheme: 1,
            plaintext_length: 0,
            content_id: String::new(),
            rights_issuer_url: String::new(),
            textual_headers: Vec::new(),
            children: Vec::new(),
        };
        let odaf = OdafAtom {
            selective_encryption: true,
            key_indicator_length: 0,
            iv_length: 16,
        };
        Self {
            kind: TrackKind::Video,
            description: SampleDescription::Protected(ProtectedSampleDescription {
                format: *b"encv",
                original_format: *b"mp4v",
                scheme_type: types::SCHEME_ODKM,
                scheme_version: 0x200,
                scheme_info: Some(OmaSchemeInfo { ohdr, odaf }),
            }),
            sizes,
            fill: 0x80,
            reads: 0,
        }
    }
}

impl SampleSource for MemoryTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn sample_description(&self, index: usize) -> Option<&SampleDescription> {
        (index == 0).then_some(&self.description)
    }

    fn read_sample(&mut self, index: u32, data: &mut Vec<u8>) -> Result<Sample, BenchError> {
        let size = *self
            .sizes
            .get(index as usize)
            .ok_or(BenchError::SampleOutOfRange(index))?;
        self.reads += 1;
        data.clear();
        data.resize(size as usize, self.fill);
        Ok(Sample {
            offset: 0,
            size,
            description_index: 1,
        })
    }
}

#[test]
fn empty_track_loads_nothing() {
    let mut track = MemoryTrack::plain(TrackKind::Audio, Vec::new());
    assert_eq!(load_samples(&mut track, &DEFAULT_CONTENT_KEY, 16), 0);
}

#[test]
fn plain_track_counts_every_pass() {
    let mut track = MemoryTrack::plain(TrackKind::Video, vec![100, 200, 300]);
    assert_eq!(load_samples(&mut track, &DEFAULT_CONTENT_KEY, 4), 4 * 600);
    assert_eq!(track.reads, 12);
}

#[test]
fn other_track_kinds_are_not_read() {
    for kind in [TrackKind::Text, TrackKind::Hint, TrackKind::Other] {
        let mut track = MemoryTrack::plain(kind, vec![10, 20]);
        assert_eq!(load_samples(&mut track, &DEFAULT_CONTENT_KEY, 3), 0);
        assert_eq!(track.reads, 0);
    }
}

#[test]
fn decrypt_failure_zeroes_the_track() {
    // selective byte set, but 4 bytes cannot hold a 16-byte IV
    let mut track = MemoryTrack::protected_cbc(vec![4, 4, 4]);
    assert_eq!(load_samples(&mut track, &DEFAULT_CONTENT_KEY, 2), 0);
    assert_eq!(track.reads, 1);
}

#[test]
fn missing_file_loads_nothing() {
    let config = test_config();
    assert_eq!(load_all_samples(Path::new("no/such/file.mp4"), &config), 0);
}

#[test]
fn garbage_file_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.mp4");
    std::fs::write(&path, [0xffu8; 64]).unwrap();
    assert_eq!(load_all_samples(&path, &test_config()), 0);
}

#[test]
fn every_input_yields_the_audio_and_video_payload() {
    let config = test_config();
    let (_dir, files) = fixture_files(&config);
    let expected = u64::from(TEST_REPEATS) * demo_av_payload();

    for workload in Workload::ALL.into_iter().filter(|w| !w.is_cipher()) {
        let path = files.path_for(workload).unwrap();
        assert_eq!(load_all_samples(path, &config), expected, "{}", workload.name());
    }
}
