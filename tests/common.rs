//! tests/common.rs
//! Common fixtures shared across test files

use mp4bench::bench::Clock;
use mp4bench::packager::{demo_tracks, write_test_files, IvSource};
use mp4bench::{BenchConfig, BenchConfigBuilder, TestFiles};
use std::cell::Cell;
use tempfile::TempDir;

/// Passes per file-workload iteration in tests - the real default is 16.
#[allow(dead_code)] // Used across multiple test files
pub const TEST_REPEATS: u32 = 2;

/// Clock that advances by a fixed step on every reading.
#[allow(dead_code)] // Used across multiple test files
pub struct StepClock {
    now: Cell<f64>,
    step: f64,
}

#[allow(dead_code)] // Used across multiple test files
impl StepClock {
    pub fn new(step: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            step,
        }
    }

    /// Readings taken so far.
    pub fn readings(&self) -> u64 {
        (self.now.get() / self.step).round() as u64
    }
}

impl Clock for StepClock {
    fn now(&self) -> f64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Config with [`TEST_REPEATS`] sample passes.
#[allow(dead_code)] // Used across multiple test files
pub fn test_config() -> BenchConfig {
    BenchConfigBuilder::new()
        .with_sample_repeats(TEST_REPEATS)
        .build()
        .unwrap()
}

/// The five default inputs, written into a fresh temporary directory with
/// reproducible IVs.
#[allow(dead_code)] // Used across multiple test files
pub fn fixture_files(config: &BenchConfig) -> (TempDir, TestFiles) {
    let dir = tempfile::tempdir().unwrap();
    let files = write_test_files(dir.path(), &config.content_key, &mut IvSource::Counter(7)).unwrap();
    (dir, files)
}

/// Audio and video bytes of one pass over the demo movie.
#[allow(dead_code)] // Used across multiple test files
pub fn demo_av_payload() -> u64 {
    demo_tracks()
        .iter()
        .filter(|t| t.kind.is_audio_or_video())
        .map(|t| t.payload_size())
        .sum()
}
