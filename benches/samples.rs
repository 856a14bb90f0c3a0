// benches/samples.rs
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mp4bench::packager::{demo_tracks, write_test_files, IvSource};
use mp4bench::{load_all_samples, BenchConfig, BenchConfigBuilder, Workload};
use std::hint::black_box;

fn bench_load_all_samples(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let config: BenchConfig = BenchConfigBuilder::new().with_sample_repeats(1).build().unwrap();
    let files = write_test_files(dir.path(), &config.content_key, &mut IvSource::Counter(0)).unwrap();

    let payload: u64 = demo_tracks()
        .iter()
        .filter(|t| t.kind.is_audio_or_video())
        .map(|t| t.payload_size())
        .sum();

    let mut group = c.benchmark_group("load_all_samples");
    group.throughput(Throughput::Bytes(payload));

    for workload in Workload::ALL.into_iter().filter(|w| !w.is_cipher()) {
        let Some(path) = files.path_for(workload) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(workload.name()), path, |b, path| {
            b.iter(|| {
                let total = load_all_samples(black_box(path), &config);
                assert_eq!(total, payload);
                total
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load_all_samples);
criterion_main!(benches);
