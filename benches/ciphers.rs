// benches/ciphers.rs
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mp4bench::crypto::{AesBlockCipher, CbcStreamCipher, CipherDirection, CtrStreamCipher};
use mp4bench::consts::DEFAULT_CIPHER_KEY;
use std::hint::black_box;

fn bench_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("aes_block");
    group.throughput(Throughput::Bytes(16));

    for direction in [CipherDirection::Encrypt, CipherDirection::Decrypt] {
        let cipher = AesBlockCipher::new(direction, &DEFAULT_CIPHER_KEY).unwrap();
        let input = [0u8; 16];
        let mut output = [0u8; 16];
        group.bench_function(BenchmarkId::from_parameter(format!("{direction:?}")), |b| {
            b.iter(|| {
                cipher.process_block(black_box(&input), &mut output);
                black_box(output)
            });
        });
    }

    group.finish();
}

fn bench_streams(c: &mut Criterion) {
    let mut group = c.benchmark_group("aes_stream");

    let sizes = [4 * 1024, 128 * 1024, 1024 * 1024];

    for &size in &sizes {
        let input = vec![0u8; size];
        let mut output = vec![0u8; size + 32];
        group.throughput(Throughput::Bytes(size as u64));

        let mut cbc_enc = CbcStreamCipher::new(
            AesBlockCipher::new(CipherDirection::Encrypt, &DEFAULT_CIPHER_KEY).unwrap(),
        );
        group.bench_with_input(BenchmarkId::new("cbc_encrypt", format_size(size)), &size, |b, _| {
            b.iter(|| cbc_enc.process_buffer(black_box(&input), &mut output, false).unwrap());
        });

        let mut cbc_dec = CbcStreamCipher::new(
            AesBlockCipher::new(CipherDirection::Decrypt, &DEFAULT_CIPHER_KEY).unwrap(),
        );
        group.bench_with_input(BenchmarkId::new("cbc_decrypt", format_size(size)), &size, |b, _| {
            b.iter(|| cbc_dec.process_buffer(black_box(&input), &mut output, false).unwrap());
        });

        let mut ctr = CtrStreamCipher::new(&DEFAULT_CIPHER_KEY, None, 16).unwrap();
        group.bench_with_input(BenchmarkId::new("ctr", format_size(size)), &size, |b, _| {
            b.iter(|| {
                // rewind so the counter never runs out on long runs
                ctr.set_iv(None);
                ctr.process_buffer(black_box(&input), &mut output, false).unwrap()
            });
        });
    }

    group.finish();
}

fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    if bytes >= MB {
        format!("{} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KiB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

criterion_group!(benches, bench_block, bench_streams);
criterion_main!(benches);
