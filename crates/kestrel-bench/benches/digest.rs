//! Digest throughput benchmarks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kestrel_bench::{PAYLOAD_SIZES, payload};
use kestrel_crypto::{Digest, Sha224, Sha256, Sha384, Sha512};

fn bench_family<D: Digest>(c: &mut Criterion, mut digest: D) {
    let mut group = c.benchmark_group(digest.algorithm_name());

    for size in PAYLOAD_SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        let data = payload(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| {
                digest.update(black_box(data));
                black_box(digest.build());
            });
        });
    }

    group.finish();
}

fn bench_sha256_family(c: &mut Criterion) {
    bench_family(c, Sha224::new());
    bench_family(c, Sha256::new());
}

fn bench_sha512_family(c: &mut Criterion) {
    bench_family(c, Sha384::new());
    bench_family(c, Sha512::new());
}

/// Many small updates exercise the byte buffering path.
fn bench_small_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("SHA-256 chunked");
    let data = payload(16 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk in [1, 7, 64, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            let mut digest = Sha256::new();
            b.iter(|| {
                for piece in data.chunks(chunk) {
                    digest.update(black_box(piece));
                }
                black_box(digest.build());
            });
        });
    }

    group.finish();
}

criterion_group!(
    digest_benches,
    bench_sha256_family,
    bench_sha512_family,
    bench_small_updates
);

criterion_main!(digest_benches);
