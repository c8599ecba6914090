//! AES and CTR benchmarks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kestrel_bench::{AES_KEY_SIZES, PAYLOAD_SIZES, counter_block, key, payload};
use kestrel_crypto::{Aes, BlockCipher, Ctr, StreamCipher};

// ============================================================================
// Key Schedule
// ============================================================================

fn bench_key_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("aes_key_schedule");

    for len in AES_KEY_SIZES {
        let key = key(len);
        group.bench_with_input(BenchmarkId::new("full", len * 8), &key, |b, key| {
            b.iter(|| black_box(Aes::new(black_box(key))));
        });
        group.bench_with_input(BenchmarkId::new("encrypt_only", len * 8), &key, |b, key| {
            b.iter(|| black_box(Aes::encrypt_only(black_box(key))));
        });
    }

    group.finish();
}

// ============================================================================
// Single Block
// ============================================================================

fn bench_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("aes_block");
    group.throughput(Throughput::Bytes(16));

    for len in AES_KEY_SIZES {
        let Ok(aes) = Aes::new(&key(len)) else {
            continue;
        };
        let block = payload(16);
        let mut out = [0u8; 16];

        group.bench_function(BenchmarkId::new("encrypt", len * 8), |b| {
            b.iter(|| black_box(aes.encrypt_into(black_box(&block), &mut out)));
        });
        group.bench_function(BenchmarkId::new("decrypt", len * 8), |b| {
            b.iter(|| black_box(aes.decrypt_into(black_box(&block), &mut out)));
        });
    }

    group.finish();
}

// ============================================================================
// CTR Stream
// ============================================================================

fn bench_ctr(c: &mut Criterion) {
    let mut group = c.benchmark_group("aes128_ctr");

    let Ok(aes) = Aes::encrypt_only(&key(16)) else {
        return;
    };
    let Ok(mut ctr) = Ctr::new(aes, &counter_block()) else {
        return;
    };

    for size in PAYLOAD_SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        let mut data = payload(size);

        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| black_box(ctr.apply_keystream(black_box(&mut data))));
        });
    }

    group.finish();
}

criterion_group!(cipher_benches, bench_key_schedule, bench_block, bench_ctr);

criterion_main!(cipher_benches);
