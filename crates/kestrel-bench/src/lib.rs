//! # kestrel-bench: Throughput benchmarks for Kestrel primitives
//!
//! Shared payload helpers for the criterion benches.
//!
//! ## Benchmarks
//!
//! - **digest**: SHA-224/256/384/512 streaming throughput
//! - **cipher**: AES key schedules, single blocks and CTR streams
//! - **mac**: HMAC per message size, PBKDF2 per iteration count
//! - **checksum**: CRC32 slicing-by-8 across polynomials
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p kestrel-bench
//!
//! # Run specific benchmark
//! cargo bench -p kestrel-bench --bench digest
//!
//! # Save baseline for comparison
//! cargo bench -p kestrel-bench --bench cipher -- --save-baseline main
//!
//! # Compare against baseline
//! cargo bench -p kestrel-bench --bench cipher -- --baseline main
//! ```

/// Message sizes every throughput group sweeps.
///
/// 15 stays below the CRC slicing threshold, 64 is one SHA-256 block, 1024
/// and up amortize setup cost.
pub const PAYLOAD_SIZES: [usize; 6] = [15, 64, 256, 1024, 16 * 1024, 64 * 1024];

/// AES key lengths in bytes.
pub const AES_KEY_SIZES: [usize; 3] = [16, 24, 32];

/// Deterministic, non-repeating-looking payload of `size` bytes.
///
/// A xorshift stream keeps benches reproducible without a RNG dependency.
pub fn payload(size: usize) -> Vec<u8> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64 ^ size as u64;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 56) as u8
        })
        .collect()
}

/// Key material of `len` bytes derived from [`payload`].
pub fn key(len: usize) -> Vec<u8> {
    payload(len).iter().map(|b| b ^ 0xA5).collect()
}

/// A fixed 16-byte initial counter block.
pub fn counter_block() -> [u8; 16] {
    let mut iv = [0u8; 16];
    for (i, byte) in iv.iter_mut().enumerate() {
        *byte = 0xF0 | i as u8;
    }
    iv
}
