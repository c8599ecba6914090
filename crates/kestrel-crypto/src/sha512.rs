//! FIPS 180-4 SHA-512 and SHA-384.
//!
//! The 64-bit family: 1024-bit blocks, 80 rounds and a 128-bit length
//! field. SHA-384 reuses the SHA-512 core with its own initial hash value
//! and drops the last two output words.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::digest::{BLOCK_WORDS, BlockBuffer, Compress, Digest, STATE_WORDS};

/// First 64 bits of the fractional parts of the cube roots of the first
/// eighty primes.
#[rustfmt::skip]
const K: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

#[rustfmt::skip]
const SHA512_IV: [u64; STATE_WORDS] = [
    0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
    0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
];

#[rustfmt::skip]
const SHA384_IV: [u64; STATE_WORDS] = [
    0xcbbb9d5dc1059ed8, 0x629a292a367cd507, 0x9159015a3070dd17, 0x152fecd8f70e5939,
    0x67332667ffc00b31, 0x8eb44a8768581511, 0xdb0c2e0d64f98fa7, 0x47b5481dbefa4fa4,
];

#[inline(always)]
fn ch(x: u64, y: u64, z: u64) -> u64 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
fn maj(x: u64, y: u64, z: u64) -> u64 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
fn sum0(x: u64) -> u64 {
    x.rotate_right(28) ^ x.rotate_right(34) ^ x.rotate_right(39)
}

#[inline(always)]
fn sum1(x: u64) -> u64 {
    x.rotate_right(14) ^ x.rotate_right(18) ^ x.rotate_right(41)
}

#[inline(always)]
fn sigma0(x: u64) -> u64 {
    x.rotate_right(1) ^ x.rotate_right(8) ^ (x >> 7)
}

#[inline(always)]
fn sigma1(x: u64) -> u64 {
    x.rotate_right(19) ^ x.rotate_right(61) ^ (x >> 6)
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct Sha512Core {
    state: [u64; STATE_WORDS],
    #[zeroize(skip)]
    iv: &'static [u64; STATE_WORDS],
}

impl Sha512Core {
    fn new(iv: &'static [u64; STATE_WORDS]) -> Self {
        Self { state: *iv, iv }
    }
}

impl Compress for Sha512Core {
    type Word = u64;

    fn compress(&mut self, block: &[u64; BLOCK_WORDS]) {
        let mut w = [0u64; 80];
        w[..BLOCK_WORDS].copy_from_slice(block);
        for t in BLOCK_WORDS..80 {
            w[t] = sigma1(w[t - 2])
                .wrapping_add(w[t - 7])
                .wrapping_add(sigma0(w[t - 15]))
                .wrapping_add(w[t - 16]);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.state;

        for t in 0..80 {
            let t1 = h
                .wrapping_add(sum1(e))
                .wrapping_add(ch(e, f, g))
                .wrapping_add(K[t])
                .wrapping_add(w[t]);
            let t2 = sum0(a).wrapping_add(maj(a, b, c));
            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        for (s, v) in self.state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
            *s = s.wrapping_add(v);
        }

        w.zeroize();
    }

    fn chaining_value(&self) -> &[u64; STATE_WORDS] {
        &self.state
    }

    fn reset(&mut self) {
        self.state = *self.iv;
    }
}

/// Streaming SHA-512.
#[derive(Clone, Debug)]
pub struct Sha512 {
    buffer: BlockBuffer<Sha512Core>,
}

impl Sha512 {
    pub const ALGORITHM_NAME: &'static str = "SHA-512";
    pub const SIZE_BYTES: usize = 64;
    pub const BLOCK_BYTES: usize = 128;

    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BlockBuffer::new(Sha512Core::new(&SHA512_IV)),
        }
    }

    /// Hashes `data` in one shot.
    pub fn digest(data: &[u8]) -> [u8; Self::SIZE_BYTES] {
        let mut digest = Self::new();
        digest.update(data);
        let mut out = [0u8; Self::SIZE_BYTES];
        digest.finish(&mut out);
        out
    }
}

impl Default for Sha512 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha512 {
    fn algorithm_name(&self) -> &'static str {
        Self::ALGORITHM_NAME
    }

    fn digest_size(&self) -> usize {
        Self::SIZE_BYTES
    }

    fn update(&mut self, input: &[u8]) {
        self.buffer.update(input);
    }

    fn finish(&mut self, output: &mut [u8]) {
        self.buffer.finish_into(output);
    }

    fn reset(&mut self) {
        self.buffer.reset();
    }
}

/// Streaming SHA-384.
#[derive(Clone, Debug)]
pub struct Sha384 {
    buffer: BlockBuffer<Sha512Core>,
}

impl Sha384 {
    pub const ALGORITHM_NAME: &'static str = "SHA-384";
    pub const SIZE_BYTES: usize = 48;
    pub const BLOCK_BYTES: usize = 128;

    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BlockBuffer::new(Sha512Core::new(&SHA384_IV)),
        }
    }

    /// Hashes `data` in one shot.
    pub fn digest(data: &[u8]) -> [u8; Self::SIZE_BYTES] {
        let mut digest = Self::new();
        digest.update(data);
        let mut out = [0u8; Self::SIZE_BYTES];
        digest.finish(&mut out);
        out
    }
}

impl Default for Sha384 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha384 {
    fn algorithm_name(&self) -> &'static str {
        Self::ALGORITHM_NAME
    }

    fn digest_size(&self) -> usize {
        Self::SIZE_BYTES
    }

    fn update(&mut self, input: &[u8]) {
        self.buffer.update(input);
    }

    fn finish(&mut self, output: &mut [u8]) {
        self.buffer.finish_into(output);
    }

    fn reset(&mut self) {
        self.buffer.reset();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: splitting input at any point yields the one-shot digest
        #[test]
        fn prop_split_invariance(
            data in prop::collection::vec(any::<u8>(), 0..400),
            split in any::<prop::sample::Index>()
        ) {
            let at = split.index(data.len() + 1);
            let mut digest = Sha512::new();
            digest.update(&data[..at]);
            digest.update(&data[at..]);
            prop_assert_eq!(digest.build(), Sha512::digest(&data).to_vec());
        }
    }
}
