//! FIPS 180-4 SHA-256 and SHA-224.
//!
//! ```text
//!          block  word  digest
//! SHA-224   512    32    224
//! SHA-256   512    32    256
//! ```
//!
//! Both share one compression core on top of the 32-bit [`BlockBuffer`];
//! SHA-224 differs only in its initial hash value and truncated output.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::digest::{BLOCK_WORDS, BlockBuffer, Compress, Digest, STATE_WORDS};

/// First 32 bits of the fractional parts of the cube roots of the first
/// sixty-four primes.
#[rustfmt::skip]
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// First 32 bits of the fractional parts of the square roots of the first
/// eight primes.
const SHA256_IV: [u32; STATE_WORDS] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Second 32 bits of the fractional parts of the square roots of the ninth
/// through sixteenth primes.
const SHA224_IV: [u32; STATE_WORDS] = [
    0xc1059ed8, 0x367cd507, 0x3070dd17, 0xf70e5939, 0xffc00b31, 0x68581511, 0x64f98fa7, 0xbefa4fa4,
];

#[inline(always)]
fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
fn sum0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn sum1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
fn sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct Sha256Core {
    state: [u32; STATE_WORDS],
    #[zeroize(skip)]
    iv: &'static [u32; STATE_WORDS],
}

impl Sha256Core {
    fn new(iv: &'static [u32; STATE_WORDS]) -> Self {
        Self { state: *iv, iv }
    }
}

impl Compress for Sha256Core {
    type Word = u32;

    fn compress(&mut self, block: &[u32; BLOCK_WORDS]) {
        let mut w = [0u32; 64];
        w[..BLOCK_WORDS].copy_from_slice(block);
        for t in BLOCK_WORDS..64 {
            w[t] = sigma1(w[t - 2])
                .wrapping_add(w[t - 7])
                .wrapping_add(sigma0(w[t - 15]))
                .wrapping_add(w[t - 16]);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.state;

        for t in 0..64 {
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

    fn chaining_value(&self) -> &[u32; STATE_WORDS] {
        &self.state
    }

    fn reset(&mut self) {
        self.state = *self.iv;
    }
}

/// Streaming SHA-256.
///
/// # Examples
///
/// ```
/// use kestrel_crypto::{Digest, Sha256};
///
/// let mut digest = Sha256::new();
/// digest.update(b"ab");
/// digest.update(b"c");
/// assert_eq!(digest.build(), Sha256::digest(b"abc"));
/// ```
#[derive(Clone, Debug)]
pub struct Sha256 {
    buffer: BlockBuffer<Sha256Core>,
}

impl Sha256 {
    pub const ALGORITHM_NAME: &'static str = "SHA-256";
    pub const SIZE_BYTES: usize = 32;
    pub const BLOCK_BYTES: usize = 64;

    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BlockBuffer::new(Sha256Core::new(&SHA256_IV)),
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

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha256 {
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

/// Streaming SHA-224.
#[derive(Clone, Debug)]
pub struct Sha224 {
    buffer: BlockBuffer<Sha256Core>,
}

impl Sha224 {
    pub const ALGORITHM_NAME: &'static str = "SHA-224";
    pub const SIZE_BYTES: usize = 28;
    pub const BLOCK_BYTES: usize = 64;

    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BlockBuffer::new(Sha256Core::new(&SHA224_IV)),
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

impl Default for Sha224 {
    fn default() -> Self {
        Self::new()
    }
}

impl Digest for Sha224 {
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
