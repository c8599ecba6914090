//! AES block cipher (FIPS 197) for 128, 192 and 256-bit keys.
//!
//! Rounds run on 32-bit column words through four combined
//! SubBytes/ShiftRows/MixColumns tables; the final round substitutes through
//! the S-box directly. Decryption uses the equivalent inverse cipher, whose
//! round keys are the encryption keys in reverse with InvMixColumns applied
//! to every group except the first and last.
//!
//! ```text
//! key bytes   key words   rounds   schedule words
//!    16           4         10          44
//!    24           6         12          52
//!    32           8         14          60
//! ```
//!
//! # Example
//!
//! ```
//! use kestrel_crypto::{Aes, BlockCipher};
//!
//! let aes = Aes::new(&[0u8; 16])?;
//! let ciphertext = aes.encrypt_to_vec(&[0u8; 16])?;
//! assert_eq!(aes.decrypt_to_vec(&ciphertext)?, vec![0u8; 16]);
//! # Ok::<(), kestrel_crypto::CryptoError>(())
//! ```

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cipher::{BlockCipher, ensure_full_block};
use crate::error::{CryptoError, Result};

/// AES S-box (FIPS 197, Section 5.1.1).
#[rustfmt::skip]
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

static INV_SBOX: [u8; 256] = invert(&SBOX);

/// Key expansion round constants, x^(i-1) in GF(2^8).
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Forward round tables: S-box, ShiftRows and MixColumns per byte lane.
static TE: [[u32; 256]; 4] = forward_tables();

/// Inverse round tables: inverse S-box and InvMixColumns per byte lane.
static TD: [[u32; 256]; 4] = inverse_tables();

/// Multiplication in GF(2^8) modulo x^8 + x^4 + x^3 + x + 1.
const fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        let high = a & 0x80;
        a <<= 1;
        if high != 0 {
            a ^= 0x1b;
        }
        b >>= 1;
    }
    product
}

const fn invert(sbox: &[u8; 256]) -> [u8; 256] {
    let mut inverse = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        inverse[sbox[i] as usize] = i as u8;
        i += 1;
    }
    inverse
}

/// Rotates lane 0 into lanes 1..3.
const fn lanes(first: [u32; 256]) -> [[u32; 256]; 4] {
    let mut tables = [first; 4];
    let mut lane = 1;
    while lane < 4 {
        let mut i = 0;
        while i < 256 {
            tables[lane][i] = first[i].rotate_right(8 * lane as u32);
            i += 1;
        }
        lane += 1;
    }
    tables
}

const fn forward_tables() -> [[u32; 256]; 4] {
    let mut first = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let s = SBOX[i];
        first[i] = (gmul(s, 2) as u32) << 24 | (s as u32) << 16 | (s as u32) << 8 | gmul(s, 3) as u32;
        i += 1;
    }
    lanes(first)
}

const fn inverse_tables() -> [[u32; 256]; 4] {
    let inv = invert(&SBOX);
    let mut first = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let s = inv[i];
        first[i] = (gmul(s, 0x0e) as u32) << 24
            | (gmul(s, 0x09) as u32) << 16
            | (gmul(s, 0x0d) as u32) << 8
            | gmul(s, 0x0b) as u32;
        i += 1;
    }
    lanes(first)
}

#[inline(always)]
fn table_round(tables: &[[u32; 256]; 4], a: u32, b: u32, c: u32, d: u32) -> u32 {
    tables[0][(a >> 24) as usize]
        ^ tables[1][((b >> 16) & 0xFF) as usize]
        ^ tables[2][((c >> 8) & 0xFF) as usize]
        ^ tables[3][(d & 0xFF) as usize]
}

#[inline(always)]
fn substitute(sbox: &[u8; 256], a: u32, b: u32, c: u32, d: u32) -> u32 {
    u32::from(sbox[(a >> 24) as usize]) << 24
        | u32::from(sbox[((b >> 16) & 0xFF) as usize]) << 16
        | u32::from(sbox[((c >> 8) & 0xFF) as usize]) << 8
        | u32::from(sbox[(d & 0xFF) as usize])
}

#[inline(always)]
fn sub_word(w: u32) -> u32 {
    substitute(&SBOX, w, w, w, w)
}

/// InvMixColumns on one schedule word.
#[inline(always)]
fn inv_mix_column(w: u32) -> u32 {
    TD[0][SBOX[(w >> 24) as usize] as usize]
        ^ TD[1][SBOX[((w >> 16) & 0xFF) as usize] as usize]
        ^ TD[2][SBOX[((w >> 8) & 0xFF) as usize] as usize]
        ^ TD[3][SBOX[(w & 0xFF) as usize] as usize]
}

fn load(block: &[u8]) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

fn store(words: [u32; 4], block: &mut [u8]) {
    for (chunk, word) in block.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
}

/// Expands `key` into the encryption schedule and, when `decrypt` is set,
/// the equivalent-inverse-cipher schedule.
fn expand_key(key: &[u8], decrypt: bool) -> (Vec<u32>, Vec<u32>) {
    let nk = key.len() / 4;
    let n = key.len() + 28;

    let mut enc = vec![0u32; n];
    for (word, chunk) in enc.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for i in nk..n {
        let mut t = enc[i - 1];
        if i % nk == 0 {
            t = sub_word(t.rotate_left(8)) ^ (u32::from(RCON[i / nk - 1]) << 24);
        } else if nk > 6 && i % nk == 4 {
            t = sub_word(t);
        }
        enc[i] = enc[i - nk] ^ t;
    }

    if !decrypt {
        return (enc, Vec::new());
    }

    let mut dec = vec![0u32; n];
    for i in (0..n).step_by(4) {
        let ei = n - i - 4;
        for j in 0..4 {
            let word = enc[ei + j];
            dec[i + j] = if i > 0 && i + 4 < n {
                inv_mix_column(word)
            } else {
                word
            };
        }
    }
    (enc, dec)
}

/// AES with a precomputed key schedule.
///
/// The raw key is only read during construction; the schedules are wiped
/// when the cipher is dropped.
#[derive(Clone)]
pub struct Aes {
    encrypt_keys: Vec<u32>,
    decrypt_keys: Vec<u32>,
}

impl Aes {
    pub const ALGORITHM_NAME: &'static str = "AES";
    pub const BLOCK_SIZE: usize = 16;

    /// Builds both encryption and decryption schedules.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::with_schedules(key, true)
    }

    /// Builds only the encryption schedule. Sufficient for CTR mode;
    /// [`Aes::decrypt_into`] fails with [`CryptoError::DecryptionUnavailable`].
    pub fn encrypt_only(key: &[u8]) -> Result<Self> {
        Self::with_schedules(key, false)
    }

    fn with_schedules(key: &[u8], decrypt: bool) -> Result<Self> {
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(CryptoError::InvalidKeySize { actual: key.len() });
        }
        let (encrypt_keys, decrypt_keys) = expand_key(key, decrypt);
        let aes = Self {
            encrypt_keys,
            decrypt_keys,
        };
        tracing::debug!(
            key_bits = aes.key_bits(),
            rounds = aes.rounds(),
            decrypt,
            "expanded aes key schedule"
        );
        Ok(aes)
    }

    pub fn key_bits(&self) -> usize {
        (self.encrypt_keys.len() - 28) * 8
    }

    pub fn rounds(&self) -> usize {
        self.encrypt_keys.len() / 4 - 1
    }

    /// Whether a decryption schedule was built.
    pub fn can_decrypt(&self) -> bool {
        !self.decrypt_keys.is_empty()
    }

    /// Decrypts the first block of `source` into the front of `destination`.
    pub fn decrypt_into(&self, source: &[u8], destination: &mut [u8]) -> Result<usize> {
        if !self.can_decrypt() {
            return Err(CryptoError::DecryptionUnavailable);
        }
        ensure_full_block(source, destination, Self::BLOCK_SIZE)?;
        let block = self.decrypt_block(load(&source[..Self::BLOCK_SIZE]));
        store(block, &mut destination[..Self::BLOCK_SIZE]);
        Ok(Self::BLOCK_SIZE)
    }

    /// Decrypts the first block of `source` into a new vector.
    pub fn decrypt_to_vec(&self, source: &[u8]) -> Result<Vec<u8>> {
        let mut destination = vec![0u8; Self::BLOCK_SIZE];
        self.decrypt_into(source, &mut destination)?;
        Ok(destination)
    }

    #[cfg(any(test, kani))]
    pub(crate) fn encrypt_round_keys(&self) -> &[u32] {
        &self.encrypt_keys
    }

    #[cfg(test)]
    fn decrypt_round_keys(&self) -> &[u32] {
        &self.decrypt_keys
    }

    fn encrypt_block(&self, input: [u32; 4]) -> [u32; 4] {
        let keys = &self.encrypt_keys;
        let [mut s0, mut s1, mut s2, mut s3] = input;
        s0 ^= keys[0];
        s1 ^= keys[1];
        s2 ^= keys[2];
        s3 ^= keys[3];

        let mut k = 4;
        for _ in 0..keys.len() / 4 - 2 {
            let t0 = keys[k] ^ table_round(&TE, s0, s1, s2, s3);
            let t1 = keys[k + 1] ^ table_round(&TE, s1, s2, s3, s0);
            let t2 = keys[k + 2] ^ table_round(&TE, s2, s3, s0, s1);
            let t3 = keys[k + 3] ^ table_round(&TE, s3, s0, s1, s2);
            (s0, s1, s2, s3) = (t0, t1, t2, t3);
            k += 4;
        }

        [
            keys[k] ^ substitute(&SBOX, s0, s1, s2, s3),
            keys[k + 1] ^ substitute(&SBOX, s1, s2, s3, s0),
            keys[k + 2] ^ substitute(&SBOX, s2, s3, s0, s1),
            keys[k + 3] ^ substitute(&SBOX, s3, s0, s1, s2),
        ]
    }

    fn decrypt_block(&self, input: [u32; 4]) -> [u32; 4] {
        let keys = &self.decrypt_keys;
        let [mut s0, mut s1, mut s2, mut s3] = input;
        s0 ^= keys[0];
        s1 ^= keys[1];
        s2 ^= keys[2];
        s3 ^= keys[3];

        let mut k = 4;
        for _ in 0..keys.len() / 4 - 2 {
            let t0 = keys[k] ^ table_round(&TD, s0, s3, s2, s1);
            let t1 = keys[k + 1] ^ table_round(&TD, s1, s0, s3, s2);
            let t2 = keys[k + 2] ^ table_round(&TD, s2, s1, s0, s3);
            let t3 = keys[k + 3] ^ table_round(&TD, s3, s2, s1, s0);
            (s0, s1, s2, s3) = (t0, t1, t2, t3);
            k += 4;
        }

        [
            keys[k] ^ substitute(&INV_SBOX, s0, s3, s2, s1),
            keys[k + 1] ^ substitute(&INV_SBOX, s1, s0, s3, s2),
            keys[k + 2] ^ substitute(&INV_SBOX, s2, s1, s0, s3),
            keys[k + 3] ^ substitute(&INV_SBOX, s3, s2, s1, s0),
        ]
    }
}

impl BlockCipher for Aes {
    fn algorithm_name(&self) -> &'static str {
        Self::ALGORITHM_NAME
    }

    fn block_size(&self) -> usize {
        Self::BLOCK_SIZE
    }

    fn encrypt_into(&self, source: &[u8], destination: &mut [u8]) -> Result<usize> {
        ensure_full_block(source, destination, Self::BLOCK_SIZE)?;
        let block = self.encrypt_block(load(&source[..Self::BLOCK_SIZE]));
        store(block, &mut destination[..Self::BLOCK_SIZE]);
        Ok(Self::BLOCK_SIZE)
    }
}

// Wiping empties the schedules, so it only happens on drop.
impl Drop for Aes {
    fn drop(&mut self) {
        self.encrypt_keys.zeroize();
        self.decrypt_keys.zeroize();
    }
}

impl ZeroizeOnDrop for Aes {}

impl std::fmt::Debug for Aes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes")
            .field("key_bits", &self.key_bits())
            .field("rounds", &self.rounds())
            .field("can_decrypt", &self.can_decrypt())
            .finish_non_exhaustive()
    }
}
