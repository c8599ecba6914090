//! CRC32 checksums with slicing-by-8.
//!
//! Each polynomial instance owns eight 256-entry tables. Row 0 is the classic
//! byte-at-a-time table; row `k` advances row `k - 1` by one more zero byte,
//! which lets the main loop fold eight input bytes per step:
//!
//! ```text
//! lo = crc ^ le32(b0..b3)
//! crc = T7[lo0] ^ T6[lo1] ^ T5[lo2] ^ T4[lo3] ^ T3[b4] ^ T2[b5] ^ T1[b6] ^ T0[b7]
//! ```
//!
//! Tables are built lazily on first use and cached for the lifetime of the
//! instance, so the [`IEEE`], [`CASTAGNOLI`] and [`KOOPMAN`] statics pay the
//! construction cost once per process.
//!
//! ## Usage
//!
//! ```
//! use kestrel_crypto::crc32::{self, CASTAGNOLI};
//!
//! // One-shot calculation
//! assert_eq!(crc32::crc32(b"a"), 0xe8b7_be43);
//! assert_eq!(CASTAGNOLI.update(b"a"), 0xc1d0_4330);
//!
//! // Incremental calculation for streaming data
//! let mut hasher = crc32::IEEE.hasher();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//! assert_eq!(hasher.finalize(), crc32::crc32(b"hello world"));
//! ```

use std::sync::OnceLock;

/// IEEE 802.3 polynomial (reversed).
pub const IEEE_POLYNOMIAL: u32 = 0xEDB8_8320;

/// Castagnoli polynomial (reversed), used by iSCSI and ext4.
pub const CASTAGNOLI_POLYNOMIAL: u32 = 0x82F6_3B78;

/// Koopman polynomial (reversed).
pub const KOOPMAN_POLYNOMIAL: u32 = 0xEB31_D82E;

/// Number of slicing tables.
const SLICES: usize = 8;

/// Inputs shorter than this go byte-at-a-time.
const SLICING_THRESHOLD: usize = 16;

type Tables = [[u32; 256]; SLICES];

pub static IEEE: Crc32 = Crc32::new(IEEE_POLYNOMIAL);
pub static CASTAGNOLI: Crc32 = Crc32::new(CASTAGNOLI_POLYNOMIAL);
pub static KOOPMAN: Crc32 = Crc32::new(KOOPMAN_POLYNOMIAL);

/// Generates the byte-at-a-time table for `polynomial`.
const fn byte_table(polynomial: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 == 1 {
                crc = (crc >> 1) ^ polynomial;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Generates all eight slicing rows for `polynomial`.
const fn slicing_tables(polynomial: u32) -> Tables {
    let mut tables = [[0u32; 256]; SLICES];
    tables[0] = byte_table(polynomial);
    let mut i = 0;
    while i < 256 {
        let mut crc = tables[0][i];
        let mut k = 1;
        while k < SLICES {
            crc = tables[0][(crc & 0xFF) as usize] ^ (crc >> 8);
            tables[k][i] = crc;
            k += 1;
        }
        i += 1;
    }
    tables
}

/// A CRC32 variant identified by its reversed polynomial.
///
/// Instances are immutable once constructed and safe to share across
/// threads; the lazily built tables are initialized exactly once.
pub struct Crc32 {
    polynomial: u32,
    tables: OnceLock<Box<Tables>>,
}

impl Crc32 {
    /// Creates an instance for a reversed `polynomial`. No table is built
    /// until the first update.
    #[must_use]
    pub const fn new(polynomial: u32) -> Self {
        Self {
            polynomial,
            tables: OnceLock::new(),
        }
    }

    pub fn polynomial(&self) -> u32 {
        self.polynomial
    }

    /// Checksum of `data` from a fresh start.
    pub fn update(&self, data: &[u8]) -> u32 {
        self.resume(0, data)
    }

    /// Continues a checksum previously returned by [`Crc32::update`] or
    /// [`Crc32::resume`] with more `data`.
    ///
    /// `resume(update(a), b) == update(a ++ b)` for every split.
    pub fn resume(&self, crc: u32, data: &[u8]) -> u32 {
        let tables = self.tables();
        let mut crc = !crc;
        let mut rest = data;

        if rest.len() >= SLICING_THRESHOLD {
            let mut chunks = rest.chunks_exact(SLICES);
            for chunk in &mut chunks {
                let lo = crc ^ u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                crc = tables[7][(lo & 0xFF) as usize]
                    ^ tables[6][((lo >> 8) & 0xFF) as usize]
                    ^ tables[5][((lo >> 16) & 0xFF) as usize]
                    ^ tables[4][(lo >> 24) as usize]
                    ^ tables[3][chunk[4] as usize]
                    ^ tables[2][chunk[5] as usize]
                    ^ tables[1][chunk[6] as usize]
                    ^ tables[0][chunk[7] as usize];
            }
            rest = chunks.remainder();
        }

        for &byte in rest {
            crc = tables[0][((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
        }

        !crc
    }

    /// Starts an incremental checksum over this polynomial.
    pub fn hasher(&self) -> Crc32Hasher<'_> {
        Crc32Hasher { crc: self, value: 0 }
    }

    fn tables(&self) -> &Tables {
        self.tables.get_or_init(|| {
            tracing::debug!(
                polynomial = format_args!("{:#010x}", self.polynomial),
                "building crc32 slicing tables"
            );
            Box::new(slicing_tables(self.polynomial))
        })
    }

    #[cfg(test)]
    fn bytewise(&self, data: &[u8]) -> u32 {
        let row = &self.tables()[0];
        let mut crc = 0xFFFF_FFFFu32;
        for &byte in data {
            crc = row[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
        }
        !crc
    }
}

impl std::fmt::Debug for Crc32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crc32")
            .field("polynomial", &format_args!("{:#010x}", self.polynomial))
            .field("tables_built", &self.tables.get().is_some())
            .finish()
    }
}

/// Streaming CRC32 over one polynomial.
///
/// ```
/// use kestrel_crypto::crc32::{IEEE, crc32};
///
/// let mut hasher = IEEE.hasher();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc32(b"hello world"));
/// ```
#[derive(Debug, Clone)]
pub struct Crc32Hasher<'a> {
    crc: &'a Crc32,
    value: u32,
}

impl Crc32Hasher<'_> {
    pub fn update(&mut self, data: &[u8]) {
        self.value = self.crc.resume(self.value, data);
    }

    /// Checksum of everything absorbed so far.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Consumes the hasher to prevent reuse after finalization.
    #[must_use]
    pub fn finalize(self) -> u32 {
        self.value
    }
}

/// IEEE CRC32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    IEEE.update(data)
}

/// Castagnoli CRC32C of `data`.
pub fn crc32c(data: &[u8]) -> u32 {
    CASTAGNOLI.update(data)
}
