//! PBKDF2 (RFC 8018, Section 5.2) over any [`Mac`].
//!
//! ```text
//! DK = T_1 || T_2 || ... || T_l            truncated to key_length
//! T_i = U_1 ^ U_2 ^ ... ^ U_c
//! U_1 = PRF(P, S || INT(i))
//! U_j = PRF(P, U_{j-1})
//! ```

use zeroize::Zeroizing;

use crate::digest::Digest;
use crate::error::{CryptoError, Result, ensure_destination};
use crate::hmac::{Hmac, Mac};

/// Largest block index; `INT(i)` is a 32-bit big-endian counter.
const MAX_BLOCKS: u64 = u32::MAX as u64;

/// Password-based key generator.
///
/// The password is bound into the MAC key once at construction and is not
/// retained afterwards. The salt is copied.
///
/// # Example
///
/// ```
/// use kestrel_crypto::{Pbkdf2, Sha256};
///
/// let mut kdf = Pbkdf2::with_digest(Sha256::new(), b"password", b"salt", 1)?;
/// let key = kdf.derive_key(20)?;
/// assert_eq!(key[..4], [0x12, 0x0f, 0xb6, 0xcf]);
/// # Ok::<(), kestrel_crypto::CryptoError>(())
/// ```
pub struct Pbkdf2<M: Mac> {
    mac: M,
    salt: Vec<u8>,
    iterations: u32,
    /// `U_j` scratch, one MAC long.
    state: Zeroizing<Vec<u8>>,
    /// `T_i` accumulator, one MAC long.
    block: Zeroizing<Vec<u8>>,
}

impl<M: Mac> Pbkdf2<M> {
    /// Fails with [`CryptoError::InvalidIterationCount`] when `iterations`
    /// is zero.
    pub fn new(mut mac: M, password: &[u8], salt: &[u8], iterations: u32) -> Result<Self> {
        if iterations < 1 {
            return Err(CryptoError::InvalidIterationCount);
        }
        mac.init(password);
        let mac_size = mac.mac_size();
        Ok(Self {
            mac,
            salt: salt.to_vec(),
            iterations,
            state: Zeroizing::new(vec![0u8; mac_size]),
            block: Zeroizing::new(vec![0u8; mac_size]),
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Longest key this generator can produce.
    pub fn max_key_length(&self) -> u64 {
        MAX_BLOCKS * self.mac.mac_size() as u64
    }

    /// Derives `key_length` bytes into the front of `destination`.
    pub fn derive_key_into(&mut self, key_length: usize, destination: &mut [u8]) -> Result<usize> {
        self.check_length(key_length)?;
        ensure_destination(destination, key_length)?;

        tracing::debug!(
            algorithm = %self.mac.algorithm_name(),
            iterations = self.iterations,
            key_length,
            "deriving pbkdf2 key"
        );

        self.mac.reset();
        let mac_size = self.mac.mac_size();
        for (index, chunk) in destination[..key_length].chunks_mut(mac_size).enumerate() {
            // Bounded by check_length.
            let counter = (index + 1) as u32;
            self.derive_block(counter);
            chunk.copy_from_slice(&self.block[..chunk.len()]);
        }
        Ok(key_length)
    }

    /// Derives `key_length` bytes into a new vector.
    pub fn derive_key(&mut self, key_length: usize) -> Result<Vec<u8>> {
        self.check_length(key_length)?;
        let mut key = vec![0u8; key_length];
        self.derive_key_into(key_length, &mut key)?;
        Ok(key)
    }

    fn check_length(&self, key_length: usize) -> Result<()> {
        let max = self.max_key_length();
        if key_length as u64 > max {
            return Err(CryptoError::DerivedKeyTooLong {
                requested: key_length,
                max,
            });
        }
        Ok(())
    }

    /// Computes `T_counter` into `self.block`.
    fn derive_block(&mut self, counter: u32) {
        if !self.salt.is_empty() {
            self.mac.update(&self.salt);
        }
        self.mac.update(&counter.to_be_bytes());
        self.mac.finish(&mut self.state);
        self.block.copy_from_slice(&self.state);

        for _ in 1..self.iterations {
            self.mac.update(&self.state);
            self.mac.finish(&mut self.state);
            for (acc, u) in self.block.iter_mut().zip(self.state.iter()) {
                *acc ^= u;
            }
        }
    }
}

impl<D: Digest> Pbkdf2<Hmac<D>> {
    /// PBKDF2 with HMAC over `digest`.
    pub fn with_digest(digest: D, password: &[u8], salt: &[u8], iterations: u32) -> Result<Self> {
        Self::new(Hmac::new(digest)?, password, salt, iterations)
    }
}

impl<M: Mac> std::fmt::Debug for Pbkdf2<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pbkdf2")
            .field("algorithm", &self.mac.algorithm_name())
            .field("iterations", &self.iterations)
            .field("salt_len", &self.salt.len())
            .finish_non_exhaustive()
    }
}

/// One-shot PBKDF2-HMAC over `digest`.
pub fn pbkdf2<D: Digest>(
    digest: D,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_length: usize,
) -> Result<Vec<u8>> {
    Pbkdf2::with_digest(digest, password, salt, iterations)?.derive_key(key_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmac::hmac;
    use crate::sha256::Sha256;
    use crate::sha512::Sha512;
    use hex_literal::hex;
    use test_case::test_case;

    #[test_case(b"password", b"salt", 1, &hex!("120fb6cffcf8b32c43e7225256c4f837a86548c9"); "c1")]
    #[test_case(b"password", b"salt", 2, &hex!("ae4d0c95af6b46d32d0adff928f06dd02a303f8e"); "c2")]
    #[test_case(b"password", b"salt", 4096, &hex!("c5e478d59288c841aa530db6845c4c8d962893a0"); "c4096")]
    #[test_case(
        b"passwordPASSWORDpassword",
        b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
        4096,
        &hex!("348c89dbcbd32b2f32d814b8116e84cf2b17347ebc1800181c");
        "long password and salt"
    )]
    #[test_case(b"pass\0word", b"sa\0lt", 4096, &hex!("89b69d0516f829893c696226650a8687"); "embedded nul")]
    fn test_hmac_sha256_vectors(password: &[u8], salt: &[u8], iterations: u32, expected: &[u8]) {
        let key = pbkdf2(Sha256::new(), password, salt, iterations, expected.len()).expect("valid");
        assert_eq!(key, expected);
    }

    #[test]
    fn test_multi_block_output() {
        // 80 bytes spans three SHA-256 blocks; the prefix matches a shorter request.
        let long = pbkdf2(Sha256::new(), b"password", b"salt", 2, 80).expect("valid");
        let short = pbkdf2(Sha256::new(), b"password", b"salt", 2, 20).expect("valid");
        assert_eq!(long.len(), 80);
        assert_eq!(&long[..20], &short[..]);
        assert_eq!(&long[..20], &hex!("ae4d0c95af6b46d32d0adff928f06dd02a303f8e"));
    }

    #[test_case(1, &hex!("c1232f10f62715fda06ae7c0a2037ca19b33cf103b727ba56d870c11f290a2ab"); "c1")]
    #[test_case(2, &hex!("8bc2f9167a81cdcfad1235cd9047f1136271c1f978fcfcb35e22dbeafa4634f6"); "c2")]
    fn test_empty_salt_vectors(iterations: u32, expected: &[u8]) {
        let derived = pbkdf2(Sha256::new(), b"password", b"", iterations, 32).expect("valid");
        assert_eq!(derived, expected);
    }

    #[test]
    fn test_empty_salt_skips_salt_segment() {
        let derived = pbkdf2(Sha256::new(), b"password", b"", 1, 32).expect("valid");
        let u1 = hmac(Sha256::new(), b"password", &1u32.to_be_bytes()).expect("supported");
        assert_eq!(derived, u1);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = Pbkdf2::with_digest(Sha256::new(), b"p", b"s", 0).expect_err("zero iterations");
        assert_eq!(err, CryptoError::InvalidIterationCount);
    }

    #[test]
    fn test_key_length_limit() {
        let mut kdf = Pbkdf2::with_digest(Sha512::new(), b"p", b"s", 1).expect("valid");
        let max = kdf.max_key_length();
        assert_eq!(max, u64::from(u32::MAX) * 64);
        let requested = usize::try_from(max + 1).unwrap_or(usize::MAX);
        assert!(matches!(
            kdf.derive_key(requested),
            Err(CryptoError::DerivedKeyTooLong { .. })
        ));
    }

    #[test]
    fn test_derive_into_offset_and_small_destination() {
        let mut kdf = Pbkdf2::with_digest(Sha256::new(), b"password", b"salt", 1).expect("valid");

        let mut small = [0u8; 10];
        assert_eq!(
            kdf.derive_key_into(20, &mut small),
            Err(CryptoError::DestinationTooSmall {
                required: 20,
                actual: 10
            })
        );

        let mut out = [0xEEu8; 24];
        assert_eq!(kdf.derive_key_into(20, &mut out[2..22]).expect("room"), 20);
        assert_eq!(&out[..2], &[0xEE, 0xEE]);
        assert_eq!(&out[2..22], &hex!("120fb6cffcf8b32c43e7225256c4f837a86548c9"));
        assert_eq!(&out[22..], &[0xEE, 0xEE]);
    }

    #[test]
    fn test_generator_reusable() {
        let mut kdf = Pbkdf2::with_digest(Sha256::new(), b"password", b"salt", 2).expect("valid");
        let first = kdf.derive_key(20).expect("valid");
        let second = kdf.derive_key(20).expect("valid");
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_length_key() {
        let key = pbkdf2(Sha256::new(), b"password", b"salt", 1, 0).expect("valid");
        assert!(key.is_empty());
    }
}
