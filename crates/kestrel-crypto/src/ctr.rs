//! Counter mode over any [`BlockCipher`].
//!
//! The counter block starts as the IV. Whenever the keystream buffer is used
//! up, the current counter is encrypted into it and the counter is
//! incremented as a big-endian integer. A counter of all `0xFF` bytes wraps
//! to all zeros.

use zeroize::Zeroize;

use crate::cipher::{BlockCipher, StreamCipher};
use crate::error::{CryptoError, Result};

/// A [`StreamCipher`] built from a block cipher and an initial counter.
///
/// # Example
///
/// ```
/// use kestrel_crypto::{Aes, Ctr, StreamCipher};
///
/// let key = [0x11u8; 16];
/// let iv = [0u8; 16];
///
/// let mut encryptor = Ctr::new(Aes::encrypt_only(&key)?, &iv)?;
/// let ciphertext = encryptor.encrypt_to_vec(b"attack at dawn")?;
///
/// let mut decryptor = Ctr::new(Aes::encrypt_only(&key)?, &iv)?;
/// assert_eq!(decryptor.encrypt_to_vec(&ciphertext)?, b"attack at dawn");
/// # Ok::<(), kestrel_crypto::CryptoError>(())
/// ```
pub struct Ctr<C: BlockCipher> {
    cipher: C,
    counter: Vec<u8>,
    keystream: Vec<u8>,
    /// Next unused keystream byte; equal to the block size when exhausted.
    position: usize,
}

impl<C: BlockCipher> Ctr<C> {
    /// Fails with [`CryptoError::InvalidIvLength`] unless `iv` is exactly one
    /// block long.
    pub fn new(cipher: C, iv: &[u8]) -> Result<Self> {
        let block_size = cipher.block_size();
        if iv.len() != block_size {
            return Err(CryptoError::InvalidIvLength {
                expected: block_size,
                actual: iv.len(),
            });
        }
        Ok(Self {
            cipher,
            counter: iv.to_vec(),
            keystream: vec![0u8; block_size],
            position: block_size,
        })
    }

    /// The wrapped block cipher.
    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// The counter block that will be encrypted next.
    pub fn counter(&self) -> &[u8] {
        &self.counter
    }

    /// Encrypts the counter into the keystream buffer, then advances it.
    /// On error neither the counter nor the position moves.
    fn refill(&mut self) -> Result<()> {
        self.cipher.encrypt_into(&self.counter, &mut self.keystream)?;

        if increment_be(&mut self.counter) {
            tracing::warn!(
                algorithm = self.cipher.algorithm_name(),
                "ctr counter wrapped around to zero"
            );
        }
        self.position = 0;
        Ok(())
    }
}

/// Big-endian increment with carry. Returns `true` when the counter wrapped.
pub(crate) fn increment_be(counter: &mut [u8]) -> bool {
    for byte in counter.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            return false;
        }
    }
    true
}

impl<C: BlockCipher> StreamCipher for Ctr<C> {
    fn algorithm_name(&self) -> String {
        format!("{}/CTR", self.cipher.algorithm_name())
    }

    fn apply_keystream(&mut self, data: &mut [u8]) -> Result<()> {
        let block_size = self.keystream.len();
        for byte in data {
            if self.position == block_size {
                self.refill()?;
            }
            *byte ^= self.keystream[self.position];
            self.position += 1;
        }
        Ok(())
    }
}

impl<C: BlockCipher> Drop for Ctr<C> {
    fn drop(&mut self) {
        self.counter.zeroize();
        self.keystream.zeroize();
    }
}

impl<C: BlockCipher> std::fmt::Debug for Ctr<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ctr")
            .field("algorithm", &self.cipher.algorithm_name())
            .field("block_size", &self.keystream.len())
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::Aes;
    use hex_literal::hex;
    use test_case::test_case;

    const COUNTER: [u8; 16] = hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");

    const PLAINTEXT: [u8; 64] = hex!(
        "6bc1bee22e409f96e93d7e117393172a"
        "ae2d8a571e03ac9c9eb76fac45af8e51"
        "30c81c46a35ce411e5fbc1191a0a52ef"
        "f69f2445df4f9b17ad2b417be66c3710"
    );

    #[test_case(
        &hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        hex!(
            "874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff"
            "5ae4df3edbd5d35e5b4f09020db03eab1e031dda2fbe03d1792170a0f3009cee"
        );
        "aes 128"
    )]
    #[test_case(
        &hex!("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b"),
        hex!(
            "1abc932417521ca24f2b0459fe7e6e0b090339ec0aa6faefd5ccc2c6f4ce8e94"
            "1e36b26bd1ebc670d1bd1d665620abf74f78a7f6d29809585a97daec58c6b050"
        );
        "aes 192"
    )]
    #[test_case(
        &hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"),
        hex!(
            "601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c5"
            "2b0930daa23de94ce87017ba2d84988ddfc9c58db67aada613c2dd08457941a6"
        );
        "aes 256"
    )]
    fn test_sp800_38a_vectors(key: &[u8], ciphertext: [u8; 64]) {
        let mut ctr = Ctr::new(Aes::new(key).expect("valid key"), &COUNTER).expect("valid iv");
        assert_eq!(ctr.encrypt_to_vec(&PLAINTEXT).expect("keystream"), ciphertext);

        let mut ctr = Ctr::new(Aes::new(key).expect("valid key"), &COUNTER).expect("valid iv");
        assert_eq!(ctr.encrypt_to_vec(&ciphertext).expect("keystream"), PLAINTEXT);
    }

    #[test]
    fn test_iv_length_must_match_block() {
        let aes = Aes::encrypt_only(&[0u8; 16]).expect("valid key");
        let err = Ctr::new(aes, &[0u8; 12]).expect_err("short iv");
        assert_eq!(
            err,
            CryptoError::InvalidIvLength {
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn test_counter_increments_per_block() {
        let aes = Aes::encrypt_only(&[0u8; 16]).expect("valid key");
        let mut ctr = Ctr::new(aes, &[0u8; 16]).expect("valid iv");

        // Nothing is encrypted until the first byte arrives.
        assert_eq!(ctr.counter(), &[0u8; 16]);
        ctr.apply_keystream(&mut [0u8; 1]).expect("keystream");
        assert_eq!(ctr.counter()[15], 1);
        ctr.apply_keystream(&mut [0u8; 15]).expect("keystream");
        assert_eq!(ctr.counter()[15], 1);
        ctr.apply_keystream(&mut [0u8; 1]).expect("keystream");
        assert_eq!(ctr.counter()[15], 2);
    }

    #[test]
    fn test_carry_propagates() {
        let mut counter = hex!("000000000000000000000000000000ff");
        assert!(!increment_be(&mut counter));
        assert_eq!(counter, hex!("00000000000000000000000000000100"));

        let mut counter = hex!("0000000000000000ffffffffffffffff");
        assert!(!increment_be(&mut counter));
        assert_eq!(counter, hex!("00000000000000010000000000000000"));
    }

    #[test]
    fn test_counter_wraps_to_zero() {
        let aes = Aes::encrypt_only(&[0u8; 16]).expect("valid key");
        let mut ctr = Ctr::new(aes, &[0xFF; 16]).expect("valid iv");
        ctr.apply_keystream(&mut [0u8; 16]).expect("keystream");
        assert_eq!(ctr.counter(), &[0u8; 16]);

        // Keystream after wrap equals the one produced from an all-zero IV.
        let mut wrapped = [0u8; 16];
        ctr.apply_keystream(&mut wrapped).expect("keystream");

        let aes = Aes::encrypt_only(&[0u8; 16]).expect("valid key");
        let mut fresh = Ctr::new(aes, &[0u8; 16]).expect("valid iv");
        assert_eq!(fresh.encrypt_to_vec(&[0u8; 16]).expect("keystream"), wrapped);
    }

    #[test]
    fn test_algorithm_name() {
        let aes = Aes::encrypt_only(&[0u8; 32]).expect("valid key");
        let ctr = Ctr::new(aes, &[0u8; 16]).expect("valid iv");
        assert_eq!(ctr.algorithm_name(), "AES/CTR");
    }

    #[test]
    fn test_empty_input_does_not_advance() {
        let aes = Aes::encrypt_only(&[0u8; 16]).expect("valid key");
        let mut ctr = Ctr::new(aes, &COUNTER).expect("valid iv");
        assert!(ctr.encrypt_to_vec(&[]).expect("keystream").is_empty());
        assert_eq!(ctr.counter(), &COUNTER);
    }

    /// A 16-byte block cipher whose every call fails.
    struct Unkeyed;

    impl BlockCipher for Unkeyed {
        fn algorithm_name(&self) -> &'static str {
            "UNKEYED"
        }

        fn block_size(&self) -> usize {
            16
        }

        fn encrypt_into(&self, _source: &[u8], _destination: &mut [u8]) -> Result<usize> {
            Err(CryptoError::InvalidKeySize { actual: 0 })
        }
    }

    #[test]
    fn test_block_cipher_error_propagates() {
        let mut ctr = Ctr::new(Unkeyed, &COUNTER).expect("valid iv");
        let plaintext = [0x5Au8; 32];

        assert_eq!(
            ctr.encrypt_to_vec(&plaintext),
            Err(CryptoError::InvalidKeySize { actual: 0 })
        );

        let mut data = plaintext;
        assert!(ctr.apply_keystream(&mut data).is_err());
        // The failing block consumed neither the counter nor any input byte.
        assert_eq!(ctr.counter(), &COUNTER);
        assert_eq!(data, plaintext);

        let mut out = [0u8; 32];
        assert!(ctr.encrypt_into(&plaintext, &mut out).is_err());
        assert_eq!(ctr.counter(), &COUNTER);
    }
}
