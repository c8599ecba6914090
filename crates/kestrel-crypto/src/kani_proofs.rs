//! Kani verification harnesses for the primitives
//!
//! Bounded model checking proofs for the arithmetic that the test vectors
//! only sample: counter carry, length encoding, key size validation and
//! checksum continuation.
//!
//! # Running Proofs
//!
//! ```bash
//! # Verify all crypto proofs
//! cargo kani --package kestrel-crypto
//!
//! # Verify specific proof
//! cargo kani --harness verify_counter_increment_matches_integer
//! ```

#[cfg(kani)]
mod verification {
    use crate::ctr::increment_be;
    use crate::digest::Word;
    use crate::{Aes, CryptoError, crc32};

    /// **Proof 1: counter increment is big-endian +1**
    ///
    /// **Property:** The counter bytes read as a big-endian integer advance
    /// by exactly one modulo 2^32
    #[kani::proof]
    #[kani::unwind(6)]
    fn verify_counter_increment_matches_integer() {
        let before: [u8; 4] = kani::any();
        let mut after = before;
        let wrapped = increment_be(&mut after);

        let expected = u32::from_be_bytes(before).wrapping_add(1);
        assert_eq!(u32::from_be_bytes(after), expected);
        assert_eq!(wrapped, u32::from_be_bytes(before) == u32::MAX);
    }

    /// **Proof 2: 32-bit length field split**
    ///
    /// **Property:** The two words reassemble the low 64 bits of the length
    #[kani::proof]
    fn verify_u32_length_field() {
        let bits: u64 = kani::any();
        let [high, low] = u32::length_field(u128::from(bits));
        assert_eq!((u64::from(high) << 32) | u64::from(low), bits);
    }

    /// **Proof 3: 64-bit length field split**
    ///
    /// **Property:** The two words reassemble the full 128-bit length
    #[kani::proof]
    fn verify_u64_length_field() {
        let bits: u128 = kani::any();
        let [high, low] = u64::length_field(bits);
        assert_eq!((u128::from(high) << 64) | u128::from(low), bits);
    }

    /// **Proof 4: AES accepts exactly three key sizes**
    ///
    /// **Property:** Every other length fails before key expansion
    #[kani::proof]
    #[kani::unwind(3)]
    fn verify_aes_rejects_invalid_key_sizes() {
        let len: usize = kani::any();
        kani::assume(len <= 64);
        kani::assume(!matches!(len, 16 | 24 | 32));

        let key = [0u8; 64];
        let result = Aes::encrypt_only(&key[..len]);
        assert!(matches!(result, Err(CryptoError::InvalidKeySize { actual }) if actual == len));
    }

    /// **Proof 5: AES schedule length**
    ///
    /// **Property:** The schedule holds `key_len + 28` words
    #[kani::proof]
    #[kani::unwind(65)]
    fn verify_aes_schedule_length() {
        let key = [0x42u8; 16];
        let aes = Aes::encrypt_only(&key);
        assert!(aes.is_ok());
        if let Ok(aes) = aes {
            assert_eq!(aes.encrypt_round_keys().len(), 44);
            assert_eq!(aes.rounds(), 10);
        }
    }

    /// **Proof 6: CRC32 continuation**
    ///
    /// **Property:** Resuming after any split equals the one-shot checksum
    #[kani::proof]
    #[kani::unwind(10)]
    fn verify_crc32_resume_split() {
        let data: [u8; 8] = kani::any();
        let split: usize = kani::any();
        kani::assume(split <= data.len());

        let head = crc32::IEEE.update(&data[..split]);
        assert_eq!(crc32::IEEE.resume(head, &data[split..]), crc32::crc32(&data));
    }
}
