//! Cipher capability traits.
//!
//! [`BlockCipher`] transforms exactly one block per call and holds an
//! immutable key schedule, so it is used through `&self`. [`StreamCipher`]
//! carries a keystream position and advances it with every byte processed.

use crate::error::{CryptoError, Result, ensure_destination};

/// A keyed permutation over fixed-size blocks.
pub trait BlockCipher {
    /// Canonical algorithm name, e.g. `"AES"`.
    fn algorithm_name(&self) -> &'static str;

    /// Block length in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts the first block of `source` into the front of `destination`.
    ///
    /// Both slices must hold at least one block; excess bytes are ignored.
    /// Returns [`BlockCipher::block_size`].
    fn encrypt_into(&self, source: &[u8], destination: &mut [u8]) -> Result<usize>;

    /// Encrypts the first block of `source` into a new vector.
    fn encrypt_to_vec(&self, source: &[u8]) -> Result<Vec<u8>> {
        let mut destination = vec![0u8; self.block_size()];
        let written = self.encrypt_into(source, &mut destination)?;
        destination.truncate(written);
        Ok(destination)
    }
}

/// A keystream generator XORed over arbitrary-length input.
///
/// Encryption and decryption are the same operation.
pub trait StreamCipher {
    /// Algorithm name including the mode, e.g. `"AES/CTR"`.
    fn algorithm_name(&self) -> String;

    /// XORs `data` with the next `data.len()` keystream bytes in place.
    ///
    /// Fails when the keystream cannot be produced. Bytes before the failing
    /// block have then been processed and the position reflects them.
    fn apply_keystream(&mut self, data: &mut [u8]) -> Result<()>;

    /// Processes all of `source` into the front of `destination`, returning
    /// `source.len()`.
    ///
    /// Fails without advancing the keystream when `destination` is shorter
    /// than `source`.
    fn encrypt_into(&mut self, source: &[u8], destination: &mut [u8]) -> Result<usize> {
        ensure_destination(destination, source.len())?;
        let out = &mut destination[..source.len()];
        out.copy_from_slice(source);
        self.apply_keystream(out)?;
        Ok(source.len())
    }

    /// Processes all of `source` into a new vector.
    fn encrypt_to_vec(&mut self, source: &[u8]) -> Result<Vec<u8>> {
        let mut out = source.to_vec();
        self.apply_keystream(&mut out)?;
        Ok(out)
    }
}

/// Fails unless `source` and `destination` can each hold one `block_size`
/// block.
pub(crate) fn ensure_full_block(
    source: &[u8],
    destination: &[u8],
    block_size: usize,
) -> Result<()> {
    if source.len() < block_size {
        return Err(CryptoError::SourceTooShort {
            required: block_size,
            actual: source.len(),
        });
    }
    ensure_destination(destination, block_size)
}
