//! Error types for the cryptographic primitives.
//!
//! Every failure here is a caller contract violation detected before any
//! state is mutated. None of them are transient, so there is nothing to retry.

/// Errors returned by the primitives in this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// AES key is not 16, 24 or 32 bytes.
    #[error("invalid key size, expected: 16/24/32, actual: {actual}")]
    InvalidKeySize { actual: usize },

    /// CTR initialization vector does not match the cipher block size.
    #[error("IV length must equal block size, expected: {expected}, actual: {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    /// Source holds less than one full block.
    #[error("source not full block: need {required} bytes, got {actual}")]
    SourceTooShort { required: usize, actual: usize },

    /// Destination cannot hold the produced output.
    #[error("destination too small: need {required} bytes, got {actual}")]
    DestinationTooSmall { required: usize, actual: usize },

    /// HMAC cannot derive a block size for the wrapped digest.
    #[error("unsupported digest algorithm: {algorithm}")]
    UnsupportedDigest { algorithm: String },

    /// PBKDF2 iteration count below one.
    #[error("iteration count must be at least 1")]
    InvalidIterationCount,

    /// PBKDF2 output longer than the 32-bit block counter can address.
    #[error("derived key too long: requested {requested} bytes, max {max}")]
    DerivedKeyTooLong { requested: usize, max: u64 },

    /// Cipher was built without a decryption key schedule.
    #[error("cipher was constructed without a decryption key schedule")]
    DecryptionUnavailable,
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Fails with [`CryptoError::DestinationTooSmall`] unless `destination` can
/// hold `required` bytes.
pub(crate) fn ensure_destination(destination: &[u8], required: usize) -> Result<()> {
    if destination.len() < required {
        return Err(CryptoError::DestinationTooSmall {
            required,
            actual: destination.len(),
        });
    }
    Ok(())
}
