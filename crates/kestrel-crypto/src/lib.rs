//! # kestrel-crypto: Portable Cryptographic Primitives
//!
//! Pure software implementations of a small family of symmetric primitives,
//! each behind a narrow, resettable interface:
//!
//! - **Digests**: SHA-224, SHA-256, SHA-384, SHA-512 ([`Digest`])
//! - **Block cipher**: AES-128/192/256 ([`BlockCipher`])
//! - **Stream mode**: CTR over any block cipher ([`StreamCipher`])
//! - **MAC**: HMAC over any digest ([`Mac`])
//! - **KDF**: PBKDF2 over any MAC
//! - **Checksums**: CRC32 with IEEE, Castagnoli and Koopman polynomials
//!
//! # Architecture
//!
//! ```text
//!   bytes ──► Digest ──► Hmac ──► Pbkdf2
//!   bytes ──► BlockCipher ──► Ctr
//!   bytes ──► Crc32
//! ```
//!
//! Digests share one [`digest::BlockBuffer`] that owns padding and
//! buffering; each algorithm only supplies its compression function.
//!
//! Key schedules, pads and scratch buffers are zeroed on drop. None of the
//! primitives here are hardened against timing side channels.

pub mod aes;
pub mod cipher;
pub mod crc32;
pub mod ctr;
pub mod digest;
mod error;
pub mod hmac;
mod kani_proofs;
pub mod pbkdf2;
pub mod sha256;
pub mod sha512;
mod tests_assertions;

pub use aes::Aes;
pub use cipher::{BlockCipher, StreamCipher};
pub use crc32::{Crc32, Crc32Hasher, crc32, crc32c};
pub use ctr::Ctr;
pub use digest::Digest;
pub use error::{CryptoError, Result};
pub use hmac::{Hmac, Mac, hmac};
pub use pbkdf2::{Pbkdf2, pbkdf2};
pub use sha256::{Sha224, Sha256};
pub use sha512::{Sha384, Sha512};
