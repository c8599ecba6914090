//! HMAC (RFC 2104) over any [`Digest`].
//!
//! `H(K ^ opad, H(K ^ ipad, text))`
//!
//! The inner digest is kept seeded with `K ^ ipad` between messages, so a
//! MAC can be computed repeatedly with the same key by alternating
//! [`Mac::update`] and [`Mac::build`].

use zeroize::Zeroizing;

use crate::digest::Digest;
use crate::error::{CryptoError, Result, ensure_destination};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// A keyed message authentication code.
pub trait Mac {
    /// Algorithm name, e.g. `"HMAC/SHA-256"`.
    fn algorithm_name(&self) -> String;

    /// MAC length in bytes.
    fn mac_size(&self) -> usize;

    /// Rekeys and discards any absorbed input.
    fn init(&mut self, key: &[u8]);

    /// Absorbs `input`.
    fn update(&mut self, input: &[u8]);

    /// Writes the MAC into `output` and re-seeds for the next message under
    /// the same key.
    ///
    /// Implementation hook behind [`Mac::build_into`] and [`Mac::build`];
    /// call those instead.
    ///
    /// # Preconditions
    ///
    /// `output.len()` must equal [`Mac::mac_size`]. A shorter slice receives
    /// a truncated MAC and the message is still consumed.
    #[doc(hidden)]
    fn finish(&mut self, output: &mut [u8]);

    /// Discards absorbed input, keeping the key.
    fn reset(&mut self);

    /// Finalizes into the front of `output`, returning the bytes written.
    fn build_into(&mut self, output: &mut [u8]) -> Result<usize> {
        let size = self.mac_size();
        ensure_destination(output, size)?;
        self.finish(&mut output[..size]);
        Ok(size)
    }

    /// Finalizes into a freshly allocated vector.
    fn build(&mut self) -> Vec<u8> {
        let mut output = vec![0u8; self.mac_size()];
        self.finish(&mut output);
        output
    }
}

/// Internal block length in bytes for a digest algorithm name.
pub fn block_size_for(algorithm: &str) -> Option<usize> {
    match algorithm {
        "MD2" => Some(16),
        "MD4" | "MD5" => Some(64),
        "SHA-1" | "SHA-224" | "SHA-256" => Some(64),
        "SHA-384" | "SHA-512" => Some(128),
        "RIPEMD128" | "RIPEMD160" => Some(64),
        "Tiger" | "Whirlpool" => Some(64),
        "GOST3411" => Some(32),
        _ => None,
    }
}

/// HMAC keyed over a wrapped digest.
///
/// # Example
///
/// ```
/// use kestrel_crypto::{Hmac, Mac, Sha256};
///
/// let mut mac = Hmac::with_key(Sha256::new(), b"key")?;
/// mac.update(b"The quick brown fox jumps over the lazy dog");
/// let tag = mac.build();
/// assert_eq!(tag.len(), 32);
/// # Ok::<(), kestrel_crypto::CryptoError>(())
/// ```
#[derive(Clone)]
pub struct Hmac<D: Digest> {
    digest: D,
    block_size: usize,
    /// `K ^ ipad`, one block.
    input_pad: Zeroizing<Vec<u8>>,
    /// `K ^ opad` followed by room for the inner digest.
    output_buf: Zeroizing<Vec<u8>>,
}

impl<D: Digest> Hmac<D> {
    /// Wraps `digest` keyed with the empty key.
    ///
    /// Fails with [`CryptoError::UnsupportedDigest`] when the digest's block
    /// size is unknown.
    pub fn new(digest: D) -> Result<Self> {
        Self::with_key(digest, &[])
    }

    /// Wraps `digest` keyed with `key`.
    pub fn with_key(digest: D, key: &[u8]) -> Result<Self> {
        let algorithm = digest.algorithm_name();
        let block_size = block_size_for(algorithm).ok_or_else(|| CryptoError::UnsupportedDigest {
            algorithm: algorithm.to_string(),
        })?;
        let digest_size = digest.digest_size();
        let mut hmac = Self {
            digest,
            block_size,
            input_pad: Zeroizing::new(vec![0u8; block_size]),
            output_buf: Zeroizing::new(vec![0u8; block_size + digest_size]),
        };
        hmac.init(key);
        Ok(hmac)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl<D: Digest> Mac for Hmac<D> {
    fn algorithm_name(&self) -> String {
        format!("HMAC/{}", self.digest.algorithm_name())
    }

    fn mac_size(&self) -> usize {
        self.digest.digest_size()
    }

    fn init(&mut self, key: &[u8]) {
        self.digest.reset();

        let key_length = if key.len() > self.block_size {
            tracing::debug!(
                algorithm = self.digest.algorithm_name(),
                block_size = self.block_size,
                "hashing hmac key longer than block size"
            );
            let digest_size = self.digest.digest_size();
            self.digest.update(key);
            self.digest.finish(&mut self.input_pad[..digest_size]);
            digest_size
        } else {
            self.input_pad[..key.len()].copy_from_slice(key);
            key.len()
        };
        self.input_pad[key_length..].fill(0);

        let block_size = self.block_size;
        self.output_buf[..block_size].copy_from_slice(&self.input_pad);
        self.output_buf[block_size..].fill(0);

        for byte in self.input_pad.iter_mut() {
            *byte ^= IPAD;
        }
        for byte in &mut self.output_buf[..block_size] {
            *byte ^= OPAD;
        }

        self.digest.update(&self.input_pad);
    }

    fn update(&mut self, input: &[u8]) {
        self.digest.update(input);
    }

    fn finish(&mut self, output: &mut [u8]) {
        let block_size = self.block_size;
        self.digest.finish(&mut self.output_buf[block_size..]);
        self.digest.update(&self.output_buf);
        self.digest.finish(output);
        self.output_buf[block_size..].fill(0);
        self.digest.update(&self.input_pad);
    }

    fn reset(&mut self) {
        self.digest.reset();
        self.digest.update(&self.input_pad);
    }
}

impl<D: Digest> std::fmt::Debug for Hmac<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hmac")
            .field("algorithm", &self.algorithm_name())
            .field("block_size", &self.block_size)
            .finish_non_exhaustive()
    }
}

/// One-shot HMAC of `message` under `key`.
pub fn hmac<D: Digest>(digest: D, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::with_key(digest, key)?;
    mac.update(message);
    Ok(mac.build())
}
