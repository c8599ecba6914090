//! Streaming digest framework.
//!
//! Every SHA-2 family member shares the same Merkle–Damgård shape: bytes are
//! gathered into big-endian words, sixteen words form a block, each full
//! block is handed to a compression function, and finalization appends a set
//! bit, zero fill and the message bit-length in the last two words.
//!
//! [`BlockBuffer`] owns that shape once. The algorithm-specific part is a
//! [`Compress`] implementation supplying the chaining state and the round
//! function, parameterized by its [`Word`] type:
//!
//! ```text
//!            word   block   length field
//! u32 family  32     512        64 bits   (SHA-224, SHA-256)
//! u64 family  64    1024       128 bits   (SHA-384, SHA-512)
//! ```
//!
//! The per-block word array is zeroed after every compression so the
//! previous block never lingers in a reused buffer.

use zeroize::Zeroize;

use crate::error::{Result, ensure_destination};

/// Words per compression block for every family.
pub const BLOCK_WORDS: usize = 16;

/// Chaining words carried between blocks for every family.
pub const STATE_WORDS: usize = 8;

/// A streaming message digest.
///
/// `update` may be called any number of times with arbitrarily sized slices;
/// the result only depends on the concatenation of all inputs. `build`
/// finalizes and leaves the instance reset, ready for the next message.
pub trait Digest {
    /// Canonical algorithm name, e.g. `"SHA-256"`.
    fn algorithm_name(&self) -> &'static str;

    /// Digest length in bytes.
    fn digest_size(&self) -> usize;

    /// Absorbs `input`.
    fn update(&mut self, input: &[u8]);

    /// Finalizes into `output` and resets the state.
    ///
    /// Implementation hook behind [`Digest::build_into`] and
    /// [`Digest::build`]; call those instead.
    ///
    /// # Preconditions
    ///
    /// `output.len()` must equal [`Digest::digest_size`]. A shorter slice
    /// receives a truncated digest and the state is still finalized.
    #[doc(hidden)]
    fn finish(&mut self, output: &mut [u8]);

    /// Discards buffered input and restores the initial chaining value.
    fn reset(&mut self);

    /// Finalizes into the front of `output`, returning the bytes written.
    ///
    /// Fails without touching the state when `output` is shorter than the
    /// digest.
    fn build_into(&mut self, output: &mut [u8]) -> Result<usize> {
        let size = self.digest_size();
        ensure_destination(output, size)?;
        self.finish(&mut output[..size]);
        Ok(size)
    }

    /// Finalizes into a freshly allocated vector.
    fn build(&mut self) -> Vec<u8> {
        let mut output = vec![0u8; self.digest_size()];
        self.finish(&mut output);
        output
    }
}

/// Lets an algorithm chosen at runtime (`Box<dyn Digest>`) sit under
/// [`crate::Hmac`] and [`crate::Pbkdf2`].
impl<D: Digest + ?Sized> Digest for Box<D> {
    fn algorithm_name(&self) -> &'static str {
        (**self).algorithm_name()
    }

    fn digest_size(&self) -> usize {
        (**self).digest_size()
    }

    fn update(&mut self, input: &[u8]) {
        (**self).update(input);
    }

    fn finish(&mut self, output: &mut [u8]) {
        (**self).finish(output);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Machine word a digest family is built from.
pub trait Word: Copy + Default + Zeroize + sealed::Sealed {
    /// Width in bytes.
    const BYTES: usize;

    /// Reads a big-endian word from the first [`Word::BYTES`] of `bytes`.
    fn from_be_slice(bytes: &[u8]) -> Self;

    /// Writes the big-endian encoding, truncated to `out.len()`.
    fn write_be(self, out: &mut [u8]);

    /// Splits a message bit-length into the two trailing block words.
    fn length_field(bit_length: u128) -> [Self; 2];
}

impl Word for u32 {
    const BYTES: usize = 4;

    #[inline]
    fn from_be_slice(bytes: &[u8]) -> Self {
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[inline]
    fn write_be(self, out: &mut [u8]) {
        let len = out.len();
        out.copy_from_slice(&self.to_be_bytes()[..len]);
    }

    #[inline]
    fn length_field(bit_length: u128) -> [Self; 2] {
        // Only the low 64 bits are encoded for this family.
        [(bit_length >> 32) as u32, bit_length as u32]
    }
}

impl Word for u64 {
    const BYTES: usize = 8;

    #[inline]
    fn from_be_slice(bytes: &[u8]) -> Self {
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        u64::from_be_bytes(word)
    }

    #[inline]
    fn write_be(self, out: &mut [u8]) {
        let len = out.len();
        out.copy_from_slice(&self.to_be_bytes()[..len]);
    }

    #[inline]
    fn length_field(bit_length: u128) -> [Self; 2] {
        [(bit_length >> 64) as u64, bit_length as u64]
    }
}

/// Block compression step plugged into a [`BlockBuffer`].
pub trait Compress {
    /// Word type of the family.
    type Word: Word;

    /// Folds one full block into the chaining state.
    fn compress(&mut self, block: &[Self::Word; BLOCK_WORDS]);

    /// Current chaining state.
    fn chaining_value(&self) -> &[Self::Word; STATE_WORDS];

    /// Restores the initial chaining value.
    fn reset(&mut self);
}

/// Word-oriented Merkle–Damgård buffer around a [`Compress`] core.
///
/// Invariant: fewer than [`BLOCK_WORDS`] complete words and fewer than
/// `Word::BYTES` loose bytes are ever held between calls.
#[derive(Clone)]
pub struct BlockBuffer<C: Compress> {
    core: C,
    block: [C::Word; BLOCK_WORDS],
    block_len: usize,
    partial: [u8; 8],
    partial_len: usize,
    byte_count: u128,
}

impl<C: Compress> BlockBuffer<C> {
    /// Wraps `core`, which must already hold its initial chaining value.
    pub fn new(core: C) -> Self {
        Self {
            core,
            block: [C::Word::default(); BLOCK_WORDS],
            block_len: 0,
            partial: [0u8; 8],
            partial_len: 0,
            byte_count: 0,
        }
    }

    /// Total bytes absorbed since the last reset.
    pub fn byte_count(&self) -> u128 {
        self.byte_count
    }

    /// Absorbs `input`.
    pub fn update(&mut self, input: &[u8]) {
        self.byte_count = self.byte_count.wrapping_add(input.len() as u128);

        let mut rest = input;
        // Complete a word left over from the previous call first.
        while self.partial_len != 0 {
            let Some((&byte, tail)) = rest.split_first() else {
                return;
            };
            self.push_byte(byte);
            rest = tail;
        }

        let mut words = rest.chunks_exact(C::Word::BYTES);
        for word in &mut words {
            self.push_word(C::Word::from_be_slice(word));
        }
        for &byte in words.remainder() {
            self.push_byte(byte);
        }
    }

    /// Pads, compresses the final block(s) and writes the chaining value
    /// big-endian into `output`, truncated to its length. Resets afterwards.
    pub fn finish_into(&mut self, output: &mut [u8]) {
        let bit_length = self.byte_count.wrapping_mul(8);

        self.push_byte(0x80);
        while self.partial_len != 0 {
            self.push_byte(0);
        }

        // No room for the two length words: flush a padding-only block.
        if self.block_len > BLOCK_WORDS - 2 {
            self.process_block();
        }

        let [high, low] = C::Word::length_field(bit_length);
        self.block[BLOCK_WORDS - 2] = high;
        self.block[BLOCK_WORDS - 1] = low;
        self.process_block();

        for (chunk, word) in output
            .chunks_mut(C::Word::BYTES)
            .zip(self.core.chaining_value().iter())
        {
            word.write_be(chunk);
        }

        self.reset();
    }

    /// Drops buffered input and restores the initial chaining value.
    pub fn reset(&mut self) {
        self.core.reset();
        self.block.zeroize();
        self.block_len = 0;
        self.partial.zeroize();
        self.partial_len = 0;
        self.byte_count = 0;
    }

    fn push_byte(&mut self, byte: u8) {
        self.partial[self.partial_len] = byte;
        self.partial_len += 1;
        if self.partial_len == C::Word::BYTES {
            let word = C::Word::from_be_slice(&self.partial);
            self.partial_len = 0;
            self.push_word(word);
        }
    }

    fn push_word(&mut self, word: C::Word) {
        self.block[self.block_len] = word;
        self.block_len += 1;
        if self.block_len == BLOCK_WORDS {
            self.process_block();
        }
    }

    fn process_block(&mut self) {
        self.core.compress(&self.block);
        self.block.zeroize();
        self.block_len = 0;
    }
}

impl<C: Compress> Drop for BlockBuffer<C> {
    fn drop(&mut self) {
        self.block.zeroize();
        self.partial.zeroize();
        self.byte_count = 0;
    }
}

impl<C: Compress> std::fmt::Debug for BlockBuffer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Buffered message words and chaining state stay out of logs.
        f.debug_struct("BlockBuffer")
            .field("block_len", &self.block_len)
            .field("partial_len", &self.partial_len)
            .field("byte_count", &self.byte_count)
            .finish_non_exhaustive()
    }
}
