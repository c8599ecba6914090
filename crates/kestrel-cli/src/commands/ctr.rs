//! AES-CTR command implementation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use kestrel_config::KestrelConfig;
use kestrel_crypto::{Aes, Ctr, StreamCipher};

use super::{decode_hex, for_each_chunk};

/// Streams `input` through AES-CTR into `output`.
///
/// Encryption and decryption are the same keystream XOR, so one command
/// serves both directions.
pub fn run(
    config: &KestrelConfig,
    key_hex: &str,
    iv_hex: &str,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let key = decode_hex("--key-hex", key_hex)?;
    let iv = decode_hex("--iv-hex", iv_hex)?;

    let cipher = Aes::encrypt_only(&key).context("Invalid AES key")?;
    let mut ctr = Ctr::new(cipher, &iv).context("Invalid counter block")?;

    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let mut scratch = Vec::with_capacity(config.io.chunk_size);

    let total = for_each_chunk(Some(input), config.io.chunk_size, |chunk| {
        scratch.clear();
        scratch.extend_from_slice(chunk);
        ctr.apply_keystream(&mut scratch)
            .context("Failed to generate keystream")?;
        writer
            .write_all(&scratch)
            .with_context(|| format!("Failed to write {}", output.display()))
    })?;

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        cipher = %ctr.algorithm_name(),
        bytes = total,
        output = %output.display(),
        "keystream applied"
    );
    Ok(())
}
