//! HMAC command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use kestrel_config::{DigestAlgorithm, KestrelConfig};
use kestrel_crypto::{Hmac, Mac};

use super::{decode_hex, digest_for, for_each_chunk, input_label};

pub fn run(
    config: &KestrelConfig,
    file: Option<&Path>,
    key_hex: &str,
    algorithm: Option<DigestAlgorithm>,
) -> Result<()> {
    let algorithm = algorithm.unwrap_or(config.digest.algorithm);
    let key = decode_hex("--key-hex", key_hex)?;

    let mut mac = Hmac::with_key(digest_for(algorithm), &key)
        .with_context(|| format!("Failed to key HMAC/{}", algorithm.canonical_name()))?;

    for_each_chunk(file, config.io.chunk_size, |chunk| {
        mac.update(chunk);
        Ok(())
    })?;

    println!("{}  {}", hex::encode(mac.build()), input_label(file));
    Ok(())
}
