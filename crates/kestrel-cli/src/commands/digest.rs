//! Digest command implementation.

use std::path::Path;

use anyhow::Result;
use kestrel_config::{DigestAlgorithm, KestrelConfig};

use super::{digest_for, for_each_chunk, input_label};

/// Prints `<hex>  <input>` for the selected algorithm.
pub fn run(
    config: &KestrelConfig,
    file: Option<&Path>,
    algorithm: Option<DigestAlgorithm>,
) -> Result<()> {
    let algorithm = algorithm.unwrap_or(config.digest.algorithm);
    let mut digest = digest_for(algorithm);

    for_each_chunk(file, config.io.chunk_size, |chunk| {
        digest.update(chunk);
        Ok(())
    })?;

    println!("{}  {}", hex::encode(digest.build()), input_label(file));
    Ok(())
}
