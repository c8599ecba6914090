//! PBKDF2 command implementation.

use anyhow::{Context, Result};
use kestrel_config::{DigestAlgorithm, KestrelConfig};
use kestrel_crypto::Pbkdf2;

use super::digest_for;

/// Command-line overrides; anything unset falls back to the `[kdf]` section.
pub struct Params<'a> {
    pub password: &'a str,
    pub salt: &'a str,
    pub iterations: Option<u32>,
    pub length: Option<usize>,
    pub algorithm: Option<DigestAlgorithm>,
}

pub fn run(config: &KestrelConfig, params: &Params<'_>) -> Result<()> {
    let algorithm = params.algorithm.unwrap_or(config.kdf.algorithm);
    let iterations = params.iterations.unwrap_or(config.kdf.iterations);
    let length = params.length.unwrap_or(config.kdf.key_length);

    tracing::info!(
        algorithm = algorithm.canonical_name(),
        iterations,
        length,
        "deriving key"
    );

    let mut kdf = Pbkdf2::with_digest(
        digest_for(algorithm),
        params.password.as_bytes(),
        params.salt.as_bytes(),
        iterations,
    )
    .context("Invalid PBKDF2 parameters")?;

    let key = kdf
        .derive_key(length)
        .with_context(|| format!("Failed to derive a {length}-byte key"))?;

    println!("{}", hex::encode(&key));
    Ok(())
}
