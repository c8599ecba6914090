//! CLI command implementations.

pub mod config;
pub mod crc32;
pub mod ctr;
pub mod digest;
pub mod hmac;
pub mod pbkdf2;
pub mod version;

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};
use kestrel_config::DigestAlgorithm;
use kestrel_crypto::{Digest, Sha224, Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

/// Instantiates the configured digest behind a trait object.
pub fn digest_for(algorithm: DigestAlgorithm) -> Box<dyn Digest> {
    match algorithm {
        DigestAlgorithm::Sha224 => Box::new(Sha224::new()),
        DigestAlgorithm::Sha256 => Box::new(Sha256::new()),
        DigestAlgorithm::Sha384 => Box::new(Sha384::new()),
        DigestAlgorithm::Sha512 => Box::new(Sha512::new()),
    }
}

/// Decodes a hex argument, naming the argument on failure.
pub fn decode_hex(name: &str, value: &str) -> Result<Zeroizing<Vec<u8>>> {
    hex::decode(value.trim())
        .map(Zeroizing::new)
        .with_context(|| format!("{name} is not valid hex"))
}

/// Label used in output lines; `-` for stdin like coreutils.
pub fn input_label(file: Option<&Path>) -> String {
    file.map_or_else(|| "-".to_string(), |path| path.display().to_string())
}

/// Feeds `file` (or stdin) to `sink` in `chunk_size` pieces.
///
/// Returns the total number of bytes read.
pub fn for_each_chunk(
    file: Option<&Path>,
    chunk_size: usize,
    mut sink: impl FnMut(&[u8]) -> Result<()>,
) -> Result<u64> {
    let mut reader: Box<dyn Read> = match file {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", input_label(file)));
            }
        };
        sink(&buffer[..read])?;
        total += read as u64;
    }

    tracing::debug!(input = %input_label(file), bytes = total, chunk_size, "input consumed");
    Ok(total)
}
