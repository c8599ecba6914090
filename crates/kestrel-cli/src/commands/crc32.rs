//! CRC32 command implementation.

use std::path::Path;

use anyhow::Result;
use kestrel_config::{KestrelConfig, Polynomial};
use kestrel_crypto::crc32::{CASTAGNOLI, Crc32, IEEE, KOOPMAN};

use super::{for_each_chunk, input_label};

fn checksum_for(polynomial: Polynomial) -> &'static Crc32 {
    match polynomial {
        Polynomial::Ieee => &IEEE,
        Polynomial::Castagnoli => &CASTAGNOLI,
        Polynomial::Koopman => &KOOPMAN,
    }
}

pub fn run(
    config: &KestrelConfig,
    file: Option<&Path>,
    polynomial: Option<Polynomial>,
) -> Result<()> {
    let polynomial = polynomial.unwrap_or(config.checksum.polynomial);
    let mut hasher = checksum_for(polynomial).hasher();

    for_each_chunk(file, config.io.chunk_size, |chunk| {
        hasher.update(chunk);
        Ok(())
    })?;

    println!("{:08x}  {}", hasher.finalize(), input_label(file));
    Ok(())
}
