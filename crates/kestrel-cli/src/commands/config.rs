//! Configuration management commands.

use std::path::Path;

use anyhow::Result;
use kestrel_config::{KestrelConfig, Paths};

/// Print the effective configuration.
pub fn show(config: &KestrelConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Report which files contribute and whether the merge validates.
pub fn validate(project: &Path, loaded: Result<KestrelConfig>) -> Result<()> {
    println!("Validating configuration in {}...", project.display());

    for source in Paths::discover(project).sources() {
        let state = if source.exists() { "found" } else { "absent" };
        println!("  {:<7} {state:>6}: {}", source.kind, source.path.display());
    }

    let config = loaded?;
    println!();
    println!("Configuration is valid");
    println!("  digest:   {}", config.digest.algorithm);
    println!(
        "  kdf:      {} x {} iterations, {} bytes",
        config.kdf.algorithm, config.kdf.iterations, config.kdf.key_length
    );
    println!("  checksum: {}", config.checksum.polynomial);
    println!("  io:       {} byte chunks", config.io.chunk_size);
    Ok(())
}
