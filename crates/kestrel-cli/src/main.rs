//! Kestrel command-line tool.
//!
//! Digests, HMACs, PBKDF2 key derivation, CRC32 checksums and AES-CTR over
//! files or stdin.
//!
//! # Quick Start
//!
//! ```bash
//! # SHA-256 of a file
//! kestrel digest ./archive.tar
//!
//! # CRC32C of stdin
//! echo -n 123456789 | kestrel crc32 --polynomial castagnoli
//!
//! # Encrypt (or decrypt) with AES-128-CTR
//! kestrel ctr --key-hex 2b7e151628aed2a6abf7158809cf4f3c \
//!     --iv-hex f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff --input plain.bin --output cipher.bin
//! ```
//!
//! Defaults for algorithm, iteration count and chunk size come from the
//! layered configuration (see `kestrel config show`).

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kestrel_config::{ConfigLoader, DigestAlgorithm, KestrelConfig, Polynomial};

/// Kestrel - portable digests, MACs, key derivation and checksums.
#[derive(Parser)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding kestrel.toml and kestrel.local.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Hex digest of a file (or stdin).
    Digest {
        /// File to hash; reads stdin when omitted.
        file: Option<PathBuf>,

        /// Digest algorithm (sha224, sha256, sha384, sha512).
        #[arg(short, long)]
        algorithm: Option<DigestAlgorithm>,
    },

    /// Hex HMAC of a file (or stdin).
    Hmac {
        /// File to authenticate; reads stdin when omitted.
        file: Option<PathBuf>,

        /// MAC key as hex.
        #[arg(short, long)]
        key_hex: String,

        /// Underlying digest algorithm.
        #[arg(short, long)]
        algorithm: Option<DigestAlgorithm>,
    },

    /// Derive a key with PBKDF2.
    Pbkdf2 {
        /// Password (UTF-8).
        #[arg(long)]
        password: String,

        /// Salt (UTF-8).
        #[arg(short, long)]
        salt: String,

        /// Iteration count.
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Derived key length in bytes.
        #[arg(short, long)]
        length: Option<usize>,

        /// Digest under the HMAC PRF.
        #[arg(short, long)]
        algorithm: Option<DigestAlgorithm>,
    },

    /// CRC32 of a file (or stdin), as 8 hex digits.
    Crc32 {
        /// File to checksum; reads stdin when omitted.
        file: Option<PathBuf>,

        /// Polynomial (ieee, castagnoli, koopman).
        #[arg(short = 'P', long)]
        polynomial: Option<Polynomial>,
    },

    /// AES-CTR encrypt or decrypt a file (the operation is its own inverse).
    Ctr {
        /// AES key as hex (16, 24 or 32 bytes).
        #[arg(short, long)]
        key_hex: String,

        /// Initial counter block as hex (16 bytes).
        #[arg(long)]
        iv_hex: String,

        /// Input file.
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (created or truncated).
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective merged configuration as TOML.
    Show,

    /// Check that every configuration source parses and validates.
    Validate,
}

fn main() -> Result<()> {
    // Results go to stdout, logs to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let loader = ConfigLoader::new().with_project_dir(&cli.project);
    let load = move || -> Result<KestrelConfig> {
        loader.load().context("Failed to load configuration")
    };

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Digest { file, algorithm } => {
            commands::digest::run(&load()?, file.as_deref(), algorithm)
        }
        Commands::Hmac {
            file,
            key_hex,
            algorithm,
        } => commands::hmac::run(&load()?, file.as_deref(), &key_hex, algorithm),
        Commands::Pbkdf2 {
            password,
            salt,
            iterations,
            length,
            algorithm,
        } => commands::pbkdf2::run(
            &load()?,
            &commands::pbkdf2::Params {
                password: &password,
                salt: &salt,
                iterations,
                length,
                algorithm,
            },
        ),
        Commands::Crc32 { file, polynomial } => {
            commands::crc32::run(&load()?, file.as_deref(), polynomial)
        }
        Commands::Ctr {
            key_hex,
            iv_hex,
            input,
            output,
        } => commands::ctr::run(&load()?, &key_hex, &iv_hex, &input, &output),
        Commands::Config(ConfigCommands::Show) => commands::config::show(&load()?),
        Commands::Config(ConfigCommands::Validate) => {
            commands::config::validate(&cli.project, load())
        }
    }
}
