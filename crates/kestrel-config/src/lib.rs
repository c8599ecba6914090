//! Configuration management for Kestrel
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence)
//! 2. Environment variables (KESTREL_* prefix, `__` between section and key)
//! 3. kestrel.local.toml (gitignored, local overrides)
//! 4. kestrel.toml (git-tracked, project config)
//! 5. ~/.config/kestrel/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{ConfigSource, Paths, SourceKind};

/// Main Kestrel configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KestrelConfig {
    pub digest: DigestConfig,
    pub kdf: KdfConfig,
    pub checksum: ChecksumConfig,
    pub io: IoConfig,
}

/// SHA-2 family member selected for `digest`, `hmac` and `pbkdf2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    const EXPECTED: &'static str = "sha224, sha256, sha384, sha512";

    /// Canonical algorithm name as reported by the digest itself.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

impl FromStr for DigestAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ConfigError::UnknownValue {
                field: "digest algorithm",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// CRC32 polynomial selected for `crc32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polynomial {
    #[default]
    Ieee,
    Castagnoli,
    Koopman,
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ieee => "ieee",
            Self::Castagnoli => "castagnoli",
            Self::Koopman => "koopman",
        };
        f.write_str(name)
    }
}

impl FromStr for Polynomial {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ieee" => Ok(Self::Ieee),
            "castagnoli" | "crc32c" => Ok(Self::Castagnoli),
            "koopman" => Ok(Self::Koopman),
            _ => Err(ConfigError::UnknownValue {
                field: "polynomial",
                value: s.to_string(),
                expected: "ieee, castagnoli, koopman",
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub algorithm: DigestAlgorithm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    /// Digest under the HMAC used as the PBKDF2 PRF.
    pub algorithm: DigestAlgorithm,
    pub iterations: u32,
    /// Derived key length in bytes.
    pub key_length: usize,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha256,
            iterations: 600_000,
            key_length: 32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksumConfig {
    pub polynomial: Polynomial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Read size when streaming files, in bytes.
    pub chunk_size: usize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
        }
    }
}

impl KestrelConfig {
    /// Load configuration from current directory
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Rejects values no command can run with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.kdf.iterations < 1 {
            return Err(ConfigError::ValidationError(
                "kdf.iterations must be at least 1".to_string(),
            ));
        }
        if self.kdf.key_length < 1 {
            return Err(ConfigError::ValidationError(
                "kdf.key_length must be at least 1".to_string(),
            ));
        }
        if self.io.chunk_size < 1 {
            return Err(ConfigError::ValidationError(
                "io.chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> std::result::Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
