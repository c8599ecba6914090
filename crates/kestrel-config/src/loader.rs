//! Merges built-in defaults, configuration files and the environment.

use crate::{KestrelConfig, Paths};
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Builder for a [`KestrelConfig`] load.
///
/// Later layers win: defaults, user file, `kestrel.toml`,
/// `kestrel.local.toml`, then `<PREFIX>_SECTION__KEY` variables.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    user_config: bool,
}

impl ConfigLoader {
    /// Loader rooted at the current directory (or `.` when it is unknown).
    pub fn new() -> Self {
        Self {
            project_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "KESTREL".to_string(),
            user_config: true,
        }
    }

    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Replaces the `KESTREL` environment prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Ignores the per-user file.
    pub fn without_user_config(mut self) -> Self {
        self.user_config = false;
        self
    }

    /// File locations this loader reads.
    pub fn paths(&self) -> Paths {
        if self.user_config {
            Paths::discover(&self.project_dir)
        } else {
            Paths::project_only(&self.project_dir)
        }
    }

    pub fn load(self) -> Result<KestrelConfig> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&KestrelConfig::default()).context("Invalid defaults")?);

        for source in self.paths().sources().into_iter().filter(|s| s.exists()) {
            builder = builder.add_source(File::from(source.path).format(FileFormat::Toml));
        }

        // Field names contain underscores, so sections split on "__".
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let merged: KestrelConfig = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        merged.validate().context("Configuration failed validation")?;
        Ok(merged)
    }

    /// Like [`ConfigLoader::load`], falling back to defaults on any error.
    pub fn load_or_default(self) -> KestrelConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
