//! Configuration file discovery.
//!
//! Files are layered lowest precedence first: the per-user file under the
//! XDG config directory, then `kestrel.toml`, then `kestrel.local.toml` in
//! the project directory.

use crate::ConfigError;
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};

const USER_FILE: &str = "config.toml";
const PROJECT_FILE: &str = "kestrel.toml";
const LOCAL_FILE: &str = "kestrel.local.toml";

/// Which layer a configuration file provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    User,
    Project,
    Local,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Local => "local",
        })
    }
}

/// A candidate configuration file. It may not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub kind: SourceKind,
    pub path: PathBuf,
}

impl ConfigSource {
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Configuration file locations for one project directory.
#[derive(Debug, Clone)]
pub struct Paths {
    user_dir: Option<PathBuf>,
    project_dir: PathBuf,
}

impl Paths {
    /// Locations for `project_dir`, with the user directory found through XDG.
    pub fn discover(project_dir: impl AsRef<Path>) -> Self {
        Self {
            user_dir: ProjectDirs::from("rs", "Kestrel", "kestrel")
                .map(|dirs| dirs.config_dir().to_path_buf()),
            project_dir: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Locations for `project_dir` only; no user file is consulted.
    pub fn project_only(project_dir: impl AsRef<Path>) -> Self {
        Self {
            user_dir: None,
            project_dir: project_dir.as_ref().to_path_buf(),
        }
    }

    /// `~/.config/kestrel/config.toml` on Linux.
    pub fn user_config_file(&self) -> Result<PathBuf, ConfigError> {
        self.user_dir
            .as_ref()
            .map(|dir| dir.join(USER_FILE))
            .ok_or_else(|| ConfigError::XdgError("no user config directory".to_string()))
    }

    pub fn project_config_file(&self) -> PathBuf {
        self.project_dir.join(PROJECT_FILE)
    }

    /// Untracked overrides next to the project file.
    pub fn local_config_file(&self) -> PathBuf {
        self.project_dir.join(LOCAL_FILE)
    }

    /// Every candidate file, lowest precedence first.
    pub fn sources(&self) -> Vec<ConfigSource> {
        let mut sources = Vec::with_capacity(3);
        if let Ok(path) = self.user_config_file() {
            sources.push(ConfigSource {
                kind: SourceKind::User,
                path,
            });
        }
        sources.push(ConfigSource {
            kind: SourceKind::Project,
            path: self.project_config_file(),
        });
        sources.push(ConfigSource {
            kind: SourceKind::Local,
            path: self.local_config_file(),
        });
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discovered_user_file() {
        let paths = Paths::discover(".");

        // Some sandboxes have no home directory at all.
        if let Ok(file) = paths.user_config_file() {
            assert!(file.to_string_lossy().contains("kestrel"));
            assert!(file.ends_with(USER_FILE));
        }
    }

    #[test]
    fn test_project_only_has_no_user_file() {
        let paths = Paths::project_only("/srv/app");
        assert!(matches!(paths.user_config_file(), Err(ConfigError::XdgError(_))));

        let kinds: Vec<_> = paths.sources().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SourceKind::Project, SourceKind::Local]);
    }

    #[test]
    fn test_sources_are_ordered_by_precedence() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let paths = Paths::discover(temp_dir.path());
        let sources = paths.sources();

        assert!(sources.windows(2).all(|pair| pair[0].kind < pair[1].kind));
        let local = sources.last().expect("local is always listed");
        assert_eq!(local.path, temp_dir.path().join(LOCAL_FILE));
    }

    #[test]
    fn test_exists_tracks_the_filesystem() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let paths = Paths::project_only(temp_dir.path());

        assert!(paths.sources().iter().all(|s| !s.exists()));

        std::fs::write(paths.project_config_file(), "").expect("Failed to write config");
        let existing: Vec<_> = paths
            .sources()
            .into_iter()
            .filter(ConfigSource::exists)
            .map(|s| s.kind)
            .collect();
        assert_eq!(existing, vec![SourceKind::Project]);
        assert_eq!(SourceKind::Project.to_string(), "project");
    }
}
