//! TOML-based configuration for mailmapsync.
//!
//! Every field has a default, so running without a config file behaves
//! exactly like an empty one: `.mailmap` at the repository root, substring
//! matching, and the `git` CLI as history source.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::history::HistoryBackend;
use crate::mailmap::MatchMode;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Mapping file settings.
    #[serde(default)]
    pub mailmap: MailmapConfig,

    /// Commit history source settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Compute the update but leave the file untouched.
    #[serde(default)]
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Mailmap
// ---------------------------------------------------------------------------

/// Where the mapping file lives and how identities are matched against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailmapConfig {
    /// Path of the mapping file, relative to the repository root.
    #[serde(default = "default_mailmap_path")]
    pub path: PathBuf,

    /// How an identity is judged to be already present in the file.
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl Default for MailmapConfig {
    fn default() -> Self {
        Self {
            path: default_mailmap_path(),
            match_mode: MatchMode::default(),
        }
    }
}

fn default_mailmap_path() -> PathBuf {
    PathBuf::from(".mailmap")
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Commit history source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Which backend reads the commit log.
    #[serde(default)]
    pub backend: HistoryBackend,

    /// Name or path of the git executable (`git-cli` backend only).
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::default(),
            git_binary: default_git_binary(),
        }
    }
}

fn default_git_binary() -> String {
    "git".into()
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl SyncConfig {
    /// Load a [`SyncConfig`] from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: SyncConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!(?config, "configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all fields are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mailmap.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "mailmap.path".into(),
                detail: "mailmap path must not be empty".into(),
            });
        }
        if self.history.backend == HistoryBackend::GitCli && self.history.git_binary.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "history.git_binary".into(),
                detail: "git binary must not be empty when using the git-cli backend".into(),
            });
        }
        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Absolute path of the mapping file inside `repo_root`.
    pub fn mailmap_path(&self, repo_root: &Path) -> Result<PathBuf, ConfigError> {
        Ok(std::path::absolute(repo_root.join(&self.mailmap.path))?)
    }

    /// Generate a default TOML config template string.
    pub fn default_template() -> &'static str {
        r#"# mailmapsync configuration

[mailmap]
path = ".mailmap"
# "substring": an identity found anywhere in the file counts as present.
# "field": only identities named by a mapping line count as present.
match_mode = "substring"

[history]
# "git-cli" runs `git log`; "libgit2" walks the history in-process.
backend = "git-cli"
git_binary = "git"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.mailmap.path, PathBuf::from(".mailmap"));
        assert_eq!(config.mailmap.match_mode, MatchMode::Substring);
        assert_eq!(config.history.backend, HistoryBackend::GitCli);
        assert_eq!(config.history.git_binary, "git");
        assert!(!config.dry_run);
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert_eq!(config.mailmap.path, PathBuf::from(".mailmap"));
        assert_eq!(config.history.backend, HistoryBackend::GitCli);
    }

    #[test]
    fn test_parse_full_config() {
        let config: SyncConfig = toml::from_str(
            r#"
dry_run = true

[mailmap]
path = "docs/.mailmap"
match_mode = "field"

[history]
backend = "libgit2"
git_binary = "/usr/local/bin/git"
"#,
        )
        .unwrap();
        assert!(config.dry_run);
        assert_eq!(config.mailmap.path, PathBuf::from("docs/.mailmap"));
        assert_eq!(config.mailmap.match_mode, MatchMode::Field);
        assert_eq!(config.history.backend, HistoryBackend::Libgit2);
        assert_eq!(config.history.git_binary, "/usr/local/bin/git");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailmapsync.toml");
        std::fs::write(&path, "[mailmap]\npath = \"AUTHORS.map\"\n").unwrap();

        let config = SyncConfig::load_and_validate(&path).unwrap();
        assert_eq!(config.mailmap.path, PathBuf::from("AUTHORS.map"));
    }

    #[test]
    fn test_file_not_found() {
        let result = SyncConfig::load_from_file("/nonexistent/mailmapsync.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[history]\nbackend = \"svn\"\n").unwrap();

        let result = SyncConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        let mut config = SyncConfig::default();
        config.mailmap.path = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_git_binary() {
        let mut config = SyncConfig::default();
        config.history.git_binary.clear();
        assert!(config.validate().is_err());

        config.history.backend = HistoryBackend::Libgit2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mailmap_path_is_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::default();
        let path = config.mailmap_path(dir.path()).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with(".mailmap"));
    }

    #[test]
    fn test_default_template_is_valid() {
        let config: SyncConfig = toml::from_str(SyncConfig::default_template()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.mailmap.match_mode, MatchMode::Substring);
    }
}
