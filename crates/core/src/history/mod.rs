//! Commit history readers.
//!
//! A [`HistorySource`] produces the raw text of a per-commit identity query:
//! one `Name <email>` candidate per line. Two backends are provided:
//! - [`GitLogReader`] shells out to `git log` (the default)
//! - [`Git2History`] walks the history in-process through `git2`

pub mod git_log;
pub mod libgit2;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HistoryConfig;
use crate::errors::HistoryError;

pub use git_log::GitLogReader;
pub use libgit2::Git2History;

/// Which commit field an identity query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Author,
    Committer,
}

impl IdentityField {
    /// Both fields, in the order a run queries them.
    pub const ALL: [IdentityField; 2] = [IdentityField::Author, IdentityField::Committer];

    /// `git log` pretty-format template for this field.
    ///
    /// `%aN`/`%aE` and `%cN`/`%cE` respect the repository's `.mailmap`.
    pub fn format(self) -> &'static str {
        match self {
            IdentityField::Author => "%aN <%aE>",
            IdentityField::Committer => "%cN <%cE>",
        }
    }
}

/// Source of raw identity text for the full commit history.
pub trait HistorySource {
    /// Run one identity query and return its raw output.
    fn read(&self, field: IdentityField) -> Result<String, HistoryError>;
}

/// Query authors then committers, sequentially. The first failure aborts.
pub fn read_all(source: &dyn HistorySource) -> Result<Vec<String>, HistoryError> {
    let mut outputs = Vec::with_capacity(IdentityField::ALL.len());
    for field in IdentityField::ALL {
        let output = source.read(field)?;
        debug!(?field, lines = output.lines().count(), "read identity query");
        outputs.push(output);
    }
    Ok(outputs)
}

/// Selectable history backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryBackend {
    /// Run the `git` executable.
    #[default]
    GitCli,
    /// Read the object database through libgit2.
    Libgit2,
}

impl HistoryBackend {
    /// Build the configured source for the repository at `repo_root`.
    pub fn open(
        self,
        repo_root: &Path,
        config: &HistoryConfig,
    ) -> Result<Box<dyn HistorySource>, HistoryError> {
        Ok(match self {
            HistoryBackend::GitCli => Box::new(GitLogReader::new(repo_root, &config.git_binary)),
            HistoryBackend::Libgit2 => Box::new(Git2History::open(repo_root)?),
        })
    }
}

impl fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HistoryBackend::GitCli => "git-cli",
            HistoryBackend::Libgit2 => "libgit2",
        })
    }
}

impl FromStr for HistoryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git-cli" | "git" => Ok(HistoryBackend::GitCli),
            "libgit2" | "git2" => Ok(HistoryBackend::Libgit2),
            other => Err(format!(
                "unknown history backend '{}' (expected git-cli or libgit2)",
                other
            )),
        }
    }
}
