//! History reader backed by the `git` executable.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use super::{HistorySource, IdentityField};
use crate::errors::HistoryError;

/// Runs `git log --pretty=format:<template>` in a repository.
#[derive(Debug, Clone)]
pub struct GitLogReader {
    repo_root: PathBuf,
    git_binary: String,
}

impl GitLogReader {
    /// Create a reader for the repository at `repo_root`, using `git_binary`.
    pub fn new(repo_root: impl Into<PathBuf>, git_binary: impl Into<String>) -> Self {
        Self {
            repo_root: repo_root.into(),
            git_binary: git_binary.into(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, HistoryError> {
        let mut cmd = Command::new(&self.git_binary);
        cmd.current_dir(&self.repo_root)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(cmd = ?format!("{} {}", self.git_binary, args.join(" ")), "running git command");
        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HistoryError::BinaryNotFound(self.git_binary.clone())
            } else {
                HistoryError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            debug!(exit_code, %stderr, "git command failed");
            return Err(HistoryError::CommandFailed { exit_code, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl HistorySource for GitLogReader {
    #[instrument(skip(self), fields(repo = %self.repo_root.display()))]
    fn read(&self, field: IdentityField) -> Result<String, HistoryError> {
        let pretty = format!("--pretty=format:{}", field.format());
        self.run_git(&["log", &pretty])
    }
}
