//! In-process history reader via `git2`.

use std::path::{Path, PathBuf};

use git2::{Mailmap, Repository, Signature};
use tracing::{debug, info, instrument};

use super::{HistorySource, IdentityField};
use crate::errors::HistoryError;

/// Walks every commit reachable from HEAD and formats its author or
/// committer the way `git log --pretty=format:"%aN <%aE>"` does, including
/// `.mailmap` resolution.
pub struct Git2History {
    repo: Repository,
    repo_path: PathBuf,
}

impl Git2History {
    /// Open an existing Git repository at `repo_path`.
    pub fn open<P: AsRef<Path>>(repo_path: P) -> Result<Self, HistoryError> {
        let path = repo_path.as_ref();
        info!(path = %path.display(), "opening git repository");
        let repo = Repository::open(path)?;
        Ok(Self {
            repo,
            repo_path: path.to_path_buf(),
        })
    }
}

fn format_signature(sig: &Signature<'_>) -> String {
    format!(
        "{} <{}>",
        String::from_utf8_lossy(sig.name_bytes()),
        String::from_utf8_lossy(sig.email_bytes())
    )
}

impl HistorySource for Git2History {
    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    fn read(&self, field: IdentityField) -> Result<String, HistoryError> {
        // Re-read per query so edits made between runs are honoured.
        let mailmap: Mailmap = self.repo.mailmap()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        let mut output = String::new();
        let mut commits = 0usize;
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let sig = match field {
                IdentityField::Author => commit.author_with_mailmap(&mailmap)?,
                IdentityField::Committer => commit.committer_with_mailmap(&mailmap)?,
            };
            if commits > 0 {
                output.push('\n');
            }
            output.push_str(&format_signature(&sig));
            commits += 1;
        }

        debug!(commits, "walked history");
        Ok(output)
    }
}
