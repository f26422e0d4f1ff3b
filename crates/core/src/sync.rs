//! The update pipeline: read history, collect identities, load the mapping
//! file, merge, write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::config::SyncConfig;
use crate::errors::{CoreError, MailmapError};
use crate::history::{read_all, HistorySource};
use crate::identity::collect_identities;
use crate::mailmap::MailmapFile;

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Absolute path of the mapping file.
    pub path: PathBuf,
    /// Identities added by this run, sorted.
    pub added: Vec<String>,
    /// Number of distinct identities found in history.
    pub collected: usize,
    /// Whether the file was rewritten.
    pub written: bool,
}

/// One-shot mailmap updater for a single repository.
pub struct MailmapSync {
    config: SyncConfig,
    mailmap_path: PathBuf,
    source: Box<dyn HistorySource>,
}

impl MailmapSync {
    /// Build an updater for the repository at `repo_root` with the backend
    /// named in `config`.
    pub fn open(repo_root: &Path, config: SyncConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let source = config.history.backend.open(repo_root, &config.history)?;
        Self::with_source(repo_root, config, source)
    }

    /// Build an updater reading history from an explicit source.
    pub fn with_source(
        repo_root: &Path,
        config: SyncConfig,
        source: Box<dyn HistorySource>,
    ) -> Result<Self, CoreError> {
        let mailmap_path = config.mailmap_path(repo_root)?;
        Ok(Self {
            config,
            mailmap_path,
            source,
        })
    }

    /// Current file contents, or `None` if the file does not exist yet.
    fn read_existing(&self) -> Result<Option<String>, MailmapError> {
        match std::fs::read_to_string(&self.mailmap_path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(MailmapError::FileError {
                path: self.mailmap_path.display().to_string(),
                source,
            }),
        }
    }

    /// Run the pipeline once.
    ///
    /// History is read before the mapping file is touched, so a failed
    /// query leaves the file exactly as it was (or absent).
    #[instrument(skip(self), fields(path = %self.mailmap_path.display()))]
    pub fn run(&self) -> Result<SyncReport, CoreError> {
        let outputs = read_all(self.source.as_ref())?;
        let identities = collect_identities(outputs.iter().map(String::as_str));

        let on_disk = self.read_existing()?;
        let mut file = if self.config.dry_run {
            MailmapFile::from_contents(on_disk.as_deref().unwrap_or_default())
        } else {
            MailmapFile::load(&self.mailmap_path)?
        };
        let added = file.merge(&identities, self.config.mailmap.match_mode);
        let rendered = file.render();

        let unchanged = on_disk.as_deref() == Some(rendered.as_str());
        let written = if self.config.dry_run {
            debug!("dry run, leaving mailmap untouched");
            false
        } else if unchanged {
            debug!("mailmap already up to date");
            false
        } else {
            file.save(&self.mailmap_path)?;
            true
        };

        info!(
            collected = identities.len(),
            added = added.len(),
            written,
            "mailmap sync complete"
        );
        Ok(SyncReport {
            path: self.mailmap_path.clone(),
            added,
            collected: identities.len(),
            written,
        })
    }
}
