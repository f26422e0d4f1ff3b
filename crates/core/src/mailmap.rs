//! `.mailmap` file reader/writer.
//!
//! The file is split into two parts on load:
//!
//! ```text
//! # comment lines             -> header, kept verbatim and in order
//! Name <email>                -> mapping lines, kept as a set
//! Proper <p@x>  Other <o@x>
//! ```
//!
//! On save the header comes first, then one blank line, then the mapping
//! lines in sorted order. Existing lines are never edited or dropped.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::MailmapError;
use crate::identity::{split_identities, IdentitySet};

/// Template used when the mapping file is missing or empty.
pub const DEFAULT_HEADER: &str = "\
# Format is:
#   Preferred Name <preferred e-mail>  Other Name <other e-mail>
#
# Reference: https://git-scm.com/docs/git-blame#_mapping_authors
";

const COMMENT_MARKER: char = '#';

/// How an identity is judged to be already present in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Present if the identity occurs anywhere in the original file text.
    #[default]
    Substring,
    /// Present if a mapping line names the identity as one of its sides.
    Field,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchMode::Substring => "substring",
            MatchMode::Field => "field",
        })
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substring" => Ok(MatchMode::Substring),
            "field" => Ok(MatchMode::Field),
            other => Err(format!(
                "unknown match mode '{}' (expected substring or field)",
                other
            )),
        }
    }
}

/// In-memory view of a mapping file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailmapFile {
    /// Comment lines, verbatim, in file order.
    pub header_comments: Vec<String>,
    /// Non-comment, non-blank lines.
    pub mappings: BTreeSet<String>,
    /// The text the file was parsed from.
    original: String,
}

impl MailmapFile {
    /// Load the mapping file, creating it empty if it does not exist.
    ///
    /// An empty file is treated as if it held [`DEFAULT_HEADER`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MailmapError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading mailmap file");

        let file_error = |source| MailmapError::FileError {
            path: path.display().to_string(),
            source,
        };

        if !path.exists() {
            debug!("mailmap file missing, creating it");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(file_error)?;
            }
        }
        // Append mode creates without truncating a file that appeared meanwhile.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(file_error)?;

        let contents = std::fs::read_to_string(path).map_err(file_error)?;
        let file = Self::from_contents(&contents);

        debug!(
            comments = file.header_comments.len(),
            mappings = file.mappings.len(),
            "parsed mailmap file"
        );
        Ok(file)
    }

    /// Parse file contents, substituting [`DEFAULT_HEADER`] for an empty file.
    pub fn from_contents(contents: &str) -> Self {
        if contents.is_empty() {
            debug!("mailmap file empty, starting from default header");
            Self::parse(DEFAULT_HEADER)
        } else {
            Self::parse(contents)
        }
    }

    /// Split `content` into header comments and mapping lines.
    pub fn parse(content: &str) -> Self {
        let mut header_comments = Vec::new();
        let mut mappings = BTreeSet::new();

        for line in content.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with(COMMENT_MARKER) {
                header_comments.push(line.to_string());
            } else if !trimmed.is_empty() {
                mappings.insert(line.to_string());
            }
        }

        Self {
            header_comments,
            mappings,
            original: content.to_string(),
        }
    }

    /// The raw text this file was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Whether `identity` is already accounted for in the file.
    ///
    /// Always judged against the file as it was read, not against lines added
    /// by [`merge`](Self::merge).
    pub fn covers(&self, identity: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Substring => self.original.contains(identity),
            MatchMode::Field => self.original.lines().any(|line| {
                !line.trim_start().starts_with(COMMENT_MARKER)
                    && split_identities(line).contains(&identity)
            }),
        }
    }

    /// Add every identity the file does not already cover.
    ///
    /// Returns the newly added identities in sorted order.
    pub fn merge(&mut self, identities: &IdentitySet, mode: MatchMode) -> Vec<String> {
        let missing: Vec<String> = identities
            .iter()
            .filter(|identity| !self.covers(identity, mode))
            .cloned()
            .collect();

        let mut added = Vec::with_capacity(missing.len());
        for identity in missing {
            if self.mappings.insert(identity.clone()) {
                added.push(identity);
            }
        }

        debug!(added = added.len(), %mode, "merged identities into mailmap");
        added
    }

    /// Serialize: header, blank line, sorted mapping lines, trailing newline.
    pub fn render(&self) -> String {
        let mappings: Vec<&str> = self.mappings.iter().map(String::as_str).collect();
        format!(
            "{}\n\n{}\n",
            self.header_comments.join("\n"),
            mappings.join("\n")
        )
    }

    /// Overwrite `path` with [`render`](Self::render).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MailmapError> {
        let path = path.as_ref();
        info!(path = %path.display(), "saving mailmap file");

        std::fs::write(path, self.render()).map_err(|source| MailmapError::FileError {
            path: path.display().to_string(),
            source,
        })?;

        debug!(count = self.mappings.len(), "saved mailmap entries");
        Ok(())
    }
}
