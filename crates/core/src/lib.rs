//! mailmapsync core library.
//!
//! Collects every author and committer identity from a repository's commit
//! history and appends the ones a `.mailmap` file does not yet account for,
//! keeping the file's header comments and existing mappings intact.

pub mod config;
pub mod errors;
pub mod history;
pub mod identity;
pub mod mailmap;
pub mod sync;

// Re-exports for convenience.
pub use config::SyncConfig;
pub use errors::CoreError;
pub use mailmap::{MailmapFile, MatchMode};
pub use sync::{MailmapSync, SyncReport};
