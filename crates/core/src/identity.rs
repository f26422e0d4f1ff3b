//! Contributor identities collected from commit history.
//!
//! An identity is the opaque `Name <email>` string git prints for an author
//! or committer. Nothing here validates names or addresses: whatever the
//! history produces is carried through unchanged.

use std::collections::BTreeSet;

use tracing::debug;

/// A `Name <email>` string as emitted by the history reader.
pub type Identity = String;

/// Deduplicated set of identities. Iteration order is lexicographic.
pub type IdentitySet = BTreeSet<Identity>;

/// Collect identities from one or more raw history outputs.
///
/// Each physical line is trimmed; empty lines are dropped and everything else
/// is inserted verbatim.
pub fn collect_identities<'a, I>(streams: I) -> IdentitySet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut identities = IdentitySet::new();
    for stream in streams {
        for line in stream.lines() {
            let line = line.trim();
            if !line.is_empty() {
                identities.insert(line.to_string());
            }
        }
    }
    debug!(count = identities.len(), "collected distinct identities");
    identities
}

/// Split a mapping line into the identities it names.
///
/// Every segment ends at a closing `>`, so `Proper <p@x>  Other <o@x>` yields
/// `["Proper <p@x>", "Other <o@x>"]` and `<p@x> <o@x>` yields `["<p@x>", "<o@x>"]`.
/// Trailing text after the last `>` is ignored.
pub fn split_identities(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = line;
    while let Some(end) = rest.find('>') {
        let segment = rest[..=end].trim();
        if !segment.is_empty() {
            segments.push(segment);
        }
        rest = &rest[end + 1..];
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_dedups_across_streams() {
        let authors = "Alice <a@x.com>\nBob <b@x.com>\nAlice <a@x.com>\n";
        let committers = "Bob <b@x.com>\nGitHub <noreply@github.com>";

        let set = collect_identities([authors, committers]);
        let collected: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(
            collected,
            vec!["Alice <a@x.com>", "Bob <b@x.com>", "GitHub <noreply@github.com>"]
        );
    }

    #[test]
    fn test_collect_trims_and_skips_blank_lines() {
        let set = collect_identities(["  Alice <a@x.com>  \n\n   \n\tBob <b@x.com>\r\n"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("Alice <a@x.com>"));
        assert!(set.contains("Bob <b@x.com>"));
    }

    #[test]
    fn test_collect_passes_malformed_lines_through() {
        let set = collect_identities(["no email here\n <> \n"]);
        assert!(set.contains("no email here"));
        assert!(set.contains("<>"));
    }

    #[test]
    fn test_collect_empty_history() {
        assert!(collect_identities(["", ""]).is_empty());
    }

    #[test]
    fn test_split_alias_line() {
        assert_eq!(
            split_identities("Alice Preferred <p@x.com>  Alice <a@x.com>"),
            vec!["Alice Preferred <p@x.com>", "Alice <a@x.com>"]
        );
    }

    #[test]
    fn test_split_email_only_forms() {
        assert_eq!(
            split_identities("<p@x.com> <a@x.com>"),
            vec!["<p@x.com>", "<a@x.com>"]
        );
        assert_eq!(split_identities("Bob <b@x.com>"), vec!["Bob <b@x.com>"]);
    }

    #[test]
    fn test_split_ignores_trailing_text() {
        assert_eq!(split_identities("Bob <b@x.com> # old laptop"), vec!["Bob <b@x.com>"]);
        assert!(split_identities("no brackets").is_empty());
    }
}
