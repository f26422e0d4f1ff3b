//! Terminal styling for the run summary.

use console::Style;

fn marked(style: Style, mark: &str, msg: &str) -> String {
    format!("{} {}", style.apply_to(mark), msg)
}

/// Green check in front of `msg`.
pub fn success(msg: &str) -> String {
    marked(Style::new().green(), "✓", msg)
}

/// A line that would be added to the mapping file.
pub fn added(identity: &str) -> String {
    marked(Style::new().green(), "+", identity)
}

pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_lines_keep_text() {
        console::set_colors_enabled(false);
        assert_eq!(added("Alice <a@x.com>"), "+ Alice <a@x.com>");
        assert_eq!(success("done"), "✓ done");
        assert_eq!(dim("quiet"), "quiet");
    }
}
