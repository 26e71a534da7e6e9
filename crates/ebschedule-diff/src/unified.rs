//! Line-level diff of normalized text, rendered as a unified diff.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce structured
//! hunks with context lines, then formats them in the standard unified
//! layout and optionally colors removed and added lines.

use std::fmt;

use colored::Colorize;
use similar::{Algorithm, ChangeTag, TextDiff};

/// Label used for the "from" side when there is nothing to diff against.
pub const NULL_DEVICE: &str = "/dev/null";

/// Number of unchanged lines kept around each change.
pub const CONTEXT_LINES: usize = 3;

/// The result of diffing two texts line by line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineDiff {
    /// The diff hunks.
    pub hunks: Vec<Hunk>,
    /// Total number of lines in the old text.
    pub old_lines: usize,
    /// Total number of lines in the new text.
    pub new_lines: usize,
}

impl LineDiff {
    /// Returns `true` if the two texts are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }
}

/// A contiguous region of changes in a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk {
    /// Line number in the old text where this hunk starts (1-based).
    pub old_start: usize,
    /// Number of lines from the old text in this hunk.
    pub old_count: usize,
    /// Line number in the new text where this hunk starts (1-based).
    pub new_start: usize,
    /// Number of lines from the new text in this hunk.
    pub new_count: usize,
    /// The individual diff lines in this hunk.
    pub lines: Vec<DiffLine>,
}

/// A single line in a diff hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// A line present in both old and new (context).
    Context(String),
    /// A line added in the new text.
    Added(String),
    /// A line removed from the old text.
    Removed(String),
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context(text) => write!(f, " {text}"),
            Self::Added(text) => write!(f, "+{text}"),
            Self::Removed(text) => write!(f, "-{text}"),
        }
    }
}

/// `start,count` as written in a hunk header. An empty range names the line
/// before it, and a count of one is left out.
fn format_range(start: usize, count: usize) -> String {
    match count {
        0 => format!("{},0", start.saturating_sub(1)),
        1 => start.to_string(),
        _ => format!("{start},{count}"),
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "@@ -{} +{} @@",
            format_range(self.old_start, self.old_count),
            format_range(self.new_start, self.new_count)
        )?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Compute a line-by-line diff between two texts.
///
/// The result is deterministic for identical inputs. A final line without a
/// trailing newline differs from the same line with one, and both are shown
/// with their text only.
pub fn diff_lines(old: &str, new: &str) -> LineDiff {
    let old_lines = old.lines().count();
    let new_lines = new.lines().count();

    // Identical content.
    if old == new {
        return LineDiff {
            hunks: Vec::new(),
            old_lines,
            new_lines,
        };
    }

    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(old, new);

    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(CONTEXT_LINES) {
        let mut lines = Vec::new();
        let mut hunk_old_count = 0usize;
        let mut hunk_new_count = 0usize;

        let (hunk_old_start, hunk_new_start) = match group.first() {
            Some(op) => (op.old_range().start + 1, op.new_range().start + 1),
            None => continue,
        };

        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        lines.push(DiffLine::Context(text));
                        hunk_old_count += 1;
                        hunk_new_count += 1;
                    }
                    ChangeTag::Delete => {
                        lines.push(DiffLine::Removed(text));
                        hunk_old_count += 1;
                    }
                    ChangeTag::Insert => {
                        lines.push(DiffLine::Added(text));
                        hunk_new_count += 1;
                    }
                }
            }
        }

        hunks.push(Hunk {
            old_start: hunk_old_start,
            old_count: hunk_old_count,
            new_start: hunk_new_start,
            new_count: hunk_new_count,
            lines,
        });
    }

    LineDiff {
        hunks,
        old_lines,
        new_lines,
    }
}

/// Render a plain unified diff between two labeled texts.
///
/// Returns an empty string when the texts are identical. An empty
/// `from_text` means the resource does not exist yet, and the from side is
/// labeled [`NULL_DEVICE`].
pub fn render_unified(from_label: &str, from_text: &str, to_label: &str, to_text: &str) -> String {
    let diff = diff_lines(from_text, to_text);
    if diff.is_empty() {
        return String::new();
    }

    let from_label = if from_text.is_empty() {
        NULL_DEVICE
    } else {
        from_label
    };

    let mut out = format!("--- {from_label}\n+++ {to_label}\n");
    for hunk in &diff.hunks {
        out.push_str(&hunk.to_string());
    }
    out
}

/// Color removed lines red and added lines green, leaving the text intact.
pub fn highlight(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len());
    for line in diff.lines() {
        if line.starts_with('-') {
            out.push_str(&line.red().to_string());
        } else if line.starts_with('+') {
            out.push_str(&line.green().to_string());
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Render a highlighted unified diff between two labeled texts.
pub fn render(from_label: &str, from_text: &str, to_label: &str, to_text: &str) -> String {
    highlight(&render_unified(from_label, from_text, to_label, to_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_no_diff() {
        let content = "hello\nworld\n";
        let diff = diff_lines(content, content);
        assert!(diff.is_empty());
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 0);
        assert_eq!(render_unified("a", content, "b", content), "");
        assert_eq!(render("a", content, "b", content), "");
    }

    #[test]
    fn single_line_addition() {
        let diff = diff_lines("line1\nline2\n", "line1\nline2\nline3\n");
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn missing_final_newline_is_a_change() {
        let diff = diff_lines("a", "a\n");
        assert!(!diff.is_empty());
        assert_eq!(diff.deletions(), 1);
        assert_eq!(diff.additions(), 1);
        assert_eq!(
            render_unified("old", "x\na", "new", "x\na\n"),
            "--- old\n+++ new\n@@ -1,2 +1,2 @@\n x\n-a\n+a\n"
        );
    }

    #[test]
    fn modification_shows_remove_and_add() {
        let out = render_unified("old.yaml", "a\nb\nc\n", "new.yaml", "a\nX\nc\n");
        assert_eq!(
            out,
            "--- old.yaml\n+++ new.yaml\n@@ -1,3 +1,3 @@\n a\n-b\n+X\n c\n"
        );
    }

    #[test]
    fn empty_from_side_uses_null_device() {
        let out = render_unified("ignored", "", "schedule.yaml", "Name: x\n");
        assert_eq!(out, "--- /dev/null\n+++ schedule.yaml\n@@ -0,0 +1 @@\n+Name: x\n");
    }

    #[test]
    fn content_to_empty() {
        let out = render_unified("arn", "a\nb\n", "schedule.yaml", "");
        assert_eq!(out, "--- arn\n+++ schedule.yaml\n@@ -1,2 +0,0 @@\n-a\n-b\n");
    }

    #[test]
    fn distant_changes_form_separate_hunks() {
        let old: String = (1..=20).map(|i| format!("l{i}\n")).collect();
        let new = old.replace("l2\n", "x2\n").replace("l19\n", "x19\n");
        let diff = diff_lines(&old, &new);
        assert_eq!(diff.hunks.len(), 2);
        assert_eq!(diff.hunks[0].old_start, 1);
        assert_eq!(diff.hunks[1].old_start, 16);
        assert_eq!(diff.hunks[1].old_count, 5);

        let text = render_unified("a", &old, "b", &new);
        assert!(text.contains("@@ -1,5 +1,5 @@\n"));
        assert!(text.contains("@@ -16,5 +16,5 @@\n"));
    }

    #[test]
    fn context_lines_present() {
        let old = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\n";
        let new = "a\nb\nc\nd\nX\nf\ng\nh\ni\nj\n";
        let diff = diff_lines(old, new);
        let hunk = &diff.hunks[0];
        let context = hunk
            .lines
            .iter()
            .filter(|l| matches!(l, DiffLine::Context(_)))
            .count();
        assert_eq!(context, 6);
        assert_eq!((hunk.old_start, hunk.old_count), (2, 7));
    }

    #[test]
    fn deterministic_output() {
        let old = "k: 1\nl: 2\nm: 3\n";
        let new = "k: 1\nm: 4\nn: 5\n";
        assert_eq!(
            render_unified("a", old, "b", new),
            render_unified("a", old, "b", new)
        );
    }

    #[test]
    fn highlight_keeps_line_text() {
        let plain = "--- a\n+++ b\n@@ -1 +1 @@\n-old\n+new\n";
        let colored = highlight(plain);
        assert_eq!(colored.lines().count(), 5);
        for (line, original) in colored.lines().zip(plain.lines()) {
            assert!(line.contains(original));
        }
        assert!(colored.contains("@@ -1 +1 @@\n"));
    }
}
