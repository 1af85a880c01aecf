//! Diff rendering for previewing planned reference updates.

use crate::stream::FileChange;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Unified diff for one planned change.
pub fn unified_diff(change: &FileChange) -> String {
    render(change, false)
}

/// Unified diff with ANSI colors for terminal display.
pub fn colorized_diff(change: &FileChange) -> String {
    render(change, true)
}

fn render(change: &FileChange, color: bool) -> String {
    let diff = TextDiff::from_lines(change.original.as_str(), change.transformed.as_str());
    let mut output = String::new();

    let (header_color, header_reset) = if color { (CYAN, RESET) } else { ("", "") };
    writeln!(
        &mut output,
        "{}--- a/{}{}",
        header_color,
        change.path.display(),
        header_reset
    )
    .unwrap();
    writeln!(
        &mut output,
        "{}+++ b/{}{}",
        header_color,
        change.path.display(),
        header_reset
    )
    .unwrap();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 && !color {
            writeln!(&mut output).unwrap();
        }
        for op in group {
            for line in diff.iter_changes(op) {
                let (sign, line_color) = match line.tag() {
                    ChangeTag::Delete => ("-", RED),
                    ChangeTag::Insert => ("+", GREEN),
                    ChangeTag::Equal => (" ", ""),
                };
                if color && !line_color.is_empty() {
                    write!(&mut output, "{}{}{}{}", line_color, sign, line.value(), RESET)
                        .unwrap();
                } else {
                    write!(&mut output, "{}{}", sign, line.value()).unwrap();
                }
            }
        }
    }

    output
}

/// Aggregate counts over a set of planned changes.
#[derive(Debug, Default)]
pub struct DiffSummary {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    /// Tallies one change into the summary.
    pub fn record(&mut self, change: &FileChange) {
        let diff = TextDiff::from_lines(change.original.as_str(), change.transformed.as_str());
        let mut insertions = 0;
        let mut deletions = 0;
        for line in diff.iter_all_changes() {
            match line.tag() {
                ChangeTag::Insert => insertions += 1,
                ChangeTag::Delete => deletions += 1,
                ChangeTag::Equal => {}
            }
        }
        if insertions > 0 || deletions > 0 {
            self.files_changed += 1;
        }
        self.insertions += insertions;
        self.deletions += deletions;
    }

    /// Summarizes a slice of planned changes.
    pub fn from_changes(changes: &[FileChange]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            summary.record(change);
        }
        summary
    }
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} file(s) changed, {} insertions(+), {} deletions(-)",
            self.files_changed, self.insertions, self.deletions
        )
    }
}
