//! Type definitions for parsed diffs

use serde::{Deserialize, Serialize};

/// Kind of a line inside a hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Addition,
    Deletion,
    Context,
}

impl LineKind {
    /// The unified diff marker for this kind
    pub fn marker(self) -> char {
        match self {
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
            LineKind::Context => ' ',
        }
    }
}

/// A single line within a diff hunk, without its leading marker.
///
/// Additions carry only `line_number_new`, deletions only `line_number_old`,
/// context lines carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkLine {
    pub content: String,
    pub line_number_new: Option<usize>,
    pub line_number_old: Option<usize>,
    pub kind: LineKind,
}

impl HunkLine {
    pub fn addition(content: impl Into<String>, new: usize) -> Self {
        Self {
            content: content.into(),
            line_number_new: Some(new),
            line_number_old: None,
            kind: LineKind::Addition,
        }
    }

    pub fn deletion(content: impl Into<String>, old: usize) -> Self {
        Self {
            content: content.into(),
            line_number_new: None,
            line_number_old: Some(old),
            kind: LineKind::Deletion,
        }
    }

    pub fn context(content: impl Into<String>, old: usize, new: usize) -> Self {
        Self {
            content: content.into(),
            line_number_new: Some(new),
            line_number_old: Some(old),
            kind: LineKind::Context,
        }
    }
}

/// One `@@ ... @@` block of a file diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    /// The original header line, verbatim
    pub header: String,
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    /// Trailing text after the closing `@@`, e.g. an enclosing function
    pub section_header: String,
    pub lines: Vec<HunkLine>,
}

impl DiffHunk {
    /// Lines present in the new file (additions and context)
    pub fn new_lines(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != LineKind::Deletion)
    }

    /// Lines present in the old file (deletions and context)
    pub fn old_lines(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != LineKind::Addition)
    }

    pub fn additions(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Addition)
    }

    pub fn deletions(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Deletion)
    }

    pub fn has_deletions(&self) -> bool {
        self.deletions().next().is_some()
    }
}

/// All hunks for a single file in a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatch {
    /// Path in the new revision
    pub filename: String,
    /// Previous path, set only when the file was renamed
    pub old_filename: Option<String>,
    pub hunks: Vec<DiffHunk>,
    pub is_new_file: bool,
    pub is_deleted_file: bool,
    /// Binary patches never carry hunks
    pub is_binary: bool,
}

impl FilePatch {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            old_filename: None,
            hunks: Vec::new(),
            is_new_file: false,
            is_deleted_file: false,
            is_binary: false,
        }
    }

    pub fn total_additions(&self) -> usize {
        self.hunks.iter().map(|h| h.additions().count()).sum()
    }

    pub fn total_deletions(&self) -> usize {
        self.hunks.iter().map(|h| h.deletions().count()).sum()
    }

    pub fn total_changes(&self) -> usize {
        self.total_additions() + self.total_deletions()
    }

    /// Iterate every line of every hunk in order
    pub fn lines(&self) -> impl Iterator<Item = &HunkLine> {
        self.hunks.iter().flat_map(|h| h.lines.iter())
    }
}
