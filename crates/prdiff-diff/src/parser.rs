//! Unified diff parsing
//!
//! A single forward pass over the physical lines of a diff. Each line is
//! classified on its own, then folded into a [`Parser`] that owns the patch
//! and hunk under construction. Malformed or out-of-place lines are dropped;
//! parsing never fails.

use super::types::{DiffHunk, FilePatch, HunkLine};

/// Parse unified diff text into file patches, in input order
pub fn parse_diff(diff_text: &str) -> Vec<FilePatch> {
    if diff_text.trim().is_empty() {
        return Vec::new();
    }

    let patches = diff_text
        .split_terminator('\n')
        .fold(Parser::default(), Parser::feed)
        .finish();

    tracing::debug!(
        files = patches.len(),
        hunks = patches.iter().map(|p| p.hunks.len()).sum::<usize>(),
        "parsed diff"
    );

    patches
}

/// What a single diff line is, checked in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineClass<'a> {
    FileHeader { old: &'a str, new: &'a str },
    NewFileMode,
    DeletedFileMode,
    Binary,
    /// `---`, `+++` and `index` lines
    Metadata,
    HunkHeader(HunkHeader<'a>),
    Addition(&'a str),
    Deletion(&'a str),
    Context(&'a str),
    Other,
}

/// Numeric fields of a `@@ -a,b +c,d @@ section` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HunkHeader<'a> {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub section: &'a str,
}

pub(crate) fn classify(line: &str) -> LineClass<'_> {
    if let Some((old, new)) = parse_file_header(line) {
        return LineClass::FileHeader { old, new };
    }
    if line.starts_with("new file mode") {
        return LineClass::NewFileMode;
    }
    if line.starts_with("deleted file mode") {
        return LineClass::DeletedFileMode;
    }
    // Body lines always start with a marker, so they never count as binary notices
    if !starts_with_marker(line) && line.contains("Binary files") {
        return LineClass::Binary;
    }
    if line.starts_with("---") || line.starts_with("+++") || line.starts_with("index ") {
        return LineClass::Metadata;
    }
    if let Some(header) = parse_hunk_header(line) {
        return LineClass::HunkHeader(header);
    }
    if let Some(content) = line.strip_prefix('+') {
        return LineClass::Addition(content);
    }
    if let Some(content) = line.strip_prefix('-') {
        return LineClass::Deletion(content);
    }
    if let Some(content) = line.strip_prefix(' ') {
        return LineClass::Context(content);
    }
    if line.is_empty() {
        return LineClass::Context("");
    }
    LineClass::Other
}

fn starts_with_marker(line: &str) -> bool {
    line.starts_with(['+', '-', ' '])
}

/// Split `diff --git a/<old> b/<new>` at the last ` b/`
pub(crate) fn parse_file_header(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("diff --git a/")?;
    let split = rest.rfind(" b/")?;
    Some((&rest[..split], &rest[split + 3..]))
}

/// Parse a hunk header; omitted counts default to 1
pub(crate) fn parse_hunk_header(line: &str) -> Option<HunkHeader<'_>> {
    let rest = line.strip_prefix("@@ -")?;
    let (old_start, old_count, rest) = parse_range(rest)?;
    let rest = rest.strip_prefix(" +")?;
    let (new_start, new_count, rest) = parse_range(rest)?;
    let rest = rest.strip_prefix(" @@")?;

    let section = if rest.is_empty() {
        rest
    } else if rest.starts_with(char::is_whitespace) {
        rest.trim_start()
    } else {
        return None;
    };

    Some(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
        section,
    })
}

fn parse_range(s: &str) -> Option<(usize, usize, &str)> {
    let (start, rest) = take_number(s)?;
    match rest.strip_prefix(',') {
        Some(after) => {
            let (count, rest) = take_number(after)?;
            Some((start, count, rest))
        }
        None => Some((start, 1, rest)),
    }
}

fn take_number(s: &str) -> Option<(usize, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Hunk under construction with its running line counters.
///
/// Counters saturate, so a header starting near `usize::MAX` cannot overflow.
#[derive(Debug)]
struct HunkBuilder {
    hunk: DiffHunk,
    old_line_no: usize,
    new_line_no: usize,
}

impl HunkBuilder {
    fn open(raw: &str, header: HunkHeader<'_>) -> Self {
        Self {
            hunk: DiffHunk {
                header: raw.to_string(),
                old_start: header.old_start,
                old_count: header.old_count,
                new_start: header.new_start,
                new_count: header.new_count,
                section_header: header.section.to_string(),
                lines: Vec::new(),
            },
            old_line_no: header.old_start,
            new_line_no: header.new_start,
        }
    }

    fn push_addition(&mut self, content: &str) {
        self.hunk.lines.push(HunkLine::addition(content, self.new_line_no));
        self.new_line_no = self.new_line_no.saturating_add(1);
    }

    fn push_deletion(&mut self, content: &str) {
        self.hunk.lines.push(HunkLine::deletion(content, self.old_line_no));
        self.old_line_no = self.old_line_no.saturating_add(1);
    }

    fn push_context(&mut self, content: &str) {
        self.hunk
            .lines
            .push(HunkLine::context(content, self.old_line_no, self.new_line_no));
        self.old_line_no = self.old_line_no.saturating_add(1);
        self.new_line_no = self.new_line_no.saturating_add(1);
    }
}

/// File patch under construction
#[derive(Debug)]
struct PatchBuilder {
    patch: FilePatch,
    hunk: Option<HunkBuilder>,
}

impl PatchBuilder {
    fn open(old: &str, new: &str) -> Self {
        let mut patch = FilePatch::new(new);
        if old != new {
            patch.old_filename = Some(old.to_string());
        }
        Self { patch, hunk: None }
    }

    fn apply(&mut self, raw: &str, class: LineClass<'_>) {
        match class {
            LineClass::NewFileMode => self.patch.is_new_file = true,
            LineClass::DeletedFileMode => self.patch.is_deleted_file = true,
            LineClass::Binary => {
                if self.hunk.is_none() && self.patch.hunks.is_empty() {
                    self.patch.is_binary = true;
                }
            }
            LineClass::HunkHeader(header) => self.open_hunk(raw, header),
            LineClass::Addition(content) => {
                if let Some(hunk) = self.hunk.as_mut() {
                    hunk.push_addition(content);
                }
            }
            LineClass::Deletion(content) => {
                if let Some(hunk) = self.hunk.as_mut() {
                    hunk.push_deletion(content);
                }
            }
            LineClass::Context(content) => {
                if let Some(hunk) = self.hunk.as_mut() {
                    hunk.push_context(content);
                }
            }
            LineClass::FileHeader { .. } | LineClass::Metadata | LineClass::Other => {}
        }
    }

    fn open_hunk(&mut self, raw: &str, header: HunkHeader<'_>) {
        self.close_hunk();
        if self.patch.is_binary {
            return;
        }
        self.hunk = Some(HunkBuilder::open(raw, header));
    }

    fn close_hunk(&mut self) {
        if let Some(builder) = self.hunk.take() {
            self.patch.hunks.push(builder.hunk);
        }
    }

    fn finish(mut self) -> FilePatch {
        self.close_hunk();
        self.patch
    }
}

/// Fold state for one parse call
#[derive(Debug, Default)]
struct Parser {
    patches: Vec<FilePatch>,
    current: Option<PatchBuilder>,
}

impl Parser {
    fn feed(mut self, line: &str) -> Self {
        let class = classify(line);

        if let LineClass::FileHeader { old, new } = class {
            self.close_patch();
            self.current = Some(PatchBuilder::open(old, new));
            return self;
        }

        // Preamble before the first file header is ignored
        if let Some(builder) = self.current.as_mut() {
            builder.apply(line, class);
        }
        self
    }

    fn close_patch(&mut self) {
        if let Some(builder) = self.current.take() {
            self.patches.push(builder.finish());
        }
    }

    fn finish(mut self) -> Vec<FilePatch> {
        self.close_patch();
        self.patches
    }
}
