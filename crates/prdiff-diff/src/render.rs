//! Render parsed patches into budgeted prompt text
//!
//! Each file becomes one section:
//!
//! ```text
//! ## File: 'src/app.py' (new file)
//!
//! @@ ... @@ def main():
//! __new hunk__
//!   12  context
//!   13 +added
//! __old hunk__
//!   context
//!  -removed
//! ```
//!
//! New-side lines are numbered so a reader can point at lines of the
//! resulting file. The old-side block only appears when a hunk removes
//! something. Once the running size passes the budget, a truncation
//! placeholder is written for that file and rendering stops.

use super::skip::SkipFilter;
use super::types::{DiffHunk, FilePatch, LineKind};
use prdiff_core::DiffConfig;

pub const DEFAULT_MAX_TOKENS: usize = 8000;
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 3.5;

pub const BINARY_PLACEHOLDER: &str = "[Binary file - skipped]";
pub const SKIPPED_PLACEHOLDER: &str = "[Auto-generated/Lock file - skipped to save tokens]";
pub const TRUNCATED_PLACEHOLDER: &str = "[Content truncated - file too large]";

/// Token budget for one rendered prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptBudget {
    pub max_tokens: usize,
    pub chars_per_token: f64,
}

impl Default for PromptBudget {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

impl PromptBudget {
    pub fn new(max_tokens: usize, chars_per_token: f64) -> Self {
        Self {
            max_tokens,
            chars_per_token,
        }
    }

    /// Character allowance, rounded down; negative or NaN ratios give zero
    pub fn max_chars(&self) -> usize {
        (self.max_tokens as f64 * self.chars_per_token) as usize
    }
}

impl From<&DiffConfig> for PromptBudget {
    fn from(config: &DiffConfig) -> Self {
        Self::new(config.max_tokens, config.chars_per_token)
    }
}

/// Render with the built-in skip table
pub fn render_prompt(patches: &[FilePatch], max_tokens: usize, chars_per_token: f64) -> String {
    render_prompt_with(
        patches,
        PromptBudget::new(max_tokens, chars_per_token),
        &SkipFilter::default(),
    )
}

pub fn render_prompt_with(
    patches: &[FilePatch],
    budget: PromptBudget,
    filter: &SkipFilter,
) -> String {
    let max_chars = budget.max_chars();
    let mut parts: Vec<String> = Vec::with_capacity(patches.len());
    let mut total_chars = 0usize;

    for patch in patches {
        // Placeholders count toward the total but never trigger truncation
        if patch.is_binary {
            let section = placeholder(&patch.filename, BINARY_PLACEHOLDER);
            total_chars += section.chars().count();
            parts.push(section);
            continue;
        }
        if filter.is_skipped(&patch.filename) {
            let section = placeholder(&patch.filename, SKIPPED_PLACEHOLDER);
            total_chars += section.chars().count();
            parts.push(section);
            continue;
        }

        let section = render_file_section(patch);
        total_chars += section.chars().count();

        if total_chars > max_chars {
            tracing::debug!(
                file = %patch.filename,
                total_chars,
                max_chars,
                "prompt budget exhausted, truncating"
            );
            parts.push(placeholder(&patch.filename, TRUNCATED_PLACEHOLDER));
            break;
        }
        parts.push(section);
    }

    parts.join("\n")
}

fn placeholder(filename: &str, message: &str) -> String {
    format!("\n## File: '{}'\n{}\n", filename, message)
}

fn file_header(patch: &FilePatch) -> String {
    let mut header = format!("\n## File: '{}'", patch.filename);
    if patch.is_new_file {
        header.push_str(" (new file)");
    } else if patch.is_deleted_file {
        header.push_str(" (deleted)");
    } else if let Some(old) = &patch.old_filename {
        header.push_str(&format!(" (renamed from '{}')", old));
    }
    header
}

/// Render one file with all of its hunks, without budget checks
pub fn render_file_section(patch: &FilePatch) -> String {
    let mut lines = vec![file_header(patch), String::new()];
    for hunk in &patch.hunks {
        render_hunk(hunk, &mut lines);
    }
    lines.join("\n")
}

fn render_hunk(hunk: &DiffHunk, out: &mut Vec<String>) {
    if hunk.section_header.is_empty() {
        out.push("@@ ... @@".to_string());
    } else {
        out.push(format!("@@ ... @@ {}", hunk.section_header));
    }

    out.push("__new hunk__".to_string());
    for line in hunk.new_lines() {
        let number = line.line_number_new.map(|n| n.to_string()).unwrap_or_default();
        out.push(format!("{:>4} {}{}", number, line.kind.marker(), line.content));
    }

    if hunk.has_deletions() {
        out.push("__old hunk__".to_string());
        for line in hunk.old_lines() {
            let marker = if line.kind == LineKind::Deletion { '-' } else { ' ' };
            out.push(format!(" {}{}", marker, line.content));
        }
    }

    out.push(String::new());
}
