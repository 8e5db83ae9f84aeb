//! Unified diff parsing and prompt rendering for LLM context
//!
//! Turns raw `git diff` output into structured patches, renders them as
//! compact line-numbered text within a token budget, summarizes change
//! counts, and splits large diffs into token-bounded chunks. Everything
//! here is pure: no I/O, no shared state.

mod chunk;
mod error;
mod parser;
mod render;
mod skip;
mod summary;
mod types;

pub use chunk::{
    estimate_tokens, split_into_chunks, CHUNK_CHARS_PER_TOKEN, DEFAULT_MAX_TOKENS_PER_CHUNK,
    LINE_OVERHEAD_CHARS,
};
pub use error::{DiffError, DiffResult};
pub use parser::parse_diff;
pub use render::{
    render_file_section, render_prompt, render_prompt_with, PromptBudget, BINARY_PLACEHOLDER,
    DEFAULT_CHARS_PER_TOKEN, DEFAULT_MAX_TOKENS, SKIPPED_PLACEHOLDER, TRUNCATED_PLACEHOLDER,
};
pub use skip::{should_skip, SkipFilter};
pub use summary::{summarize, DiffSummary, FileSummary};
pub use types::{DiffHunk, FilePatch, HunkLine, LineKind};
