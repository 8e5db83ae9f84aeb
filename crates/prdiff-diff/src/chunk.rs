//! Split many file patches into token-bounded groups
//!
//! Greedy and order-preserving: patches are never reordered or split, so a
//! patch larger than the budget always sits alone in its chunk.

use super::types::FilePatch;

pub const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 4000;

/// Characters added per line for markers and line numbers
pub const LINE_OVERHEAD_CHARS: usize = 10;

/// Fixed ratio used for chunk estimates
pub const CHUNK_CHARS_PER_TOKEN: f64 = 3.5;

/// Rough token size of a patch's hunk content
pub fn estimate_tokens(patch: &FilePatch) -> usize {
    let chars: usize = patch
        .lines()
        .map(|line| line.content.chars().count() + LINE_OVERHEAD_CHARS)
        .sum();
    (chars as f64 / CHUNK_CHARS_PER_TOKEN) as usize
}

/// Group patches into chunks for separate model calls.
///
/// The open chunk is closed before adding the next patch when its running
/// total already exceeds `max_tokens_per_chunk`, or when the next patch
/// alone exceeds it. Empty chunks are never produced.
///
/// `max_tokens_per_chunk` is not a hard cap: a chunk just under the budget
/// still takes the next patch, so its total can approach twice the budget.
pub fn split_into_chunks(
    patches: &[FilePatch],
    max_tokens_per_chunk: usize,
) -> Vec<Vec<FilePatch>> {
    let mut chunks: Vec<Vec<FilePatch>> = Vec::new();
    let mut current: Vec<FilePatch> = Vec::new();
    let mut current_tokens = 0usize;

    for patch in patches {
        let tokens = estimate_tokens(patch);
        let over_budget = current_tokens > max_tokens_per_chunk || tokens > max_tokens_per_chunk;

        if over_budget && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_tokens = 0;
        }

        current.push(patch.clone());
        current_tokens = current_tokens.saturating_add(tokens);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    tracing::debug!(
        files = patches.len(),
        chunks = chunks.len(),
        max_tokens_per_chunk,
        "split diff into chunks"
    );

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiffHunk, HunkLine};

    /// A patch whose estimate is exactly `tokens`
    fn patch_with_tokens(name: &str, tokens: usize) -> FilePatch {
        // each line: 25 chars + 10 overhead = 35 chars = 10 tokens
        assert_eq!(tokens % 10, 0);
        let lines = (0..tokens / 10)
            .map(|i| HunkLine::addition("x".repeat(25), i + 1))
            .collect::<Vec<_>>();
        let mut patch = FilePatch::new(name);
        patch.hunks.push(DiffHunk {
            header: "@@ -0,0 +1 @@".to_string(),
            old_start: 0,
            old_count: 0,
            new_start: 1,
            new_count: lines.len(),
            section_header: String::new(),
            lines,
        });
        patch
    }

    fn names(chunks: &[Vec<FilePatch>]) -> Vec<Vec<&str>> {
        chunks
            .iter()
            .map(|c| c.iter().map(|p| p.filename.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(&patch_with_tokens("a", 3000)), 3000);
        assert_eq!(estimate_tokens(&FilePatch::new("empty")), 0);

        let mut patch = FilePatch::new("short");
        patch.hunks.push(DiffHunk {
            header: String::new(),
            old_start: 1,
            old_count: 1,
            new_start: 1,
            new_count: 1,
            section_header: String::new(),
            lines: vec![HunkLine::context("abc", 1, 1)],
        });
        // 13 / 3.5 rounds down
        assert_eq!(estimate_tokens(&patch), 3);
    }

    #[test]
    fn test_three_equal_patches() {
        let patches = vec![
            patch_with_tokens("p1", 3000),
            patch_with_tokens("p2", 3000),
            patch_with_tokens("p3", 3000),
        ];
        let chunks = split_into_chunks(&patches, 5000);
        assert_eq!(names(&chunks), vec![vec!["p1", "p2"], vec!["p3"]]);
    }

    #[test]
    fn test_oversized_patch_stands_alone() {
        let patches = vec![
            patch_with_tokens("small", 100),
            patch_with_tokens("huge", 9000),
            patch_with_tokens("tail", 100),
        ];
        let chunks = split_into_chunks(&patches, 5000);
        assert_eq!(names(&chunks), vec![vec!["small"], vec!["huge"], vec!["tail"]]);
    }

    #[test]
    fn test_small_patches_share_a_chunk() {
        let patches = vec![
            patch_with_tokens("a", 100),
            patch_with_tokens("b", 100),
            patch_with_tokens("c", 100),
        ];
        let chunks = split_into_chunks(&patches, 4000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 3);
    }

    #[test]
    fn test_chunk_may_exceed_budget() {
        let patches = vec![patch_with_tokens("a", 4000), patch_with_tokens("b", 4000)];
        let chunks = split_into_chunks(&patches, 5000);
        assert_eq!(names(&chunks), vec![vec!["a", "b"]]);
        let total: usize = chunks[0].iter().map(estimate_tokens).sum();
        assert_eq!(total, 8000);
    }

    #[test]
    fn test_no_patches_no_chunks() {
        assert!(split_into_chunks(&[], 4000).is_empty());
    }

    #[test]
    fn test_binary_patches_weigh_nothing() {
        let mut image = FilePatch::new("a.png");
        image.is_binary = true;
        let chunks = split_into_chunks(&[image.clone(), image], 1);
        assert_eq!(chunks.len(), 1);
    }
}
