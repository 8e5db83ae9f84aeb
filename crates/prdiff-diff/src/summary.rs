//! Aggregate change statistics

use super::types::FilePatch;
use serde::Serialize;

/// Per-file counts, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub filename: String,
    pub additions: usize,
    pub deletions: usize,
    pub is_new: bool,
    pub is_deleted: bool,
    pub is_binary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub total_files: usize,
    pub total_additions: usize,
    pub total_deletions: usize,
    pub total_changes: usize,
    pub files: Vec<FileSummary>,
}

pub fn summarize(patches: &[FilePatch]) -> DiffSummary {
    let files: Vec<FileSummary> = patches
        .iter()
        .map(|p| FileSummary {
            filename: p.filename.clone(),
            additions: p.total_additions(),
            deletions: p.total_deletions(),
            is_new: p.is_new_file,
            is_deleted: p.is_deleted_file,
            is_binary: p.is_binary,
        })
        .collect();

    let total_additions = files.iter().map(|f| f.additions).sum();
    let total_deletions = files.iter().map(|f| f.deletions).sum();

    DiffSummary {
        total_files: files.len(),
        total_additions,
        total_deletions,
        total_changes: total_additions + total_deletions,
        files,
    }
}
