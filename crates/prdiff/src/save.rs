//! Saving rendered chunks to disk

use prdiff_diff::{estimate_tokens, render_prompt_with, FilePatch, PromptBudget, SkipFilter};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "chunks.json";

/// Entry in the chunks.json manifest
#[derive(Debug, Serialize)]
pub struct ChunkEntry {
    pub chunk: String,
    pub file: String,
    pub files: Vec<String>,
    pub estimated_tokens: usize,
}

#[derive(Debug)]
pub struct SaveReport {
    pub manifest_path: PathBuf,
    pub chunk_count: usize,
}

/// Generate chunk suffix (aa-zz, then numbers)
pub fn generate_chunk_suffix(index: usize) -> String {
    // First use aa-zz (26*26 = 676 combinations)
    if index < 676 {
        let first = (index / 26) as u8;
        let second = (index % 26) as u8;
        format!("{}{}", (b'a' + first) as char, (b'a' + second) as char)
    } else {
        // After zz, use numbers
        format!("{:04}", index - 676)
    }
}

fn is_chunk_file(name: &str) -> bool {
    name.starts_with("chunk_") && name.ends_with(".txt")
}

/// Remove chunk files left over from a previous run, keeping everything else
fn remove_stale_chunks(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let name = entry.file_name();
        if is_file && name.to_str().is_some_and(is_chunk_file) {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Write one rendered file per chunk plus a JSON manifest
pub fn save_chunks(
    chunks: &[Vec<FilePatch>],
    output_dir: &Path,
    budget: PromptBudget,
    filter: &SkipFilter,
) -> io::Result<SaveReport> {
    if output_dir.exists() {
        remove_stale_chunks(output_dir)?;
    } else {
        fs::create_dir_all(output_dir)?;
    }

    let mut manifest = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        let suffix = generate_chunk_suffix(index);
        let chunk_filename = format!("chunk_{}.txt", suffix);

        let mut file = fs::File::create(output_dir.join(&chunk_filename))?;
        file.write_all(render_prompt_with(chunk, budget, filter).as_bytes())?;

        manifest.push(ChunkEntry {
            chunk: suffix,
            file: chunk_filename,
            files: chunk.iter().map(|p| p.filename.clone()).collect(),
            estimated_tokens: chunk.iter().map(estimate_tokens).sum(),
        });
    }

    let manifest_path = output_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&manifest_path, json + "\n")?;

    tracing::info!(
        dir = %output_dir.display(),
        chunks = chunks.len(),
        "saved diff chunks"
    );

    Ok(SaveReport {
        manifest_path,
        chunk_count: chunks.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prdiff_diff::{parse_diff, split_into_chunks};

    const DIFF: &str = "\
diff --git a/a.rs b/a.rs
@@ -1 +1,2 @@
 line1
+line2
diff --git a/b.rs b/b.rs
@@ -1 +1,2 @@
 lineA
+lineB
";

    #[test]
    fn test_generate_chunk_suffix() {
        assert_eq!(generate_chunk_suffix(0), "aa");
        assert_eq!(generate_chunk_suffix(1), "ab");
        assert_eq!(generate_chunk_suffix(26), "ba");
        assert_eq!(generate_chunk_suffix(675), "zz");
        assert_eq!(generate_chunk_suffix(676), "0000");
        assert_eq!(generate_chunk_suffix(700), "0024");
    }

    #[test]
    fn test_save_chunks_writes_files_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = split_into_chunks(&parse_diff(DIFF), 1);
        assert_eq!(chunks.len(), 2);

        let report = save_chunks(
            &chunks,
            dir.path(),
            PromptBudget::default(),
            &SkipFilter::default(),
        )
        .unwrap();
        assert_eq!(report.chunk_count, 2);

        let first = fs::read_to_string(dir.path().join("chunk_aa.txt")).unwrap();
        assert!(first.contains("## File: 'a.rs'"));
        assert!(!first.contains("b.rs"));
        let second = fs::read_to_string(dir.path().join("chunk_ab.txt")).unwrap();
        assert!(second.contains("   2 +lineB"));

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report.manifest_path).unwrap()).unwrap();
        assert_eq!(manifest[0]["chunk"], "aa");
        assert_eq!(manifest[1]["file"], "chunk_ab.txt");
        assert_eq!(manifest[1]["files"][0], "b.rs");
    }

    #[test]
    fn test_save_chunks_removes_stale_chunks_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("chunk_zz.txt"), "old").unwrap();
        fs::write(dir.path().join("notes.md"), "keep").unwrap();

        let chunks = split_into_chunks(&parse_diff(DIFF), 4000);
        save_chunks(&chunks, dir.path(), PromptBudget::default(), &SkipFilter::default()).unwrap();

        assert!(!dir.path().join("chunk_zz.txt").exists());
        assert!(dir.path().join("chunk_aa.txt").exists());
        assert!(!dir.path().join("chunk_ab.txt").exists());
        assert!(dir.path().join("notes.md").exists());
    }

    #[test]
    fn test_save_chunks_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("llm").join("diff");
        save_chunks(&[], &nested, PromptBudget::default(), &SkipFilter::default()).unwrap();
        assert!(nested.join(MANIFEST_FILE).exists());
    }
}
