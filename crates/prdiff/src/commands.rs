use crate::cli::{Cli, Command, RenderArgs, SplitArgs};
use crate::save::{generate_chunk_suffix, save_chunks};
use anyhow::{Context, Result};
use prdiff_core::{Config, DiffConfig};
use prdiff_diff::{
    estimate_tokens, parse_diff, render_prompt_with, split_into_chunks, summarize, FilePatch,
    PromptBudget, SkipFilter,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let diff_config = config.diff_or_default();

    let input = read_input(cli.input.as_deref())?;
    let patches = parse_diff(&input);
    tracing::info!(files = patches.len(), "parsed input diff");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&cli.command, &patches, &diff_config, &mut out)?;
    out.flush()?;

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read diff from {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read diff from stdin")?;
            Ok(input)
        }
    }
}

fn budget(args: &RenderArgs, config: &DiffConfig) -> PromptBudget {
    PromptBudget::new(
        args.max_tokens.unwrap_or(config.max_tokens),
        args.chars_per_token.unwrap_or(config.chars_per_token),
    )
}

pub(crate) fn run_command<W: Write>(
    command: &Command,
    patches: &[FilePatch],
    config: &DiffConfig,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Render(args) => {
            let filter = SkipFilter::from_config(config)?;
            let rendered = render_prompt_with(patches, budget(args, config), &filter);
            write!(out, "{}", rendered)?;
        }
        Command::Summary { pretty } => {
            let summary = summarize(patches);
            write_json(out, &summary, *pretty)?;
        }
        Command::Parse { pretty } => {
            write_json(out, &patches, *pretty)?;
        }
        Command::Split(args) => run_split(args, patches, config, out)?,
    }
    Ok(())
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run_split<W: Write>(
    args: &SplitArgs,
    patches: &[FilePatch],
    config: &DiffConfig,
    out: &mut W,
) -> Result<()> {
    let max_tokens_per_chunk = args.max_tokens_per_chunk.unwrap_or(config.max_tokens_per_chunk);
    let chunks = split_into_chunks(patches, max_tokens_per_chunk);
    let filter = SkipFilter::from_config(config)?;
    let budget = budget(&args.render, config);

    if args.save {
        let output_dir = args.output_dir.as_deref().unwrap_or(&config.output_dir);
        let report = save_chunks(&chunks, Path::new(output_dir), budget, &filter)
            .with_context(|| format!("Failed to save chunks to {}", output_dir))?;

        // Machine-readable paths on stdout
        writeln!(out, "generated: {}/", output_dir)?;
        writeln!(out, "manifest: {}", report.manifest_path.display())?;
        writeln!(out, "chunks: {}", report.chunk_count)?;
        return Ok(());
    }

    for (index, chunk) in chunks.iter().enumerate() {
        let tokens: usize = chunk.iter().map(estimate_tokens).sum();
        writeln!(
            out,
            "=== chunk {} ({} files, ~{} tokens) ===",
            generate_chunk_suffix(index),
            chunk.len(),
            tokens
        )?;
        writeln!(out, "{}", render_prompt_with(chunk, budget, &filter))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,2 +1,2 @@ mod a;
-mod b;
+mod c;
 mod d;
diff --git a/Cargo.lock b/Cargo.lock
--- a/Cargo.lock
+++ b/Cargo.lock
@@ -1 +1 @@
-version = 1
+version = 2
";

    fn run(command: Command, config: &DiffConfig) -> String {
        let patches = parse_diff(DIFF);
        let mut out = Vec::new();
        run_command(&command, &patches, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_command() {
        let out = run(Command::Render(RenderArgs::default()), &DiffConfig::default());
        assert!(out.contains("## File: 'src/lib.rs'"));
        assert!(out.contains("   1 +mod c;"));
        assert!(out.contains(
            "## File: 'Cargo.lock'\n[Auto-generated/Lock file - skipped to save tokens]"
        ));
    }

    #[test]
    fn test_render_cli_budget_overrides_config() {
        let args = RenderArgs {
            max_tokens: Some(1),
            chars_per_token: Some(1.0),
        };
        let out = run(Command::Render(args), &DiffConfig::default());
        assert!(out.contains("[Content truncated - file too large]"));
    }

    #[test]
    fn test_render_with_invalid_config_pattern_fails() {
        let config = DiffConfig {
            extra_skip_patterns: vec!["[".to_string()],
            ..DiffConfig::default()
        };
        let patches = parse_diff(DIFF);
        let mut out = Vec::new();
        let err = run_command(&Command::Render(RenderArgs::default()), &patches, &config, &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid skip pattern"));
    }

    #[test]
    fn test_summary_command() {
        let out = run(Command::Summary { pretty: false }, &DiffConfig::default());
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["total_files"], 2);
        assert_eq!(json["total_changes"], 4);
        assert_eq!(json["files"][1]["filename"], "Cargo.lock");
    }

    #[test]
    fn test_parse_command() {
        let out = run(Command::Parse { pretty: true }, &DiffConfig::default());
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json[0]["hunks"][0]["section_header"], "mod a;");
    }

    #[test]
    fn test_split_command_prints_banners() {
        let args = SplitArgs {
            max_tokens_per_chunk: Some(1),
            ..SplitArgs::default()
        };
        let out = run(Command::Split(args), &DiffConfig::default());
        assert!(out.contains("=== chunk aa (1 files, ~"));
        assert!(out.contains("=== chunk ab (1 files, ~"));
        assert!(!out.contains("=== chunk ac"));
    }

    #[test]
    fn test_split_command_saves_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("chunks");
        let args = SplitArgs {
            save: true,
            output_dir: Some(output_dir.to_string_lossy().to_string()),
            ..SplitArgs::default()
        };
        let out = run(Command::Split(args), &DiffConfig::default());
        assert!(out.contains("chunks: 1"));
        assert!(output_dir.join("chunk_aa.txt").exists());
        assert!(output_dir.join("chunks.json").exists());
    }
}
