use clap::{Args, Parser, Subcommand};
use prdiff_core::logging::DEFAULT_LOG_LEVEL;
use std::path::PathBuf;

/// Turn git diffs into compact, token-budgeted prompt text
#[derive(Debug, Parser)]
#[command(name = "prdiff", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Read the diff from a file instead of stdin
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Specify configuration file path
    #[arg(long, env = "PRDIFF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "PRDIFF_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL, global = true)]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "PRDIFF_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the diff as line-numbered prompt text
    Render(RenderArgs),

    /// Print change counts as JSON
    Summary {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the parsed patches as JSON
    Parse {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Split the diff into token-bounded chunks
    Split(SplitArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// Override the token budget
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// Override the characters-per-token ratio
    #[arg(long)]
    pub chars_per_token: Option<f64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SplitArgs {
    /// Override the token budget per chunk
    #[arg(long)]
    pub max_tokens_per_chunk: Option<usize>,

    #[command(flatten)]
    pub render: RenderArgs,

    /// Save chunks to files instead of printing them
    #[arg(long)]
    pub save: bool,

    /// Output directory for saved chunks
    #[arg(long, requires = "save")]
    pub output_dir: Option<String>,
}
