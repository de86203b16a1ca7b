//! Clap argument types for the critiq CLI.

use clap::Parser;
use std::path::PathBuf;

use critiq::models::{OversizedPolicy, ReviewMode};

/// AI-powered pull request review.
#[derive(Parser, Debug)]
#[command(name = "critiq", version = critiq::constants::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Review a pull request and post the report as a comment.
    Review(Box<ReviewArgs>),

    /// Print version information.
    Version,
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// Repository in `owner/name` form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Pull request number.
    #[arg(long)]
    pub pr: u64,

    /// Working directory to load `.critiq.toml` from (default: cwd).
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Review unit: per-commit or per-file.
    #[arg(long, value_enum)]
    pub mode: Option<ReviewMode>,

    /// Stream chat responses with live progress on stderr.
    #[arg(long, default_value_t = false)]
    pub stream: bool,

    /// Max change volume (additions + deletions) per commit.
    #[arg(long)]
    pub max_changes: Option<u64>,

    /// Max number of files considered in file-based review.
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Inline instruction template for the analysis prompts.
    #[arg(long, conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Read the instruction template from a file.
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// How to surface oversized commits.
    #[arg(long, value_enum)]
    pub oversized: Option<OversizedPolicy>,

    /// Chat model name.
    #[arg(long)]
    pub model: Option<String>,

    /// Print the report to stdout instead of posting it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
