//! critiq — AI-powered pull request review CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use critiq::chat::{ChatService, HttpChatService};
use critiq::config::Config;
use critiq::constants;
use critiq::env::Env;
use critiq::github::{GithubClient, HostClient};
use critiq::pipeline::ReviewPipeline;

use cli::args::{Cli, Command, ReviewArgs};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Review(args) => run_review(*args).await,
        Command::Version => run_version(),
    }
}

/// Print version information.
fn run_version() -> Result<()> {
    println!("{} {}", "critiq".bold(), constants::VERSION.green().bold());
    Ok(())
}

async fn run_review(args: ReviewArgs) -> Result<()> {
    // Load config with layering; CLI flags are applied on top below.
    let work_dir = std::fs::canonicalize(&args.path)
        .with_context(|| format!("--path directory not found: {}", args.path.display()))?;
    let mut config =
        Config::load(Some(&work_dir), &Env::real()).context("failed to load configuration")?;

    if let Some(mode) = args.mode {
        config.review.mode = mode;
    }
    if args.stream {
        config.review.stream = true;
    }
    if let Some(max_changes) = args.max_changes {
        config.review.max_changes = max_changes;
    }
    if let Some(max_files) = args.max_files {
        config.review.max_files = max_files;
    }
    if let Some(policy) = args.oversized {
        config.review.oversized_policy = policy;
    }
    if let Some(model) = args.model {
        config.chat.model = model;
    }
    if let Some(prompt) = args.prompt {
        config.review.instructions = prompt;
    } else if let Some(ref path) = args.prompt_file {
        config.review.instructions = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read prompt file {}", path.display()))?;
    }

    let repo = args
        .repo
        .or_else(|| config.github.repo.clone())
        .context("no repository given (use --repo or GITHUB_REPOSITORY)")?;

    let host: Arc<dyn HostClient> = Arc::new(
        GithubClient::new(&config.github, &repo, args.pr)
            .context("failed to set up GitHub client")?,
    );
    let chat: Arc<dyn ChatService> =
        Arc::new(HttpChatService::new(&config.chat).context("failed to set up chat service")?);

    let pipeline = ReviewPipeline::new(host, chat, config.review.clone(), args.dry_run);

    let run = pipeline.run().await.context("review failed")?;

    if run.outcomes.is_empty() {
        eprintln!("No changes to review.");
        return Ok(());
    }

    if args.dry_run {
        print!("{}", run.body);
        return Ok(());
    }

    pipeline
        .publish(&run.body)
        .await
        .context("failed to publish review")?;

    let analyzed = run.outcomes.iter().filter(|o| o.is_analyzed()).count();
    eprintln!(
        "{} Reviewed {}/{} unit(s) on {} #{}",
        "✔".green().bold(),
        analyzed,
        run.outcomes.len(),
        repo.bold(),
        args.pr,
    );

    let failed = run.outcomes.iter().filter(|o| o.is_failed()).count();
    if failed > 0 {
        eprintln!(
            "{} {failed} unit(s) could not be analyzed, see the posted report",
            "⚠".yellow().bold(),
        );
    }

    Ok(())
}
