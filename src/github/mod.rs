//! Hosting-platform client: the `HostClient` trait and its GitHub
//! implementation.
//!
//! Provides an abstraction layer over the GitHub REST API so the pipeline
//! can be tested against mock implementations.

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::GithubClient;

use crate::models::{CommitInfo, CommitRef, PrFile, PullRequestInfo};

/// Errors from hosting-platform calls.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode content of {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("host client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for the hosting platform consumed by the review pipeline.
///
/// The repository and pull request number are fixed at construction; one
/// client instance serves one run. No call is retried — per-unit failures
/// are converted into `Failed` outcomes by the caller.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Fetch pull request metadata (title, refs, change totals).
    async fn get_pull_request(&self) -> Result<PullRequestInfo, HostError>;

    /// List the PR's commits in platform order.
    async fn list_commits(&self) -> Result<Vec<CommitRef>, HostError>;

    /// Fetch one commit's file list with per-file add/delete counts and patches.
    async fn get_commit(&self, sha: &str) -> Result<CommitInfo, HostError>;

    /// List the PR's changed files in platform order.
    async fn list_files(&self) -> Result<Vec<PrFile>, HostError>;

    /// Fetch a file's content at the given ref, decoded to text.
    async fn get_file_content(&self, path: &str, git_ref: &str) -> Result<String, HostError>;

    /// Post a comment on the pull request.
    async fn create_comment(&self, body: &str) -> Result<(), HostError>;
}
