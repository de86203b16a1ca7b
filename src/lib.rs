//! critiq — AI-powered pull request review.
//!
//! Enumerates the commits (or changed files) of a pull request, runs each
//! admissible unit through a chat-completion service one at a time, and
//! posts a single deterministic Markdown report as a PR comment.

pub mod chat;
pub mod config;
pub mod constants;
pub mod env;
pub mod fetch;
pub mod github;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod report;
