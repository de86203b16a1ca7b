//! Shared types used across all modules.
//!
//! This module defines the core data structures for work units, outcomes,
//! and pull request metadata. Other modules import from here rather than
//! reaching into each other's internals.

pub mod pr;
pub mod unit;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use pr::{CommitFile, CommitInfo, CommitRef, PrFile, PullRequestInfo};
pub use unit::{AnalysisOutcome, WorkUnit};

/// What the pipeline enumerates as work units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    /// One unit per commit in the pull request, in platform order.
    #[default]
    Commits,
    /// One unit per changed file, capped at the configured file count.
    Files,
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewMode::Commits => write!(f, "commits"),
            ReviewMode::Files => write!(f, "files"),
        }
    }
}

impl std::str::FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commits" => Ok(ReviewMode::Commits),
            "files" => Ok(ReviewMode::Files),
            other => Err(format!(
                "unsupported review mode: '{other}'. Supported: commits, files"
            )),
        }
    }
}

/// How oversized commits are surfaced.
///
/// Either policy is valid; the choice must stay consistent within one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OversizedPolicy {
    /// Collect oversized commits into the final report as rejected sections.
    #[default]
    Defer,
    /// Post a separate warning comment as soon as an oversized commit is
    /// detected; the final report only carries a count.
    Immediate,
}

impl fmt::Display for OversizedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OversizedPolicy::Defer => write!(f, "defer"),
            OversizedPolicy::Immediate => write!(f, "immediate"),
        }
    }
}

impl std::str::FromStr for OversizedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "defer" => Ok(OversizedPolicy::Defer),
            "immediate" => Ok(OversizedPolicy::Immediate),
            other => Err(format!(
                "unsupported oversized policy: '{other}'. Supported: defer, immediate"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_mode_display_and_parse() {
        assert_eq!(ReviewMode::Commits.to_string(), "commits");
        assert_eq!(ReviewMode::Files.to_string(), "files");
        assert_eq!("commits".parse::<ReviewMode>().unwrap(), ReviewMode::Commits);
        assert_eq!("FILES".parse::<ReviewMode>().unwrap(), ReviewMode::Files);
        assert!("branches".parse::<ReviewMode>().is_err());
    }

    #[test]
    fn review_mode_default_is_commits() {
        assert_eq!(ReviewMode::default(), ReviewMode::Commits);
    }

    #[test]
    fn oversized_policy_display_and_parse() {
        assert_eq!(OversizedPolicy::Defer.to_string(), "defer");
        assert_eq!(OversizedPolicy::Immediate.to_string(), "immediate");
        assert_eq!(
            "immediate".parse::<OversizedPolicy>().unwrap(),
            OversizedPolicy::Immediate
        );
        assert!("eager".parse::<OversizedPolicy>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&ReviewMode::Files).unwrap();
        assert_eq!(json, "\"files\"");
        let back: ReviewMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReviewMode::Files);

        let json = serde_json::to_string(&OversizedPolicy::Immediate).unwrap();
        assert_eq!(json, "\"immediate\"");
        let back: OversizedPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OversizedPolicy::Immediate);
    }
}
