//! The review pipeline: enumerate, admit, analyze, summarize, render.
//!
//! Units are processed strictly one at a time, in enumeration order, and
//! every unit produces exactly one outcome. Per-unit failures are recorded
//! and the run continues; only enumeration and publishing are fatal.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::chat::{ChatError, ChatMessage, ChatService, StreamEvent};
use crate::config::ReviewConfig;
use crate::fetch;
use crate::github::{HostClient, HostError};
use crate::models::{AnalysisOutcome, OversizedPolicy, PullRequestInfo, ReviewMode, WorkUnit};
use crate::progress::StreamPrinter;
use crate::prompt;
use crate::report::{self, ReportInput};

/// Fatal pipeline errors. Per-unit analysis failures never surface here;
/// they become `Failed` outcomes instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("failed to publish review comment: {0}")]
    Publish(#[source] HostError),
}

/// Collects streamed deltas into the final analysis text.
#[derive(Debug, Default)]
pub struct StreamingAccumulator {
    buf: String,
}

impl StreamingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delta: &str) {
        self.buf.push_str(delta);
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finalize the stream. A stream that ended without producing any
    /// text is an error, matching the whole-response empty check.
    pub fn finish(self) -> Result<String, ChatError> {
        if self.buf.is_empty() {
            Err(ChatError::Empty)
        } else {
            Ok(self.buf)
        }
    }
}

/// Result of a completed run, ready to publish or print.
pub struct ReviewRun {
    /// The assembled Markdown report.
    pub body: String,
    /// Per-unit outcomes in enumeration order.
    pub outcomes: Vec<AnalysisOutcome>,
    /// Files excluded by the file cap (file mode only).
    pub skipped_files: usize,
}

/// Orchestrates one review run against one pull request.
pub struct ReviewPipeline {
    host: Arc<dyn HostClient>,
    chat: Arc<dyn ChatService>,
    review: ReviewConfig,
    printer: StreamPrinter,
    dry_run: bool,
}

impl ReviewPipeline {
    pub fn new(
        host: Arc<dyn HostClient>,
        chat: Arc<dyn ChatService>,
        review: ReviewConfig,
        dry_run: bool,
    ) -> Self {
        let printer = StreamPrinter::new(review.stream);
        Self {
            host,
            chat,
            review,
            printer,
            dry_run,
        }
    }

    /// Execute the full pipeline and assemble the report.
    pub async fn run(&self) -> Result<ReviewRun, PipelineError> {
        let pr = self.host.get_pull_request().await?;
        info!(pr = pr.number, title = %pr.title, mode = %self.review.mode, "starting review");

        let (outcomes, skipped_files) = match self.review.mode {
            ReviewMode::Commits => (self.review_commits().await?, 0),
            ReviewMode::Files => self.review_files(&pr).await?,
        };

        let summary = self.aggregate_summary(&pr, &outcomes, skipped_files).await;

        let body = report::render(&ReportInput {
            outcomes: &outcomes,
            summary: summary.as_deref(),
            mode: self.review.mode,
            oversized_policy: self.review.oversized_policy,
        });

        Ok(ReviewRun {
            body,
            outcomes,
            skipped_files,
        })
    }

    /// Post the report as a single PR comment. Failure here is fatal.
    pub async fn publish(&self, body: &str) -> Result<(), PipelineError> {
        self.host
            .create_comment(body)
            .await
            .map_err(PipelineError::Publish)
    }

    async fn review_commits(&self) -> Result<Vec<AnalysisOutcome>, PipelineError> {
        let refs = self.host.list_commits().await?;
        info!(commits = refs.len(), "enumerated commits");

        let mut outcomes = Vec::with_capacity(refs.len());
        for commit in &refs {
            let unit = match fetch::commit_unit(&self.host, &commit.sha).await {
                Ok(unit) => unit,
                Err(e) => {
                    warn!(sha = %commit.sha, error = %e, "failed to fetch commit");
                    outcomes.push(AnalysisOutcome::Failed {
                        unit: WorkUnit::commit(&commit.sha, commit.title(), String::new(), 0),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(volume) = unit.change_volume {
                if volume > self.review.max_changes {
                    info!(sha = %unit.short_id, volume, threshold = self.review.max_changes,
                        "commit exceeds change threshold");
                    if self.review.oversized_policy == OversizedPolicy::Immediate {
                        self.post_oversized_notice(&unit, volume).await;
                    }
                    outcomes.push(AnalysisOutcome::Rejected {
                        unit,
                        change_volume: volume,
                        threshold: self.review.max_changes,
                    });
                    continue;
                }
            }

            outcomes.push(self.analyze(unit).await);
        }
        Ok(outcomes)
    }

    async fn review_files(
        &self,
        pr: &PullRequestInfo,
    ) -> Result<(Vec<AnalysisOutcome>, usize), PipelineError> {
        let files = self.host.list_files().await?;
        info!(files = files.len(), "enumerated changed files");

        let (selected, skipped) = fetch::select_files(files, self.review.max_files);

        let mut outcomes = Vec::with_capacity(selected.len());
        for file in &selected {
            let unit = match fetch::file_unit(&self.host, file, &pr.head_sha).await {
                Ok(unit) => unit,
                Err(e) => {
                    warn!(path = %file.filename, error = %e, "failed to fetch file");
                    outcomes.push(AnalysisOutcome::Failed {
                        unit: WorkUnit::file(&file.filename, String::new()),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            outcomes.push(self.analyze(unit).await);
        }
        Ok((outcomes, skipped))
    }

    /// Send one unit to the chat service and record the outcome.
    async fn analyze(&self, unit: WorkUnit) -> AnalysisOutcome {
        let messages = prompt::unit_messages(&self.review.instructions, &unit.payload);

        let result = if self.review.stream {
            self.complete_streaming(&messages, &unit.label).await
        } else {
            self.chat.complete(&messages).await
        };

        match result {
            Ok(text) => AnalysisOutcome::Analyzed { unit, text },
            Err(e) => {
                warn!(unit = %unit.short_id, error = %e, "analysis failed");
                AnalysisOutcome::Failed {
                    unit,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Streaming completion: echo deltas as they arrive and accumulate
    /// them into the final text.
    async fn complete_streaming(
        &self,
        messages: &[ChatMessage],
        label: &str,
    ) -> Result<String, ChatError> {
        let mut rx = self.chat.stream(messages).await?;
        self.printer.begin(label);

        let mut acc = StreamingAccumulator::new();
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Delta(text) => {
                    self.printer.delta(&text);
                    acc.push(&text);
                }
                StreamEvent::Done => break,
                StreamEvent::Error(e) => {
                    self.printer.end();
                    return Err(ChatError::Stream(e));
                }
            }
        }

        self.printer.end();
        acc.finish()
    }

    /// Run the aggregate-summary call. Summary failure is non-fatal: the
    /// report is published without a summary section.
    async fn aggregate_summary(
        &self,
        pr: &PullRequestInfo,
        outcomes: &[AnalysisOutcome],
        skipped_files: usize,
    ) -> Option<String> {
        let analyzed: Vec<(String, String)> = outcomes
            .iter()
            .filter(|o| o.is_analyzed())
            .map(|o| (o.unit().short_id.clone(), o.unit().label.clone()))
            .collect();
        let skipped = outcomes.iter().filter(|o| o.is_rejected()).count() + skipped_files;

        let messages =
            prompt::summary_messages(&self.review.instructions, pr, &analyzed, skipped);

        // Same invocation mode as the per-unit calls.
        let result = if self.review.stream {
            self.complete_streaming(&messages, "summary").await
        } else {
            self.chat.complete(&messages).await
        };

        match result {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(error = %e, "summary generation failed, omitting section");
                None
            }
        }
    }

    /// Post the standalone notice for an oversized commit under the
    /// `immediate` policy. Failure is logged and the run continues.
    async fn post_oversized_notice(&self, unit: &WorkUnit, change_volume: u64) {
        if self.dry_run {
            info!(unit = %unit.short_id, "dry run: skipping oversized-commit notice");
            return;
        }
        let notice = report::oversized_notice(unit, change_volume, self.review.max_changes);
        if let Err(e) = self.host.create_comment(&notice).await {
            warn!(unit = %unit.short_id, error = %e, "failed to post oversized-commit notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_collects_in_order() {
        let mut acc = StreamingAccumulator::new();
        acc.push("Hel");
        acc.push("lo ");
        acc.push("world");
        assert!(!acc.is_empty());
        assert_eq!(acc.finish().unwrap(), "Hello world");
    }

    #[test]
    fn accumulator_empty_stream_is_error() {
        let acc = StreamingAccumulator::new();
        assert!(acc.is_empty());
        assert!(matches!(acc.finish(), Err(ChatError::Empty)));
    }
}
