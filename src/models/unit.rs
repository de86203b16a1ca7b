//! Work units and per-unit analysis outcomes.

use crate::constants::SHORT_SHA_LEN;

/// One commit or one file under review.
///
/// Constructed fresh by the change fetcher, immutable afterwards, and
/// consumed by the report assembler via its [`AnalysisOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    /// Stable identifier: full commit SHA, or file path.
    pub id: String,
    /// Identifier as shown in the report: truncated SHA, or file path.
    pub short_id: String,
    /// Human-readable title: commit message first line, or file path.
    pub label: String,
    /// The rendered change context (diff text or file content) to analyze.
    pub payload: String,
    /// Added + removed lines for a commit. `None` for file units, which
    /// are bounded by a count cap rather than a size threshold.
    pub change_volume: Option<u64>,
}

impl WorkUnit {
    /// Build a unit for one commit.
    pub fn commit(sha: &str, label: &str, payload: String, change_volume: u64) -> Self {
        Self {
            id: sha.to_string(),
            short_id: sha.chars().take(SHORT_SHA_LEN).collect(),
            label: label.to_string(),
            payload,
            change_volume: Some(change_volume),
        }
    }

    /// Build a unit for one file.
    pub fn file(path: &str, payload: String) -> Self {
        Self {
            id: path.to_string(),
            short_id: path.to_string(),
            label: path.to_string(),
            payload,
            change_volume: None,
        }
    }
}

/// Tagged result of attempting to analyze one [`WorkUnit`].
///
/// Exactly one outcome exists per enumerated unit, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The chat service returned analysis text.
    Analyzed { unit: WorkUnit, text: String },
    /// Change volume exceeded the admission threshold; the unit was never
    /// sent to the chat service.
    Rejected {
        unit: WorkUnit,
        change_volume: u64,
        threshold: u64,
    },
    /// Fetching or analyzing the unit failed; the run continued.
    Failed { unit: WorkUnit, error: String },
}

impl AnalysisOutcome {
    /// The work unit this outcome belongs to.
    pub fn unit(&self) -> &WorkUnit {
        match self {
            AnalysisOutcome::Analyzed { unit, .. }
            | AnalysisOutcome::Rejected { unit, .. }
            | AnalysisOutcome::Failed { unit, .. } => unit,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        matches!(self, AnalysisOutcome::Analyzed { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, AnalysisOutcome::Rejected { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed { .. })
    }
}
