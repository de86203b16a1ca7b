//! Deterministic Markdown report assembly.
//!
//! The report is a pure function of the ordered outcome list and the
//! optional aggregate summary: no clocks, no randomness, no network.
//! Rendering the same inputs twice yields byte-identical output.

use crate::constants::{REPORT_FOOTER, REPORT_TITLE};
use crate::models::{AnalysisOutcome, OversizedPolicy, ReviewMode, WorkUnit};

/// Everything the renderer needs for one report.
pub struct ReportInput<'a> {
    pub outcomes: &'a [AnalysisOutcome],
    pub summary: Option<&'a str>,
    pub mode: ReviewMode,
    pub oversized_policy: OversizedPolicy,
}

/// Anchor-safe id: lowercase alphanumerics, everything else collapsed
/// to hyphens.
fn anchor(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

fn unit_heading(unit: &WorkUnit, mode: ReviewMode) -> String {
    match mode {
        ReviewMode::Commits => format!("Commit {}: {}", unit.short_id, unit.label),
        ReviewMode::Files => format!("File {}", unit.label),
    }
}

fn unit_noun(mode: ReviewMode) -> &'static str {
    match mode {
        ReviewMode::Commits => "commit",
        ReviewMode::Files => "file",
    }
}

/// The standalone notice posted per oversized commit under the
/// `immediate` policy.
pub fn oversized_notice(unit: &WorkUnit, change_volume: u64, threshold: u64) -> String {
    format!(
        "## ⚠️ Commit {short}: {label}\n\n\
         This commit exceeds the recommended limit of {threshold} lines \
         (found {change_volume} changes) and was not analyzed.\n\n\
         {RECOMMENDATIONS}",
        short = unit.short_id,
        label = unit.label,
    )
}

const RECOMMENDATIONS: &str = "**Recommendations:**\n\
    - Consider splitting this into smaller, more focused commits\n\
    - Make incremental changes that are easier to review\n\
    - Ensure each commit has a single, clear purpose\n";

/// Assemble the full report body.
pub fn render(input: &ReportInput<'_>) -> String {
    let mut out = String::new();

    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");

    // Under the immediate policy, oversized commits were already posted
    // as their own comments and get no section here.
    let sectioned: Vec<&AnalysisOutcome> = input
        .outcomes
        .iter()
        .filter(|o| !(o.is_rejected() && input.oversized_policy == OversizedPolicy::Immediate))
        .collect();

    out.push_str("## Table of Contents\n\n");
    for outcome in &sectioned {
        let unit = outcome.unit();
        let marker = match outcome {
            AnalysisOutcome::Analyzed { .. } => "✅",
            AnalysisOutcome::Rejected { .. } => "❌",
            AnalysisOutcome::Failed { .. } => "⚠️",
        };
        out.push_str(&format!(
            "- [{marker} {heading}](#{anchor})\n",
            heading = unit_heading(unit, input.mode),
            anchor = anchor(&unit.short_id),
        ));
    }
    if input.summary.is_some() {
        out.push_str("- [📋 Summary](#summary)\n");
    }
    out.push('\n');

    out.push_str("## Reviews\n\n");
    for outcome in &sectioned {
        let unit = outcome.unit();
        let heading = unit_heading(unit, input.mode);
        let id = anchor(&unit.short_id);

        match outcome {
            AnalysisOutcome::Analyzed { text, .. } => {
                out.push_str(&format!(
                    "### ✅ <span id=\"{id}\">{heading}</span>\n\n{text}\n\n---\n\n"
                ));
            }
            AnalysisOutcome::Rejected {
                change_volume,
                threshold,
                ..
            } => {
                out.push_str(&format!(
                    "### ❌ <span id=\"{id}\">{heading}</span>\n\n\
                     This commit exceeds the recommended limit of {threshold} lines \
                     (found {change_volume} changes).\n\n\
                     {RECOMMENDATIONS}\n---\n\n"
                ));
            }
            AnalysisOutcome::Failed { error, .. } => {
                out.push_str(&format!(
                    "### ⚠️ <span id=\"{id}\">{heading}</span>\n\n\
                     Error analyzing this {noun}: {error}\n\n---\n\n",
                    noun = unit_noun(input.mode),
                ));
            }
        }
    }

    if input.oversized_policy == OversizedPolicy::Immediate {
        let oversized = input.outcomes.iter().filter(|o| o.is_rejected()).count();
        if oversized > 0 {
            out.push_str(&format!(
                "{oversized} oversized commit(s) were addressed in separate comments.\n\n"
            ));
        }
    }

    if let Some(summary) = input.summary {
        out.push_str(&format!(
            "## 📋 <span id=\"summary\">Summary</span>\n\n{summary}\n\n"
        ));
    }

    out.push_str(REPORT_FOOTER);
    out.push('\n');

    out
}
