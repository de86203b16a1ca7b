//! Prompt construction for per-unit analysis and the aggregate summary.
//!
//! The change context is rendered once at fetch time and stored as the
//! work unit's payload; here it is combined with the configured
//! instruction template into the chat request messages. No size
//! truncation happens in this module — admission control runs earlier.

use crate::chat::ChatMessage;
use crate::models::{CommitInfo, PullRequestInfo};

/// Render the analysis context for one commit: SHA, author, message,
/// changed-file list with counts, and every patch under one fenced block.
pub fn commit_context(commit: &CommitInfo) -> String {
    let mut out = String::new();

    out.push_str("## Commit Analysis\n");
    out.push_str(&format!("SHA: {}\n", commit.sha));
    out.push_str(&format!("Author: {}\n", commit.author));
    out.push_str(&format!("Message: {}\n\n", commit.message));

    out.push_str("Changed Files:\n");
    for file in &commit.files {
        out.push_str(&format!(
            "- {} (Added: {}, Removed: {})\n",
            file.filename, file.additions, file.deletions
        ));
    }

    out.push_str("\nCode Changes:\n```diff\n");
    for file in &commit.files {
        if let Some(ref patch) = file.patch {
            out.push_str(patch);
            out.push('\n');
        }
    }
    out.push_str("```\n");

    out
}

/// Render the analysis context for one file: path and full content.
pub fn file_context(path: &str, content: &str) -> String {
    format!("## File Analysis\nPath: {path}\n\nContent:\n```\n{content}\n```\n")
}

/// Build the chat messages for one work-unit analysis.
pub fn unit_messages(instructions: &str, payload: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(format!("{instructions}\n\n{payload}"))]
}

/// Build the chat messages for the aggregate-summary call.
///
/// `analyzed` is the ordered `(short id, label)` list of successfully
/// analyzed units; `skipped` counts rejected commits and capped files.
pub fn summary_messages(
    instructions: &str,
    pr: &PullRequestInfo,
    analyzed: &[(String, String)],
    skipped: usize,
) -> Vec<ChatMessage> {
    let mut content = format!("{instructions}\n\n");

    content.push_str("## Pull Request Information\n");
    content.push_str(&format!("Title: {}\n", pr.title));
    content.push_str(&format!(
        "Description: {}\n",
        pr.body.as_deref().unwrap_or("No description provided")
    ));
    content.push_str(&format!("Author: {}\n", pr.author));
    content.push_str(&format!("Base Branch: {}\n", pr.base_ref));
    content.push_str(&format!("Head Branch: {}\n", pr.head_ref));
    content.push_str(&format!("Number of Files Changed: {}\n", pr.changed_files));
    content.push_str(&format!("Total Additions: {}\n", pr.additions));
    content.push_str(&format!("Total Deletions: {}\n", pr.deletions));

    content.push_str("\nChanges Analysis:\n");
    for (id, label) in analyzed {
        content.push_str(&format!("- {id}: {label}\n"));
    }

    if skipped > 0 {
        content.push_str(&format!(
            "\nNote: {skipped} change(s) were too large or too numerous to analyze.\n"
        ));
    }

    content.push_str(
        "\nProvide a brief, focused summary of the changes, their impact, \
         and any key recommendations.",
    );

    vec![ChatMessage::user(content)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommitFile;

    fn sample_commit() -> CommitInfo {
        CommitInfo {
            sha: "0123456789abcdef".to_string(),
            author: "Dev One".to_string(),
            message: "Fix login flow".to_string(),
            files: vec![
                CommitFile {
                    filename: "src/auth.rs".to_string(),
                    additions: 5,
                    deletions: 3,
                    patch: Some("@@ -1,3 +1,5 @@\n+let ok = true;".to_string()),
                },
                CommitFile {
                    filename: "assets/logo.png".to_string(),
                    additions: 0,
                    deletions: 0,
                    patch: None,
                },
            ],
        }
    }

    fn sample_pr() -> PullRequestInfo {
        PullRequestInfo {
            number: 7,
            title: "Improve auth".to_string(),
            body: None,
            author: "octocat".to_string(),
            base_ref: "main".to_string(),
            head_ref: "feature/auth".to_string(),
            head_sha: "feedface".to_string(),
            changed_files: 2,
            additions: 5,
            deletions: 3,
        }
    }

    #[test]
    fn commit_context_includes_metadata_and_diff() {
        let ctx = commit_context(&sample_commit());
        assert!(ctx.contains("SHA: 0123456789abcdef"));
        assert!(ctx.contains("Author: Dev One"));
        assert!(ctx.contains("Message: Fix login flow"));
        assert!(ctx.contains("- src/auth.rs (Added: 5, Removed: 3)"));
        assert!(ctx.contains("```diff"));
        assert!(ctx.contains("+let ok = true;"));
    }

    #[test]
    fn commit_context_skips_missing_patches() {
        let ctx = commit_context(&sample_commit());
        // The binary file appears in the listing but contributes no patch
        assert!(ctx.contains("- assets/logo.png (Added: 0, Removed: 0)"));
        let diff_block = ctx.split("```diff").nth(1).unwrap();
        assert!(!diff_block.contains("logo.png"));
    }

    #[test]
    fn file_context_includes_path_and_content() {
        let ctx = file_context("src/main.rs", "fn main() {}");
        assert!(ctx.contains("Path: src/main.rs"));
        assert!(ctx.contains("fn main() {}"));
    }

    #[test]
    fn unit_messages_prepends_instructions() {
        let messages = unit_messages("Review carefully.", "the diff");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert!(messages[0].content.starts_with("Review carefully.\n\n"));
        assert!(messages[0].content.ends_with("the diff"));
    }

    #[test]
    fn summary_messages_include_pr_metadata_and_units() {
        let analyzed = vec![
            ("0123456".to_string(), "Fix login flow".to_string()),
            ("89abcde".to_string(), "Add tests".to_string()),
        ];
        let messages = summary_messages("Summarize.", &sample_pr(), &analyzed, 0);
        let content = &messages[0].content;
        assert!(content.contains("Title: Improve auth"));
        assert!(content.contains("Description: No description provided"));
        assert!(content.contains("Base Branch: main"));
        assert!(content.contains("- 0123456: Fix login flow"));
        assert!(content.contains("- 89abcde: Add tests"));
        assert!(!content.contains("Note:"));
    }

    #[test]
    fn summary_messages_mention_skipped_count() {
        let messages = summary_messages("Summarize.", &sample_pr(), &[], 3);
        assert!(messages[0]
            .content
            .contains("Note: 3 change(s) were too large or too numerous to analyze."));
    }
}
