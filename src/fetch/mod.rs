//! Work-unit assembly from host data.
//!
//! Turns commit references and changed-file listings into self-contained
//! [`WorkUnit`]s whose payloads carry the full rendered analysis context.

use std::sync::Arc;

use tracing::info;

use crate::github::{HostClient, HostError};
use crate::models::{PrFile, WorkUnit};
use crate::prompt;

/// Fetch one commit's detail and assemble its work unit.
///
/// The change volume is the sum of additions and deletions across all
/// files in the commit, used for admission control by the pipeline.
pub async fn commit_unit(host: &Arc<dyn HostClient>, sha: &str) -> Result<WorkUnit, HostError> {
    let commit = host.get_commit(sha).await?;
    let payload = prompt::commit_context(&commit);
    Ok(WorkUnit::commit(
        &commit.sha,
        commit.title(),
        payload,
        commit.change_volume(),
    ))
}

/// Fetch one changed file's head-revision content and assemble its
/// work unit.
pub async fn file_unit(
    host: &Arc<dyn HostClient>,
    file: &PrFile,
    head_sha: &str,
) -> Result<WorkUnit, HostError> {
    let content = host.get_file_content(&file.filename, head_sha).await?;
    let payload = prompt::file_context(&file.filename, &content);
    Ok(WorkUnit::file(&file.filename, payload))
}

/// Drop removed files and cap the list at `max_files`, preserving the
/// listing order. Returns the retained files and the count of files
/// dropped by the cap (removed files are not counted).
pub fn select_files(files: Vec<PrFile>, max_files: usize) -> (Vec<PrFile>, usize) {
    let reviewable: Vec<PrFile> = files.into_iter().filter(|f| !f.is_removed()).collect();
    let total = reviewable.len();

    if total > max_files {
        let skipped = total - max_files;
        info!(total, max_files, skipped, "file cap exceeded, truncating");
        (reviewable.into_iter().take(max_files).collect(), skipped)
    } else {
        (reviewable, 0)
    }
}
