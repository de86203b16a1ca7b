//! Pull request, commit, and file metadata returned by the hosting platform.

/// Pull request metadata used for the aggregate summary prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub author: String,
    pub base_ref: String,
    pub head_ref: String,
    /// SHA of the head commit, used as the `ref` for file-content fetches.
    pub head_sha: String,
    pub changed_files: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// A commit as returned by the PR commit listing (no file details yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub sha: String,
    pub author: String,
    pub message: String,
}

impl CommitRef {
    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Full commit details including per-file change counts and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub author: String,
    pub message: String,
    pub files: Vec<CommitFile>,
}

impl CommitInfo {
    /// Aggregate change volume: additions + deletions across all files.
    pub fn change_volume(&self) -> u64 {
        self.files.iter().map(|f| f.additions + f.deletions).sum()
    }

    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// One file within a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    pub filename: String,
    pub additions: u64,
    pub deletions: u64,
    /// Unified diff for this file. Absent for binary or very large files.
    pub patch: Option<String>,
}

/// One file in the PR's changed-file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrFile {
    pub filename: String,
    /// Platform status string: "added", "modified", "removed", "renamed", …
    pub status: String,
    pub additions: u64,
    pub deletions: u64,
}

impl PrFile {
    /// Removed files have no content to fetch and are excluded upstream.
    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}
