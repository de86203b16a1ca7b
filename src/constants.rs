//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and default review limits so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "critiq";

/// Crate version, surfaced by `critiq version` and the HTTP User-Agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.critiq.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".critiq.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "critiq";

/// Default aggregate change volume (additions + deletions) above which a
/// commit is rejected without analysis.
pub const DEFAULT_MAX_CHANGES: u64 = 1000;

/// Default cap on the number of files considered in file-based review.
/// Files beyond the cap are silently excluded (only a count is logged).
pub const DEFAULT_MAX_FILES: usize = 10;

/// Number of characters shown for a commit SHA in the report.
pub const SHORT_SHA_LEN: usize = 7;

/// Default instruction template sent ahead of every change context.
pub const DEFAULT_INSTRUCTIONS: &str = "\
Analyze the following code changes and provide:
1. A brief summary of changes
2. Code quality assessment
3. Potential issues or improvements
4. Security considerations if applicable";

/// Report title line. Presentation only.
pub const REPORT_TITLE: &str = "# 🔍 Code Review";

/// Report footer. Presentation only.
pub const REPORT_FOOTER: &str =
    "<div align=\"right\">\n  <sub>Powered by <a href=\"https://github.com/critiq-dev/critiq\">critiq</a></sub>\n</div>";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROMPT: &str = "CRITIQ_PROMPT";
pub const ENV_MAX_CHANGES: &str = "CRITIQ_MAX_CHANGES";
pub const ENV_MAX_FILES: &str = "CRITIQ_MAX_FILES";
pub const ENV_CHAT_URL: &str = "CRITIQ_CHAT_URL";
pub const ENV_MODEL: &str = "CRITIQ_MODEL";
pub const ENV_CHAT_API_KEY: &str = "CRITIQ_CHAT_API_KEY";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
