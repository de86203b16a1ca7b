//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.critiq.toml` in the working directory
//! 4. `~/.config/critiq/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::{OversizedPolicy, ReviewMode};

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub review: ReviewConfig,
    pub chat: ChatConfig,
    pub github: GithubConfig,
}

/// Review pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Whether units are commits or files.
    pub mode: ReviewMode,
    /// Instruction template prepended to every change context.
    pub instructions: String,
    /// Admission threshold: max additions + deletions per commit.
    pub max_changes: u64,
    /// File-based review cap; files beyond it are silently excluded.
    pub max_files: usize,
    /// Use streaming chat completions with live progress output.
    pub stream: bool,
    /// How oversized commits are surfaced.
    pub oversized_policy: OversizedPolicy,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            mode: ReviewMode::default(),
            instructions: constants::DEFAULT_INSTRUCTIONS.to_string(),
            max_changes: constants::DEFAULT_MAX_CHANGES,
            max_files: constants::DEFAULT_MAX_FILES,
            stream: false,
            oversized_policy: OversizedPolicy::default(),
        }
    }
}

/// Chat-completion service configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of an OpenAI-compatible API (e.g. `https://api.openai.com/v1`).
    pub base_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
        }
    }
}

/// Hosting platform configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
    /// Repository in `owner/name` form (usually from `GITHUB_REPOSITORY`).
    pub repo: Option<String>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("repo", &self.repo)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            repo: None,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, working-directory config, then applies
    /// environment variable overrides. CLI flags are merged by the caller.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: local config
        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for
    /// non-default values).
    fn merge(&mut self, other: Config) {
        let default_review = ReviewConfig::default();
        if other.review.mode != default_review.mode {
            self.review.mode = other.review.mode;
        }
        if other.review.instructions != default_review.instructions {
            self.review.instructions = other.review.instructions;
        }
        if other.review.max_changes != default_review.max_changes {
            self.review.max_changes = other.review.max_changes;
        }
        if other.review.max_files != default_review.max_files {
            self.review.max_files = other.review.max_files;
        }
        if other.review.stream {
            self.review.stream = true;
        }
        if other.review.oversized_policy != default_review.oversized_policy {
            self.review.oversized_policy = other.review.oversized_policy;
        }

        let default_chat = ChatConfig::default();
        if other.chat.base_url.is_some() {
            self.chat.base_url = other.chat.base_url;
        }
        if other.chat.model != default_chat.model {
            self.chat.model = other.chat.model;
        }
        if other.chat.api_key.is_some() {
            self.chat.api_key = other.chat.api_key;
        }

        let default_github = GithubConfig::default();
        if other.github.api_url != default_github.api_url {
            self.github.api_url = other.github.api_url;
        }
        if other.github.token.is_some() {
            self.github.token = other.github.token;
        }
        if other.github.repo.is_some() {
            self.github.repo = other.github.repo;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_PROMPT) {
            self.review.instructions = val;
        }
        if let Some(val) = env.parsed::<u64>(constants::ENV_MAX_CHANGES) {
            self.review.max_changes = val;
        }
        if let Some(val) = env.parsed::<usize>(constants::ENV_MAX_FILES) {
            self.review.max_files = val;
        }

        if let Ok(val) = env.var(constants::ENV_CHAT_URL) {
            self.chat.base_url = Some(val);
        }
        if let Ok(val) = env.var(constants::ENV_MODEL) {
            self.chat.model = val;
        }
        if let Ok(val) = env.var(constants::ENV_CHAT_API_KEY) {
            self.chat.api_key = Some(val);
        }

        if let Ok(val) = env.var(constants::ENV_GITHUB_TOKEN) {
            self.github.token = Some(val);
        }
        if let Ok(val) = env.var(constants::ENV_GITHUB_API_URL) {
            self.github.api_url = val;
        }
        if let Ok(val) = env.var(constants::ENV_GITHUB_REPOSITORY) {
            self.github.repo = Some(val);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.review.mode, ReviewMode::Commits);
        assert_eq!(config.review.max_changes, 1000);
        assert_eq!(config.review.max_files, 10);
        assert!(!config.review.stream);
        assert_eq!(config.review.oversized_policy, OversizedPolicy::Defer);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.review.instructions.contains("Security considerations"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[review]
mode = "files"
max_changes = 500
max_files = 20
stream = true
oversized_policy = "immediate"

[chat]
base_url = "https://llm.internal/v1"
model = "mistral-large"

[github]
api_url = "https://github.example.com/api/v3"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.review.mode, ReviewMode::Files);
        assert_eq!(config.review.max_changes, 500);
        assert_eq!(config.review.max_files, 20);
        assert!(config.review.stream);
        assert_eq!(config.review.oversized_policy, OversizedPolicy::Immediate);
        assert_eq!(config.chat.base_url.as_deref(), Some("https://llm.internal/v1"));
        assert_eq!(config.chat.model, "mistral-large");
        assert_eq!(config.github.api_url, "https://github.example.com/api/v3");
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();

        other.review.mode = ReviewMode::Files;
        other.review.instructions = "Be brief.".to_string();
        other.review.max_changes = 2000;
        other.review.stream = true;
        other.chat.base_url = Some("https://llm.internal/v1".to_string());
        other.chat.api_key = Some("sk-test".to_string());
        other.github.token = Some("ghp_test".to_string());
        other.github.repo = Some("octo/repo".to_string());

        base.merge(other);

        assert_eq!(base.review.mode, ReviewMode::Files);
        assert_eq!(base.review.instructions, "Be brief.");
        assert_eq!(base.review.max_changes, 2000);
        assert!(base.review.stream);
        assert_eq!(base.chat.base_url.as_deref(), Some("https://llm.internal/v1"));
        assert_eq!(base.chat.api_key.as_deref(), Some("sk-test"));
        assert_eq!(base.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(base.github.repo.as_deref(), Some("octo/repo"));
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.review.max_changes = 750;
        base.chat.model = "claude-haiku".to_string();

        base.merge(Config::default());

        assert_eq!(base.review.max_changes, 750);
        assert_eq!(base.chat.model, "claude-haiku");
    }

    #[test]
    fn load_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(
            &path,
            r#"
[review]
max_changes = 300
"#,
        )
        .unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.review.max_changes, 300);
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let result = Config::load_file(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn load_file_not_found() {
        let result = Config::load_file(Path::new("/tmp/critiq_not_exist_config.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("read"));
    }

    #[test]
    fn load_from_work_dir() {
        let env = Env::mock(Vec::<(&str, &str)>::new());

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".critiq.toml"),
            r#"
[review]
mode = "files"
"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.review.mode, ReviewMode::Files);
    }

    #[test]
    fn load_without_any_config_files() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.review.max_changes, 1000);
    }

    #[test]
    fn apply_env_vars_review_settings() {
        let env = Env::mock([
            ("CRITIQ_PROMPT", "Focus on security."),
            ("CRITIQ_MAX_CHANGES", "800"),
            ("CRITIQ_MAX_FILES", "5"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.review.instructions, "Focus on security.");
        assert_eq!(config.review.max_changes, 800);
        assert_eq!(config.review.max_files, 5);
    }

    #[test]
    fn apply_env_vars_invalid_number_falls_back() {
        let env = Env::mock([("CRITIQ_MAX_CHANGES", "lots")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.review.max_changes, 1000);
    }

    #[test]
    fn apply_env_vars_chat_and_github() {
        let env = Env::mock([
            ("CRITIQ_CHAT_URL", "https://llm.internal/v1"),
            ("CRITIQ_MODEL", "gpt-4o"),
            ("CRITIQ_CHAT_API_KEY", "sk-env"),
            ("GITHUB_TOKEN", "ghp_env"),
            ("GITHUB_REPOSITORY", "octo/repo"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.chat.base_url.as_deref(), Some("https://llm.internal/v1"));
        assert_eq!(config.chat.model, "gpt-4o");
        assert_eq!(config.chat.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_env"));
        assert_eq!(config.github.repo.as_deref(), Some("octo/repo"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = Config {
            chat: ChatConfig {
                api_key: Some("sk-secret".to_string()),
                ..ChatConfig::default()
            },
            github: GithubConfig {
                token: Some("ghp_secret".to_string()),
                ..GithubConfig::default()
            },
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("REDACTED"));
    }
}
