//! GitHub REST implementation of [`HostClient`].
//!
//! Talks to `api.github.com` (or a GitHub Enterprise base URL) with plain
//! reqwest calls and narrow response DTOs. File content arrives
//! base64-encoded with embedded newlines and is decoded here.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::GithubConfig;
use crate::constants::{APP_NAME, VERSION};
use crate::models::{CommitFile, CommitInfo, CommitRef, PrFile, PullRequestInfo};

use super::{HostClient, HostError};

/// GitHub API client bound to one repository and pull request.
#[derive(Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    repo: String,
    pr: u64,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client for `owner/name` PR `pr`.
    ///
    /// The token is optional: unauthenticated reads work on public
    /// repositories, but [`HostClient::create_comment`] requires one.
    pub fn new(config: &GithubConfig, repo: &str, pr: u64) -> Result<Self, HostError> {
        if !repo.contains('/') {
            return Err(HostError::NotConfigured(format!(
                "repository must be in 'owner/name' form, got '{repo}'"
            )));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            pr,
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.repo, path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", format!("{APP_NAME}/{VERSION}"));
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, HostError> {
        debug!(url, "GET");
        let response = self.request(self.http.get(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            return Err(HostError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

// ── Response DTOs (narrow, endpoint-local) ──────────────────────────

#[derive(Debug, Deserialize)]
struct PullDto {
    number: u64,
    title: Option<String>,
    body: Option<String>,
    user: Option<UserDto>,
    base: RefDto,
    head: RefDto,
    changed_files: Option<u64>,
    additions: Option<u64>,
    deletions: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RefDto {
    #[serde(rename = "ref")]
    name: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitListDto {
    sha: String,
    commit: CommitMetaDto,
}

#[derive(Debug, Deserialize)]
struct CommitMetaDto {
    message: String,
    author: Option<CommitAuthorDto>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthorDto {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommitDetailDto {
    sha: String,
    commit: CommitMetaDto,
    #[serde(default)]
    files: Vec<CommitFileDto>,
}

#[derive(Debug, Deserialize)]
struct CommitFileDto {
    filename: String,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    patch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PrFileDto {
    filename: String,
    status: String,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
}

#[derive(Debug, Deserialize)]
struct ContentDto {
    content: String,
    #[serde(default)]
    encoding: String,
}

/// Decode the GitHub contents API payload (base64 with embedded newlines).
fn decode_content(path: &str, dto: &ContentDto) -> Result<String, HostError> {
    if dto.encoding != "base64" {
        return Err(HostError::Decode {
            path: path.to_string(),
            reason: format!("unexpected encoding '{}'", dto.encoding),
        });
    }
    let compact: String = dto.content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| HostError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| HostError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl HostClient for GithubClient {
    async fn get_pull_request(&self) -> Result<PullRequestInfo, HostError> {
        let url = self.url(&format!("pulls/{}", self.pr));
        let dto: PullDto = self.get_json(&url).await?;
        Ok(PullRequestInfo {
            number: dto.number,
            title: dto.title.unwrap_or_else(|| "(no title)".to_string()),
            body: dto.body,
            author: dto.user.map(|u| u.login).unwrap_or_default(),
            base_ref: dto.base.name,
            head_ref: dto.head.name,
            head_sha: dto.head.sha,
            changed_files: dto.changed_files.unwrap_or(0),
            additions: dto.additions.unwrap_or(0),
            deletions: dto.deletions.unwrap_or(0),
        })
    }

    async fn list_commits(&self) -> Result<Vec<CommitRef>, HostError> {
        let url = self.url(&format!("pulls/{}/commits", self.pr));
        let items: Vec<CommitListDto> = self.get_json(&url).await?;
        Ok(items
            .into_iter()
            .map(|c| CommitRef {
                sha: c.sha,
                author: c.commit.author.map(|a| a.name).unwrap_or_default(),
                message: c.commit.message,
            })
            .collect())
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitInfo, HostError> {
        let url = self.url(&format!("commits/{sha}"));
        let dto: CommitDetailDto = self.get_json(&url).await?;
        Ok(CommitInfo {
            sha: dto.sha,
            author: dto.commit.author.map(|a| a.name).unwrap_or_default(),
            message: dto.commit.message,
            files: dto
                .files
                .into_iter()
                .map(|f| CommitFile {
                    filename: f.filename,
                    additions: f.additions,
                    deletions: f.deletions,
                    patch: f.patch,
                })
                .collect(),
        })
    }

    async fn list_files(&self) -> Result<Vec<PrFile>, HostError> {
        let url = self.url(&format!("pulls/{}/files", self.pr));
        let items: Vec<PrFileDto> = self.get_json(&url).await?;
        Ok(items
            .into_iter()
            .map(|f| PrFile {
                filename: f.filename,
                status: f.status,
                additions: f.additions,
                deletions: f.deletions,
            })
            .collect())
    }

    async fn get_file_content(&self, path: &str, git_ref: &str) -> Result<String, HostError> {
        let url = format!("{}?ref={git_ref}", self.url(&format!("contents/{path}")));
        let dto: ContentDto = self.get_json(&url).await?;
        decode_content(path, &dto)
    }

    async fn create_comment(&self, body: &str) -> Result<(), HostError> {
        if self.token.is_none() {
            return Err(HostError::NotConfigured(
                "a GitHub token is required to post comments (set GITHUB_TOKEN)".to_string(),
            ));
        }
        let url = self.url(&format!("issues/{}/comments", self.pr));
        debug!(url, "POST comment");
        let response = self
            .request(self.http.post(&url))
            .json(&json!({ "body": body }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_else(|_| "<no body>".to_string());
            return Err(HostError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(())
    }
}
