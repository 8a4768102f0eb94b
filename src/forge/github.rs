//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Authentication
//!
//! A personal access token is passed at construction; the CLI reads it from
//! `GITHUB_TOKEN` or prompts for it with masked input. Rate limiting is
//! surfaced as an API error, not retried.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{CreatePrRequest, Forge, ForgeError, PrState, PullRequest};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "relcut-cli";

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// GitHub's PR response shape (the fields we read).
#[derive(Debug, Deserialize)]
struct PrResponse {
    number: u64,
    html_url: String,
    state: String,
    merged: Option<bool>,
}

/// GitHub's error response shape.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

impl GitHubForge {
    /// Create a new GitHub forge with a token.
    pub fn new(token: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::with_api_base(token, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a forge against a custom API base URL.
    ///
    /// Used for GitHub Enterprise installations and for tests against a
    /// local mock server.
    pub fn with_api_base(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    async fn error_from_response(response: Response) -> ForgeError {
        let status = response.status();
        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.message)
            .unwrap_or_else(|_| "unknown error".to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ForgeError::AuthFailed(message),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn create_pr(&self, request: CreatePrRequest) -> Result<PullRequest, ForgeError> {
        let url = format!(
            "{}/repos/{}/{}/pulls",
            self.api_base, self.owner, self.repo
        );

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&serde_json::json!({
                "title": request.title,
                "head": request.head,
                "base": request.base,
                "body": request.body,
            }))
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let pr: PrResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let state = match (pr.state.as_str(), pr.merged.unwrap_or(false)) {
            (_, true) => PrState::Merged,
            ("open", _) => PrState::Open,
            _ => PrState::Closed,
        };

        Ok(PullRequest {
            number: pr.number,
            url: pr.html_url,
            state,
        })
    }
}
