//! GitHub REST client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, instrument, warn};

use pfp_core::constants::{DEFAULT_GITHUB_API_BASE, DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use pfp_core::error::{Provider, Result};
use pfp_core::traits::GitHubApi;
use pfp_core::types::GitHubUser;

use crate::http::{build_client, ensure_success, read_json, transport_error, user_url};

/// GitHub client configuration.
#[derive(Clone)]
pub struct GitHubConfig {
    /// REST API base (e.g. "https://api.github.com")
    pub api_base: String,
    /// User-Agent; GitHub refuses requests without one
    pub user_agent: String,
    /// Optional token, raises the unauthenticated rate limit
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_GITHUB_API_BASE.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            token: None,
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl GitHubConfig {
    /// Points the client at another API base.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Adds a token sent as `Authorization: Bearer <token>`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_base", &self.api_base)
            .field("user_agent", &self.user_agent)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Fetches GitHub user records.
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    /// Creates a client from config.
    pub fn with_config(config: GitHubConfig) -> Result<Self> {
        let http_client = build_client(config.timeout_seconds, &config.user_agent)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetches `GET /users/{login}`.
    #[instrument(skip(self))]
    pub async fn fetch_user(&self, login: &str) -> Result<GitHubUser> {
        let url = user_url(&self.config.api_base, login)?;

        let mut request = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, Provider::GitHub, self.config.timeout_seconds))?;

        if let Err(err) = ensure_success(&response, Provider::GitHub) {
            warn!(login, status = %response.status(), "GitHub rejected user lookup");
            return Err(err);
        }

        let user: GitHubUser =
            read_json(response, Provider::GitHub, self.config.timeout_seconds).await?;
        debug!(login, id = user.id, "Fetched GitHub user");
        Ok(user)
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn fetch_user(&self, login: &str) -> Result<GitHubUser> {
        GitHubClient::fetch_user(self, login).await
    }
}

#[cfg(test)]
mod tests {
    use pfp_core::error::PfpError;
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn octocat() -> serde_json::Value {
        json!({
            "login": "octocat",
            "id": 583231,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "html_url": "https://github.com/octocat",
            "name": "The Octocat",
            "public_repos": 8,
            "followers": 9000,
            "following": 9
        })
    }

    #[tokio::test]
    async fn test_fetch_user_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(octocat()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            GitHubClient::with_config(GitHubConfig::default().with_api_base(server.uri())).unwrap();
        let user = client.fetch_user("octocat").await.unwrap();
        assert_eq!(user.id, 583231);
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
    }

    #[tokio::test]
    async fn test_fetch_bot_account() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/dependabot[bot]"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "dependabot[bot]",
                "id": 49699333,
                "avatar_url": "https://avatars.githubusercontent.com/in/29110?v=4",
                "html_url": "https://github.com/apps/dependabot"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            GitHubClient::with_config(GitHubConfig::default().with_api_base(server.uri())).unwrap();
        let user = client.fetch_user("dependabot[bot]").await.unwrap();
        assert_eq!(user.login, "dependabot[bot]");
    }

    #[tokio::test]
    async fn test_fetch_user_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(octocat()))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::with_config(
            GitHubConfig::default()
                .with_api_base(server.uri())
                .with_token("ghp_test"),
        )
        .unwrap();
        assert!(client.fetch_user("octocat").await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_user_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let client =
            GitHubClient::with_config(GitHubConfig::default().with_api_base(server.uri())).unwrap();
        let err = client.fetch_user("nobody-here").await.unwrap_err();
        assert!(matches!(
            err,
            PfpError::UpstreamHttp {
                provider: Provider::GitHub,
                status: 404
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_user_wrong_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "octocat"})))
            .mount(&server)
            .await;

        let client =
            GitHubClient::with_config(GitHubConfig::default().with_api_base(server.uri())).unwrap();
        let err = client.fetch_user("octocat").await.unwrap_err();
        assert!(matches!(err, PfpError::UpstreamParse { provider: Provider::GitHub, .. }));
    }
}
