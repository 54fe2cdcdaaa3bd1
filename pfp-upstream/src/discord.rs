//! Discord REST client.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, instrument, warn};

use pfp_core::constants::{DEFAULT_DISCORD_API_BASE, DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use pfp_core::error::{Provider, Result};
use pfp_core::traits::DiscordApi;
use pfp_core::types::DiscordUser;

use crate::http::{build_client, ensure_success, read_json, transport_error, user_url};

/// Discord client configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// REST API base, without trailing slash (e.g. "https://discord.com/api")
    pub api_base: String,
    /// Bot token sent as `Authorization: Bot <token>`
    pub bot_token: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl DiscordConfig {
    /// Creates config for the public API with the given bot token.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_DISCORD_API_BASE.into(),
            bot_token: bot_token.into(),
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }

    /// Points the client at another API base (proxies, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("api_base", &self.api_base)
            .field("bot_token", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Fetches Discord user records with a bot token.
pub struct DiscordClient {
    config: DiscordConfig,
    http_client: reqwest::Client,
}

impl DiscordClient {
    /// Creates a client from config.
    pub fn with_config(config: DiscordConfig) -> Result<Self> {
        let http_client = build_client(config.timeout_seconds, DEFAULT_USER_AGENT)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetches `GET /users/{id}`.
    #[instrument(skip(self))]
    pub async fn fetch_user(&self, user_id: &str) -> Result<DiscordUser> {
        let url = user_url(&self.config.api_base, user_id)?;

        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, format!("Bot {}", self.config.bot_token))
            .send()
            .await
            .map_err(|e| transport_error(e, Provider::Discord, self.config.timeout_seconds))?;

        if let Err(err) = ensure_success(&response, Provider::Discord) {
            warn!(user_id, status = %response.status(), "Discord rejected user lookup");
            return Err(err);
        }

        let user: DiscordUser =
            read_json(response, Provider::Discord, self.config.timeout_seconds).await?;
        debug!(user_id, username = %user.username, "Fetched Discord user");
        Ok(user)
    }
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn fetch_user(&self, user_id: &str) -> Result<DiscordUser> {
        DiscordClient::fetch_user(self, user_id).await
    }
}
