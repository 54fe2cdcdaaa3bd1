//! App state: profile resolver, image fetcher, rate limiter, config.

use std::sync::Arc;

use pfp_core::error::Result;
use pfp_core::traits::{DiscordApi, GitHubApi, ImageFetcher};
use pfp_upstream::{DiscordClient, DiscordConfig, GitHubClient, GitHubConfig, ImageClient, ProfileResolver};

use crate::config::ApiConfig;
use crate::rate_limit::RateLimiter;

/// Shared state handed to every handler.
pub struct AppState {
    /// Configuration the server was started with.
    pub config: ApiConfig,
    /// Cached Discord/GitHub lookups.
    pub resolver: ProfileResolver,
    /// Downloads images for the proxy routes.
    pub images: Arc<dyn ImageFetcher>,
    /// Per-client fixed-window limiter.
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Builds state around the real upstream clients.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let discord = DiscordClient::with_config(
            DiscordConfig::new(config.discord_bot_token.clone())
                .with_api_base(config.discord_api_base.clone())
                .with_timeout(config.upstream_timeout_seconds),
        )?;

        let mut github_config = GitHubConfig::default()
            .with_api_base(config.github_api_base.clone())
            .with_timeout(config.upstream_timeout_seconds);
        if let Some(token) = &config.github_token {
            github_config = github_config.with_token(token.clone());
        }
        let github = GitHubClient::with_config(github_config)?;

        let images = ImageClient::with_timeout(config.upstream_timeout_seconds)?;

        Ok(Self::with_upstreams(
            config,
            Arc::new(discord),
            Arc::new(github),
            Arc::new(images),
        ))
    }

    /// Builds state around caller-supplied upstreams.
    pub fn with_upstreams(
        config: ApiConfig,
        discord: Arc<dyn DiscordApi>,
        github: Arc<dyn GitHubApi>,
        images: Arc<dyn ImageFetcher>,
    ) -> Self {
        let resolver = ProfileResolver::new(discord, github, config.cache_ttl());
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max,
            config.rate_limit_window(),
            config.trust_proxy_hops,
        ));

        Self {
            config,
            resolver,
            images,
            limiter,
        }
    }
}
