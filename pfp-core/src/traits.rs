//! Upstream seams.
//!
//! The HTTP clients in `pfp-upstream` implement these; tests substitute stubs.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DiscordUser, GitHubUser, ProxiedImage};

/// Source of Discord user records.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Fetches one user by snowflake id. One request, no retries.
    async fn fetch_user(&self, user_id: &str) -> Result<DiscordUser>;
}

/// Source of GitHub user records.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetches one user by login. One request, no retries.
    async fn fetch_user(&self, login: &str) -> Result<GitHubUser>;
}

/// Fetches image bytes for relaying to clients.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads the image at `url`.
    async fn fetch_image(&self, url: &str) -> Result<ProxiedImage>;
}
