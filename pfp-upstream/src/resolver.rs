//! Cached profile lookups.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::instrument;

use pfp_cache::{CacheStats, TtlCache};
use pfp_core::derive::{derive_avatar, derive_banner, derive_raw};
use pfp_core::error::Result;
use pfp_core::traits::{DiscordApi, GitHubApi};
use pfp_core::types::{DerivedAvatar, DerivedBanner, DiscordUser, GitHubProfile, GitHubUser, RawUserView};

/// Cache key builders. Keys are namespaced by provider so a Discord id and a
/// GitHub login can never collide.
pub mod cache_key {
    /// Key for a Discord user id.
    pub fn discord(user_id: &str) -> String {
        format!("discord:{}", user_id)
    }

    /// Key for a GitHub login. Logins are case-insensitive.
    pub fn github(login: &str) -> String {
        format!("github:{}", login.to_ascii_lowercase())
    }
}

/// Resolves Discord and GitHub profiles through a TTL cache.
///
/// Records are fetched at most once per TTL window per key on the sequential
/// path; failures are never cached. Avatar and banner views are derived from
/// the (possibly cached) record on every call.
pub struct ProfileResolver {
    discord: Arc<dyn DiscordApi>,
    github: Arc<dyn GitHubApi>,
    discord_cache: Arc<TtlCache<Arc<DiscordUser>>>,
    github_cache: Arc<TtlCache<Arc<GitHubUser>>>,
}

impl ProfileResolver {
    /// Creates a resolver whose cached records live for `ttl`.
    pub fn new(discord: Arc<dyn DiscordApi>, github: Arc<dyn GitHubApi>, ttl: Duration) -> Self {
        Self {
            discord,
            github,
            discord_cache: Arc::new(TtlCache::new(ttl)),
            github_cache: Arc::new(TtlCache::new(ttl)),
        }
    }

    /// Returns the Discord record for `user_id`, from cache or upstream.
    ///
    /// The id is not validated here; callers check it first.
    #[instrument(skip(self))]
    pub async fn discord_user(&self, user_id: &str) -> Result<Arc<DiscordUser>> {
        let discord = &self.discord;
        self.discord_cache
            .cached_fetch(&cache_key::discord(user_id), || async move {
                discord.fetch_user(user_id).await.map(Arc::new)
            })
            .await
    }

    /// Returns the GitHub record for `login`, from cache or upstream.
    #[instrument(skip(self))]
    pub async fn github_user(&self, login: &str) -> Result<Arc<GitHubUser>> {
        let github = &self.github;
        self.github_cache
            .cached_fetch(&cache_key::github(login), || async move {
                github.fetch_user(login).await.map(Arc::new)
            })
            .await
    }

    /// Avatar view for a Discord user at `size`.
    pub async fn avatar(&self, user_id: &str, size: u32) -> Result<DerivedAvatar> {
        let user = self.discord_user(user_id).await?;
        Ok(derive_avatar(&user, size))
    }

    /// Banner view for a Discord user at `size`.
    ///
    /// Fails with `NoBanner` when the user has none.
    pub async fn banner(&self, user_id: &str, size: u32) -> Result<DerivedBanner> {
        let user = self.discord_user(user_id).await?;
        derive_banner(&user, size)
    }

    /// Full Discord record with resolved URLs.
    pub async fn raw_user(&self, user_id: &str) -> Result<RawUserView> {
        let user = self.discord_user(user_id).await?;
        Ok(derive_raw(&user))
    }

    /// Normalized GitHub profile.
    pub async fn github_profile(&self, login: &str) -> Result<GitHubProfile> {
        let user = self.github_user(login).await?;
        Ok(GitHubProfile::from(user.as_ref()))
    }

    /// Starts background sweepers on both caches.
    pub fn spawn_sweepers(&self, period: Duration) -> [JoinHandle<()>; 2] {
        [
            self.discord_cache.spawn_sweeper(period),
            self.github_cache.spawn_sweeper(period),
        ]
    }

    /// Statistics for the Discord and GitHub caches, in that order.
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.discord_cache.stats(), self.github_cache.stats())
    }
}

#[cfg(test)]
mod tests {
    use pfp_core::error::{PfpError, Provider};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::{DiscordClient, DiscordConfig, GitHubClient, GitHubConfig};

    const USER_ID: &str = "80351110224678912";

    fn resolver(server: &MockServer, ttl: Duration) -> ProfileResolver {
        let discord =
            DiscordClient::with_config(DiscordConfig::new("test-token").with_api_base(server.uri()))
                .unwrap();
        let github =
            GitHubClient::with_config(GitHubConfig::default().with_api_base(server.uri())).unwrap();
        ProfileResolver::new(Arc::new(discord), Arc::new(github), ttl)
    }

    fn discord_user(avatar: Option<&str>, banner: Option<&str>) -> serde_json::Value {
        json!({
            "id": USER_ID,
            "username": "nelly",
            "global_name": "Nelly",
            "avatar": avatar,
            "banner": banner,
            "discriminator": "7"
        })
    }

    #[tokio::test]
    async fn test_second_lookup_within_ttl_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/users/{USER_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(discord_user(Some("abc123"), None)))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = resolver(&server, Duration::from_secs(60));
        let first = resolver.avatar(USER_ID, 512).await.unwrap();
        let second = resolver.avatar(USER_ID, 512).await.unwrap();

        assert_eq!(first, second);
        assert!(first.avatar_url.ends_with("abc123.png?size=512"));
        assert_eq!(first.display_name, "Nelly");
    }

    #[tokio::test]
    async fn test_lookup_after_ttl_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(discord_user(None, None)))
            .expect(2)
            .mount(&server)
            .await;

        let resolver = resolver(&server, Duration::from_millis(50));
        resolver.discord_user(USER_ID).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        resolver.discord_user(USER_ID).await.unwrap();
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(2)
            .mount(&server)
            .await;

        let resolver = resolver(&server, Duration::from_secs(60));
        for _ in 0..2 {
            let err = resolver.avatar(USER_ID, 512).await.unwrap_err();
            assert!(matches!(
                err,
                PfpError::UpstreamHttp {
                    provider: Provider::Discord,
                    status: 403
                }
            ));
        }
    }

    #[tokio::test]
    async fn test_avatar_banner_and_raw_share_one_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(discord_user(None, Some("xyz"))))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = resolver(&server, Duration::from_secs(60));
        let avatar = resolver.avatar(USER_ID, 128).await.unwrap();
        let banner = resolver.banner(USER_ID, 1024).await.unwrap();
        let raw = resolver.raw_user(USER_ID).await.unwrap();

        assert_eq!(avatar.avatar_url, "https://cdn.discordapp.com/embed/avatars/2.png");
        assert!(banner.banner_url.contains("xyz"));
        assert!(banner.banner_url.ends_with("?size=1024"));
        assert_eq!(raw.banner_url.as_deref(), Some(
            "https://cdn.discordapp.com/banners/80351110224678912/xyz.png?size=512"
        ));
    }

    #[tokio::test]
    async fn test_banner_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(discord_user(None, None)))
            .mount(&server)
            .await;

        let err = resolver(&server, Duration::from_secs(60))
            .banner(USER_ID, 512)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_github_key_is_case_insensitive() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "octocat",
                "id": 583231,
                "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
                "html_url": "https://github.com/octocat",
                "name": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = resolver(&server, Duration::from_secs(60));
        let profile = resolver.github_profile("octocat").await.unwrap();
        resolver.github_profile("OctoCat").await.unwrap();

        assert_eq!(profile.display_name, "octocat");
        assert_eq!(resolver.cache_stats().1.valid_entries, 1);
    }

    #[test]
    fn test_cache_keys_are_namespaced() {
        assert_eq!(cache_key::discord(USER_ID), "discord:80351110224678912");
        assert_eq!(cache_key::github("OctoCat"), "github:octocat");
        assert_ne!(cache_key::discord("octocat"), cache_key::github("octocat"));
    }
}
