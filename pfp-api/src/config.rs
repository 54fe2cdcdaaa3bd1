//! Server configuration from the environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use pfp_core::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_DISCORD_API_BASE, DEFAULT_GITHUB_API_BASE,
    DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use pfp_core::error::{PfpError, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
const DEFAULT_TRUST_PROXY_HOPS: usize = 1;

/// Server configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Listening port (`PORT`)
    pub port: u16,
    /// Discord bot token (`DISCORD_BOT_TOKEN`, required)
    pub discord_bot_token: String,
    /// Lifetime of cached upstream records in seconds (`CACHE_TTL`)
    pub cache_ttl_seconds: u64,
    /// Requests allowed per client per window (`RATE_LIMIT_MAX`)
    pub rate_limit_max: u32,
    /// Rate-limit window in seconds (`RATE_LIMIT_WINDOW`)
    pub rate_limit_window_seconds: u64,
    /// Reverse-proxy hops trusted in `X-Forwarded-For` (`TRUST_PROXY_HOPS`)
    pub trust_proxy_hops: usize,
    /// Upstream request timeout in seconds (`UPSTREAM_TIMEOUT`)
    pub upstream_timeout_seconds: u64,
    /// Discord API base (`DISCORD_API_BASE`)
    pub discord_api_base: String,
    /// GitHub API base (`GITHUB_API_BASE`)
    pub github_api_base: String,
    /// Optional GitHub token (`GITHUB_TOKEN`)
    pub github_token: Option<String>,
}

impl ApiConfig {
    /// Creates a config with defaults for everything but the bot token.
    pub fn new(discord_bot_token: impl Into<String>) -> Self {
        Self {
            port: DEFAULT_PORT,
            discord_bot_token: discord_bot_token.into(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECS,
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
            rate_limit_window_seconds: DEFAULT_RATE_LIMIT_WINDOW_SECS,
            trust_proxy_hops: DEFAULT_TRUST_PROXY_HOPS,
            upstream_timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            discord_api_base: DEFAULT_DISCORD_API_BASE.into(),
            github_api_base: DEFAULT_GITHUB_API_BASE.into(),
            github_token: None,
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// [`PfpError::Config`] when `DISCORD_BOT_TOKEN` is missing or empty.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// Unparseable numbers fall back to their default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("DISCORD_BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PfpError::Config("Missing DISCORD_BOT_TOKEN".into()))?;

        let defaults = Self::new(token);

        Ok(Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            cache_ttl_seconds: parse_or(&lookup, "CACHE_TTL", defaults.cache_ttl_seconds),
            rate_limit_max: parse_or(&lookup, "RATE_LIMIT_MAX", defaults.rate_limit_max),
            rate_limit_window_seconds: parse_or(
                &lookup,
                "RATE_LIMIT_WINDOW",
                defaults.rate_limit_window_seconds,
            ),
            trust_proxy_hops: parse_or(&lookup, "TRUST_PROXY_HOPS", defaults.trust_proxy_hops),
            upstream_timeout_seconds: parse_or(
                &lookup,
                "UPSTREAM_TIMEOUT",
                defaults.upstream_timeout_seconds,
            ),
            discord_api_base: non_empty(&lookup, "DISCORD_API_BASE")
                .unwrap_or(defaults.discord_api_base),
            github_api_base: non_empty(&lookup, "GITHUB_API_BASE")
                .unwrap_or(defaults.github_api_base),
            github_token: non_empty(&lookup, "GITHUB_TOKEN"),
            discord_bot_token: defaults.discord_bot_token,
        })
    }

    /// Cache TTL as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Rate-limit window as a duration.
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_seconds)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("port", &self.port)
            .field("discord_bot_token", &"<redacted>")
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window_seconds", &self.rate_limit_window_seconds)
            .field("trust_proxy_hops", &self.trust_proxy_hops)
            .field("upstream_timeout_seconds", &self.upstream_timeout_seconds)
            .field("discord_api_base", &self.discord_api_base)
            .field("github_api_base", &self.github_api_base)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match non_empty(lookup, key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Ignoring unparseable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_token_fails() {
        let err = ApiConfig::from_lookup(lookup(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, PfpError::Config(msg) if msg.contains("DISCORD_BOT_TOKEN")));
    }

    #[test]
    fn test_blank_token_fails() {
        assert!(ApiConfig::from_lookup(lookup(&[("DISCORD_BOT_TOKEN", "  ")])).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[("DISCORD_BOT_TOKEN", "token")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(900));
        assert_eq!(config.trust_proxy_hops, 1);
        assert_eq!(config.upstream_timeout_seconds, 10);
        assert_eq!(config.discord_api_base, "https://discord.com/api");
        assert_eq!(config.github_token, None);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("DISCORD_BOT_TOKEN", "token"),
            ("PORT", "8080"),
            ("CACHE_TTL", "5"),
            ("RATE_LIMIT_MAX", "10"),
            ("GITHUB_TOKEN", "ghp_x"),
            ("DISCORD_API_BASE", "http://localhost:9000/api"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl_seconds, 5);
        assert_eq!(config.rate_limit_max, 10);
        assert_eq!(config.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(config.discord_api_base, "http://localhost:9000/api");
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("DISCORD_BOT_TOKEN", "token"),
            ("PORT", "eighty"),
            ("CACHE_TTL", "-1"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_ttl_seconds, 60);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = ApiConfig::new("bot-secret");
        config.github_token = Some("gh-secret".into());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("bot-secret"));
        assert!(!debug.contains("gh-secret"));
    }
}
