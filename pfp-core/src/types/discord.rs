//! Discord user record and the views derived from it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Discord user as returned by `GET /users/{id}`.
///
/// Only the fields the service interprets are typed. Everything else
/// (flags, accent color, decoration data, clan, primary guild...) is kept in
/// [`extra`](Self::extra) and forwarded verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscordUser {
    /// Snowflake id.
    pub id: String,
    /// Unique username.
    pub username: String,
    /// Display name override.
    #[serde(default)]
    pub global_name: Option<String>,
    /// Avatar asset hash; `a_` prefix means animated.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Legacy 4-digit tag, only used to pick a default avatar.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Banner asset hash.
    #[serde(default)]
    pub banner: Option<String>,
    /// Untyped passthrough fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DiscordUser {
    /// Name to show: the global display name, or the username when unset.
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Avatar summary served by `GET /api/:userId`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DerivedAvatar {
    /// Snowflake id.
    pub id: String,
    /// Unique username.
    pub username: String,
    /// Global name, falling back to the username.
    pub display_name: String,
    /// Resolved CDN URL.
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
    /// Legacy tag, passed through untouched.
    pub discriminator: Option<String>,
}

/// Banner summary served by `GET /api/banner/:userId`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DerivedBanner {
    /// Snowflake id.
    pub id: String,
    /// Resolved CDN URL.
    #[serde(rename = "bannerUrl")]
    pub banner_url: String,
}

/// Full Discord record plus resolved URLs, served by `GET /api/user/:userId/raw`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RawUserView {
    /// The upstream record, flattened into the response object.
    #[serde(flatten)]
    pub user: DiscordUser,
    /// Global name, falling back to the username.
    pub display_name: String,
    /// Avatar URL at the default size.
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
    /// Banner URL at the default size, `null` without a banner.
    #[serde(rename = "bannerUrl")]
    pub banner_url: Option<String>,
}
