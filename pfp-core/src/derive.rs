//! Derivation of CDN URLs from Discord user records.
//!
//! Pure functions: no I/O, no caching. Sizes are taken as given; the HTTP
//! layer is responsible for restricting them to the allow-list.

use crate::constants::{ANIMATED_HASH_PREFIX, DEFAULT_AVATAR_COUNT, DEFAULT_IMAGE_SIZE, DISCORD_CDN_BASE};
use crate::error::{PfpError, Result};
use crate::types::{DerivedAvatar, DerivedBanner, DiscordUser, RawUserView};

/// Resolves the avatar of `user` at `size`.
///
/// Users without a custom avatar get one of the built-in defaults, chosen by
/// [`default_avatar_index`]; `size` does not apply to those.
pub fn derive_avatar(user: &DiscordUser, size: u32) -> DerivedAvatar {
    DerivedAvatar {
        id: user.id.clone(),
        username: user.username.clone(),
        display_name: user.display_name().to_string(),
        avatar_url: avatar_url(user, size),
        discriminator: user.discriminator.clone(),
    }
}

/// Resolves the banner of `user` at `size`.
///
/// # Errors
///
/// [`PfpError::NoBanner`] when the user has no banner hash.
pub fn derive_banner(user: &DiscordUser, size: u32) -> Result<DerivedBanner> {
    let banner_url = banner_url(user, size).ok_or_else(|| PfpError::NoBanner(user.id.clone()))?;

    Ok(DerivedBanner {
        id: user.id.clone(),
        banner_url,
    })
}

/// Wraps the full record with resolved avatar and banner URLs at the default size.
pub fn derive_raw(user: &DiscordUser) -> RawUserView {
    RawUserView {
        display_name: user.display_name().to_string(),
        avatar_url: avatar_url(user, DEFAULT_IMAGE_SIZE),
        banner_url: banner_url(user, DEFAULT_IMAGE_SIZE),
        user: user.clone(),
    }
}

/// Index of the built-in avatar for a legacy discriminator.
///
/// `discriminator mod 5`, or 0 when the discriminator is absent or not a number.
pub fn default_avatar_index(discriminator: Option<&str>) -> u32 {
    discriminator
        .and_then(|d| d.trim().parse::<u32>().ok())
        .map_or(0, |d| d % DEFAULT_AVATAR_COUNT)
}

fn avatar_url(user: &DiscordUser, size: u32) -> String {
    match non_empty(user.avatar.as_deref()) {
        Some(hash) => asset_url("avatars", &user.id, hash, size),
        None => format!(
            "{}/embed/avatars/{}.png",
            DISCORD_CDN_BASE,
            default_avatar_index(user.discriminator.as_deref())
        ),
    }
}

fn banner_url(user: &DiscordUser, size: u32) -> Option<String> {
    non_empty(user.banner.as_deref()).map(|hash| asset_url("banners", &user.id, hash, size))
}

fn asset_url(kind: &str, user_id: &str, hash: &str, size: u32) -> String {
    format!(
        "{}/{}/{}/{}.{}?size={}",
        DISCORD_CDN_BASE,
        kind,
        user_id,
        hash,
        extension(hash),
        size
    )
}

fn extension(hash: &str) -> &'static str {
    if hash.starts_with(ANIMATED_HASH_PREFIX) {
        "gif"
    } else {
        "png"
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
