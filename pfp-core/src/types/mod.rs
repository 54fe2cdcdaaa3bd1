//! Domain types for pfp-proxy.
//!
//! - [`DiscordUser`]: raw Discord user record, passthrough fields included
//! - [`GitHubUser`]: raw GitHub user record
//! - [`DerivedAvatar`], [`DerivedBanner`], [`RawUserView`], [`GitHubProfile`]:
//!   views computed per request, never cached
//! - [`ImageSize`], [`ProxiedImage`]: image proxy inputs and outputs

mod discord;
mod github;
mod image;

pub use discord::*;
pub use github::*;
pub use image::*;
