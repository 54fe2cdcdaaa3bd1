//! # pfp-upstream
//!
//! HTTP clients for the services pfp-proxy fronts, and the resolver that puts
//! the TTL cache in front of them.
//!
//! - [`DiscordClient`]: `GET /users/{id}` with a bot token
//! - [`GitHubClient`]: `GET /users/{login}`
//! - [`ImageClient`]: CDN image downloads for the proxy routes
//! - [`ProfileResolver`]: cached lookups plus avatar/banner derivation

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod discord;
mod github;
mod http;
mod image;
mod resolver;

pub use discord::{DiscordClient, DiscordConfig};
pub use github::{GitHubClient, GitHubConfig};
pub use image::ImageClient;
pub use resolver::{cache_key, ProfileResolver};
