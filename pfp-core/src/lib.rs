//! # pfp-core
//!
//! Core types, errors, and traits shared by every pfp-proxy crate:
//!
//! - **Types**: Discord and GitHub user records plus the views derived from them
//! - **Errors**: One error enum covering validation, upstream and config failures
//! - **Constants**: CDN locations, size allow-list, defaults
//! - **Derive**: Pure functions turning a user record into avatar/banner URLs
//! - **Traits**: The upstream seams (`DiscordApi`, `GitHubApi`, `ImageFetcher`)
//!
//! ## Example
//!
//! ```rust
//! use pfp_core::{derive_avatar, DiscordUser};
//!
//! let user: DiscordUser = serde_json::from_str(
//!     r#"{"id":"80351110224678912","username":"nelly","avatar":"a_abc123"}"#,
//! ).unwrap();
//! let avatar = derive_avatar(&user, 512);
//! assert!(avatar.avatar_url.ends_with(".gif?size=512"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod derive;
pub mod error;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export commonly used items at crate root
pub use constants::*;
pub use derive::{derive_avatar, derive_banner, derive_raw, default_avatar_index};
pub use error::{PfpError, Provider, Result};
pub use traits::*;
pub use types::*;
pub use validate::{is_valid_github_login, is_valid_user_id};
