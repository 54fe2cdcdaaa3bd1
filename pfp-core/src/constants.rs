//! Service constants: CDN locations, image sizes, and defaults.

// ═══════════════════════════════════════════════════════════════════════════════
// DISCORD CDN
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the Discord CDN.
pub const DISCORD_CDN_BASE: &str = "https://cdn.discordapp.com";

/// Number of built-in default avatars selectable by discriminator.
pub const DEFAULT_AVATAR_COUNT: u32 = 5;

/// Hash prefix Discord uses for animated assets.
pub const ANIMATED_HASH_PREFIX: &str = "a_";

// ═══════════════════════════════════════════════════════════════════════════════
// IMAGE SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Sizes accepted from clients. Anything else falls back to [`DEFAULT_IMAGE_SIZE`].
pub const ALLOWED_IMAGE_SIZES: [u32; 7] = [64, 128, 256, 512, 1024, 2048, 4096];

/// Size used when a route does not name one or names an invalid one.
pub const DEFAULT_IMAGE_SIZE: u32 = 512;

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Discord REST API base.
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";

/// GitHub REST API base.
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// User-Agent sent to GitHub, which rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("pfp-proxy/", env!("CARGO_PKG_VERSION"));

/// Upstream request timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Largest image body relayed by the proxy routes.
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Lifetime of a cached upstream record in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Shortest Discord snowflake accepted, in digits.
pub const USER_ID_MIN_DIGITS: usize = 17;

/// Longest Discord snowflake accepted, in digits.
pub const USER_ID_MAX_DIGITS: usize = 20;

/// Longest GitHub login accepted. Bot (`name[bot]`) and managed-user
/// (`name_shortcode`) logins run past the 39 characters of personal accounts.
pub const GITHUB_LOGIN_MAX_LEN: usize = 100;
