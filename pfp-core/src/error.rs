//! Error types for pfp-proxy.
//!
//! One `thiserror` enum covers the whole request pipeline. The HTTP layer maps
//! each variant onto a status code; see `is_validation_error` and friends.

use std::fmt;

use thiserror::Error;

/// Result type alias using `PfpError`.
pub type Result<T> = std::result::Result<T, PfpError>;

/// Upstream service a request was sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Discord REST API.
    Discord,
    /// GitHub REST API.
    GitHub,
    /// Image CDN (Discord CDN or GitHub avatars).
    Cdn,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Discord => f.write_str("Discord"),
            Provider::GitHub => f.write_str("GitHub"),
            Provider::Cdn => f.write_str("CDN"),
        }
    }
}

/// Main error type for all pfp-proxy operations.
#[derive(Debug, Error)]
pub enum PfpError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Discord user id is not a 17–20 digit snowflake.
    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),

    /// GitHub login cannot be used as a single URL path segment.
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // ABSENT DATA
    // ═══════════════════════════════════════════════════════════════════════════

    /// The user has no banner asset.
    #[error("User {0} has no banner")]
    NoBanner(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Upstream answered with a non-success status.
    #[error("{provider} API error: {status}")]
    UpstreamHttp {
        /// Service that answered.
        provider: Provider,
        /// HTTP status code it answered with.
        status: u16,
    },

    /// Upstream body did not match the expected record shape.
    #[error("{provider} response could not be parsed: {reason}")]
    UpstreamParse {
        /// Service that answered.
        provider: Provider,
        /// Parser message.
        reason: String,
    },

    /// Upstream body exceeded the relay limit.
    #[error("{provider} response exceeds {limit} bytes")]
    TooLarge {
        /// Service that answered.
        provider: Provider,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Request never completed (DNS, TLS, connection reset...).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request exceeded the configured timeout.
    #[error("{provider} request timed out after {seconds}s")]
    Timeout {
        /// Service that did not answer in time.
        provider: Provider,
        /// Configured timeout.
        seconds: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PfpError {
    /// Returns true if the caller supplied a malformed identifier.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, PfpError::InvalidUserId(_) | PfpError::InvalidUsername(_))
    }

    /// Returns true if the requested resource simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PfpError::NoBanner(_))
    }

    /// Returns true if the failure happened talking to an upstream service.
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            PfpError::UpstreamHttp { .. }
                | PfpError::UpstreamParse { .. }
                | PfpError::TooLarge { .. }
                | PfpError::Http(_)
                | PfpError::Timeout { .. }
        )
    }
}
