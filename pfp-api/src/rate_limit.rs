//! Fixed-window rate limiting per client address.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tracing::warn;

use crate::error::ApiError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Clone, Copy, Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Outcome of counting one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateDecision {
    /// Under the limit.
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
        /// Time until the window resets.
        reset_after: Duration,
    },
    /// Over the limit until the window resets.
    Limited {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

/// Counts requests per client in fixed windows.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
    trust_proxy_hops: usize,
}

impl RateLimiter {
    /// Allows `max_requests` per `window` per client. `trust_proxy_hops`
    /// reverse proxies are trusted to append to `X-Forwarded-For`.
    pub fn new(max_requests: u32, window: Duration, trust_proxy_hops: usize) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
            trust_proxy_hops,
        }
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Requests allowed per window.
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Counts one request from `client`.
    pub fn check(&self, client: &str) -> RateDecision {
        let now = Instant::now();
        let mut entry = self.windows.entry(client.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            *entry = Window {
                started_at: now,
                count: 0,
            };
        }
        entry.count = entry.count.saturating_add(1);

        let reset_after = self
            .window
            .saturating_sub(now.duration_since(entry.started_at));

        if entry.count > self.max_requests {
            RateDecision::Limited {
                retry_after: reset_after,
            }
        } else {
            RateDecision::Allowed {
                remaining: self.max_requests - entry.count,
                reset_after,
            }
        }
    }

    /// Drops windows that have ended, returning how many went.
    pub fn purge_expired(&self) -> usize {
        let before = self.windows.len();
        let now = Instant::now();
        self.windows
            .retain(|_, w| now.duration_since(w.started_at) < self.window);
        before.saturating_sub(self.windows.len())
    }

    /// Identifies the client: the address `trust_proxy_hops` entries from the
    /// right of `X-Forwarded-For`, or the socket peer when no proxy is trusted
    /// or the header is absent.
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<IpAddr>) -> String {
        if self.trust_proxy_hops > 0 {
            let chain: Vec<&str> = headers
                .get_all(X_FORWARDED_FOR)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|v| v.split(','))
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
                .collect();

            if !chain.is_empty() {
                let idx = chain.len().saturating_sub(self.trust_proxy_hops);
                return chain[idx].to_string();
            }
        }

        peer.map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".into())
    }
}

/// Middleware applying the limiter to every request.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip());
    let client = limiter.client_key(req.headers(), peer);

    match limiter.check(&client) {
        RateDecision::Allowed {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(req).await;
            set_limit_headers(&mut response, limiter.max_requests(), remaining, reset_after);
            response
        }
        RateDecision::Limited { retry_after } => {
            warn!(client = %client, "Rate limit exceeded");
            let mut response = ApiError::too_many_requests().into_response();
            set_limit_headers(&mut response, limiter.max_requests(), 0, retry_after);
            response.headers_mut().insert(
                axum::http::header::RETRY_AFTER,
                HeaderValue::from(ceil_secs(retry_after)),
            );
            response
        }
    }
}

fn set_limit_headers(response: &mut Response, limit: u32, remaining: u32, reset_after: Duration) {
    let headers = response.headers_mut();
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(ceil_secs(reset_after)));
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
