//! # pfp-proxy API Server
//!
//! REST API serving normalized Discord and GitHub avatar/profile data.
//!
//! ## Endpoints
//!
//! - `GET /api` - List endpoints
//! - `GET /api/:userId` - Discord avatar JSON
//! - `GET /api/pfp/:userId/{image,smallimage,bigimage,superbigimage,:size}` - Avatar image
//! - `GET /api/user/:userId/raw` - Raw Discord user JSON with resolved URLs
//! - `GET /api/banner/:userId` - Banner JSON
//! - `GET /api/banner/:userId/image` - Banner image
//! - `GET /api/github/:username` - GitHub profile JSON
//! - `GET /api/github/:username/pfp` - GitHub avatar image
//! - `GET /ping` - Health check
//!
//! ## Example
//!
//! ```rust,ignore
//! use pfp_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env()?;
//! let server = ApiServer::new(config)?;
//! server.run(([0, 0, 0, 0], 3000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod dto;
mod error;
mod handlers;
mod rate_limit;
mod routes;
mod security;
mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use rate_limit::{RateDecision, RateLimiter};
pub use routes::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use pfp_core::error::Result;

/// API server for pfp-proxy.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server backed by the real Discord, GitHub, and CDN clients.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::from_state(AppState::new(config)?))
    }

    /// Creates a server around prepared state (custom upstreams, tests).
    pub fn from_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates the router with all routes and middleware configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = create_router(self.state.clone()).layer(axum::middleware::from_fn_with_state(
            self.state.limiter.clone(),
            rate_limit::rate_limit,
        ));

        security::apply_headers(router)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address until Ctrl+C.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let sweep_period = Duration::from_secs(self.state.config.cache_ttl_seconds.max(1));
        let _sweepers = self.state.resolver.spawn_sweepers(sweep_period);
        let _limiter_sweeper = self.spawn_limiter_sweeper();

        info!("pfp-proxy listening on http://{}", addr);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }

    fn spawn_limiter_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.state.limiter.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window().max(Duration::from_secs(1)));
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.purge_expired();
                if removed > 0 {
                    debug!(removed, "Purged stale rate-limit windows");
                }
            }
        })
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            tracing::warn!(error = %err, "Cannot listen for Ctrl+C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
