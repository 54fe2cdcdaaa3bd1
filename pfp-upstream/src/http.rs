//! Shared request plumbing for the upstream clients.

use std::time::Duration;

use serde::de::DeserializeOwned;

use pfp_core::error::{PfpError, Provider, Result};

/// Builds a client with a bounded timeout; every upstream call goes through one.
pub(crate) fn build_client(timeout_seconds: u64, user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .build()
        .map_err(|e| PfpError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Maps a reqwest failure onto the error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error, provider: Provider, timeout_seconds: u64) -> PfpError {
    if err.is_timeout() {
        PfpError::Timeout {
            provider,
            seconds: timeout_seconds,
        }
    } else {
        PfpError::Http(err.to_string())
    }
}

/// Builds `{api_base}/users/{id}`, percent-encoding `id` as one path segment.
pub(crate) fn user_url(api_base: &str, id: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(api_base)
        .map_err(|e| PfpError::Config(format!("Invalid API base {}: {}", api_base, e)))?;
    url.path_segments_mut()
        .map_err(|_| PfpError::Config(format!("API base cannot take a path: {}", api_base)))?
        .pop_if_empty()
        .push("users")
        .push(id);
    Ok(url)
}

pub(crate) fn ensure_success(response: &reqwest::Response, provider: Provider) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(PfpError::UpstreamHttp {
            provider,
            status: status.as_u16(),
        })
    }
}

/// Reads the whole body and parses it as `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    provider: Provider,
    timeout_seconds: u64,
) -> Result<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(e, provider, timeout_seconds))?;

    serde_json::from_slice(&body).map_err(|e| PfpError::UpstreamParse {
        provider,
        reason: e.to_string(),
    })
}
