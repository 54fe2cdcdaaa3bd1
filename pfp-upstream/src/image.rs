//! CDN image downloads for the proxy routes.

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};

use pfp_core::constants::{DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_IMAGE_BYTES};
use pfp_core::error::{PfpError, Provider, Result};
use pfp_core::traits::ImageFetcher;
use pfp_core::types::ProxiedImage;

use crate::http::{build_client, ensure_success, transport_error};

/// Downloads avatar and banner images.
///
/// Bodies are buffered up to a byte limit; larger ones fail with
/// [`PfpError::TooLarge`].
pub struct ImageClient {
    http_client: reqwest::Client,
    timeout_seconds: u64,
    max_bytes: usize,
}

impl ImageClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_UPSTREAM_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout in seconds.
    pub fn with_timeout(timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            http_client: build_client(timeout_seconds, DEFAULT_USER_AGENT)?,
            timeout_seconds,
            max_bytes: MAX_IMAGE_BYTES,
        })
    }

    /// Sets the largest body accepted, in bytes.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Downloads the image at `url`, keeping its `Content-Type`.
    #[instrument(skip(self))]
    pub async fn fetch_image(&self, url: &str) -> Result<ProxiedImage> {
        let mut response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(e, Provider::Cdn, self.timeout_seconds))?;

        if let Err(err) = ensure_success(&response, Provider::Cdn) {
            warn!(url, status = %response.status(), "CDN refused image");
            return Err(err);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let too_large = PfpError::TooLarge {
            provider: Provider::Cdn,
            limit: self.max_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            warn!(url, limit = self.max_bytes, "CDN image over size limit");
            return Err(too_large);
        }

        // Content-Length is optional; the limit also holds per chunk.
        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| transport_error(e, Provider::Cdn, self.timeout_seconds))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                warn!(url, limit = self.max_bytes, "CDN image over size limit");
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url, bytes = body.len(), "Downloaded image");
        Ok(ProxiedImage {
            content_type,
            body: body.freeze(),
        })
    }
}

#[async_trait]
impl ImageFetcher for ImageClient {
    async fn fetch_image(&self, url: &str) -> Result<ProxiedImage> {
        ImageClient::fetch_image(self, url).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[tokio::test]
    async fn test_fetch_image_keeps_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/avatars/1/abc.png"))
            .and(query_param("size", "512"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(PNG_MAGIC),
            )
            .expect(1)
            .mount(&server)
            .await;

        let image = ImageClient::new()
            .unwrap()
            .fetch_image(&format!("{}/avatars/1/abc.png?size=512", server.uri()))
            .await
            .unwrap();

        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(&image.body[..], PNG_MAGIC);
    }

    #[tokio::test]
    async fn test_fetch_image_over_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0u8; 64]),
            )
            .mount(&server)
            .await;

        let err = ImageClient::new()
            .unwrap()
            .with_max_bytes(16)
            .fetch_image(&format!("{}/avatars/1/huge.png", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PfpError::TooLarge {
                provider: Provider::Cdn,
                limit: 16
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_image_at_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 16]))
            .mount(&server)
            .await;

        let image = ImageClient::new()
            .unwrap()
            .with_max_bytes(16)
            .fetch_image(&format!("{}/avatars/1/ok.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(image.body.len(), 16);
    }

    #[tokio::test]
    async fn test_fetch_image_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = ImageClient::new()
            .unwrap()
            .fetch_image(&format!("{}/banners/1/gone.png", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PfpError::UpstreamHttp {
                provider: Provider::Cdn,
                status: 404
            }
        ));
    }
}
