//! DTOs for API responses that are not domain views.

use serde::Serialize;

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
}

/// Response for `GET /api`.
#[derive(Debug, Serialize)]
pub struct EndpointList {
    /// Available endpoints
    pub endpoints: Vec<EndpointDoc>,
}

/// One documented endpoint.
#[derive(Debug, Serialize)]
pub struct EndpointDoc {
    /// Route pattern
    pub url: &'static str,
    /// What it returns
    pub description: &'static str,
}

impl EndpointList {
    /// The static endpoint catalog.
    pub fn catalog() -> Self {
        const ENDPOINTS: &[(&str, &str)] = &[
            // Discord
            ("/api/:userId", "Get avatar JSON info (JSON)"),
            ("/api/user/:userId/raw", "Get raw Discord user data (JSON)"),
            ("/api/pfp/:userId/image", "Avatar image (512px)"),
            ("/api/pfp/:userId/smallimage", "Avatar image (128px)"),
            ("/api/pfp/:userId/bigimage", "Avatar image (1024px)"),
            ("/api/pfp/:userId/superbigimage", "Avatar image (4096px)"),
            ("/api/pfp/:userId/:size", "Avatar image with custom size (64-4096)"),
            ("/api/banner/:userId", "Get banner URL JSON for a user (JSON)"),
            ("/api/banner/:userId/image", "Banner image"),
            // GitHub
            ("/api/github/:username", "Get GitHub user JSON info"),
            ("/api/github/:username/pfp", "GitHub avatar image"),
            // Health
            ("/ping", "Health check"),
        ];

        Self {
            endpoints: ENDPOINTS
                .iter()
                .map(|&(url, description)| EndpointDoc { url, description })
                .collect(),
        }
    }
}

/// Query string accepted by the banner routes.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SizeQuery {
    /// Requested size; validated against the allow-list
    pub size: Option<String>,
}
