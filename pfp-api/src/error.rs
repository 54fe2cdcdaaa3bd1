//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use pfp_core::error::PfpError;

use crate::dto::ErrorResponse;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Rate limit exceeded.
    pub fn too_many_requests() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please try again later.",
        )
    }

    /// Maps a pipeline error, using `context` as the client-facing message
    /// for server-side failures. Those are logged in full.
    pub fn from_pfp(err: PfpError, context: &str) -> Self {
        match &err {
            PfpError::InvalidUserId(_) => ApiError::bad_request("Invalid user ID"),
            PfpError::InvalidUsername(_) => ApiError::bad_request("Invalid username"),
            PfpError::NoBanner(_) => ApiError::not_found("Banner not available"),
            _ => {
                error!(error = %err, context, "Request failed");
                ApiError::internal(context)
            }
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<PfpError> for ApiError {
    fn from(err: PfpError) -> Self {
        ApiError::from_pfp(err, "An internal error occurred")
    }
}

#[cfg(test)]
mod tests {
    use pfp_core::error::Provider;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(PfpError::InvalidUserId("abc".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PfpError::NoBanner("1".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PfpError::UpstreamHttp {
                provider: Provider::Discord,
                status: 403
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(PfpError::UpstreamParse {
                provider: Provider::GitHub,
                reason: "eof".into()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_detail_is_not_leaked() {
        let err = ApiError::from_pfp(
            PfpError::Http("dns error: discord.com".into()),
            "Could not fetch avatar",
        );
        assert_eq!(err.message, "Could not fetch avatar");
    }
}
