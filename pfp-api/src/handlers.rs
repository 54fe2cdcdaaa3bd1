//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use pfp_core::error::PfpError;
use pfp_core::types::{DerivedAvatar, DerivedBanner, GitHubProfile, ImageSize, ProxiedImage, RawUserView};
use pfp_core::validate::{is_valid_github_login, is_valid_user_id};

use crate::dto::{EndpointList, SizeQuery};
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// GET /ping
pub async fn ping() -> &'static str {
    "pong"
}

/// GET /api
pub async fn list_endpoints() -> Json<EndpointList> {
    Json(EndpointList::catalog())
}

/// GET /api/:user_id
pub async fn get_avatar(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<DerivedAvatar>> {
    check_user_id(&user_id)?;

    let avatar = state
        .resolver
        .avatar(&user_id, ImageSize::default().get())
        .await
        .map_err(|e| ApiError::from_pfp(e, "Could not fetch avatar"))?;

    Ok(Json(avatar))
}

/// GET /api/pfp/:user_id/:variant
///
/// `variant` is one of the named sizes or a number; anything else serves 512px.
pub async fn get_avatar_image(
    State(state): State<Arc<AppState>>,
    Path((user_id, variant)): Path<(String, String)>,
) -> Result<Response> {
    check_user_id(&user_id)?;
    let size = ImageSize::from_route_segment(&variant);

    let avatar = state
        .resolver
        .avatar(&user_id, size.get())
        .await
        .map_err(|e| ApiError::from_pfp(e, "Could not fetch avatar"))?;

    debug!(user_id = %user_id, size = size.get(), "Proxying avatar");
    proxy_image(&state, &avatar.avatar_url, "Could not fetch avatar").await
}

/// GET /api/user/:user_id/raw
pub async fn get_raw_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<RawUserView>> {
    check_user_id(&user_id)?;

    let raw = state
        .resolver
        .raw_user(&user_id)
        .await
        .map_err(|e| ApiError::from_pfp(e, "Could not fetch user data"))?;

    Ok(Json(raw))
}

/// GET /api/banner/:user_id?size=N
pub async fn get_banner(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<SizeQuery>,
) -> Result<Json<DerivedBanner>> {
    check_user_id(&user_id)?;
    let size = ImageSize::from_param(query.size.as_deref());

    let banner = state
        .resolver
        .banner(&user_id, size.get())
        .await
        .map_err(|e| ApiError::from_pfp(e, "Could not fetch banner"))?;

    Ok(Json(banner))
}

/// GET /api/banner/:user_id/image?size=N
pub async fn get_banner_image(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<SizeQuery>,
) -> Result<Response> {
    check_user_id(&user_id)?;
    let size = ImageSize::from_param(query.size.as_deref());

    let banner = state
        .resolver
        .banner(&user_id, size.get())
        .await
        .map_err(|e| ApiError::from_pfp(e, "Could not fetch banner"))?;

    proxy_image(&state, &banner.banner_url, "Could not fetch banner").await
}

/// GET /api/github/:username
pub async fn get_github_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<GitHubProfile>> {
    check_github_login(&username)?;

    let profile = state
        .resolver
        .github_profile(&username)
        .await
        .map_err(|e| ApiError::from_pfp(e, "Could not fetch GitHub user data"))?;

    Ok(Json(profile))
}

/// GET /api/github/:username/pfp
pub async fn get_github_avatar(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Response> {
    check_github_login(&username)?;

    let user = state
        .resolver
        .github_user(&username)
        .await
        .map_err(|e| ApiError::from_pfp(e, "Could not fetch GitHub avatar"))?;

    proxy_image(&state, &user.avatar_url, "Could not fetch GitHub avatar").await
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

fn check_user_id(user_id: &str) -> Result<()> {
    if is_valid_user_id(user_id) {
        Ok(())
    } else {
        Err(PfpError::InvalidUserId(user_id.to_string()).into())
    }
}

fn check_github_login(login: &str) -> Result<()> {
    if is_valid_github_login(login) {
        Ok(())
    } else {
        Err(PfpError::InvalidUsername(login.to_string()).into())
    }
}

/// Downloads `url` and relays it with its content type. Images may be embedded
/// from any origin, so the same-origin resource policy is relaxed here.
async fn proxy_image(state: &AppState, url: &str, context: &str) -> Result<Response> {
    let ProxiedImage { content_type, body } = state
        .images
        .fetch_image(url)
        .await
        .map_err(|e| ApiError::from_pfp(e, context))?;

    let content_type = content_type
        .and_then(|ct| HeaderValue::from_str(&ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            (
                header::HeaderName::from_static("cross-origin-resource-policy"),
                HeaderValue::from_static("cross-origin"),
            ),
        ],
        body,
    )
        .into_response())
}
