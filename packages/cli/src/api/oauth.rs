// ABOUTME: Sign-in routes: begin Google OAuth, handle the callback, and log out
// ABOUTME: A successful callback persists the profile (best effort) and redirects with a fresh credential

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};
use tracing::{info, warn};

use calgate_auth::{CallbackParams, OAuthProvider, ProviderIdentity};
use calgate_storage::NewIdentity;

use crate::error::{ApiResult, AppError};
use crate::state::AppState;

/// Stored token expiry when the provider doesn't report one
const FALLBACK_TOKEN_LIFETIME_HOURS: i64 = 1;

pub const SCHEDULE_PAGE: &str = "/schedule-meeting";

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Resolve the `{provider}` path segment against the configured provider.
fn resolve_provider(state: &AppState, name: &str) -> ApiResult<OAuthProvider> {
    let provider: OAuthProvider = name.parse()?;
    if provider != state.identity_provider.provider() {
        return Err(AppError::bad_request(format!(
            "Unsupported provider: {}",
            provider
        )));
    }
    Ok(provider)
}

/// `GET /auth/` with no provider segment
pub async fn missing_provider() -> AppError {
    AppError::bad_request("Provider is required")
}

pub async fn begin_auth(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> ApiResult<Response> {
    let provider = resolve_provider(&state, &provider)?;
    let request = state.identity_provider.begin()?;

    info!(provider = %provider, "Redirecting to identity provider");
    Ok(found(&request.url))
}

pub async fn auth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Response> {
    let provider = resolve_provider(&state, &provider)?;
    let identity = state.identity_provider.complete(params).await?;

    save_profile(&state, &identity).await;

    let credential = state
        .issuer
        .issue(&identity.user_id, &identity.access_token)
        .map_err(AppError::CredentialIssue)?;

    info!(provider = %provider, user_id = %identity.user_id, "Sign-in complete");
    Ok(found(&format!("{}?token={}", SCHEDULE_PAGE, credential)))
}

/// Credentials are stateless; logging out is the client discarding its copy.
pub async fn logout(State(state): State<AppState>, Path(provider): Path<String>) -> ApiResult<Redirect> {
    let provider = resolve_provider(&state, &provider)?;
    info!(provider = %provider, "Logout");
    Ok(Redirect::temporary("/"))
}

/// Upsert the signed-in user's profile. Failures are logged and swallowed.
async fn save_profile(state: &AppState, identity: &ProviderIdentity) {
    let Some(profiles) = &state.profiles else {
        return;
    };

    let input = NewIdentity {
        google_id: identity.user_id.clone(),
        email: identity.email.clone(),
        name: identity.name.clone(),
        picture: identity.avatar_url.clone(),
        access_token: identity.access_token.clone(),
        refresh_token: identity.refresh_token.clone(),
        token_expiry: identity
            .expires_at
            .unwrap_or_else(|| Utc::now() + Duration::hours(FALLBACK_TOKEN_LIFETIME_HOURS)),
    };

    if let Err(e) = profiles.upsert_identity(input).await {
        warn!(user_id = %identity.user_id, error = %e, "Failed to save user profile");
    }
}
