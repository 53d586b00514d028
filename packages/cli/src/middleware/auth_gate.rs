// ABOUTME: Bearer credential middleware and extractor for protected routes
// ABOUTME: Rejected requests get a 401 JSON body and never reach the handler

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use calgate_auth::{Claims, TokenError};

use crate::error::AppError;
use crate::state::AppState;

/// Validate the bearer credential and attach its claims to the request.
pub async fn require_credential(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();
    let request = state.gate.authorize(request).map_err(AppError::Unauthorized)?;

    debug!(path = %path, "Credential accepted");
    Ok(next.run(request).await)
}

/// Claims attached by `require_credential`.
///
/// Handlers read the provider access token only from here.
#[derive(Debug, Clone)]
pub struct CurrentCredential(pub Claims);

impl CurrentCredential {
    pub fn user_id(&self) -> &str {
        &self.0.subject
    }

    pub fn provider_access_token(&self) -> &str {
        self.0.provider_access_token()
    }
}

impl<S> FromRequestParts<S> for CurrentCredential
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(CurrentCredential)
            .ok_or(AppError::Unauthorized(TokenError::MissingAuthHeader))
    }
}
