use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use calgate_auth::{AuthError, TokenError};
use calgate_calendar::CalendarError;

/// Main application error type that all handlers should return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Credential missing or rejected by the access gate
    #[error("Unauthorized: {0}")]
    Unauthorized(TokenError),

    /// Sign-in with the identity provider failed
    #[error("OAuth error: {0}")]
    OAuth(#[from] AuthError),

    /// The calendar API rejected or failed a call
    #[error("Calendar error: {0}")]
    Upstream(#[from] CalendarError),

    /// Minting a credential after a successful sign-in failed
    #[error("Credential issue failed: {0}")]
    CredentialIssue(TokenError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    request_id: String,
}

impl AppError {
    /// Convert AppError to appropriate HTTP status code and error code
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized(token_error) => (StatusCode::UNAUTHORIZED, token_error.code()),
            AppError::OAuth(auth_error) => match auth_error {
                AuthError::InvalidProvider(_) => (StatusCode::BAD_REQUEST, "INVALID_PROVIDER"),
                AuthError::StateMismatch => (StatusCode::BAD_REQUEST, "STATE_MISMATCH"),
                AuthError::OAuthFailed(_) => (StatusCode::BAD_REQUEST, "OAUTH_DENIED"),
                AuthError::Configuration(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
                }
                AuthError::Provider(_)
                | AuthError::TokenExchange(_)
                | AuthError::UserInfo(_)
                | AuthError::Http(_)
                | AuthError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "OAUTH_FAILED"),
            },
            AppError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
            AppError::CredentialIssue(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CREDENTIAL_ISSUE_FAILED")
            }
            AppError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
        }
    }

    /// Get user-friendly error message (sanitized for external consumption)
    fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation failed: {}", msg),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Unauthorized(token_error) => token_error.to_string(),
            AppError::OAuth(auth_error) => match auth_error {
                AuthError::InvalidProvider(msg) => msg.clone(),
                AuthError::Configuration(_) => "Server configuration error".to_string(),
                other => other.to_string(),
            },
            // Google's own message is passed through
            AppError::Upstream(calendar_error) => calendar_error.to_string(),
            AppError::CredentialIssue(_) => "Failed to generate token".to_string(),
            AppError::Configuration(_) => "Server configuration error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();
        let user_message = self.to_user_message();

        // Log internal errors with full context but don't expose details
        match &self {
            AppError::Configuration(msg) => {
                error!(
                    request_id = %request_id,
                    config_error = %msg,
                    "Configuration error"
                );
            }
            AppError::CredentialIssue(err) => {
                error!(
                    request_id = %request_id,
                    error = %err,
                    "Failed to issue credential"
                );
            }
            AppError::Upstream(err) => {
                warn!(
                    request_id = %request_id,
                    error = %err,
                    "Calendar API call failed"
                );
            }
            AppError::Unauthorized(err) => {
                warn!(
                    request_id = %request_id,
                    error_code = %error_code,
                    reason = %err,
                    "Rejected unauthenticated request"
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let body = ErrorResponse {
            error: user_message,
            code: error_code,
            request_id,
        };

        (status_code, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
