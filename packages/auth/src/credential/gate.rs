// ABOUTME: Request-level access gate for bearer credentials
// ABOUTME: Extracts "Authorization: Bearer <token>", validates it, and attaches claims to the request

use http::{header::AUTHORIZATION, HeaderMap, Request};
use tracing::{debug, warn};

use super::{claims::Claims, validator::TokenValidator};
use crate::error::{TokenError, TokenResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the credential out of an `Authorization` header.
///
/// A header that is absent, not valid ASCII, not a Bearer scheme, or carries
/// an empty token counts as missing.
pub fn bearer_token(headers: &HeaderMap) -> TokenResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(TokenError::MissingAuthHeader)?;

    let scheme_len = BEARER_PREFIX.len();
    if value.len() < scheme_len || !value[..scheme_len].eq_ignore_ascii_case(BEARER_PREFIX) {
        return Err(TokenError::MissingAuthHeader);
    }

    let token = value[scheme_len..].trim();
    if token.is_empty() {
        return Err(TokenError::MissingAuthHeader);
    }
    Ok(token)
}

/// Validates the bearer credential on incoming requests.
#[derive(Clone)]
pub struct AccessGate {
    validator: TokenValidator,
}

impl AccessGate {
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    /// Check the headers of a request and return the verified claim set.
    pub fn check(&self, headers: &HeaderMap) -> TokenResult<Claims> {
        let token = bearer_token(headers)?;
        self.validator.validate(token).map_err(|e| {
            warn!(error = %e, "Rejected bearer credential");
            e
        })
    }

    /// Validate the request's credential and attach the claims to its
    /// extensions. On error the request is consumed and must not proceed.
    pub fn authorize<B>(&self, mut request: Request<B>) -> TokenResult<Request<B>> {
        let claims = self.check(request.headers())?;
        debug!(user_id = %claims.subject, "Request authorized");
        request.extensions_mut().insert(claims);
        Ok(request)
    }
}
