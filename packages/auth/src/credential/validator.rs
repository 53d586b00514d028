// ABOUTME: Verifies bearer credentials against the signing secret and the clock
// ABOUTME: Enforces a single-algorithm allow-list, MAC check, required claims, and expiry

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use tracing::debug;

use super::{
    claims::{Claims, RawClaims},
    secret::SigningSecret,
    CREDENTIAL_ALGORITHM,
};
use crate::error::{TokenError, TokenResult};

/// Validates bearer credentials.
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &SigningSecret) -> Self {
        // Validation::new pins the accepted algorithms to exactly this one
        let mut validation = Validation::new(CREDENTIAL_ALGORITHM);
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);
        // Expiry is checked against our own clock below so the boundary is
        // strict (now < exp) and tests can pin the time.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            key: secret.decoding_key(),
            validation,
        }
    }

    /// Validate a credential at the current time.
    pub fn validate(&self, credential: &str) -> TokenResult<Claims> {
        self.validate_at(credential, Utc::now())
    }

    /// Validate a credential as of `now`.
    pub fn validate_at(&self, credential: &str, now: DateTime<Utc>) -> TokenResult<Claims> {
        debug!(token_len = credential.len(), "Validating bearer credential");

        let credential = credential.trim();
        if credential.is_empty() {
            return Err(TokenError::malformed("empty credential"));
        }

        let data = jsonwebtoken::decode::<RawClaims>(credential, &self.key, &self.validation)?;
        let claims = Claims::try_from(data.claims)?;

        if claims.is_expired_at(now) {
            debug!(user_id = %claims.subject, exp = claims.exp, "Credential expired");
            return Err(TokenError::Expired);
        }

        debug!(user_id = %claims.subject, "Credential validated");
        Ok(claims)
    }
}
