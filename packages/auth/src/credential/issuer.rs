// ABOUTME: Mints HS256 bearer credentials binding a user to a provider access token
// ABOUTME: Stateless; the only input besides the call arguments is the injected signing secret

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tracing::debug;

use super::{claims::Claims, secret::SigningSecret, CREDENTIAL_ALGORITHM};
use crate::error::{TokenError, TokenResult};

/// Default lifetime of a freshly issued credential
pub const DEFAULT_VALIDITY_HOURS: i64 = 24;

/// Longest validity window accepted by `with_validity` (one year)
pub const MAX_VALIDITY_HOURS: i64 = 8760;

/// Issues bearer credentials.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    validity: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            key: secret.encoding_key(),
            validity: Duration::hours(DEFAULT_VALIDITY_HOURS),
        }
    }

    /// Override the validity window (positive, at most `MAX_VALIDITY_HOURS`)
    pub fn with_validity(mut self, validity: Duration) -> TokenResult<Self> {
        if validity <= Duration::zero() {
            return Err(TokenError::Config(format!(
                "credential validity must be positive, got {}s",
                validity.num_seconds()
            )));
        }
        if validity > Duration::hours(MAX_VALIDITY_HOURS) {
            return Err(TokenError::Config(format!(
                "credential validity must be at most {} hours, got {}",
                MAX_VALIDITY_HOURS,
                validity.num_hours()
            )));
        }
        self.validity = validity;
        Ok(self)
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Mint a credential valid from now until now + the validity window.
    pub fn issue(&self, subject_id: &str, provider_access_token: &str) -> TokenResult<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.validity)
            .ok_or_else(|| TokenError::Config("credential expiry is out of range".to_string()))?;
        self.issue_until(subject_id, provider_access_token, now, expires_at)
    }

    /// Mint a credential with an explicit expiry instant.
    pub fn issue_until(
        &self,
        subject_id: &str,
        provider_access_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> TokenResult<String> {
        let claims = Claims::new(subject_id, provider_access_token, issued_at, expires_at)?;
        let header = Header::new(CREDENTIAL_ALGORITHM);
        debug_assert_eq!(header.alg, Algorithm::HS256);

        let token = jsonwebtoken::encode(&header, &claims, &self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        debug!(
            user_id = %claims.subject,
            exp = claims.exp,
            "Issued bearer credential"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SigningSecret::new("issuer-test-secret-0123456789abcdef").unwrap())
    }

    #[test]
    fn test_issue_produces_compact_jws() {
        let token = issuer().issue("u1", "ptok").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_issue_rejects_empty_inputs() {
        assert_eq!(
            issuer().issue("", "ptok").unwrap_err(),
            TokenError::missing_claim("user_id")
        );
        assert_eq!(
            issuer().issue("u1", "").unwrap_err(),
            TokenError::missing_claim("access_token")
        );
    }

    #[test]
    fn test_header_names_hs256() {
        let token = issuer().issue("u1", "ptok").unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_with_validity_rejects_non_positive() {
        assert!(issuer().with_validity(Duration::zero()).is_err());
        assert!(issuer().with_validity(Duration::hours(-1)).is_err());
        let custom = issuer().with_validity(Duration::hours(2)).unwrap();
        assert_eq!(custom.validity(), Duration::hours(2));
    }

    #[test]
    fn test_with_validity_rejects_windows_over_a_year() {
        assert!(issuer()
            .with_validity(Duration::hours(MAX_VALIDITY_HOURS))
            .is_ok());
        assert!(matches!(
            issuer().with_validity(Duration::hours(MAX_VALIDITY_HOURS + 1)),
            Err(TokenError::Config(_))
        ));
        assert!(matches!(
            issuer().with_validity(Duration::days(100_000_000)),
            Err(TokenError::Config(_))
        ));
    }

    #[test]
    fn test_longest_window_still_issues() {
        let token = issuer()
            .with_validity(Duration::hours(MAX_VALIDITY_HOURS))
            .unwrap()
            .issue("u1", "ptok")
            .unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_default_validity_is_one_day() {
        assert_eq!(issuer().validity(), Duration::hours(24));
    }
}
