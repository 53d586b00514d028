// ABOUTME: Claim set carried inside a bearer credential
// ABOUTME: Typed struct with required fields checked when a credential is decoded

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TokenError, TokenResult};

/// Claims embedded in every bearer credential.
///
/// ```json
/// { "user_id": "1098…", "access_token": "ya29.…", "iat": 1700000000, "exp": 1700086400 }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Provider-assigned identity of the signed-in user
    #[serde(rename = "user_id")]
    pub subject: String,
    /// Provider access token used to call the calendar API on the user's behalf
    pub access_token: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration time (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn new(
        subject: impl Into<String>,
        access_token: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> TokenResult<Self> {
        let claims = Self {
            subject: subject.into(),
            access_token: access_token.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        claims.ensure_complete()?;
        Ok(claims)
    }

    pub fn provider_access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// True when `now` is at or past the expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    fn ensure_complete(&self) -> TokenResult<()> {
        if self.subject.trim().is_empty() {
            return Err(TokenError::missing_claim("user_id"));
        }
        if self.access_token.trim().is_empty() {
            return Err(TokenError::missing_claim("access_token"));
        }
        Ok(())
    }
}

// The provider token is a live credential; keep it out of logs.
impl std::fmt::Debug for Claims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Claims")
            .field("subject", &self.subject)
            .field("access_token_len", &self.access_token.len())
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Wire shape used while decoding, so an absent field becomes
/// `MissingClaim` instead of a generic JSON error.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

impl TryFrom<RawClaims> for Claims {
    type Error = TokenError;

    fn try_from(raw: RawClaims) -> TokenResult<Self> {
        let subject = raw
            .user_id
            .ok_or_else(|| TokenError::missing_claim("user_id"))?;
        let access_token = raw
            .access_token
            .ok_or_else(|| TokenError::missing_claim("access_token"))?;
        let exp = raw.exp.ok_or_else(|| TokenError::missing_claim("exp"))?;

        let claims = Claims {
            subject,
            access_token,
            iat: raw.iat.unwrap_or_default(),
            exp,
        };
        claims.ensure_complete()?;
        Ok(claims)
    }
}
