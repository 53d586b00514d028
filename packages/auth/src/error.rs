// ABOUTME: Error types for bearer credentials and the Google OAuth flow
// ABOUTME: TokenError covers issuing/validating credentials, AuthError covers provider interaction

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;
pub type TokenResult<T> = Result<T, TokenError>;

/// Failures while minting or checking a bearer credential.
///
/// Every variant except `Config` means the caller presented something we
/// refuse to trust, and maps to HTTP 401 at the edge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret is not configured: {0}")]
    Config(String),

    #[error("Authorization header missing")]
    MissingAuthHeader,

    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    #[error("Credential signature mismatch")]
    SignatureMismatch,

    #[error("Credential expired")]
    Expired,

    #[error("Missing claim: {0}")]
    MissingClaim(String),

    #[error("Failed to sign credential: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn missing_claim(name: impl Into<String>) -> Self {
        Self::MissingClaim(name.into())
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCredential(reason.into())
    }

    /// Machine-readable code used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::MissingAuthHeader => "MISSING_AUTH_HEADER",
            Self::MalformedCredential(_) => "MALFORMED_CREDENTIAL",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::Expired => "CREDENTIAL_EXPIRED",
            Self::MissingClaim(_) => "MISSING_CLAIM",
            Self::Signing(_) => "SIGNING_ERROR",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            // Only HS256 is on the allow-list, so a header naming anything
            // else can never carry a signature we accept.
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::SignatureMismatch
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim(claim.clone()),
            ErrorKind::InvalidToken => TokenError::malformed("invalid JWT structure"),
            ErrorKind::Base64(e) => TokenError::malformed(format!("invalid base64: {}", e)),
            ErrorKind::Json(e) => TokenError::malformed(format!("invalid claim set: {}", e)),
            ErrorKind::Utf8(e) => TokenError::malformed(format!("invalid utf-8: {}", e)),
            _ => TokenError::malformed(format!("JWT error: {}", err)),
        }
    }
}

/// Failures while talking to the identity provider.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("OAuth authentication failed: {0}")]
    OAuthFailed(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    #[error("State mismatch: CSRF protection failed")]
    StateMismatch,

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to fetch user profile: {0}")]
    UserInfo(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
