// ABOUTME: Calgate authentication library: bearer credential issuing/validation and Google sign-in
// ABOUTME: Credentials are HS256 JWTs carrying the user id and the Google access token

pub mod credential;
pub mod error;
pub mod oauth;

// Re-export main types
pub use credential::{
    bearer_token, AccessGate, Claims, SigningSecret, TokenIssuer, TokenValidator,
    CREDENTIAL_ALGORITHM, DEFAULT_VALIDITY_HOURS, MAX_VALIDITY_HOURS,
};
pub use error::{AuthError, AuthResult, TokenError, TokenResult};
pub use oauth::{
    AuthorizationRequest, CallbackParams, GoogleEndpoints, GoogleOAuthClient, GoogleOAuthConfig,
    IdentityProvider, OAuthProvider, PkceChallenge, ProviderIdentity,
};
