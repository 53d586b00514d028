// ABOUTME: Google sign-in: provider names, PKCE, pending state, and the authorization-code client
// ABOUTME: IdentityProvider is the seam the web layer depends on so tests can substitute a stub

use async_trait::async_trait;

use crate::error::AuthResult;

pub mod google;
pub mod pkce;
pub mod provider;
pub mod state;
pub mod types;

pub use google::{GoogleOAuthClient, GoogleOAuthConfig};
pub use pkce::PkceChallenge;
pub use provider::{GoogleEndpoints, OAuthProvider};
pub use state::{PendingAuthorization, PendingAuthorizations, PENDING_TTL_MINUTES};
pub use types::{
    AuthorizationRequest, CallbackParams, GoogleUserInfo, ProviderIdentity, TokenResponse,
};

/// Redirect-based sign-in with an external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> OAuthProvider;

    /// Start a sign-in: remember the pending state and return the consent URL.
    fn begin(&self) -> AuthResult<AuthorizationRequest>;

    /// Finish a sign-in from the provider's redirect parameters.
    async fn complete(&self, params: CallbackParams) -> AuthResult<ProviderIdentity>;
}
