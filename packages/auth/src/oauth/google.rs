// ABOUTME: Google OAuth 2.0 authorization-code flow with PKCE for the web sign-in
// ABOUTME: Builds the consent URL, exchanges the callback code, and fetches the OIDC profile

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

use super::{
    pkce::PkceChallenge,
    provider::{GoogleEndpoints, OAuthProvider},
    state::PendingAuthorizations,
    types::{AuthorizationRequest, CallbackParams, GoogleUserInfo, ProviderIdentity, TokenResponse},
    IdentityProvider,
};
use crate::error::{AuthError, AuthResult};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// OAuth client registration
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .finish_non_exhaustive()
    }
}

/// Error body returned by Google's token endpoint
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct GoogleOAuthClient {
    config: GoogleOAuthConfig,
    endpoints: GoogleEndpoints,
    client: Client,
    pending: PendingAuthorizations,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> AuthResult<Self> {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    pub fn with_endpoints(config: GoogleOAuthConfig, endpoints: GoogleEndpoints) -> AuthResult<Self> {
        if config.client_id.trim().is_empty() {
            return Err(AuthError::Configuration("Google client id is empty".to_string()));
        }
        if config.client_secret.trim().is_empty() {
            return Err(AuthError::Configuration(
                "Google client secret is empty".to_string(),
            ));
        }
        Url::parse(&config.redirect_uri).map_err(|e| {
            AuthError::Configuration(format!("Invalid redirect URI {}: {}", config.redirect_uri, e))
        })?;

        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            endpoints,
            client,
            pending: PendingAuthorizations::new(),
        })
    }

    pub fn pending(&self) -> &PendingAuthorizations {
        &self.pending
    }

    fn build_auth_url(&self, pkce: &PkceChallenge, state: &str) -> AuthResult<String> {
        let scope = OAuthProvider::Google.scopes().join(" ");
        let url = Url::parse_with_params(
            &self.endpoints.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("state", state),
                ("code_challenge", pkce.code_challenge.as_str()),
                ("code_challenge_method", PkceChallenge::METHOD),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AuthError::Configuration(format!("Invalid authorization URL: {}", e)))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> AuthResult<TokenResponse> {
        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(&self.endpoints.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
                ("code_verifier", code_verifier),
            ])
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // Surface only Google's error code, never the raw body
            let reason = response
                .json::<OAuthErrorBody>()
                .await
                .map(|b| match b.error_description {
                    Some(desc) => format!("{}: {}", b.error, desc),
                    None => b.error,
                })
                .unwrap_or_else(|_| "unrecognized error response".to_string());
            error!(status = %status, "Token exchange rejected");
            return Err(AuthError::TokenExchange(format!(
                "Token exchange failed with status {} ({})",
                status, reason
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("Failed to parse token response: {}", e)))
    }

    async fn fetch_user_info(&self, access_token: &str) -> AuthResult<GoogleUserInfo> {
        let response = self
            .client
            .get(&self.endpoints.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::UserInfo(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Userinfo request rejected");
            return Err(AuthError::UserInfo(format!(
                "Userinfo request failed with status {}",
                status
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AuthError::UserInfo(format!("Failed to parse userinfo: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn provider(&self) -> OAuthProvider {
        OAuthProvider::Google
    }

    fn begin(&self) -> AuthResult<AuthorizationRequest> {
        let pkce = PkceChallenge::generate();
        let state = nanoid::nanoid!(32);

        let url = self.build_auth_url(&pkce, &state)?;
        self.pending.insert(state.clone(), pkce.code_verifier);

        info!("Starting Google sign-in");
        Ok(AuthorizationRequest { url, state })
    }

    async fn complete(&self, params: CallbackParams) -> AuthResult<ProviderIdentity> {
        if let Some(err) = params.error {
            let detail = params
                .error_description
                .map(|d| format!("{}: {}", err, d))
                .unwrap_or(err);
            return Err(AuthError::OAuthFailed(detail));
        }

        let state = params
            .state
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::StateMismatch)?;
        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AuthError::OAuthFailed("Authorization code missing".to_string()))?;

        let pending = self.pending.take(&state)?;
        debug!("State validated");

        let tokens = self.exchange_code(&code, &pending.code_verifier).await?;
        let profile = self.fetch_user_info(&tokens.access_token).await?;

        let email = profile.email.unwrap_or_default();
        let name = profile
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.clone());

        info!(user_id = %profile.sub, "Google sign-in completed");

        Ok(ProviderIdentity {
            provider: OAuthProvider::Google.to_string(),
            user_id: profile.sub,
            name,
            email,
            avatar_url: profile.picture,
            expires_at: tokens.expires_at(Utc::now()),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }
}
