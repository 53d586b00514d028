// ABOUTME: Shared application state handed to every handler
// ABOUTME: Holds the credential issuer/gate and the provider, profile, and calendar seams

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use tracing::{info, warn};

use calgate_auth::{
    AccessGate, GoogleOAuthClient, GoogleOAuthConfig, IdentityProvider, TokenIssuer,
    TokenValidator,
};
use calgate_calendar::{CalendarGateway, GoogleCalendarClient};
use calgate_storage::{IdentityStorage, ProfileStore, TokenCipher};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub gate: Arc<AccessGate>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub calendar: Arc<dyn CalendarGateway>,
    /// `None` when persistence is disabled
    pub profiles: Option<Arc<dyn ProfileStore>>,
    pub upcoming_window: Duration,
}

impl AppState {
    pub fn new(
        issuer: TokenIssuer,
        gate: AccessGate,
        identity_provider: Arc<dyn IdentityProvider>,
        calendar: Arc<dyn CalendarGateway>,
    ) -> Self {
        Self {
            issuer: Arc::new(issuer),
            gate: Arc::new(gate),
            identity_provider,
            calendar,
            profiles: None,
            upcoming_window: Duration::days(7),
        }
    }

    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn with_upcoming_window(mut self, window: Duration) -> Self {
        self.upcoming_window = window;
        self
    }

    /// Wire up the production collaborators described by `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let issuer = TokenIssuer::new(&config.signing_secret)
            .with_validity(Duration::hours(config.credential_ttl_hours))?;
        let gate = AccessGate::new(TokenValidator::new(&config.signing_secret));

        let identity_provider = GoogleOAuthClient::new(GoogleOAuthConfig {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.oauth_redirect_url.clone(),
        })?;
        let calendar = GoogleCalendarClient::new(config.calendar_time_zone.clone())?;

        let mut state = Self::new(issuer, gate, Arc::new(identity_provider), Arc::new(calendar))
            .with_upcoming_window(Duration::days(config.upcoming_window_days));

        match &config.database_url {
            Some(url) => {
                let pool = calgate_storage::connect(url)
                    .await
                    .context("Failed to open profile database")?;
                let cipher = TokenCipher::derive(config.token_key_material())?;
                state = state.with_profiles(Arc::new(IdentityStorage::new(pool, cipher)));
                info!("Profile persistence enabled");
            }
            None => warn!("DB_URL not set; user profiles will not be persisted"),
        }

        Ok(state)
    }
}
