// ABOUTME: Router-level tests with stubbed identity provider, calendar, and profile store
// ABOUTME: Shared fixtures live here; each *_tests module covers one area of the HTTP surface

mod api_tests;
mod meetings_tests;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Response};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;

use calgate_auth::{
    AccessGate, AuthError, AuthResult, AuthorizationRequest, CallbackParams, IdentityProvider,
    OAuthProvider, ProviderIdentity, SigningSecret, TokenIssuer, TokenValidator,
};
use calgate_calendar::{CalendarError, CalendarGateway, CalendarResult, CreatedEvent, Event, NewEvent};
use calgate_storage::{Identity, NewIdentity, ProfileStore, StorageError, StorageResult};

use crate::state::AppState;

pub const TEST_SECRET: &str = "test-signing-secret-that-is-long-enough";
pub const STUB_CONSENT_URL: &str = "https://accounts.example.test/consent?state=stub-state";

pub fn secret() -> SigningSecret {
    SigningSecret::new(TEST_SECRET).unwrap()
}

pub fn issue_credential(user_id: &str, access_token: &str) -> String {
    TokenIssuer::new(&secret()).issue(user_id, access_token).unwrap()
}

pub fn sample_identity() -> ProviderIdentity {
    ProviderIdentity {
        provider: "google".to_string(),
        user_id: "u1".to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        avatar_url: None,
        access_token: "ptok-A".to_string(),
        refresh_token: Some("1//refresh".to_string()),
        expires_at: None,
    }
}

type Outcome = Box<dyn Fn() -> AuthResult<ProviderIdentity> + Send + Sync>;

/// Identity provider that skips the network and returns a canned outcome.
pub struct StubIdentityProvider {
    outcome: Outcome,
    pub completed: Mutex<Vec<CallbackParams>>,
}

impl StubIdentityProvider {
    pub fn succeeding() -> Self {
        Self::with_outcome(|| Ok(sample_identity()))
    }

    pub fn with_outcome<F>(outcome: F) -> Self
    where
        F: Fn() -> AuthResult<ProviderIdentity> + Send + Sync + 'static,
    {
        Self {
            outcome: Box::new(outcome),
            completed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    fn provider(&self) -> OAuthProvider {
        OAuthProvider::Google
    }

    fn begin(&self) -> AuthResult<AuthorizationRequest> {
        Ok(AuthorizationRequest {
            url: STUB_CONSENT_URL.to_string(),
            state: "stub-state".to_string(),
        })
    }

    async fn complete(&self, params: CallbackParams) -> AuthResult<ProviderIdentity> {
        if let Some(err) = params.error.clone() {
            return Err(AuthError::OAuthFailed(err));
        }
        self.completed.lock().unwrap().push(params);
        (self.outcome)()
    }
}

/// Calendar gateway that records the access token of every call.
#[derive(Default)]
pub struct StubCalendar {
    pub events: Vec<Event>,
    pub upstream_error: Option<(u16, String)>,
    pub seen_tokens: Mutex<Vec<String>>,
    pub created: Mutex<Vec<NewEvent>>,
    pub listed_ranges: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl StubCalendar {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            upstream_error: Some((status, message.to_string())),
            ..Default::default()
        }
    }

    fn check(&self, access_token: &str) -> CalendarResult<()> {
        self.seen_tokens.lock().unwrap().push(access_token.to_string());
        match &self.upstream_error {
            Some((status, message)) => Err(CalendarError::upstream(*status, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarGateway for StubCalendar {
    async fn list_upcoming(
        &self,
        access_token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CalendarResult<Vec<Event>> {
        self.check(access_token)?;
        self.listed_ranges.lock().unwrap().push((from, to));
        Ok(self.events.clone())
    }

    async fn create_event(
        &self,
        access_token: &str,
        event: NewEvent,
    ) -> CalendarResult<CreatedEvent> {
        self.check(access_token)?;
        self.created.lock().unwrap().push(event);
        Ok(CreatedEvent {
            id: "evt-123".to_string(),
            link: "https://calendar.google.com/event?eid=evt-123".to_string(),
        })
    }
}

/// Profile store that keeps upserts in memory.
#[derive(Default)]
pub struct RecordingProfiles {
    pub saved: Mutex<Vec<NewIdentity>>,
}

#[async_trait]
impl ProfileStore for RecordingProfiles {
    async fn upsert_identity(&self, input: NewIdentity) -> StorageResult<Identity> {
        let now = Utc::now();
        let identity = Identity {
            id: 1,
            google_id: input.google_id.clone(),
            email: input.email.clone(),
            name: input.name.clone(),
            picture: input.picture.clone(),
            access_token: input.access_token.clone(),
            refresh_token: input.refresh_token.clone(),
            token_expiry: input.token_expiry,
            created_at: now,
            updated_at: now,
        };
        self.saved.lock().unwrap().push(input);
        Ok(identity)
    }

    async fn update_tokens(
        &self,
        google_id: &str,
        _access_token: &str,
        _refresh_token: Option<&str>,
        _token_expiry: DateTime<Utc>,
    ) -> StorageResult<()> {
        Err(StorageError::NotFound(google_id.to_string()))
    }

    async fn get_by_google_id(&self, _google_id: &str) -> StorageResult<Option<Identity>> {
        Ok(None)
    }
}

/// Profile store whose every call fails.
pub struct FailingProfiles;

#[async_trait]
impl ProfileStore for FailingProfiles {
    async fn upsert_identity(&self, _input: NewIdentity) -> StorageResult<Identity> {
        Err(StorageError::Database("disk I/O error".to_string()))
    }

    async fn update_tokens(
        &self,
        _google_id: &str,
        _access_token: &str,
        _refresh_token: Option<&str>,
        _token_expiry: DateTime<Utc>,
    ) -> StorageResult<()> {
        Err(StorageError::Database("disk I/O error".to_string()))
    }

    async fn get_by_google_id(&self, _google_id: &str) -> StorageResult<Option<Identity>> {
        Err(StorageError::Database("disk I/O error".to_string()))
    }
}

pub fn state_with(
    identity_provider: Arc<dyn IdentityProvider>,
    calendar: Arc<dyn CalendarGateway>,
) -> AppState {
    let secret = secret();
    AppState::new(
        TokenIssuer::new(&secret),
        AccessGate::new(TokenValidator::new(&secret)),
        identity_provider,
        calendar,
    )
}

pub fn test_state() -> AppState {
    state_with(
        Arc::new(StubIdentityProvider::succeeding()),
        Arc::new(StubCalendar::default()),
    )
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
