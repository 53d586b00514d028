// ABOUTME: Identity record types for signed-in Google users
// ABOUTME: Provider tokens are never serialized

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored identity with its provider tokens opened
#[derive(Clone, Serialize)]
pub struct Identity {
    pub id: i64,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing)]
    pub token_expiry: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("google_id", &self.google_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Input for `upsert_identity`
#[derive(Clone)]
pub struct NewIdentity {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expiry: DateTime<Utc>,
}

impl std::fmt::Debug for NewIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewIdentity")
            .field("google_id", &self.google_id)
            .field("email", &self.email)
            .field("token_expiry", &self.token_expiry)
            .finish_non_exhaustive()
    }
}
