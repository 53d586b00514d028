// ABOUTME: Identity persistence: record types, the ProfileStore trait, and its SQLite implementation
// ABOUTME: The web layer depends on the trait so persistence can be disabled or stubbed

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageResult;

pub mod storage;
pub mod types;

pub use storage::IdentityStorage;
pub use types::{Identity, NewIdentity};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a new identity or refresh the profile and tokens of an existing one.
    async fn upsert_identity(&self, input: NewIdentity) -> StorageResult<Identity>;

    async fn update_tokens(
        &self,
        google_id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
        token_expiry: DateTime<Utc>,
    ) -> StorageResult<()>;

    async fn get_by_google_id(&self, google_id: &str) -> StorageResult<Option<Identity>>;
}
