// ABOUTME: SQLite implementation of the profile store
// ABOUTME: Upserts keyed on google_id with provider tokens sealed at rest

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use super::{Identity, NewIdentity, ProfileStore};
use crate::encryption::TokenCipher;
use crate::error::{StorageError, StorageResult};

pub struct IdentityStorage {
    pool: SqlitePool,
    cipher: TokenCipher,
}

impl IdentityStorage {
    pub fn new(pool: SqlitePool, cipher: TokenCipher) -> Self {
        Self { pool, cipher }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn seal_optional(&self, value: Option<&str>) -> StorageResult<Option<String>> {
        value
            .filter(|v| !v.is_empty())
            .map(|v| self.cipher.seal(v))
            .transpose()
    }

    fn parse_timestamp(value: &str, column: &str) -> StorageResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StorageError::Database(format!("Invalid {} timestamp", column)))
    }

    fn row_to_identity(&self, row: &SqliteRow) -> StorageResult<Identity> {
        let access_sealed: String = row.try_get("access_token")?;
        let refresh_sealed: Option<String> = row.try_get("refresh_token")?;
        let token_expiry: String = row.try_get("token_expiry")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Identity {
            id: row.try_get("id")?,
            google_id: row.try_get("google_id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            picture: row.try_get("picture")?,
            access_token: self.cipher.open(&access_sealed)?,
            refresh_token: refresh_sealed
                .map(|v| self.cipher.open(&v))
                .transpose()?,
            token_expiry: Self::parse_timestamp(&token_expiry, "token_expiry")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
            updated_at: Self::parse_timestamp(&updated_at, "updated_at")?,
        })
    }
}

#[async_trait]
impl ProfileStore for IdentityStorage {
    async fn upsert_identity(&self, input: NewIdentity) -> StorageResult<Identity> {
        if input.google_id.trim().is_empty() {
            return Err(StorageError::InvalidInput("google_id is empty".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let access_sealed = self.cipher.seal(&input.access_token)?;
        let refresh_sealed = self.seal_optional(input.refresh_token.as_deref())?;

        // Google only returns a refresh token on some consents; keep the old
        // one when the new sign-in didn't carry one.
        sqlx::query(
            r#"
            INSERT INTO identities (
                google_id, email, name, picture, access_token, refresh_token,
                token_expiry, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(google_id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name,
                picture = excluded.picture,
                access_token = excluded.access_token,
                refresh_token = COALESCE(excluded.refresh_token, identities.refresh_token),
                token_expiry = excluded.token_expiry,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&input.google_id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.picture)
        .bind(&access_sealed)
        .bind(&refresh_sealed)
        .bind(input.token_expiry.to_rfc3339())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(google_id = %input.google_id, "Upserted identity");

        self.get_by_google_id(&input.google_id)
            .await?
            .ok_or(StorageError::NotFound(input.google_id))
    }

    async fn update_tokens(
        &self,
        google_id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
        token_expiry: DateTime<Utc>,
    ) -> StorageResult<()> {
        let access_sealed = self.cipher.seal(access_token)?;
        let refresh_sealed = self.seal_optional(refresh_token)?;

        let result = sqlx::query(
            r#"
            UPDATE identities SET
                access_token = ?,
                refresh_token = COALESCE(?, refresh_token),
                token_expiry = ?,
                updated_at = ?
            WHERE google_id = ?
            "#,
        )
        .bind(&access_sealed)
        .bind(&refresh_sealed)
        .bind(token_expiry.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(google_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(google_id.to_string()));
        }

        debug!(google_id = %google_id, "Updated identity tokens");
        Ok(())
    }

    async fn get_by_google_id(&self, google_id: &str) -> StorageResult<Option<Identity>> {
        let row = sqlx::query("SELECT * FROM identities WHERE google_id = ?")
            .bind(google_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| self.row_to_identity(&row)).transpose()
    }
}
