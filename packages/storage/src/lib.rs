// ABOUTME: Calgate storage layer: SQLite pool setup, migrations, and the identity profile store
// ABOUTME: Provider tokens are sealed with ChaCha20-Poly1305 before they are written

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

pub mod encryption;
pub mod error;
pub mod identity;

pub use encryption::TokenCipher;
pub use error::{StorageError, StorageResult};
pub use identity::{Identity, IdentityStorage, NewIdentity, ProfileStore};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Open (creating if missing) the SQLite database at `database_url` and apply migrations.
pub async fn connect(database_url: &str) -> StorageResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Profile store ready");
    Ok(pool)
}
