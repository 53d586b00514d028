// ABOUTME: Storage error types for the profile store
// ABOUTME: Wraps sqlx and migration failures alongside token sealing errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to derive encryption key: {0}")]
    KeyDerivation(String),

    #[error("Failed to encrypt data: {0}")]
    Encryption(String),

    #[error("Failed to decrypt data: {0}")]
    Decryption(String),

    #[error("Invalid encrypted data format")]
    InvalidFormat,
}

pub type StorageResult<T> = Result<T, StorageError>;
