// ABOUTME: Process-wide signing secret for bearer credentials
// ABOUTME: Validated once at startup and shared read-only by issuer and validator

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{TokenError, TokenResult};

/// Secrets shorter than this still work but are flagged at startup
const RECOMMENDED_MIN_LEN: usize = 32;

/// Symmetric key used to sign and verify bearer credentials.
///
/// Cloning is cheap and every clone refers to the same bytes, so an issuer
/// and a validator built from one `SigningSecret` always agree.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Arc<Zeroizing<Vec<u8>>>,
}

impl SigningSecret {
    /// Build a secret from raw bytes. Empty input is a configuration error.
    pub fn new(secret: impl Into<Vec<u8>>) -> TokenResult<Self> {
        let bytes = secret.into();
        if bytes.is_empty() {
            return Err(TokenError::Config("signing secret is empty".to_string()));
        }
        if bytes.len() < RECOMMENDED_MIN_LEN {
            warn!(
                secret_len = bytes.len(),
                "Signing secret is shorter than {} bytes", RECOMMENDED_MIN_LEN
            );
        }
        Ok(Self {
            bytes: Arc::new(Zeroizing::new(bytes)),
        })
    }

    /// Read the secret from an environment variable.
    pub fn from_env(var: &str) -> TokenResult<Self> {
        match std::env::var(var) {
            Ok(value) => Self::new(value),
            Err(_) => Err(TokenError::Config(format!("{} is not set", var))),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.as_bytes())
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.as_bytes())
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
