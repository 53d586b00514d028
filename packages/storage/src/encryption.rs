// ABOUTME: Provider token sealing using ChaCha20-Poly1305 AEAD
// ABOUTME: Key is derived with HKDF-SHA256 from configured key material

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ring::{
    aead::{self, Aad, LessSafeKey, Nonce, UnboundKey},
    hkdf,
    rand::{SecureRandom, SystemRandom},
};

use crate::error::{StorageError, StorageResult};

/// Salt for key derivation (constant, not secret)
const KEY_SALT: &[u8] = b"calgate-token-sealing-v1";
const KEY_INFO: &[u8] = b"provider-token-encryption";

/// Nonce size for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

/// Seals provider tokens before they reach the database.
///
/// Output is base64 of `nonce || ciphertext || tag`.
#[derive(Clone)]
pub struct TokenCipher {
    rng: Arc<SystemRandom>,
    key: Arc<LessSafeKey>,
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenCipher(<redacted>)")
    }
}

impl TokenCipher {
    /// Derive a 256-bit sealing key from arbitrary key material.
    pub fn derive(key_material: &[u8]) -> StorageResult<Self> {
        if key_material.is_empty() {
            return Err(StorageError::KeyDerivation(
                "key material is empty".to_string(),
            ));
        }

        let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, KEY_SALT);
        let prk = salt.extract(key_material);

        let mut key_bytes = [0u8; 32];
        prk.expand(&[KEY_INFO], hkdf::HKDF_SHA256)
            .map_err(|_| StorageError::KeyDerivation("HKDF expansion failed".to_string()))?
            .fill(&mut key_bytes)
            .map_err(|_| StorageError::KeyDerivation("Key fill failed".to_string()))?;

        let unbound = UnboundKey::new(&aead::CHACHA20_POLY1305, &key_bytes)
            .map_err(|_| StorageError::KeyDerivation("Invalid key length".to_string()))?;

        Ok(Self {
            rng: Arc::new(SystemRandom::new()),
            key: Arc::new(LessSafeKey::new(unbound)),
        })
    }

    pub fn seal(&self, plaintext: &str) -> StorageResult<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| StorageError::Encryption("Failed to generate nonce".to_string()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| StorageError::Encryption("Seal operation failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);

        Ok(BASE64.encode(&sealed))
    }

    pub fn open(&self, sealed: &str) -> StorageResult<String> {
        if sealed.is_empty() {
            return Ok(String::new());
        }

        let data = BASE64
            .decode(sealed)
            .map_err(|_| StorageError::InvalidFormat)?;
        if data.len() < NONCE_SIZE + aead::CHACHA20_POLY1305.tag_len() {
            return Err(StorageError::InvalidFormat);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| StorageError::InvalidFormat)?;

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| StorageError::Decryption("Open operation failed".to_string()))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| StorageError::Decryption("Invalid UTF-8 in decrypted data".to_string()))
    }
}
