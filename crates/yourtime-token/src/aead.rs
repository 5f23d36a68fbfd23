//! Sealed tokens: the JSON payload encrypted with AES-256-GCM
//!
//! # Format
//!
//! ```text
//! v1.local.<base64url(nonce || ciphertext || tag)>
//! ```
//!
//! The `v1.local.` header is bound to the ciphertext as associated data, and
//! every token uses a fresh random 96-bit nonce.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload as AeadPayload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use tracing::debug;

use crate::error::TokenError;
use crate::maker::{TokenBackend, TokenMaker};
use crate::payload::Payload;

/// Required key size in bytes
pub const KEY_SIZE: usize = 32;

/// AES-GCM nonce size in bytes
pub const NONCE_SIZE: usize = 12;

/// Token header, also used as associated data
pub const TOKEN_HEADER: &str = "v1.local.";

/// Token maker backed by AES-256-GCM
pub struct AeadMaker {
    cipher: Aes256Gcm,
}

impl AeadMaker {
    /// Create a maker from a key of exactly [`KEY_SIZE`] bytes
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        if key.len() != KEY_SIZE {
            return Err(TokenError::KeyConfiguration(format!(
                "invalid key size: must be exactly {} bytes, got {}",
                KEY_SIZE,
                key.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| TokenError::KeyConfiguration(e.to_string()))?;

        Ok(Self { cipher })
    }

    fn seal(&self, plaintext: &[u8]) -> Result<String, TokenError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                AeadPayload {
                    msg: plaintext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|e| TokenError::Serialization(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(format!("{}{}", TOKEN_HEADER, URL_SAFE_NO_PAD.encode(sealed)))
    }

    fn open(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let body = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or(TokenError::InvalidToken)?;

        let sealed = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| TokenError::InvalidToken)?;

        if sealed.len() <= NONCE_SIZE {
            return Err(TokenError::InvalidToken);
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);

        self.cipher
            .decrypt(
                Nonce::from_slice(nonce),
                AeadPayload {
                    msg: ciphertext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::InvalidToken)
    }
}

impl TokenMaker for AeadMaker {
    fn create_token(&self, subject: &str, duration: Duration) -> Result<String, TokenError> {
        let payload = Payload::new(subject, duration)?;
        let plaintext =
            serde_json::to_vec(&payload).map_err(|e| TokenError::Serialization(e.to_string()))?;

        self.seal(&plaintext)
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let plaintext = self.open(token).inspect_err(|e| {
            debug!(kind = e.kind(), "sealed token rejected");
        })?;

        let payload: Payload = serde_json::from_slice(&plaintext).map_err(|_| {
            debug!("sealed token decrypted but payload is malformed");
            TokenError::InvalidToken
        })?;

        payload.is_valid()?;

        Ok(payload)
    }

    fn backend(&self) -> TokenBackend {
        TokenBackend::Aead
    }
}
