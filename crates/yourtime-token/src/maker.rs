//! Token maker contract and backend selection

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::aead::AeadMaker;
use crate::error::TokenError;
use crate::jwt::JwtMaker;
use crate::payload::Payload;

/// Issues and verifies access tokens with a single symmetric key
///
/// Implementations hold no per-call state, so one instance can be shared
/// across every request handler.
pub trait TokenMaker: Send + Sync {
    /// Create a token for `subject` that expires after `duration`
    fn create_token(&self, subject: &str, duration: Duration) -> Result<String, TokenError>;

    /// Verify a token and return its payload
    ///
    /// # Errors
    /// - [`TokenError::InvalidToken`] if the token is corrupted, forged,
    ///   sealed with another key, or otherwise undecodable
    /// - [`TokenError::ExpiredToken`] if the token is genuine but expired
    fn verify_token(&self, token: &str) -> Result<Payload, TokenError>;

    /// Backend name (for logging)
    fn backend(&self) -> TokenBackend;
}

/// Available token backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// AES-256-GCM sealed payload
    Aead,
    /// HS256-signed JWT
    Jwt,
}

impl fmt::Display for TokenBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenBackend::Aead => write!(f, "aead"),
            TokenBackend::Jwt => write!(f, "jwt"),
        }
    }
}

impl FromStr for TokenBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aead" => Ok(TokenBackend::Aead),
            "jwt" => Ok(TokenBackend::Jwt),
            other => Err(format!(
                "unknown token backend '{}', expected 'aead' or 'jwt'",
                other
            )),
        }
    }
}

/// Build the maker for the configured backend
///
/// Fails with [`TokenError::KeyConfiguration`] when the key does not fit the
/// backend; callers should treat that as a startup failure.
pub fn build_maker(backend: TokenBackend, key: &[u8]) -> Result<Arc<dyn TokenMaker>, TokenError> {
    let maker: Arc<dyn TokenMaker> = match backend {
        TokenBackend::Aead => Arc::new(AeadMaker::new(key)?),
        TokenBackend::Jwt => Arc::new(JwtMaker::new(key)?),
    };

    Ok(maker)
}
