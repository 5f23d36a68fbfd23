//! Token errors

use thiserror::Error;

/// Errors raised while building a maker, issuing, or verifying a token
///
/// `InvalidToken` and `ExpiredToken` are kept apart so callers can tell a
/// forged or corrupted token from one that was genuine but is too old.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature, decryption, or structure check failed, or the token
    /// declared a signing algorithm other than the pinned one
    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    /// Expiry would fall outside the representable date range
    #[error("token duration is out of range")]
    DurationOutOfRange,

    /// Key material rejected at maker construction
    #[error("invalid key configuration: {0}")]
    KeyConfiguration(String),

    /// Payload could not be encoded or sealed while issuing a token
    #[error("failed to encode token: {0}")]
    Serialization(String),
}

impl TokenError {
    /// Short machine-readable name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::InvalidToken => "invalid",
            TokenError::ExpiredToken => "expired",
            TokenError::DurationOutOfRange => "duration_out_of_range",
            TokenError::KeyConfiguration(_) => "key_configuration",
            TokenError::Serialization(_) => "serialization",
        }
    }
}
