//! JWT (JSON Web Token) handling
//!
//! Tokens are signed with HMAC-SHA256 and nothing else. The algorithm in the
//! token header is compared against [`JWT_ALGORITHM`] before the signature is
//! looked at, so `alg: none` and algorithm-swapped tokens never get verified
//! against the key.

use chrono::Duration;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::debug;

use crate::error::TokenError;
use crate::maker::{TokenBackend, TokenMaker};
use crate::payload::Payload;

/// Minimum HMAC secret length in bytes
pub const MIN_SECRET_KEY_SIZE: usize = 32;

/// The only accepted signing algorithm
pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token maker producing HS256-signed JWTs
pub struct JwtMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtMaker {
    /// Create a maker from a secret of at least [`MIN_SECRET_KEY_SIZE`] bytes
    ///
    /// Validates ONLY:
    /// - Header algorithm (must be HS256)
    /// - Signature
    /// - Payload expiry, with no leeway
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_KEY_SIZE {
            return Err(TokenError::KeyConfiguration(format!(
                "invalid key size: must be at least {} bytes, got {}",
                MIN_SECRET_KEY_SIZE,
                secret.len()
            )));
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        // Expiry lives in the payload and is checked by Payload::is_valid
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    fn decode_payload(&self, token: &str) -> Result<Payload, TokenError> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "JWT header rejected");
            TokenError::InvalidToken
        })?;

        if header.alg != JWT_ALGORITHM {
            debug!(alg = ?header.alg, "JWT signed with disallowed algorithm");
            return Err(TokenError::InvalidToken);
        }

        let token_data = decode::<Payload>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "JWT rejected");
                TokenError::InvalidToken
            })?;

        Ok(token_data.claims)
    }
}

impl TokenMaker for JwtMaker {
    fn create_token(&self, subject: &str, duration: Duration) -> Result<String, TokenError> {
        let payload = Payload::new(subject, duration)?;

        encode(&Header::new(JWT_ALGORITHM), &payload, &self.encoding_key)
            .map_err(|e| TokenError::Serialization(e.to_string()))
    }

    fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        let payload = self.decode_payload(token)?;
        payload.is_valid()?;

        Ok(payload)
    }

    fn backend(&self) -> TokenBackend {
        TokenBackend::Jwt
    }
}
