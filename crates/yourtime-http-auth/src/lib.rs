//! Bearer token authentication for yourtime HTTP APIs
//!
//! Every request passes through the same gate:
//!
//! 1. No `Authorization` header: rejected (`MissingCredential`)
//! 2. Fewer than two fields: rejected (`MalformedCredential`)
//! 3. Scheme other than `bearer`: rejected (`UnsupportedScheme`)
//! 4. Token handed to the configured [`TokenMaker`]; its error is the
//!    rejection reason
//! 5. On success the decoded [`Payload`] is made available downstream
//!
//! Rejections are HTTP 401 with a JSON body `{"error": "..."}`.
//!
//! # Usage
//!
//! ```ignore
//! use axum::{middleware, routing::get, Extension, Router};
//! use yourtime_http_auth::{require_auth, TokenAuthState};
//! use yourtime_token::Payload;
//!
//! async fn me(Extension(payload): Extension<Payload>) -> String {
//!     payload.subject
//! }
//!
//! let state = Arc::new(TokenAuthState::new(maker));
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(middleware::from_fn_with_state(state, require_auth));
//! ```

mod bearer;
mod middleware;

pub use bearer::{
    extract_bearer_token, find_authorization_header, AUTHORIZATION_HEADER_KEY,
    AUTHORIZATION_TYPE_BEARER,
};
pub use middleware::{require_auth, ErrorResponse, TokenAuthState};

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use yourtime_token::{Payload, TokenError, TokenMaker};

/// Reasons a request is refused by the gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header is not provided")]
    MissingCredential,

    #[error("invalid authorization header format")]
    MalformedCredential,

    #[error("unsupported authorization type {0}")]
    UnsupportedScheme(String),

    /// The maker refused the token (invalid or expired)
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Gate decision for one request
#[derive(Debug, Clone)]
pub enum AuthResult {
    /// Credential verified; carries the decoded payload
    Authenticated(Payload),
    /// Request must be rejected with 401
    Unauthorized(AuthError),
}

impl AuthResult {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthResult::Authenticated(_))
    }
}

/// Verifies bearer credentials with a single token maker
///
/// Cheap to clone; the maker is shared.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    maker: Arc<dyn TokenMaker>,
}

impl BearerTokenAuthenticator {
    pub fn new(maker: Arc<dyn TokenMaker>) -> Self {
        Self { maker }
    }

    /// Run the gate on a raw `Authorization` header value
    pub fn authorize(&self, header: Option<&str>) -> Result<Payload, AuthError> {
        let token = extract_bearer_token(header)?;

        let payload = self.maker.verify_token(token).inspect_err(|e| {
            debug!(
                backend = %self.maker.backend(),
                kind = e.kind(),
                "Bearer auth: token rejected"
            );
        })?;

        debug!(token_id = %payload.id, "Bearer auth: valid token");
        Ok(payload)
    }

    /// Run the gate on a list of (header_name, header_value) pairs
    pub fn authenticate(&self, headers: &[(String, String)]) -> AuthResult {
        match self.authorize(find_authorization_header(headers)) {
            Ok(payload) => AuthResult::Authenticated(payload),
            Err(e) => AuthResult::Unauthorized(e),
        }
    }

    pub fn maker(&self) -> &Arc<dyn TokenMaker> {
        &self.maker
    }
}
