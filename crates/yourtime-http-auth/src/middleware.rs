//! Axum middleware for the bearer gate
//!
//! Validates the `Authorization` header of every request and inserts the
//! decoded [`Payload`] into the request extensions, where handlers pick it up
//! with `Extension<Payload>`.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use yourtime_token::TokenMaker;

use crate::{AuthError, BearerTokenAuthenticator};

/// JSON body of a 401 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Gate state shared across middleware instances
#[derive(Clone)]
pub struct TokenAuthState {
    pub authenticator: BearerTokenAuthenticator,
}

impl TokenAuthState {
    pub fn new(maker: Arc<dyn TokenMaker>) -> Self {
        Self {
            authenticator: BearerTokenAuthenticator::new(maker),
        }
    }
}

/// Authentication middleware
///
/// # Errors
/// Returns 401 Unauthorized, without calling the inner handler, if:
/// - The Authorization header is missing or not valid UTF-8
/// - The header is not of the form `Bearer <token>`
/// - The token is invalid or expired
pub async fn require_auth(
    State(state): State<Arc<TokenAuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedCredential)?),
        None => None,
    };

    let payload = state.authenticator.authorize(header)?;

    request.extensions_mut().insert(payload);

    Ok(next.run(request).await)
}
