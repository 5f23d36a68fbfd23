//! Bearer credential parsing (RFC 6750)
//!
//! # Format
//!
//! ```text
//! Authorization: Bearer <token>
//! ```

use tracing::debug;

use crate::AuthError;

/// Header carrying the credential (matched case-insensitively)
pub const AUTHORIZATION_HEADER_KEY: &str = "authorization";

/// The only accepted scheme, compared after lower-casing
pub const AUTHORIZATION_TYPE_BEARER: &str = "bearer";

/// Extract the token from an `Authorization` header value
///
/// The value is split on whitespace; the first field is the scheme and the
/// second the token. Extra fields are ignored.
///
/// # Errors
/// - [`AuthError::MissingCredential`] if there is no header or it is blank
/// - [`AuthError::MalformedCredential`] if there are fewer than two fields
/// - [`AuthError::UnsupportedScheme`] if the scheme is not `bearer`
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => {
            debug!("Bearer auth: no Authorization header");
            return Err(AuthError::MissingCredential);
        }
    };

    let mut fields = header.split_whitespace();
    let (scheme, token) = match (fields.next(), fields.next()) {
        (Some(scheme), Some(token)) => (scheme, token),
        _ => {
            debug!("Bearer auth: could not split scheme and token");
            return Err(AuthError::MalformedCredential);
        }
    };

    if scheme.to_lowercase() != AUTHORIZATION_TYPE_BEARER {
        debug!(scheme = %scheme, "Bearer auth: unsupported scheme");
        return Err(AuthError::UnsupportedScheme(scheme.to_string()));
    }

    Ok(token)
}

/// Find the `Authorization` value in a list of (name, value) pairs
pub fn find_authorization_header(headers: &[(String, String)]) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(AUTHORIZATION_HEADER_KEY))
        .map(|(_, value)| value.as_str())
}
