//! Token payload (the claim set carried by every token)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;

/// Decoded claims of an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payload {
    /// Unique token ID, random per issued token
    pub id: Uuid,
    /// Principal the token speaks for (usually the user's email)
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Payload {
    /// Create a payload valid for `duration` from now
    ///
    /// A zero or negative duration is accepted; such a payload is already
    /// expired and fails [`Payload::is_valid`]. A duration that pushes the
    /// expiry past the representable date range is
    /// [`TokenError::DurationOutOfRange`].
    pub fn new(subject: impl Into<String>, duration: Duration) -> Result<Self, TokenError> {
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(duration)
            .ok_or(TokenError::DurationOutOfRange)?;

        Ok(Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            issued_at,
            expires_at,
        })
    }

    /// Check the payload against the current clock
    ///
    /// No leeway is applied: one instant past `expires_at` is expired.
    pub fn is_valid(&self) -> Result<(), TokenError> {
        if Utc::now() > self.expires_at {
            return Err(TokenError::ExpiredToken);
        }

        Ok(())
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self) -> Duration {
        let left = self.expires_at - Utc::now();
        if left < Duration::zero() {
            Duration::zero()
        } else {
            left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_payload() {
        let before = Utc::now();
        let payload = Payload::new("ana@example.com", Duration::minutes(1)).unwrap();

        assert_eq!(payload.subject, "ana@example.com");
        assert!(!payload.id.is_nil());
        assert!(payload.issued_at >= before);
        assert_eq!(payload.expires_at - payload.issued_at, Duration::minutes(1));
        assert!(payload.is_valid().is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Payload::new("ana@example.com", Duration::minutes(1)).unwrap();
        let b = Payload::new("ana@example.com", Duration::minutes(1)).unwrap();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_negative_duration_is_expired() {
        let payload = Payload::new("ana@example.com", -Duration::minutes(1)).unwrap();

        assert_eq!(payload.is_valid(), Err(TokenError::ExpiredToken));
        assert_eq!(payload.remaining(), Duration::zero());
    }

    #[test]
    fn test_out_of_range_duration() {
        assert_eq!(
            Payload::new("ana@example.com", Duration::days(100_000_000)),
            Err(TokenError::DurationOutOfRange)
        );
        assert_eq!(
            Payload::new("ana@example.com", -Duration::days(100_000_000)),
            Err(TokenError::DurationOutOfRange)
        );
    }

    #[test]
    fn test_remaining_is_bounded_by_duration() {
        let payload = Payload::new("ana@example.com", Duration::hours(1)).unwrap();
        let remaining = payload.remaining();

        assert!(remaining <= Duration::hours(1));
        assert!(remaining > Duration::minutes(59));
    }

    #[test]
    fn test_json_field_names() {
        let payload = Payload::new("ana@example.com", Duration::minutes(1)).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("id").is_some());
        assert_eq!(json["subject"], "ana@example.com");
        assert!(json.get("issued_at").is_some());
        assert!(json.get("expires_at").is_some());
    }
}
