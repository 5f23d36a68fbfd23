//! Contract tests run against every token backend

use chrono::{Duration, Utc};
use std::sync::Arc;
use yourtime_token::{build_maker, TokenBackend, TokenError, TokenMaker};

const KEY: &[u8] = b"abcdefghijklmnopqrstuvwxyzabcdef";

fn makers() -> Vec<Arc<dyn TokenMaker>> {
    [TokenBackend::Aead, TokenBackend::Jwt]
        .into_iter()
        .map(|backend| build_maker(backend, KEY).expect("Failed to build maker"))
        .collect()
}

/// Replace the byte at `index` with a different base64url character
fn flip(token: &str, index: usize) -> String {
    let mut bytes = token.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_round_trip_preserves_subject_and_times() {
    for maker in makers() {
        for subject in ["ana@example.com", "", "ünïcödé@example.com", "a b c"] {
            let issued_at = Utc::now();
            let duration = Duration::minutes(1);

            let token = maker.create_token(subject, duration).unwrap();
            assert!(!token.is_empty());

            let payload = maker.verify_token(&token).unwrap();
            assert_eq!(payload.subject, subject, "backend {}", maker.backend());
            assert!(!payload.id.is_nil());
            assert!((payload.issued_at - issued_at).num_milliseconds().abs() < 1000);
            assert!(
                (payload.expires_at - (issued_at + duration))
                    .num_milliseconds()
                    .abs()
                    < 1000
            );
        }
    }
}

#[test]
fn test_expired_token_is_distinguishable() {
    for maker in makers() {
        let token = maker
            .create_token("ana@example.com", -Duration::minutes(1))
            .unwrap();

        assert_eq!(
            maker.verify_token(&token),
            Err(TokenError::ExpiredToken),
            "backend {}",
            maker.backend()
        );
    }
}

#[test]
fn test_single_byte_tamper_is_rejected() {
    for maker in makers() {
        let token = maker
            .create_token("ana@example.com", Duration::minutes(5))
            .unwrap();

        for index in 0..token.len() {
            let tampered = flip(&token, index);
            assert_eq!(
                maker.verify_token(&tampered),
                Err(TokenError::InvalidToken),
                "backend {} accepted a token altered at byte {}",
                maker.backend(),
                index
            );
        }
    }
}

#[test]
fn test_truncated_token_is_rejected() {
    for maker in makers() {
        let token = maker.create_token("ana", Duration::minutes(5)).unwrap();

        assert_eq!(
            maker.verify_token(&token[..token.len() - 1]),
            Err(TokenError::InvalidToken)
        );
        assert_eq!(
            maker.verify_token(&format!("{}A", token)),
            Err(TokenError::InvalidToken)
        );
    }
}

#[test]
fn test_key_configuration_errors() {
    for len in [0, 16, 31] {
        let key = vec![b'k'; len];
        assert!(matches!(
            build_maker(TokenBackend::Aead, &key),
            Err(TokenError::KeyConfiguration(_))
        ));
        assert!(matches!(
            build_maker(TokenBackend::Jwt, &key),
            Err(TokenError::KeyConfiguration(_))
        ));
    }

    // Sealed tokens need an exact key, signed tokens accept longer secrets
    let long = vec![b'k'; 48];
    assert!(matches!(
        build_maker(TokenBackend::Aead, &long),
        Err(TokenError::KeyConfiguration(_))
    ));
    assert!(build_maker(TokenBackend::Jwt, &long).is_ok());
}

#[test]
fn test_makers_are_shareable_across_threads() {
    for maker in makers() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let maker = Arc::clone(&maker);
                std::thread::spawn(move || {
                    let subject = format!("user{}@example.com", i);
                    let token = maker.create_token(&subject, Duration::minutes(1)).unwrap();
                    let payload = maker.verify_token(&token).unwrap();
                    assert_eq!(payload.subject, subject);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}

#[test]
fn test_out_of_range_duration_is_an_error() {
    for maker in makers() {
        assert_eq!(
            maker.create_token("ana", Duration::days(100_000_000)),
            Err(TokenError::DurationOutOfRange),
            "backend {}",
            maker.backend()
        );
    }
}
