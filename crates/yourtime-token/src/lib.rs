//! Stateless access tokens for the yourtime API
//!
//! A [`TokenMaker`] issues a token for a subject and later verifies it,
//! returning the decoded [`Payload`]. Two interchangeable backends exist:
//!
//! - [`AeadMaker`]: the payload is sealed with AES-256-GCM, so it is neither
//!   readable nor forgeable without the key
//! - [`JwtMaker`]: the payload is carried as HS256-signed JWT claims
//!
//! A deployment picks one backend at startup with [`build_maker`].
//!
//! ```
//! use chrono::Duration;
//! use yourtime_token::{build_maker, TokenBackend};
//!
//! let maker = build_maker(TokenBackend::Aead, b"0123456789abcdef0123456789abcdef").unwrap();
//! let token = maker.create_token("ana@example.com", Duration::minutes(15)).unwrap();
//! let payload = maker.verify_token(&token).unwrap();
//! assert_eq!(payload.subject, "ana@example.com");
//! ```

pub mod aead;
pub mod error;
pub mod jwt;
pub mod maker;
pub mod payload;

pub use aead::AeadMaker;
pub use error::TokenError;
pub use jwt::JwtMaker;
pub use maker::{build_maker, TokenBackend, TokenMaker};
pub use payload::Payload;
