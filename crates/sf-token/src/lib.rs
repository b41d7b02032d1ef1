//! # sf-token
//!
//! Issue and check signed, time-limited tokens.
//!
//! A token binds arbitrary JSON contents to an identifier and an end of life,
//! with a keyed hash to detect tampering. Contents are not encrypted: only
//! integrity and expiry are protected. There is no storage, no revocation and
//! no transport here; callers decide what to do with the envelope.
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use sf_token::{ObjectIdGenerator, TokenService};
//!
//! let service = TokenService::builder()
//!     .secret("mysecret")
//!     .id_generator(ObjectIdGenerator::new())
//!     .algorithm("sha256")
//!     .build()
//!     .unwrap();
//!
//! let end_of_life = service.now() + 3_600_000;
//! let envelope = service
//!     .create_token(Some(json!({ "uri": "/plop" })), Some(end_of_life))
//!     .unwrap();
//!
//! service
//!     .check_token(&envelope.to_unverified(), Some(&envelope.hash))
//!     .unwrap();
//! ```
//!
//! ## Re-exports
//!
//! - `sf_token::core` - Core primitives (envelopes, algorithms, canonical digest input)

pub mod clock;
pub mod id;
pub mod service;
pub mod settings;

// Re-export component crate
pub use sf_token_core as core;

pub use clock::{Clock, SystemClock};
pub use id::{IdGenerator, ObjectIdGenerator, RandomIdGenerator};
pub use service::{TokenRequest, TokenService, TokenServiceBuilder};
pub use settings::{CollaboratorRegistry, TokenSettings};

// Re-export commonly used core types
pub use sf_token_core::{Envelope, HashAlgorithm, Result, TokenError, UnverifiedToken};
