//! # sf-token testkit
//!
//! Testing utilities for sf-token.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A mock clock, a deterministic id stub, and a service wired to both
//! - **Golden vectors**: Known inputs with independently computed hashes
//! - **Generators**: Proptest strategies for JSON contents and issuance parameters
//!
//! ## Test Fixtures
//!
//! ```rust
//! use serde_json::json;
//! use sf_token_testkit::fixtures::{TestFixture, FIRST_STUB_ID};
//!
//! let fixture = TestFixture::new();
//! let envelope = fixture
//!     .service
//!     .create_token(Some(json!({ "uri": "/plop" })), Some(fixture.in_millis(3_600_000)))
//!     .unwrap();
//! assert_eq!(envelope.id, FIRST_STUB_ID);
//!
//! fixture.clock.advance(3_600_001);
//! assert!(fixture.service.verify(&envelope).is_err());
//! ```
//!
//! ## Golden Vectors
//!
//! ```rust
//! use sf_token_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     assert_eq!(vector.compute_hash(), vector.expected_hash, "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use sf_token_testkit::{TestFixture, TokenParams};
//!
//! proptest! {
//!     #[test]
//!     fn issued_tokens_check(params: TokenParams) {
//!         let fixture = TestFixture::new();
//!         let envelope = fixture.service
//!             .create_token(Some(params.contents), Some(fixture.in_millis(params.ttl)))
//!             .unwrap();
//!         prop_assert!(fixture.service.verify(&envelope).is_ok());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{IdStub, MockClock, TestFixture, FIXTURE_NOW, FIXTURE_SECRET};
pub use generators::{json_value, truthy_contents, TokenParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
