//! # sf-token core
//!
//! Pure primitives for signed, time-limited tokens: hash algorithms, the
//! canonical digest input, envelopes, and input validation.
//!
//! This crate contains no clock, no randomness, no I/O. It is pure computation.
//!
//! ## Key Types
//!
//! - [`Envelope`] - An issued token: id, end of life, contents, hash
//! - [`UnverifiedToken`] - A token presented for checking, fields not yet validated
//! - [`HashAlgorithm`] - Allow-listed digest algorithms
//! - [`TokenError`] - Every rejection kind
//!
//! ## Canonicalization
//!
//! Hashes cover `id:endOfLife:json(contents):secret`. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod validation;

pub use canonical::{canonical_json, digest_input, js_number_string, number_string, token_digest};
pub use crypto::HashAlgorithm;
pub use envelope::{is_past, is_truthy, Envelope, UnverifiedToken};
pub use error::{Result, TokenError};
pub use validation::{validate_unverified, CheckedFields};
