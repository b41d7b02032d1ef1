//! Error types for sf-token.

use thiserror::Error;

/// Every way issuing or checking a token can be rejected.
///
/// None of these are transient: each one is a caller-input or expiry problem,
/// so nothing retries them internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    /// The configured secret is missing or not a string.
    #[error("secret must be a string, got {found}")]
    BadSecret { found: &'static str },

    /// No identifier generator was configured.
    #[error("no unique id generator configured")]
    NoIdGenerator,

    /// The configured identifier generator cannot be resolved to a callable.
    #[error("bad unique id generator: {name}")]
    BadIdGenerator { name: String },

    /// The configured clock cannot be resolved to a callable.
    #[error("bad time function: {name}")]
    BadTime { name: String },

    /// The requested hash algorithm is not on the allow-list.
    #[error("unsupported hash algorithm {name:?} (supported: {})", .supported.join(", "))]
    BadAlgorithm {
        name: String,
        supported: Vec<&'static str>,
    },

    /// Token contents are absent (or falsy, when checking).
    #[error("token has no contents")]
    NoContent,

    /// End of life is absent or not a number.
    #[error("end of life must be a number, got {found}")]
    NoEndOfLife { found: &'static str },

    /// The current time is past the token's end of life.
    #[error("end of life {end_of_life} is past (now {now})")]
    PastEndOfLife { end_of_life: String, now: i64 },

    /// No hash string was presented for checking.
    #[error("no hash given, got {found}")]
    NoHash { found: &'static str },

    /// The envelope id is absent or not a string.
    #[error("token id must be a string, got {found}")]
    NoId { found: &'static str },

    /// The presented hash does not match the recomputed digest.
    #[error("hash mismatch for presented hash {given}")]
    BadHash { given: String },

    /// Settings could not be read or parsed.
    #[error("settings error: {0}")]
    Settings(String),
}

impl TokenError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::BadSecret { .. } => "E_BAD_SECRET",
            TokenError::NoIdGenerator => "E_NO_ID_GENERATOR",
            TokenError::BadIdGenerator { .. } => "E_BAD_ID_GENERATOR",
            TokenError::BadTime { .. } => "E_BAD_TIME",
            TokenError::BadAlgorithm { .. } => "E_BAD_ALGORITHM",
            TokenError::NoContent => "E_NO_CONTENT",
            TokenError::NoEndOfLife { .. } => "E_NO_END_OF_LIFE",
            TokenError::PastEndOfLife { .. } => "E_PAST_END_OF_LIFE",
            TokenError::NoHash { .. } => "E_NO_HASH",
            TokenError::NoId { .. } => "E_NO_ID",
            TokenError::BadHash { .. } => "E_BAD_HASH",
            TokenError::Settings(_) => "E_SETTINGS",
        }
    }
}

/// Result type for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;
