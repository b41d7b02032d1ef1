//! Input validation for tokens presented for checking.

use serde_json::{Number, Value};

use crate::envelope::{is_truthy, js_type_name, UnverifiedToken};
use crate::error::{Result, TokenError};

/// The fields of an [`UnverifiedToken`] once they are known to be well-typed.
#[derive(Debug, Clone, Copy)]
pub struct CheckedFields<'a> {
    pub id: &'a str,
    pub end_of_life: &'a Number,
    pub contents: &'a Value,
    pub hash: &'a str,
}

/// Validate a presented token and hash before any hashing happens.
///
/// This performs, in order:
/// - Hash must be present
/// - Id must be a string
/// - Contents must be present and truthy
/// - End of life must be a number
///
/// Contents are held to truthiness here while issuance only requires them to
/// be present: `""`, `0` and `false` can be issued but never checked.
pub fn validate_unverified<'a>(
    token: &'a UnverifiedToken,
    hash: Option<&'a str>,
) -> Result<CheckedFields<'a>> {
    let hash = hash.ok_or(TokenError::NoHash { found: "undefined" })?;

    let id = match &token.id {
        Some(Value::String(id)) => id.as_str(),
        other => {
            return Err(TokenError::NoId {
                found: js_type_name(other.as_ref()),
            })
        }
    };

    let contents = match &token.contents {
        Some(contents) if is_truthy(contents) => contents,
        _ => return Err(TokenError::NoContent),
    };

    let end_of_life = match &token.end_of_life {
        Some(Value::Number(n)) => n,
        other => {
            return Err(TokenError::NoEndOfLife {
                found: js_type_name(other.as_ref()),
            })
        }
    };

    Ok(CheckedFields {
        id,
        end_of_life,
        contents,
        hash,
    })
}
