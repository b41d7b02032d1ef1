//! Token envelopes: what gets issued, and what gets presented for checking.
//!
//! An [`Envelope`] is produced by issuance and is well-formed by construction.
//! Tokens coming back from callers arrive as an [`UnverifiedToken`], whose
//! fields may be missing or of the wrong JSON type; validation sorts that out.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::canonical::number_string;

/// An issued token.
///
/// Contents are visible to anyone holding the envelope; the hash only
/// protects integrity and expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Unique per issuance.
    #[serde(alias = "_id")]
    pub id: String,

    /// Absolute expiry, in the clock's unit (milliseconds since epoch by default).
    pub end_of_life: i64,

    /// Arbitrary JSON contents, opaque to the service.
    pub contents: Value,

    /// Lowercase hex digest binding id, end of life, contents and the secret.
    pub hash: String,
}

impl Envelope {
    /// Strip the hash, leaving the fields a check recomputes it from.
    pub fn to_unverified(&self) -> UnverifiedToken {
        UnverifiedToken::from(self)
    }
}

/// A token presented for checking, as received from the outside world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnverifiedToken {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_of_life: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Value>,
}

impl UnverifiedToken {
    /// Build a token from well-typed parts.
    pub fn new(id: impl Into<String>, end_of_life: i64, contents: Value) -> Self {
        Self {
            id: Some(Value::String(id.into())),
            end_of_life: Some(Value::Number(Number::from(end_of_life))),
            contents: Some(contents),
        }
    }

    pub fn with_id(mut self, id: Value) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_end_of_life(mut self, end_of_life: Value) -> Self {
        self.end_of_life = Some(end_of_life);
        self
    }

    pub fn with_contents(mut self, contents: Value) -> Self {
        self.contents = Some(contents);
        self
    }
}

impl From<&Envelope> for UnverifiedToken {
    fn from(envelope: &Envelope) -> Self {
        Self::new(envelope.id.clone(), envelope.end_of_life, envelope.contents.clone())
    }
}

impl From<Envelope> for UnverifiedToken {
    fn from(envelope: Envelope) -> Self {
        Self {
            id: Some(Value::String(envelope.id)),
            end_of_life: Some(Value::Number(Number::from(envelope.end_of_life))),
            contents: Some(envelope.contents),
        }
    }
}

/// The JavaScript `typeof` name of an optional JSON value, for diagnostics.
pub fn js_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Null | Value::Array(_) | Value::Object(_)) => "object",
    }
}

/// JavaScript truthiness of a JSON value.
///
/// `null`, `false`, `0` and `""` are falsy; every array and object, even an
/// empty one, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `now` is strictly past `end_of_life`.
pub fn is_past(now: i64, end_of_life: &Number) -> bool {
    if let Some(eol) = end_of_life.as_i64() {
        now > eol
    } else if end_of_life.is_u64() {
        // Larger than any i64.
        false
    } else {
        end_of_life.as_f64().map_or(false, |eol| (now as f64) > eol)
    }
}

/// Render an end of life for error payloads.
pub fn end_of_life_display(end_of_life: &Number) -> String {
    number_string(end_of_life)
}
