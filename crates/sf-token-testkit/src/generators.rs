//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use sf_token_core::is_truthy;

/// Generate an arbitrary JSON value, nested a few levels deep.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e12f64..1.0e12f64).prop_map(Value::from),
        "[a-zA-Z0-9 /_é-]{0,16}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Generate JSON contents that pass a token check.
pub fn truthy_contents() -> impl Strategy<Value = Value> {
    json_value().prop_filter("contents must be truthy", is_truthy)
}

/// Generate a token id.
pub fn token_id() -> impl Strategy<Value = String> {
    "[0-9a-f]{24}".prop_map(String::from)
}

/// Generate a time-to-live, up to ten years in milliseconds.
pub fn ttl() -> impl Strategy<Value = i64> {
    0i64..=315_360_000_000i64
}

/// Parameters for issuing a token.
#[derive(Debug, Clone)]
pub struct TokenParams {
    pub contents: Value,
    pub ttl: i64,
}

impl Arbitrary for TokenParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (truthy_contents(), ttl())
            .prop_map(|(contents, ttl)| TokenParams { contents, ttl })
            .boxed()
    }
}
