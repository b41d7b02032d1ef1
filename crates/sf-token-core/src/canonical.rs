//! Canonical digest input for token hashes.
//!
//! The digest covers the UTF-8 bytes of
//!
//! ```text
//! id ":" endOfLife ":" json(contents) ":" secret
//! ```
//!
//! where numbers are rendered the way ECMAScript `Number#toString` renders them
//! and `json` follows `JSON.stringify` (no whitespace, object keys in insertion
//! order). Tokens minted by other implementations of the same scheme verify here
//! and vice versa.
//!
//! **CRITICAL**: This format is FROZEN. Changing field order, the separator or
//! the serialization rules invalidates every token already issued.

use serde_json::{Number, Value};

use crate::crypto::HashAlgorithm;

/// Separator between digest input fields.
pub const FIELD_SEPARATOR: char = ':';

/// Largest integer a double represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Build the string whose digest becomes the token hash.
pub fn digest_input(id: &str, end_of_life: &Number, contents: &Value, secret: &str) -> String {
    let mut out = String::with_capacity(id.len() + secret.len() + 64);
    out.push_str(id);
    out.push(FIELD_SEPARATOR);
    out.push_str(&number_string(end_of_life));
    out.push(FIELD_SEPARATOR);
    write_json(&mut out, contents);
    out.push(FIELD_SEPARATOR);
    out.push_str(secret);
    out
}

/// Compute the lowercase hex token hash for the given fields.
pub fn token_digest(
    algorithm: HashAlgorithm,
    id: &str,
    end_of_life: &Number,
    contents: &Value,
    secret: &str,
) -> String {
    algorithm.digest_hex(digest_input(id, end_of_life, contents, secret).as_bytes())
}

/// Serialize a JSON value the way `JSON.stringify` does.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_json(&mut out, value);
    out
}

/// Render a JSON number as its decimal string.
///
/// Safe integers print their digits; everything else goes through the
/// double-precision rendering, since that is the value a JavaScript peer holds.
pub fn number_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&i) {
            return i.to_string();
        }
    }
    match n.as_f64() {
        Some(f) => js_number_string(f),
        None => n.to_string(),
    }
}

/// Render a double the way ECMAScript `Number#toString` does.
pub fn js_number_string(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        // Covers -0 as well.
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x < 0.0 {
        return format!("-{}", js_number_string(-x));
    }

    // Shortest round-trip digits in scientific form, e.g. "1.2345e-7".
    let sci = format!("{x:e}");
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;

    if k <= n && n <= 21 {
        let mut s = digits;
        s.extend(std::iter::repeat('0').take((n - k) as usize));
        s
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let sign = if e >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", e.abs())
        }
    }
}

fn write_json(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&number_string(n)),
        Value::String(s) => write_json_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json_string(out, key);
                out.push(':');
                write_json(out, item);
            }
            out.push('}');
        }
    }
}

fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
