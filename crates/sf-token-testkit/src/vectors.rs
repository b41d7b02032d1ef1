//! Golden test vectors for cross-implementation verification.
//!
//! Expected hashes were computed independently of this crate, by hashing the
//! literal digest input with a stock hash tool. Any implementation of the
//! token scheme must reproduce them exactly.

use serde_json::{Number, Value};

use sf_token_core::{digest_input, token_digest, HashAlgorithm};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Hash algorithm name.
    pub algorithm: &'static str,
    pub secret: &'static str,
    pub id: &'static str,
    pub end_of_life: i64,
    /// Contents as a JSON document; key order is significant.
    pub contents: &'static str,
    /// Exact string the digest covers.
    pub expected_input: &'static str,
    /// Expected lowercase hex hash.
    pub expected_hash: &'static str,
}

impl GoldenVector {
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::from_name(self.algorithm).expect("golden vectors use supported algorithms")
    }

    pub fn contents_value(&self) -> Value {
        serde_json::from_str(self.contents).expect("golden vector contents are valid JSON")
    }

    pub fn end_of_life_number(&self) -> Number {
        Number::from(self.end_of_life)
    }

    pub fn digest_input(&self) -> String {
        digest_input(
            self.id,
            &self.end_of_life_number(),
            &self.contents_value(),
            self.secret,
        )
    }

    pub fn compute_hash(&self) -> String {
        token_digest(
            self.hash_algorithm(),
            self.id,
            &self.end_of_life_number(),
            &self.contents_value(),
            self.secret,
        )
    }
}

const REPORT_CONTENTS: &str =
    r#"{"method":"DELETE","uri":"/user/abbacacaabbacacaabbacaca/suscriptions/report_received"}"#;

const REPORT_INPUT: &str = r#"abbacacaabbacacaabbacaca:1267837200000:{"method":"DELETE","uri":"/user/abbacacaabbacacaabbacaca/suscriptions/report_received"}:guestwhat"#;

const MIXED_INPUT: &str =
    r#"507f1f77bcf86cd799439011:1700000000000:{"b":1,"a":[true,null,"é"],"c":1.5}:s3cr3t"#;

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "report token, sha256",
            algorithm: "sha256",
            secret: "guestwhat",
            id: "abbacacaabbacacaabbacaca",
            end_of_life: 1267837200000,
            contents: REPORT_CONTENTS,
            expected_input: REPORT_INPUT,
            expected_hash: "03b5097ac965ebf29fc335ec242afb59438c7b6a13d6c9a4046948b9ebceb593",
        },
        GoldenVector {
            name: "report token, md5",
            algorithm: "md5",
            secret: "guestwhat",
            id: "abbacacaabbacacaabbacaca",
            end_of_life: 1267837200000,
            contents: REPORT_CONTENTS,
            expected_input: REPORT_INPUT,
            expected_hash: "38559834a3f019bbaa7aba8ccd2fb2fd",
        },
        GoldenVector {
            name: "report token, sha1",
            algorithm: "sha1",
            secret: "guestwhat",
            id: "abbacacaabbacacaabbacaca",
            end_of_life: 1267837200000,
            contents: REPORT_CONTENTS,
            expected_input: REPORT_INPUT,
            expected_hash: "8b7df55d50baa5e9d613cd229aaec1b09319e94e",
        },
        GoldenVector {
            name: "report token, sha512",
            algorithm: "sha512",
            secret: "guestwhat",
            id: "abbacacaabbacacaabbacaca",
            end_of_life: 1267837200000,
            contents: REPORT_CONTENTS,
            expected_input: REPORT_INPUT,
            expected_hash: "a537cee623d6b2f03e43f985301bb4188c43790f51e06957a6efcca610f43483193d6c1f07db8c91f53620fd9581e2abc1f15b32d26a57c6dfe7f3066a98727c",
        },
        GoldenVector {
            name: "empty object, just expired",
            algorithm: "sha256",
            secret: "guestwhat",
            id: "abbacacaabbacacaabbacaca",
            end_of_life: 1267833599999,
            contents: "{}",
            expected_input: "abbacacaabbacacaabbacaca:1267833599999:{}:guestwhat",
            expected_hash: "11577900867812db010768fb08495c4529c393f9cd704824dcee3171c27be852",
        },
        GoldenVector {
            name: "unsorted keys, unicode and a float, sha256",
            algorithm: "sha256",
            secret: "s3cr3t",
            id: "507f1f77bcf86cd799439011",
            end_of_life: 1700000000000,
            contents: r#"{"b":1,"a":[true,null,"é"],"c":1.5}"#,
            expected_input: MIXED_INPUT,
            expected_hash: "046eb106966ecfc688fc7c192a20fe95c5bf604d32e7bb44243bde5930887039",
        },
        GoldenVector {
            name: "unsorted keys, unicode and a float, sha384",
            algorithm: "sha384",
            secret: "s3cr3t",
            id: "507f1f77bcf86cd799439011",
            end_of_life: 1700000000000,
            contents: r#"{"b":1,"a":[true,null,"é"],"c":1.5}"#,
            expected_input: MIXED_INPUT,
            expected_hash: "148ea570edf3e7c2652f149e451f8d8cd08b7a2898b84648a0eb65074c2991fa87e7e65a20b316ce9f0d1a1df090d510",
        },
        GoldenVector {
            name: "null contents, empty secret, sha224",
            algorithm: "sha224",
            secret: "",
            id: "x",
            end_of_life: 0,
            contents: "null",
            expected_input: "x:0:null:",
            expected_hash: "e0f905bf2828f3cfccc270f6a41bb5db588fa3aa5c867a1c341db0c3",
        },
        GoldenVector {
            name: "string contents, sha256",
            algorithm: "sha256",
            secret: "guestwhat",
            id: "id-1",
            end_of_life: 1267837200000,
            contents: r#""plain""#,
            expected_input: r#"id-1:1267837200000:"plain":guestwhat"#,
            expected_hash: "bcd905ae44b891c412c1a9d5a147dc868bd2e633436b686c2c7fa3d0442dff78",
        },
    ]
}

/// Check every golden vector against this implementation.
///
/// Returns `(name, matches, computed_hash)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hash = v.compute_hash();
            let matches = hash == v.expected_hash;
            (v.name.to_string(), matches, hash)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_match() {
        for (name, matches, hash) in verify_all_vectors() {
            assert!(matches, "vector '{name}' computed {hash}");
        }
    }

    #[test]
    fn test_vector_inputs_match() {
        for vector in all_vectors() {
            assert_eq!(
                vector.digest_input(),
                vector.expected_input,
                "vector '{}'",
                vector.name
            );
        }
    }

    #[test]
    fn test_vector_hash_lengths() {
        for vector in all_vectors() {
            assert_eq!(
                vector.expected_hash.len(),
                vector.hash_algorithm().output_len() * 2,
                "vector '{}'",
                vector.name
            );
        }
    }
}
