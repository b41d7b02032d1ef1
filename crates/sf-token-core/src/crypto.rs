//! Hash algorithms available for token digests.
//!
//! Algorithms are resolved against an explicit allow-list rather than whatever
//! a host crypto library happens to register, so the set is the same on every
//! platform.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};

use crate::error::TokenError;

/// A digest algorithm a token service can be configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
    Blake3,
}

impl HashAlgorithm {
    /// Every supported algorithm, in the order names are reported.
    pub const ALL: [HashAlgorithm; 9] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha512_224,
        HashAlgorithm::Sha512_256,
        HashAlgorithm::Blake3,
    ];

    /// The canonical lowercase name of the algorithm.
    pub const fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha512_224 => "sha512-224",
            HashAlgorithm::Sha512_256 => "sha512-256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Names of all supported algorithms.
    pub fn supported() -> Vec<&'static str> {
        Self::ALL.iter().map(HashAlgorithm::name).collect()
    }

    /// Resolve an algorithm by its exact name.
    pub fn from_name(name: &str) -> Result<Self, TokenError> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == name)
            .ok_or_else(|| TokenError::BadAlgorithm {
                name: name.to_string(),
                supported: Self::supported(),
            })
    }

    /// Digest length in bytes.
    pub const fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 | HashAlgorithm::Sha512_224 => 28,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha512_256 | HashAlgorithm::Blake3 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Compute the digest of `data`, rendered as lowercase hex.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        match self {
            HashAlgorithm::Md5 => hex_digest::<Md5>(data),
            HashAlgorithm::Sha1 => hex_digest::<Sha1>(data),
            HashAlgorithm::Sha224 => hex_digest::<Sha224>(data),
            HashAlgorithm::Sha256 => hex_digest::<Sha256>(data),
            HashAlgorithm::Sha384 => hex_digest::<Sha384>(data),
            HashAlgorithm::Sha512 => hex_digest::<Sha512>(data),
            HashAlgorithm::Sha512_224 => hex_digest::<Sha512_224>(data),
            HashAlgorithm::Sha512_256 => hex_digest::<Sha512_256>(data),
            HashAlgorithm::Blake3 => blake3::hash(data).to_hex().to_string(),
        }
    }
}

fn hex_digest<D: Digest>(data: &[u8]) -> String {
    hex::encode(D::digest(data))
}

impl FromStr for HashAlgorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
