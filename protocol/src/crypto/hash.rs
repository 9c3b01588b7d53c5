//! # Hashing Utilities
//!
//! Content hashes for NOVA. Transaction IDs are the BLAKE3 digest of the
//! canonical transaction bytes, and addresses are derived from the BLAKE3
//! digest of a public key. BLAKE3 is fast on every platform, resistant to
//! length extension, and needs no double-hashing trick.
//!
//! [`Hash`] is the fixed-size digest type. Its text form is exactly 64
//! lowercase hex characters; parsing is strict about length so a truncated
//! identifier is reported as malformed rather than silently padded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::HASH_OUTPUT_LENGTH;

/// Errors produced when parsing a hash from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// The string is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The decoded bytes have the wrong length.
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required number of bytes.
        expected: usize,
        /// Number of bytes actually decoded.
        got: usize,
    },
}

/// Compute the BLAKE3 hash of the input data.
///
/// # Example
///
/// ```
/// use nova_tx::crypto::blake3_hash;
///
/// let hash = blake3_hash(b"NOVA protocol");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// A 32-byte content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_OUTPUT_LENGTH]);

impl Hash {
    /// Hashes `data` with BLAKE3.
    pub fn digest(data: &[u8]) -> Self {
        Self(blake3_hash(data))
    }

    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: [u8; HASH_OUTPUT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_OUTPUT_LENGTH] {
        &self.0
    }

    /// Lowercase hex text form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Hash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| HashError::InvalidHex(e.to_string()))?;
        let arr: [u8; HASH_OUTPUT_LENGTH] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| HashError::InvalidLength {
                    expected: HASH_OUTPUT_LENGTH,
                    got: bytes.len(),
                })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake3_is_deterministic() {
        assert_eq!(blake3_hash(b"nova"), blake3_hash(b"nova"));
        assert_ne!(blake3_hash(b"nova"), blake3_hash(b"Nova"));
    }

    #[test]
    fn text_roundtrip() {
        let h = Hash::digest(b"some transaction bytes");
        let text = h.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<Hash>().unwrap(), h);
    }

    #[test]
    fn parse_rejects_short_input() {
        let err = "abcd".parse::<Hash>().unwrap_err();
        assert_eq!(
            err,
            HashError::InvalidLength {
                expected: 32,
                got: 2
            }
        );
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = "zz".repeat(32).parse::<Hash>().unwrap_err();
        assert!(matches!(err, HashError::InvalidHex(_)));
    }

    #[test]
    fn serde_uses_hex_string() {
        let h = Hash::digest(b"x");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
