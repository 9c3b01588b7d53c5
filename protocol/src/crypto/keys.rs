//! # Key Management
//!
//! Ed25519 key types for transaction signers.
//!
//! - [`NovaPublicKey`] is validated on construction: 32 bytes that are not
//!   a valid curve point never make it into a transaction. This is what lets
//!   the codec promise that a decoded transaction only carries well-formed
//!   keys.
//! - [`NovaSignature`] is 64 opaque bytes. Verification decides whether it
//!   is any good.
//! - [`NovaKeypair`] exists for signing transactions in tests, tooling and
//!   the `keygen` command. Key custody belongs to the wallet, not here.
//!
//! Key bytes are never logged.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::address::{Address, AddressType};
use super::hash::blake3_hash;
use crate::config::{ADDRESS_HASH_LENGTH, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur when parsing key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid public key length: expected {expected} bytes, got {got}")]
    InvalidPublicKeyLength { expected: usize, got: usize },

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature length: expected {expected} bytes, got {got}")]
    InvalidSignatureLength { expected: usize, got: usize },

    #[error("invalid secret key bytes: wrong length")]
    InvalidSecretKey,
}

// ---------------------------------------------------------------------------
// NovaPublicKey
// ---------------------------------------------------------------------------

/// The public half of a signer's identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NovaPublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl NovaPublicKey {
    /// Builds a public key from raw bytes, rejecting anything that is not a
    /// valid Ed25519 point.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Result<Self, KeyError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Parses the 64-character hex text form.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let raw = hex::decode(s).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            raw.as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidPublicKeyLength {
                    expected: PUBLIC_KEY_LENGTH,
                    got: raw.len(),
                })?;
        Self::from_bytes(bytes)
    }

    /// Returns the raw 32 key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Lowercase hex text form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// The account address controlled by this key.
    pub fn account_address(&self) -> Address {
        Address::new(AddressType::Account, self.key_hash())
    }

    /// The validator address controlled by this key.
    pub fn validator_address(&self) -> Address {
        Address::new(AddressType::Validator, self.key_hash())
    }

    /// Verifies `signature` over `message`.
    ///
    /// Returns `false` for any failure; callers only need the verdict.
    pub fn verify(&self, message: &[u8], signature: &NovaSignature) -> bool {
        let Ok(vk) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig = DalekSignature::from_bytes(&signature.bytes);
        vk.verify(message, &sig).is_ok()
    }

    fn key_hash(&self) -> [u8; ADDRESS_HASH_LENGTH] {
        let digest = blake3_hash(&self.bytes);
        let mut out = [0u8; ADDRESS_HASH_LENGTH];
        out.copy_from_slice(&digest[..ADDRESS_HASH_LENGTH]);
        out
    }
}

impl FromStr for NovaPublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for NovaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NovaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NovaPublicKey({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// NovaSignature
// ---------------------------------------------------------------------------

/// An Ed25519 signature. Always exactly 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NovaSignature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl NovaSignature {
    /// Wraps raw signature bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parses the 128-character hex text form.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let raw = hex::decode(s).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        let bytes: [u8; SIGNATURE_LENGTH] =
            raw.as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidSignatureLength {
                    expected: SIGNATURE_LENGTH,
                    got: raw.len(),
                })?;
        Ok(Self { bytes })
    }

    /// Returns the raw 64 signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// Lowercase hex text form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Display for NovaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NovaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NovaSignature({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// NovaKeypair
// ---------------------------------------------------------------------------

/// An Ed25519 signing keypair.
///
/// Intentionally not `Serialize`/`Debug`: exporting a secret key should be
/// a deliberate call to [`NovaKeypair::secret_key_bytes`].
#[derive(Clone)]
pub struct NovaKeypair {
    signing_key: SigningKey,
}

impl NovaKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Constructs a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> NovaPublicKey {
        NovaPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> NovaSignature {
        NovaSignature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }

    /// Exports the raw 32-byte secret key material. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}
