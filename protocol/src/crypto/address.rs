//! # Addresses
//!
//! A NOVA address is 21 bytes: a type byte followed by the first 20 bytes
//! of `BLAKE3(public_key)`. The same key controls one account address and
//! one validator address; only the type byte differs.
//!
//! ```text
//! public_key (32 bytes)
//!     -> BLAKE3(public_key)[..20]
//!     -> type || hash  (21 bytes)
//!     -> Bech32("nova", bytes) -> nova1...
//! ```
//!
//! The treasury address is special: type `0` with an all-zero hash. It has
//! no key behind it and only appears as the sender of subsidy transfers.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ADDRESS_HASH_LENGTH, ADDRESS_HRP, ADDRESS_LENGTH};

/// Errors that can occur while parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The Bech32 string could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The decoded address has an unexpected human-readable prefix.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp { expected: String, got: String },

    /// The decoded data has an unexpected length.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },

    /// The type byte is not one of the known address types.
    #[error("invalid address type: {0}")]
    InvalidType(u8),

    /// A treasury-typed address with a non-zero hash.
    #[error("invalid treasury address")]
    InvalidTreasury,
}

/// The role an address plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AddressType {
    /// The protocol treasury. Source of block subsidies.
    Treasury = 0,
    /// A validator: bonds stake, produces sortition proofs.
    Validator = 1,
    /// A regular account holding spendable funds.
    Account = 2,
}

impl AddressType {
    /// Maps a wire type byte back to the enum.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Treasury),
            1 => Some(Self::Validator),
            2 => Some(Self::Account),
            _ => None,
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Treasury => write!(f, "treasury"),
            Self::Validator => write!(f, "validator"),
            Self::Account => write!(f, "account"),
        }
    }
}

/// A typed 21-byte address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Builds an address from its type and key hash.
    pub fn new(kind: AddressType, key_hash: [u8; ADDRESS_HASH_LENGTH]) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = kind as u8;
        bytes[1..].copy_from_slice(&key_hash);
        Self(bytes)
    }

    /// The treasury address.
    pub const fn treasury() -> Self {
        Self([0u8; ADDRESS_LENGTH])
    }

    /// Validates raw wire bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Result<Self, AddressError> {
        let kind = AddressType::from_byte(bytes[0]).ok_or(AddressError::InvalidType(bytes[0]))?;
        if kind == AddressType::Treasury && bytes[1..].iter().any(|b| *b != 0) {
            return Err(AddressError::InvalidTreasury);
        }
        Ok(Self(bytes))
    }

    /// Returns the raw 21 bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// The address role. Always valid: construction checks the type byte.
    pub fn address_type(&self) -> AddressType {
        match self.0[0] {
            1 => AddressType::Validator,
            2 => AddressType::Account,
            _ => AddressType::Treasury,
        }
    }

    /// The 20-byte key hash.
    pub fn key_hash(&self) -> &[u8] {
        &self.0[1..]
    }

    pub fn is_treasury(&self) -> bool {
        self.address_type() == AddressType::Treasury
    }

    pub fn is_validator(&self) -> bool {
        self.address_type() == AddressType::Validator
    }

    pub fn is_account(&self) -> bool {
        self.address_type() == AddressType::Account
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

        if hrp != Hrp::parse_unchecked(ADDRESS_HRP) {
            return Err(AddressError::InvalidHrp {
                expected: ADDRESS_HRP.to_string(),
                got: hrp.to_string(),
            });
        }

        let bytes: [u8; ADDRESS_LENGTH] =
            data.as_slice()
                .try_into()
                .map_err(|_| AddressError::InvalidDataLength {
                    expected: ADDRESS_LENGTH,
                    got: data.len(),
                })?;

        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = bech32::encode::<Bech32>(Hrp::parse_unchecked(ADDRESS_HRP), &self.0)
            .map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
