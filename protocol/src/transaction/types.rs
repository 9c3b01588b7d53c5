//! Core type definitions for NOVA transactions.
//!
//! These types form the vocabulary of every transaction on the network.
//! They are intentionally `Copy` to keep the codec and the validation path
//! free of heap allocations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{MAX_SUPPLY, UNITS_PER_NOVA};

// ---------------------------------------------------------------------------
// PayloadType
// ---------------------------------------------------------------------------

/// Discriminant for the payload a transaction carries.
///
/// The numeric value is the wire discriminant and is consensus-critical.
/// `BatchTransfer` is declared so that the discriminant is reserved and
/// recognized, but the network does not accept it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PayloadType {
    /// Value transfer between two accounts.
    Transfer = 1,
    /// Stake bonded from an account to a validator.
    Bond = 2,
    /// Sortition proof published by a validator.
    Sortition = 3,
    /// Validator leaves the active set.
    Unbond = 4,
    /// Unbonded stake moves from a validator back to an account.
    Withdraw = 5,
    /// One sender, many recipients. Not supported yet.
    BatchTransfer = 6,
}

impl PayloadType {
    /// Maps a wire byte to a payload type. Anything outside the closed set
    /// is `None`.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Transfer),
            2 => Some(Self::Bond),
            3 => Some(Self::Sortition),
            4 => Some(Self::Unbond),
            5 => Some(Self::Withdraw),
            6 => Some(Self::BatchTransfer),
            _ => None,
        }
    }

    /// The wire byte for this type.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "Transfer"),
            Self::Bond => write!(f, "Bond"),
            Self::Sortition => write!(f, "Sortition"),
            Self::Unbond => write!(f, "Unbond"),
            Self::Withdraw => write!(f, "Withdraw"),
            Self::BatchTransfer => write!(f, "BatchTransfer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A monetary amount in nano-NOVA, the smallest indivisible unit.
///
/// Always an integer: no floating point anywhere near money.
/// `Amount(1_000_000_000)` is one NOVA.
///
/// # Examples
///
/// ```
/// use nova_tx::transaction::types::Amount;
///
/// let fee = Amount::new(1_000);
/// let one_nova = Amount::from_nova(1);
/// assert_eq!(one_nova.value(), 1_000_000_000);
/// assert_eq!(one_nova.checked_sub(fee), Some(Amount::new(999_999_000)));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from smallest units.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Creates an amount from whole NOVA. Saturates on overflow.
    pub const fn from_nova(nova: u64) -> Self {
        Self(nova.saturating_mul(UNITS_PER_NOVA))
    }

    /// The raw value in smallest units.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount does not exceed the total supply.
    pub const fn is_within_supply(self) -> bool {
        self.0 <= MAX_SUPPLY
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
