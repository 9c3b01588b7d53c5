//! Transaction payloads: the economic action a transaction carries.
//!
//! [`Payload`] is a closed sum type. The discriminant is computed from the
//! variant, never stored beside it, so the two cannot disagree. Every
//! consumer (codec, projection, fee schedule) matches on it exhaustively;
//! adding a variant is a compile error at each site until it is handled.
//!
//! Each variant validates itself in [`Payload::basic_check`]. These are
//! structural rules only: address roles, key/address consistency, and
//! amount ranges. Balances and stake bookkeeping belong to the ledger.

use thiserror::Error;

use super::types::{Amount, PayloadType};
use crate::config::SORTITION_PROOF_LENGTH;
use crate::crypto::{Address, AddressType, NovaPublicKey};

/// Structural payload errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// An address does not have the role its field requires.
    #[error("invalid {field} address {address}: expected {expected}")]
    InvalidAddressRole {
        field: &'static str,
        address: Address,
        expected: &'static str,
    },

    /// A bond carries a public key whose validator address is not the receiver.
    #[error("public key does not match validator address {receiver}")]
    PublicKeyMismatch { receiver: Address },

    /// An amount exceeds the total supply.
    #[error("{field} {amount} exceeds the total supply")]
    AmountOutOfRange { field: &'static str, amount: Amount },

    /// The payload type is declared but not accepted by the network.
    #[error("{0} payload is not supported yet")]
    Unsupported(PayloadType),
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Moves `amount` from one account to another. A transfer from the treasury
/// is a block subsidy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPayload {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// Bonds `stake` from an account to a validator. The validator's public key
/// is attached on the first bond so the ledger can learn it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondPayload {
    pub from: Address,
    pub to: Address,
    pub public_key: Option<NovaPublicKey>,
    pub stake: Amount,
}

/// A validator's sortition proof for the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortitionPayload {
    pub validator: Address,
    pub proof: [u8; SORTITION_PROOF_LENGTH],
}

/// A validator asks to leave the committee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbondPayload {
    pub validator: Address,
}

/// Unbonded stake moves from a validator to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawPayload {
    /// The validator address the stake leaves.
    pub from: Address,
    /// The account address receiving it.
    pub to: Address,
    pub amount: Amount,
}

/// One leg of a batch transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub to: Address,
    pub amount: Amount,
}

/// One sender paying several recipients. Carried by the codec so committed
/// data always decodes, but rejected by [`Payload::basic_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTransferPayload {
    pub from: Address,
    pub recipients: Vec<Recipient>,
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// The payload of a transaction. Exactly one variant per transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Transfer(TransferPayload),
    Bond(BondPayload),
    Sortition(SortitionPayload),
    Unbond(UnbondPayload),
    Withdraw(WithdrawPayload),
    BatchTransfer(BatchTransferPayload),
}

impl Payload {
    /// The wire discriminant of this payload.
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Self::Transfer(_) => PayloadType::Transfer,
            Self::Bond(_) => PayloadType::Bond,
            Self::Sortition(_) => PayloadType::Sortition,
            Self::Unbond(_) => PayloadType::Unbond,
            Self::Withdraw(_) => PayloadType::Withdraw,
            Self::BatchTransfer(_) => PayloadType::BatchTransfer,
        }
    }

    /// The monetary value this payload moves.
    pub fn value(&self) -> Amount {
        match self {
            Self::Transfer(p) => p.amount,
            Self::Bond(p) => p.stake,
            Self::Sortition(_) | Self::Unbond(_) => Amount::ZERO,
            Self::Withdraw(p) => p.amount,
            Self::BatchTransfer(p) => p
                .recipients
                .iter()
                .fold(Amount::ZERO, |acc, r| acc.saturating_add(r.amount)),
        }
    }

    /// The address whose key must sign the transaction.
    pub fn signer(&self) -> &Address {
        match self {
            Self::Transfer(p) => &p.from,
            Self::Bond(p) => &p.from,
            Self::Sortition(p) => &p.validator,
            Self::Unbond(p) => &p.validator,
            Self::Withdraw(p) => &p.from,
            Self::BatchTransfer(p) => &p.from,
        }
    }

    /// The role the signer's address must have. The signer's public key is
    /// checked against the address of this type.
    pub fn signer_role(&self) -> AddressType {
        match self {
            Self::Transfer(_) | Self::Bond(_) | Self::BatchTransfer(_) => AddressType::Account,
            Self::Sortition(_) | Self::Unbond(_) | Self::Withdraw(_) => AddressType::Validator,
        }
    }

    /// Structural validation of the payload on its own.
    pub fn basic_check(&self) -> Result<(), PayloadError> {
        match self {
            Self::Transfer(p) => {
                if !p.from.is_account() && !p.from.is_treasury() {
                    return Err(role("sender", p.from, "account or treasury"));
                }
                expect_role("receiver", &p.to, AddressType::Account)?;
                check_amount("amount", p.amount)
            }
            Self::Bond(p) => {
                expect_role("sender", &p.from, AddressType::Account)?;
                expect_role("receiver", &p.to, AddressType::Validator)?;
                if let Some(pk) = &p.public_key {
                    if pk.validator_address() != p.to {
                        return Err(PayloadError::PublicKeyMismatch { receiver: p.to });
                    }
                }
                check_amount("stake", p.stake)
            }
            Self::Sortition(p) => expect_role("validator", &p.validator, AddressType::Validator),
            Self::Unbond(p) => expect_role("validator", &p.validator, AddressType::Validator),
            Self::Withdraw(p) => {
                expect_role("sender", &p.from, AddressType::Validator)?;
                expect_role("receiver", &p.to, AddressType::Account)?;
                check_amount("amount", p.amount)
            }
            Self::BatchTransfer(_) => Err(PayloadError::Unsupported(PayloadType::BatchTransfer)),
        }
    }
}

fn role(field: &'static str, address: Address, expected: &'static str) -> PayloadError {
    PayloadError::InvalidAddressRole {
        field,
        address,
        expected,
    }
}

fn expect_role(
    field: &'static str,
    address: &Address,
    expected: AddressType,
) -> Result<(), PayloadError> {
    if address.address_type() == expected {
        return Ok(());
    }
    let expected = match expected {
        AddressType::Treasury => "treasury",
        AddressType::Validator => "validator",
        AddressType::Account => "account",
    };
    Err(role(field, *address, expected))
}

fn check_amount(field: &'static str, amount: Amount) -> Result<(), PayloadError> {
    if amount.is_within_supply() {
        Ok(())
    } else {
        Err(PayloadError::AmountOutOfRange { field, amount })
    }
}
