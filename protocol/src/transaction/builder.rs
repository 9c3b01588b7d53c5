//! The transaction entity and its per-payload constructors.
//!
//! A [`Transaction`] is an envelope (version, lock time, fee, memo, signer
//! key, signature) around exactly one [`Payload`]. Constructors exist for
//! every payload kind the gateway builds; each returns an unsigned
//! transaction at the current [`TX_VERSION`] with an empty memo, which
//! [`Transaction::with_memo`] can fill in.
//!
//! The transaction ID is not a field. It is derived on demand from the
//! canonical bytes (see [`super::codec`]), so it can never go stale.

use super::payload::{
    BondPayload, Payload, SortitionPayload, TransferPayload, UnbondPayload, WithdrawPayload,
};
use super::types::Amount;
use crate::config::{SORTITION_PROOF_LENGTH, TX_VERSION};
use crate::crypto::{Address, Hash, NovaPublicKey, NovaSignature};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A NOVA transaction.
///
/// `lock_time` is a block height: the transaction is only eligible for
/// inclusion at or after it. `fee` is in nano-NOVA. `public_key` may be
/// absent when the ledger already knows the signer's key, and is always
/// absent on subsidy transfers. `signature` is `None` until signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub lock_time: u32,
    pub fee: Amount,
    pub memo: String,
    pub public_key: Option<NovaPublicKey>,
    pub signature: Option<NovaSignature>,
    pub payload: Payload,
}

impl Transaction {
    fn unsigned(lock_time: u32, fee: Amount, payload: Payload) -> Self {
        Self {
            version: TX_VERSION,
            lock_time,
            fee,
            memo: String::new(),
            public_key: None,
            signature: None,
            payload,
        }
    }

    /// A transfer of `amount` from `from` to `to`.
    pub fn new_transfer(
        lock_time: u32,
        from: Address,
        to: Address,
        amount: Amount,
        fee: Amount,
    ) -> Self {
        Self::unsigned(
            lock_time,
            fee,
            Payload::Transfer(TransferPayload { from, to, amount }),
        )
    }

    /// A block subsidy: a fee-less transfer from the treasury.
    pub fn new_subsidy(lock_time: u32, to: Address, amount: Amount) -> Self {
        Self::new_transfer(lock_time, Address::treasury(), to, amount, Amount::ZERO)
    }

    /// Bonds `stake` from account `from` to validator `to`.
    pub fn new_bond(
        lock_time: u32,
        from: Address,
        to: Address,
        public_key: Option<NovaPublicKey>,
        stake: Amount,
        fee: Amount,
    ) -> Self {
        Self::unsigned(
            lock_time,
            fee,
            Payload::Bond(BondPayload {
                from,
                to,
                public_key,
                stake,
            }),
        )
    }

    /// Unbonds `validator`. Unbonding is free.
    pub fn new_unbond(lock_time: u32, validator: Address) -> Self {
        Self::unsigned(
            lock_time,
            Amount::ZERO,
            Payload::Unbond(UnbondPayload { validator }),
        )
    }

    /// Withdraws `amount` of unbonded stake from validator `from` to account `to`.
    pub fn new_withdraw(
        lock_time: u32,
        from: Address,
        to: Address,
        amount: Amount,
        fee: Amount,
    ) -> Self {
        Self::unsigned(
            lock_time,
            fee,
            Payload::Withdraw(WithdrawPayload { from, to, amount }),
        )
    }

    /// Publishes a sortition proof for `validator`. Sortition is free.
    pub fn new_sortition(
        lock_time: u32,
        validator: Address,
        proof: [u8; SORTITION_PROOF_LENGTH],
    ) -> Self {
        Self::unsigned(
            lock_time,
            Amount::ZERO,
            Payload::Sortition(SortitionPayload { validator, proof }),
        )
    }

    /// Sets the memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// The transaction ID: the content hash of the canonical bytes.
    ///
    /// Covers every field, signature included, so two transactions that
    /// differ anywhere have different IDs.
    pub fn id(&self) -> Hash {
        Hash::digest(&self.to_bytes())
    }

    /// The monetary value the payload moves.
    pub fn value(&self) -> Amount {
        self.payload.value()
    }

    /// Returns `true` if the transaction carries a signature.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Returns `true` for a transfer out of the treasury.
    pub fn is_subsidy(&self) -> bool {
        matches!(&self.payload, Payload::Transfer(p) if p.from.is_treasury())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
