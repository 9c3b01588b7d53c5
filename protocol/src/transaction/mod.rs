//! # Transaction Module
//!
//! The transaction model, its canonical encoding, signing and stateless
//! verification.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        : PayloadType discriminant and the Amount value type
//! payload.rs      : Payload sum type and per-variant structural checks
//! builder.rs      : Transaction entity and per-payload constructors
//! codec.rs        : Canonical binary encoding, sign bytes, decoding
//! signing.rs      : Ed25519 signing of the sign bytes
//! verification.rs : BasicCheck: structural and signature validation
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: a constructor such as [`Transaction::new_transfer`].
//! 2. **Encode**: [`Transaction::to_bytes`] / [`Transaction::to_hex`] give
//!    the raw transaction handed to the signer.
//! 3. **Sign**: [`sign_transaction`] with the signer's keypair.
//! 4. **Broadcast**: the gateway decodes, runs [`basic_check`] and submits
//!    the transaction to the pending pool.
//! 5. **Commit**: the ledger stores the canonical bytes, addressed by
//!    [`Transaction::id`].

pub mod builder;
pub mod codec;
pub mod payload;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::Transaction;
pub use codec::DecodeError;
pub use payload::{
    BatchTransferPayload, BondPayload, Payload, PayloadError, Recipient, SortitionPayload,
    TransferPayload, UnbondPayload, WithdrawPayload,
};
pub use signing::sign_transaction;
pub use types::{Amount, PayloadType};
pub use verification::{basic_check, TransactionError};
