//! Transaction verification: structural checks and signature validation.
//!
//! Every transaction entering the pool must pass [`basic_check`]. The checks
//! are stateless: balances, nonces, lock-time windows and double spends are
//! the ledger's business. They run from cheapest to most expensive so the
//! signature is only verified on transactions that are otherwise sound.

use thiserror::Error;

use super::builder::Transaction;
use super::payload::PayloadError;
use super::types::Amount;
use crate::config::{MAX_MEMO_LENGTH, TX_VERSION};
use crate::crypto::{Address, AddressType};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during transaction verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("invalid version: expected {expected}, got {got}")]
    InvalidVersion { expected: u8, got: u8 },

    #[error("memo is {len} bytes, max is {max}")]
    MemoTooLong { len: usize, max: usize },

    #[error("fee {0} exceeds the total supply")]
    FeeOutOfRange(Amount),

    /// The payload failed its own structural check.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("subsidy transaction must not pay a fee, got {0}")]
    SubsidyWithFee(Amount),

    #[error("subsidy transaction must not carry a signature or public key")]
    SubsidySigned,

    /// A non-subsidy transaction without a signature.
    #[error("transaction is unsigned")]
    MissingSignature,

    /// The attached public key does not derive the signer's address.
    #[error("public key does not match signer {signer}")]
    PublicKeyMismatch { signer: Address },

    /// The Ed25519 signature does not verify over the sign bytes.
    #[error("invalid signature for signer {signer}")]
    InvalidSignature { signer: Address },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Stateless validation of a decoded transaction.
///
/// The checks, in order:
///
/// 1. **Version** is the current transaction version.
/// 2. **Memo** fits in [`MAX_MEMO_LENGTH`] bytes.
/// 3. **Fee** does not exceed the total supply.
/// 4. **Payload** passes its own structural check.
/// 5. **Subsidy** transfers carry no fee, signature or key.
/// 6. **Signature** is present on everything else.
/// 7. **Public key**, when attached, derives the signer address and the
///    signature verifies against it.
///
/// A signed transaction without a public key passes: the ledger holds the
/// signer's key and verifies it there.
pub fn basic_check(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.version != TX_VERSION {
        return Err(TransactionError::InvalidVersion {
            expected: TX_VERSION,
            got: tx.version,
        });
    }

    if tx.memo.len() > MAX_MEMO_LENGTH {
        return Err(TransactionError::MemoTooLong {
            len: tx.memo.len(),
            max: MAX_MEMO_LENGTH,
        });
    }

    if !tx.fee.is_within_supply() {
        return Err(TransactionError::FeeOutOfRange(tx.fee));
    }

    tx.payload.basic_check()?;

    if tx.is_subsidy() {
        if !tx.fee.is_zero() {
            return Err(TransactionError::SubsidyWithFee(tx.fee));
        }
        if tx.signature.is_some() || tx.public_key.is_some() {
            return Err(TransactionError::SubsidySigned);
        }
        return Ok(());
    }

    let signature = tx.signature.ok_or(TransactionError::MissingSignature)?;

    if let Some(public_key) = &tx.public_key {
        let signer = *tx.payload.signer();
        let derived = match tx.payload.signer_role() {
            AddressType::Validator => public_key.validator_address(),
            _ => public_key.account_address(),
        };
        if derived != signer {
            return Err(TransactionError::PublicKeyMismatch { signer });
        }
        if !public_key.verify(&tx.sign_bytes(), &signature) {
            return Err(TransactionError::InvalidSignature { signer });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SUPPLY;
    use crate::crypto::{NovaKeypair, NovaSignature};
    use crate::transaction::payload::{BatchTransferPayload, Payload};
    use crate::transaction::signing::sign_transaction;
    use crate::transaction::types::PayloadType;

    fn alice() -> NovaKeypair {
        NovaKeypair::from_seed(&[1u8; 32])
    }

    fn bob() -> NovaKeypair {
        NovaKeypair::from_seed(&[2u8; 32])
    }

    fn signed_transfer() -> Transaction {
        let mut tx = Transaction::new_transfer(
            10,
            alice().public_key().account_address(),
            bob().public_key().account_address(),
            Amount::new(5_000_000),
            Amount::new(1_000),
        );
        sign_transaction(&mut tx, &alice());
        tx
    }

    #[test]
    fn valid_signed_transfer_passes() {
        assert_eq!(basic_check(&signed_transfer()), Ok(()));
    }

    #[test]
    fn valid_validator_transactions_pass() {
        let val = NovaKeypair::from_seed(&[7u8; 32]);
        let mut unbond = Transaction::new_unbond(1, val.public_key().validator_address());
        sign_transaction(&mut unbond, &val);
        assert_eq!(basic_check(&unbond), Ok(()));

        let mut withdraw = Transaction::new_withdraw(
            1,
            val.public_key().validator_address(),
            alice().public_key().account_address(),
            Amount::new(10),
            Amount::new(1_000),
        );
        sign_transaction(&mut withdraw, &val);
        assert_eq!(basic_check(&withdraw), Ok(()));
    }

    #[test]
    fn wrong_version_rejected() {
        let mut tx = signed_transfer();
        tx.version = 2;
        assert_eq!(
            basic_check(&tx),
            Err(TransactionError::InvalidVersion {
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn long_memo_rejected() {
        let mut tx = Transaction::new_transfer(
            10,
            alice().public_key().account_address(),
            bob().public_key().account_address(),
            Amount::new(1),
            Amount::new(1_000),
        )
        .with_memo("x".repeat(MAX_MEMO_LENGTH + 1));
        sign_transaction(&mut tx, &alice());
        assert!(matches!(
            basic_check(&tx),
            Err(TransactionError::MemoTooLong { .. })
        ));
    }

    #[test]
    fn fee_above_supply_rejected() {
        let mut tx = signed_transfer();
        tx.fee = Amount::new(MAX_SUPPLY + 1);
        assert!(matches!(
            basic_check(&tx),
            Err(TransactionError::FeeOutOfRange(_))
        ));
    }

    #[test]
    fn unsigned_transfer_rejected() {
        let mut tx = signed_transfer();
        tx.signature = None;
        assert_eq!(basic_check(&tx), Err(TransactionError::MissingSignature));
    }

    #[test]
    fn tampered_transaction_fails_signature() {
        let mut tx = signed_transfer();
        tx.fee = Amount::new(1_001);
        assert!(matches!(
            basic_check(&tx),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn garbage_signature_rejected() {
        let mut tx = signed_transfer();
        tx.signature = Some(NovaSignature::from_bytes([0u8; 64]));
        assert!(matches!(
            basic_check(&tx),
            Err(TransactionError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn foreign_key_rejected() {
        let mut tx = Transaction::new_transfer(
            10,
            alice().public_key().account_address(),
            bob().public_key().account_address(),
            Amount::new(1),
            Amount::new(1_000),
        );
        sign_transaction(&mut tx, &bob());
        assert!(matches!(
            basic_check(&tx),
            Err(TransactionError::PublicKeyMismatch { .. })
        ));
    }

    #[test]
    fn signed_without_key_passes() {
        let mut tx = signed_transfer();
        tx.public_key = None;
        assert_eq!(basic_check(&tx), Ok(()));
    }

    #[test]
    fn subsidy_rules() {
        let to = bob().public_key().account_address();
        let subsidy = Transaction::new_subsidy(1, to, Amount::new(100));
        assert_eq!(basic_check(&subsidy), Ok(()));

        let mut with_fee = subsidy.clone();
        with_fee.fee = Amount::new(1);
        assert_eq!(
            basic_check(&with_fee),
            Err(TransactionError::SubsidyWithFee(Amount::new(1)))
        );

        let mut signed = subsidy;
        signed.signature = Some(NovaSignature::from_bytes([1u8; 64]));
        assert_eq!(basic_check(&signed), Err(TransactionError::SubsidySigned));
    }

    #[test]
    fn batch_transfer_rejected() {
        let mut tx = signed_transfer();
        tx.payload = Payload::BatchTransfer(BatchTransferPayload {
            from: alice().public_key().account_address(),
            recipients: vec![],
        });
        assert_eq!(
            basic_check(&tx),
            Err(TransactionError::Payload(PayloadError::Unsupported(
                PayloadType::BatchTransfer
            )))
        );
    }
}
