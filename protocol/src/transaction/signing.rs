//! Transaction signing with Ed25519 keypairs.
//!
//! Signing is a separate step from building because the keypair may not
//! be available at construction time (hardware wallet, remote signer). The
//! gateway itself never signs; it hands out unsigned raw transactions.

use super::builder::Transaction;
use crate::crypto::NovaKeypair;

/// Signs a transaction in place.
///
/// Attaches the keypair's public key, then signs [`Transaction::sign_bytes`].
/// Neither the key nor the signature is part of the sign bytes, so the
/// order does not affect the signature. The transaction ID does change,
/// since it covers the full encoding.
///
/// # Example
///
/// ```
/// use nova_tx::crypto::NovaKeypair;
/// use nova_tx::transaction::{sign_transaction, Amount, Transaction};
///
/// let alice = NovaKeypair::generate();
/// let bob = NovaKeypair::generate();
/// let mut tx = Transaction::new_transfer(
///     1,
///     alice.public_key().account_address(),
///     bob.public_key().account_address(),
///     Amount::new(1_000_000),
///     Amount::new(1_000),
/// );
///
/// sign_transaction(&mut tx, &alice);
/// assert!(tx.is_signed());
/// ```
pub fn sign_transaction<'a>(tx: &'a mut Transaction, keypair: &NovaKeypair) -> &'a Transaction {
    tx.public_key = Some(keypair.public_key());
    tx.signature = Some(keypair.sign(&tx.sign_bytes()));
    tx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
