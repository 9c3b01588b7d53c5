//! # Cryptographic Primitives for NOVA Transactions
//!
//! Everything a transaction needs to name things and prove things:
//!
//! - **BLAKE3** content hashes for transaction IDs and address derivation.
//! - **Ed25519** public keys and signatures for signers.
//! - **Bech32** typed addresses (treasury, validator, account).
//!
//! Everything here is a thin, type-safe wrapper around audited
//! implementations. Each type validates on construction, so once a value
//! exists it is well-formed.

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{Address, AddressError, AddressType};
pub use hash::{blake3_hash, Hash, HashError};
pub use keys::{KeyError, NovaKeypair, NovaPublicKey, NovaSignature};
