//! # Node-State Capabilities
//!
//! The gateway never talks to a monolithic node state. It depends on four
//! narrow capabilities, each a trait here, so every operation names exactly
//! what it reads and tests can substitute any one of them:
//!
//! - [`FeeSchedule`]: the fee for an amount and payload type.
//! - [`HeightSource`]: the height of the last committed block.
//! - [`CommittedTxSource`]: committed transactions by ID.
//! - [`PendingPool`]: admission of a verified transaction to the pool.
//!
//! In-memory reference implementations live in the submodules:
//! [`FeeParams`], [`MemoryLedger`] and [`MemoryPool`].

pub mod fee;
pub mod ledger;
pub mod pool;

pub use fee::FeeParams;
pub use ledger::MemoryLedger;
pub use pool::{MemoryPool, PoolConfig, PoolError};

use async_trait::async_trait;

use crate::crypto::Hash;
use crate::transaction::{Amount, DecodeError, PayloadType, Transaction};

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Computes network fees.
pub trait FeeSchedule: Send + Sync {
    fn calculate_fee(&self, amount: Amount, payload_type: PayloadType) -> Amount;
}

/// Reports the chain tip.
pub trait HeightSource: Send + Sync {
    fn last_block_height(&self) -> u32;
}

/// Looks up committed transactions.
pub trait CommittedTxSource: Send + Sync {
    fn committed_tx(&self, id: &Hash) -> Option<CommittedTx>;
}

/// Admits a transaction to the pending pool and relays it to peers.
///
/// The only asynchronous capability. Callers must finish every check
/// before awaiting it: once the future is polled the submission may have
/// happened, and dropping it does not undo it.
#[async_trait]
pub trait PendingPool: Send + Sync {
    async fn add_pending_tx_and_broadcast(&self, tx: Transaction) -> Result<(), PoolError>;
}

// ---------------------------------------------------------------------------
// CommittedTx
// ---------------------------------------------------------------------------

/// A transaction as stored in a committed block: canonical bytes plus the
/// block it landed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedTx {
    pub tx_id: Hash,
    pub height: u32,
    /// Block timestamp, seconds since the UNIX epoch.
    pub block_time: u32,
    pub data: Vec<u8>,
}

impl CommittedTx {
    /// Records `tx` as committed at `height`.
    pub fn new(tx: &Transaction, height: u32, block_time: u32) -> Self {
        let data = tx.to_bytes();
        Self {
            tx_id: Hash::digest(&data),
            height,
            block_time,
            data,
        }
    }

    /// Decodes the stored bytes.
    pub fn to_tx(&self) -> Result<Transaction, DecodeError> {
        Transaction::from_bytes(&self.data)
    }
}
