//! In-memory committed-transaction index.
//!
//! Stands in for the block store in the gateway binary and in tests. Holds
//! the canonical bytes of every committed transaction keyed by ID, plus the
//! current chain height.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use tracing::{debug, info};

use super::{CommittedTx, CommittedTxSource, HeightSource};
use crate::crypto::Hash;
use crate::transaction::Transaction;

/// A thread-safe in-memory ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    txs: DashMap<Hash, CommittedTx>,
    height: AtomicU32,
}

impl MemoryLedger {
    /// An empty ledger at height 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty ledger whose tip is already at `height`.
    pub fn with_height(height: u32) -> Self {
        Self {
            txs: DashMap::new(),
            height: AtomicU32::new(height),
        }
    }

    /// Commits `txs` as the next block and returns its height.
    ///
    /// An empty block still advances the height.
    pub fn commit_block(&self, txs: Vec<Transaction>, block_time: u32) -> u32 {
        let height = self.height.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        let count = txs.len();
        for tx in &txs {
            let committed = CommittedTx::new(tx, height, block_time);
            debug!(id = %committed.tx_id, height, "transaction committed");
            self.txs.insert(committed.tx_id, committed);
        }
        info!(height, txs = count, "block committed");
        height
    }

    /// Inserts a raw record directly. Lets callers seed data that was not
    /// produced by [`MemoryLedger::commit_block`], such as corrupt bytes.
    pub fn insert(&self, committed: CommittedTx) {
        self.txs.insert(committed.tx_id, committed);
    }

    /// Number of committed transactions.
    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }
}

impl HeightSource for MemoryLedger {
    fn last_block_height(&self) -> u32 {
        self.height.load(Ordering::SeqCst)
    }
}

impl CommittedTxSource for MemoryLedger {
    fn committed_tx(&self, id: &Hash) -> Option<CommittedTx> {
        self.txs.get(id).map(|entry| entry.value().clone())
    }
}
