//! Bounded pending-transaction pool.
//!
//! Holds verified transactions awaiting block inclusion, in arrival order.
//!
//! ## Design
//!
//! - `DashMap` indexes entries by ID for lock-free lookups.
//! - A `parking_lot::Mutex<VecDeque>` keeps arrival order and serializes
//!   admission: duplicate, fee and capacity checks plus the insert happen
//!   under one lock, so two concurrent submissions of the same transaction
//!   can never both succeed.
//! - Accepted IDs are announced on a `tokio::sync::broadcast` channel. That
//!   channel is the relay to peers; with no subscribers the announcement is
//!   dropped.

use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use super::PendingPool;
use crate::config::DEFAULT_POOL_SIZE;
use crate::crypto::Hash;
use crate::transaction::{Amount, Payload, Transaction};

const ANNOUNCE_CAPACITY: usize = 1_024;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable pool limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of pending transactions.
    pub max_size: usize,

    /// Minimum fee for fee-bearing payloads. Unbond and Sortition are
    /// always fee-free and exempt.
    pub min_fee: Amount,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_POOL_SIZE,
            min_fee: Amount::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// PoolError
// ---------------------------------------------------------------------------

/// Reasons the pool refuses a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("transaction {0} already exists in pool")]
    Duplicate(Hash),

    #[error("fee too low: minimum {min}, got {got}")]
    FeeTooLow { min: Amount, got: Amount },

    #[error("pool is full ({size} transactions)")]
    PoolFull { size: usize },

    #[error("subsidy transactions are not accepted from clients")]
    SubsidyNotAllowed,

    #[error("signature without public key cannot be verified")]
    MissingPublicKey,
}

// ---------------------------------------------------------------------------
// MemoryPool
// ---------------------------------------------------------------------------

/// A thread-safe FIFO transaction pool.
pub struct MemoryPool {
    entries: DashMap<Hash, Transaction>,
    order: Mutex<VecDeque<Hash>>,
    announcer: broadcast::Sender<Hash>,
    config: PoolConfig,
}

impl fmt::Debug for MemoryPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPool")
            .field("size", &self.entries.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl MemoryPool {
    pub fn new(config: PoolConfig) -> Self {
        let (announcer, _) = broadcast::channel(ANNOUNCE_CAPACITY);
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            announcer,
            config,
        }
    }

    /// Admits a transaction and returns its ID.
    ///
    /// Checks, in order: subsidy, key presence, duplicate, minimum fee,
    /// capacity. Subsidies only enter the ledger through block production.
    /// There is no key registry behind this pool, so a signature is only
    /// admitted together with the public key that verifies it.
    pub fn add(&self, tx: Transaction) -> Result<Hash, PoolError> {
        if tx.is_subsidy() {
            return Err(PoolError::SubsidyNotAllowed);
        }
        if tx.signature.is_some() && tx.public_key.is_none() {
            return Err(PoolError::MissingPublicKey);
        }

        let id = tx.id();
        let mut order = self.order.lock();

        if self.entries.contains_key(&id) {
            return Err(PoolError::Duplicate(id));
        }

        let fee_free = matches!(tx.payload, Payload::Unbond(_) | Payload::Sortition(_));
        if !fee_free && tx.fee < self.config.min_fee {
            return Err(PoolError::FeeTooLow {
                min: self.config.min_fee,
                got: tx.fee,
            });
        }

        if order.len() >= self.config.max_size {
            return Err(PoolError::PoolFull {
                size: self.config.max_size,
            });
        }

        self.entries.insert(id, tx);
        order.push_back(id);
        drop(order);

        debug!(%id, "transaction added to pool");
        // Err only means nobody is listening.
        let _ = self.announcer.send(id);
        Ok(id)
    }

    /// Removes and returns up to `max` transactions, oldest first.
    pub fn drain(&self, max: usize) -> Vec<Transaction> {
        let mut order = self.order.lock();
        let take = max.min(order.len());
        order
            .drain(..take)
            .filter_map(|id| self.entries.remove(&id).map(|(_, tx)| tx))
            .collect()
    }

    /// Subscribes to IDs of newly accepted transactions.
    pub fn subscribe(&self) -> broadcast::Receiver<Hash> {
        self.announcer.subscribe()
    }

    pub fn get(&self, id: &Hash) -> Option<Transaction> {
        self.entries.get(id).map(|e| e.value().clone())
    }

    pub fn contains(&self, id: &Hash) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PendingPool for MemoryPool {
    async fn add_pending_tx_and_broadcast(&self, tx: Transaction) -> Result<(), PoolError> {
        self.add(tx).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
