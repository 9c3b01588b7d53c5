// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Transactions: Core Library
//!
//! The transaction half of a NOVA node: what a transaction is, how it is
//! written to bytes, and what the node must supply to build, check and
//! accept one.
//!
//! ## Architecture
//!
//! - **config**: protocol constants (versions, lengths, supply, defaults).
//! - **crypto**: BLAKE3 hashes, Ed25519 keys, typed Bech32 addresses.
//! - **transaction**: payload variants, the transaction entity, the
//!   canonical codec, signing and stateless verification.
//! - **state**: the narrow capabilities the gateway consumes from the node
//!   (fees, chain height, committed transactions, pending pool) and
//!   in-memory implementations of each.
//! - **rpc**: JSON-RPC request/response types shared with clients.
//!
//! ## Design Philosophy
//!
//! 1. One byte layout per transaction. IDs are hashes of it.
//! 2. Closed sums, exhaustive matches. New payload kinds fail to compile
//!    until every consumer handles them.
//! 3. No unsafe code in crypto paths.
//! 4. If it touches money, it has tests. Plural.

pub mod config;
pub mod crypto;
pub mod rpc;
pub mod state;
pub mod transaction;
