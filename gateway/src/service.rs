//! # Transaction Service
//!
//! The gateway's operations, independent of transport. Each call parses its
//! inputs first, then resolves defaults, then touches node state. The
//! service keeps no mutable state of its own; everything it reads or writes
//! goes through the capability traits it was built with.
//!
//! Only broadcast is `async`, and only the final pool submission awaits.
//! Decoding and verification finish before that, so a caller that drops
//! the future early leaves no trace in the pool.

use std::str::FromStr;
use std::sync::Arc;

use nova_tx::crypto::{Address, Hash, NovaPublicKey};
use nova_tx::rpc::{
    BroadcastTransactionRequest, BroadcastTransactionResponse, CalculateFeeRequest,
    CalculateFeeResponse, DecodeRawTransactionRequest, DecodeRawTransactionResponse,
    GetRawBondTransactionRequest, GetRawTransactionResponse, GetRawTransferTransactionRequest,
    GetRawUnbondTransactionRequest, GetRawWithdrawTransactionRequest, GetTransactionRequest,
    GetTransactionResponse, TransactionData, TransactionVerbosity, TransactionView,
};
use nova_tx::state::{CommittedTxSource, FeeSchedule, HeightSource, PendingPool};
use nova_tx::transaction::{basic_check, Transaction};
use tracing::{debug, error, info};

use crate::defaults::DefaultResolver;
use crate::error::GatewayError;
use crate::projection::transaction_to_info;

pub struct TransactionService {
    ledger: Arc<dyn CommittedTxSource>,
    pool: Arc<dyn PendingPool>,
    fees: Arc<dyn FeeSchedule>,
    defaults: DefaultResolver,
}

impl TransactionService {
    pub fn new(
        ledger: Arc<dyn CommittedTxSource>,
        pool: Arc<dyn PendingPool>,
        fees: Arc<dyn FeeSchedule>,
        heights: Arc<dyn HeightSource>,
    ) -> Self {
        Self {
            ledger,
            pool,
            defaults: DefaultResolver::new(Arc::clone(&fees), heights),
            fees,
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// A committed transaction by ID.
    pub fn get_transaction(
        &self,
        req: &GetTransactionRequest,
    ) -> Result<GetTransactionResponse, GatewayError> {
        let id = Hash::from_str(&req.id)
            .map_err(|e| GatewayError::Malformed(format!("invalid transaction ID: {e}")))?;

        let committed = self.ledger.committed_tx(&id).ok_or(GatewayError::NotFound)?;

        let transaction = match req.verbosity {
            TransactionVerbosity::Data => TransactionView::Data(TransactionData {
                id: committed.tx_id.to_hex(),
                data: hex::encode(&committed.data),
            }),
            TransactionVerbosity::Info => {
                let tx = committed.to_tx().map_err(|e| {
                    error!(
                        %id,
                        height = committed.height,
                        error = %e,
                        "committed transaction failed to decode"
                    );
                    GatewayError::Internal(format!("committed transaction {id}: {e}"))
                })?;
                TransactionView::Info(transaction_to_info(&tx))
            }
        };

        Ok(GetTransactionResponse {
            block_height: committed.height,
            block_time: committed.block_time,
            transaction,
        })
    }

    // -----------------------------------------------------------------------
    // Broadcast
    // -----------------------------------------------------------------------

    /// Decodes, verifies and submits a signed transaction.
    pub async fn broadcast_transaction(
        &self,
        req: &BroadcastTransactionRequest,
    ) -> Result<BroadcastTransactionResponse, GatewayError> {
        let bytes = hex::decode(&req.signed_raw_transaction)
            .map_err(|_| GatewayError::Malformed("invalid signed transaction".into()))?;
        let tx = Transaction::from_bytes(&bytes)
            .map_err(|e| GatewayError::Malformed(format!("couldn't decode transaction: {e}")))?;
        basic_check(&tx)
            .map_err(|e| GatewayError::Invalid(format!("couldn't verify transaction: {e}")))?;

        let id = tx.id();
        self.pool
            .add_pending_tx_and_broadcast(tx)
            .await
            .map_err(GatewayError::Rejected)?;

        info!(%id, "transaction broadcast");
        Ok(BroadcastTransactionResponse { id: id.to_hex() })
    }

    // -----------------------------------------------------------------------
    // Fees
    // -----------------------------------------------------------------------

    /// The fee for an amount. With `fixed_amount` the fee is taken out of
    /// the amount and the remainder is returned.
    pub fn calculate_fee(
        &self,
        req: &CalculateFeeRequest,
    ) -> Result<CalculateFeeResponse, GatewayError> {
        let fee = self.fees.calculate_fee(req.amount, req.payload_type);
        let amount = if req.fixed_amount {
            req.amount.checked_sub(fee).ok_or_else(|| {
                GatewayError::Invalid(format!("fee {fee} exceeds amount {}", req.amount))
            })?
        } else {
            req.amount
        };
        Ok(CalculateFeeResponse { amount, fee })
    }

    // -----------------------------------------------------------------------
    // Raw builders
    // -----------------------------------------------------------------------

    /// An unsigned transfer.
    pub fn get_raw_transfer_transaction(
        &self,
        req: &GetRawTransferTransactionRequest,
    ) -> Result<GetRawTransactionResponse, GatewayError> {
        let sender = parse_address(&req.sender)?;
        let receiver = parse_address(&req.receiver)?;

        let fee = self.defaults.fee(req.fee, req.amount);
        let lock_time = self.defaults.lock_time(req.lock_time);
        let tx = Transaction::new_transfer(lock_time, sender, receiver, req.amount, fee)
            .with_memo(req.memo.as_str());
        Ok(raw(&tx))
    }

    /// An unsigned bond. An empty public key means none is attached.
    pub fn get_raw_bond_transaction(
        &self,
        req: &GetRawBondTransactionRequest,
    ) -> Result<GetRawTransactionResponse, GatewayError> {
        let sender = parse_address(&req.sender)?;
        let receiver = parse_address(&req.receiver)?;
        let public_key = if req.public_key.is_empty() {
            None
        } else {
            Some(
                NovaPublicKey::from_hex(&req.public_key)
                    .map_err(|e| GatewayError::Malformed(e.to_string()))?,
            )
        };

        let fee = self.defaults.fee(req.fee, req.stake);
        let lock_time = self.defaults.lock_time(req.lock_time);
        let tx =
            Transaction::new_bond(lock_time, sender, receiver, public_key, req.stake, fee)
                .with_memo(req.memo.as_str());
        Ok(raw(&tx))
    }

    /// An unsigned unbond. Unbonding is free, so there is no fee to resolve.
    pub fn get_raw_unbond_transaction(
        &self,
        req: &GetRawUnbondTransactionRequest,
    ) -> Result<GetRawTransactionResponse, GatewayError> {
        let validator = parse_address(&req.validator_address)?;

        let lock_time = self.defaults.lock_time(req.lock_time);
        let tx = Transaction::new_unbond(lock_time, validator).with_memo(req.memo.as_str());
        Ok(raw(&tx))
    }

    /// An unsigned withdraw.
    pub fn get_raw_withdraw_transaction(
        &self,
        req: &GetRawWithdrawTransactionRequest,
    ) -> Result<GetRawTransactionResponse, GatewayError> {
        let validator = parse_address(&req.validator_address)?;
        let account = parse_address(&req.account_address)?;

        let fee = self.defaults.fee(req.fee, req.amount);
        let lock_time = self.defaults.lock_time(req.lock_time);
        let tx = Transaction::new_withdraw(lock_time, validator, account, req.amount, fee)
            .with_memo(req.memo.as_str());
        Ok(raw(&tx))
    }

    // -----------------------------------------------------------------------
    // Decode
    // -----------------------------------------------------------------------

    /// Decodes and projects a raw transaction. No verification.
    pub fn decode_raw_transaction(
        &self,
        req: &DecodeRawTransactionRequest,
    ) -> Result<DecodeRawTransactionResponse, GatewayError> {
        let tx = decode_raw(&req.raw_transaction)?;
        Ok(DecodeRawTransactionResponse {
            transaction: transaction_to_info(&tx),
        })
    }
}

/// Decodes raw transaction hex. Shared with the offline `decode` command.
pub fn decode_raw(raw_hex: &str) -> Result<Transaction, GatewayError> {
    let bytes = hex::decode(raw_hex)
        .map_err(|_| GatewayError::Malformed("invalid raw transaction".into()))?;
    Transaction::from_bytes(&bytes)
        .map_err(|e| GatewayError::Malformed(format!("couldn't decode transaction: {e}")))
}

fn parse_address(text: &str) -> Result<Address, GatewayError> {
    Address::from_str(text).map_err(|e| GatewayError::Malformed(e.to_string()))
}

fn raw(tx: &Transaction) -> GetRawTransactionResponse {
    debug!(
        payload_type = %tx.payload.payload_type(),
        fee = %tx.fee,
        lock_time = tx.lock_time,
        "raw transaction built"
    );
    GetRawTransactionResponse {
        raw_transaction: tx.to_hex(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use nova_tx::crypto::{AddressError, NovaKeypair, NovaSignature};
    use nova_tx::rpc::PayloadInfo;
    use nova_tx::state::{CommittedTx, MemoryLedger, MemoryPool, PoolError};
    use nova_tx::transaction::{sign_transaction, Amount, PayloadType};

    use crate::error::Code;

    const HEIGHT: u32 = 4_242;

    struct FixedFee;

    impl FeeSchedule for FixedFee {
        fn calculate_fee(&self, _amount: Amount, _payload_type: PayloadType) -> Amount {
            Amount::new(50)
        }
    }

    struct FixedHeight;

    impl HeightSource for FixedHeight {
        fn last_block_height(&self) -> u32 {
            HEIGHT
        }
    }

    /// Counts submissions; rejects everything once `reject` is set.
    #[derive(Default)]
    struct CountingPool {
        calls: AtomicUsize,
        reject: bool,
    }

    #[async_trait]
    impl PendingPool for CountingPool {
        async fn add_pending_tx_and_broadcast(&self, tx: Transaction) -> Result<(), PoolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                Err(PoolError::Duplicate(tx.id()))
            } else {
                Ok(())
            }
        }
    }

    struct Harness {
        service: TransactionService,
        ledger: Arc<MemoryLedger>,
        pool: Arc<CountingPool>,
    }

    fn harness_with(pool: CountingPool) -> Harness {
        let ledger = Arc::new(MemoryLedger::new());
        let pool = Arc::new(pool);
        let service = TransactionService::new(
            ledger.clone(),
            pool.clone(),
            Arc::new(FixedFee),
            Arc::new(FixedHeight),
        );
        Harness {
            service,
            ledger,
            pool,
        }
    }

    fn harness() -> Harness {
        harness_with(CountingPool::default())
    }

    fn kp(seed: u8) -> NovaKeypair {
        NovaKeypair::from_seed(&[seed; 32])
    }

    fn transfer_request(amount: u64, fee: u64, lock_time: u32) -> GetRawTransferTransactionRequest {
        GetRawTransferTransactionRequest {
            sender: kp(1).public_key().account_address().to_string(),
            receiver: kp(2).public_key().account_address().to_string(),
            amount: Amount::new(amount),
            fee: Amount::new(fee),
            lock_time,
            memo: String::new(),
        }
    }

    fn decode(raw_hex: &str) -> Transaction {
        Transaction::from_bytes(&hex::decode(raw_hex).unwrap()).unwrap()
    }

    fn signed_hex(raw_hex: &str, keypair: &NovaKeypair) -> String {
        let mut tx = decode(raw_hex);
        sign_transaction(&mut tx, keypair);
        tx.to_hex()
    }

    // -- CalculateFee ------------------------------------------------------

    #[test]
    fn fixed_amount_subtracts_fee() {
        let h = harness();
        let resp = h
            .service
            .calculate_fee(&CalculateFeeRequest {
                amount: Amount::new(1_000),
                payload_type: PayloadType::Transfer,
                fixed_amount: true,
            })
            .unwrap();
        assert_eq!(resp.amount, Amount::new(950));
        assert_eq!(resp.fee, Amount::new(50));
    }

    #[test]
    fn floating_amount_is_unchanged() {
        let h = harness();
        let resp = h
            .service
            .calculate_fee(&CalculateFeeRequest {
                amount: Amount::new(1_000),
                payload_type: PayloadType::Bond,
                fixed_amount: false,
            })
            .unwrap();
        assert_eq!(resp.amount, Amount::new(1_000));
        assert_eq!(resp.fee, Amount::new(50));
    }

    #[test]
    fn fixed_amount_below_fee_is_invalid() {
        let h = harness();
        let err = h
            .service
            .calculate_fee(&CalculateFeeRequest {
                amount: Amount::new(10),
                payload_type: PayloadType::Transfer,
                fixed_amount: true,
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid(_)));
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    // -- Raw builders ------------------------------------------------------

    #[test]
    fn raw_transfer_resolves_defaults() {
        let h = harness();
        let resp = h
            .service
            .get_raw_transfer_transaction(&transfer_request(5_000_000, 0, 0))
            .unwrap();

        let tx = decode(&resp.raw_transaction);
        assert_eq!(tx.fee, Amount::new(50));
        assert_eq!(tx.lock_time, HEIGHT);
        assert_eq!(tx.value(), Amount::new(5_000_000));
        assert!(!tx.is_signed());
        assert_eq!(resp.raw_transaction, resp.raw_transaction.to_lowercase());
    }

    #[test]
    fn raw_transfer_keeps_explicit_values() {
        let h = harness();
        let mut req = transfer_request(5_000_000, 7, 99);
        req.memo = "rent".into();
        let tx = decode(
            &h.service
                .get_raw_transfer_transaction(&req)
                .unwrap()
                .raw_transaction,
        );
        assert_eq!(tx.fee, Amount::new(7));
        assert_eq!(tx.lock_time, 99);
        assert_eq!(tx.memo, "rent");
    }

    #[test]
    fn raw_transfer_bad_address_is_parse_error_verbatim() {
        let h = harness();
        let mut req = transfer_request(1, 0, 0);
        req.receiver = "not-an-address".into();

        let expected = Address::from_str("not-an-address").unwrap_err().to_string();
        let err = h.service.get_raw_transfer_transaction(&req).unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn raw_bond_with_and_without_key() {
        let h = harness();
        let val = kp(5);
        let mut req = GetRawBondTransactionRequest {
            sender: kp(1).public_key().account_address().to_string(),
            receiver: val.public_key().validator_address().to_string(),
            public_key: val.public_key().to_hex(),
            stake: Amount::from_nova(1_000),
            fee: Amount::ZERO,
            lock_time: 0,
            memo: String::new(),
        };

        let tx = decode(&h.service.get_raw_bond_transaction(&req).unwrap().raw_transaction);
        assert_eq!(tx.fee, Amount::new(50));
        assert_eq!(tx.payload.payload_type(), PayloadType::Bond);

        req.public_key = String::new();
        let tx = decode(&h.service.get_raw_bond_transaction(&req).unwrap().raw_transaction);
        assert!(matches!(
            tx.payload,
            nova_tx::transaction::Payload::Bond(ref b) if b.public_key.is_none()
        ));

        req.public_key = "zz".into();
        assert!(matches!(
            h.service.get_raw_bond_transaction(&req),
            Err(GatewayError::Malformed(_))
        ));
    }

    #[test]
    fn raw_unbond_has_no_fee() {
        let h = harness();
        let req = GetRawUnbondTransactionRequest {
            validator_address: kp(5).public_key().validator_address().to_string(),
            lock_time: 0,
            memo: String::new(),
        };
        let tx = decode(&h.service.get_raw_unbond_transaction(&req).unwrap().raw_transaction);
        assert!(tx.fee.is_zero());
        assert_eq!(tx.lock_time, HEIGHT);
    }

    #[test]
    fn raw_unbond_rejects_wrong_hrp() {
        let h = harness();
        let req = GetRawUnbondTransactionRequest {
            validator_address: "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4".into(),
            lock_time: 0,
            memo: String::new(),
        };
        let err = h.service.get_raw_unbond_transaction(&req).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[test]
    fn raw_withdraw_resolves_defaults() {
        let h = harness();
        let req = GetRawWithdrawTransactionRequest {
            validator_address: kp(5).public_key().validator_address().to_string(),
            account_address: kp(1).public_key().account_address().to_string(),
            amount: Amount::new(10_000),
            fee: Amount::ZERO,
            lock_time: 12,
            memo: String::new(),
        };
        let tx = decode(
            &h.service
                .get_raw_withdraw_transaction(&req)
                .unwrap()
                .raw_transaction,
        );
        assert_eq!(tx.fee, Amount::new(50));
        assert_eq!(tx.lock_time, 12);
    }

    // -- Broadcast ---------------------------------------------------------

    #[tokio::test]
    async fn end_to_end_transfer() {
        let h = harness();
        let raw = h
            .service
            .get_raw_transfer_transaction(&transfer_request(5_000_000, 0, 0))
            .unwrap()
            .raw_transaction;
        let signed = signed_hex(&raw, &kp(1));

        let resp = h
            .service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: signed.clone(),
            })
            .await
            .unwrap();
        assert_eq!(h.pool.calls.load(Ordering::SeqCst), 1);
        assert_eq!(resp.id, decode(&signed).id().to_hex());

        // Commit it and read it back.
        h.ledger.commit_block(vec![decode(&signed)], 1_700_000_000);
        let got = h
            .service
            .get_transaction(&GetTransactionRequest {
                id: resp.id.clone(),
                verbosity: TransactionVerbosity::Info,
            })
            .unwrap();
        assert_eq!(got.block_height, 1);
        assert_eq!(got.block_time, 1_700_000_000);
        assert_eq!(got.transaction.id(), resp.id);
        let TransactionView::Info(info) = got.transaction else {
            panic!("info verbosity must decode");
        };
        assert_eq!(info.fee, Amount::new(50));
        assert_eq!(info.lock_time, HEIGHT);
        assert_eq!(
            info.payload,
            Some(PayloadInfo::Transfer {
                sender: kp(1).public_key().account_address().to_string(),
                receiver: kp(2).public_key().account_address().to_string(),
                amount: Amount::new(5_000_000),
            })
        );
    }

    #[tokio::test]
    async fn unsigned_broadcast_never_reaches_pool() {
        let h = harness();
        let raw = h
            .service
            .get_raw_transfer_transaction(&transfer_request(5_000_000, 0, 0))
            .unwrap()
            .raw_transaction;

        let err = h
            .service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: raw,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Invalid(_)));
        assert!(err.to_string().starts_with("couldn't verify transaction: "));
        assert_eq!(h.pool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_signer_never_reaches_pool() {
        let h = harness();
        let raw = h
            .service
            .get_raw_transfer_transaction(&transfer_request(5_000_000, 0, 0))
            .unwrap()
            .raw_transaction;
        let signed = signed_hex(&raw, &kp(9));

        let err = h
            .service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: signed,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(h.pool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn broadcast_bad_hex_and_bad_bytes() {
        let h = harness();

        let err = h
            .service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: "xyz".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid signed transaction");

        let err = h
            .service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: "0001".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
        assert!(err.to_string().starts_with("couldn't decode transaction: "));
        assert_eq!(h.pool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_discriminant_is_malformed() {
        let h = harness();
        let raw = h
            .service
            .get_raw_transfer_transaction(&transfer_request(5_000_000, 0, 0))
            .unwrap()
            .raw_transaction;
        let mut bytes = hex::decode(&raw).unwrap();
        // flags, version, lock time (4), fee varint (1), memo length.
        let type_index = 1 + 1 + 4 + 1 + 1;
        assert_eq!(bytes[type_index], PayloadType::Transfer.as_byte());
        bytes[type_index] = 0x2A;

        let err = h
            .service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: hex::encode(&bytes),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
        assert_eq!(
            err.to_string(),
            "couldn't decode transaction: unknown payload type: 42"
        );

        let err = h
            .service
            .decode_raw_transaction(&DecodeRawTransactionRequest {
                raw_transaction: hex::encode(&bytes),
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
        assert_eq!(h.pool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pool_rejection_is_canceled() {
        let h = harness_with(CountingPool {
            reject: true,
            ..Default::default()
        });
        let raw = h
            .service
            .get_raw_transfer_transaction(&transfer_request(5_000_000, 0, 0))
            .unwrap()
            .raw_transaction;

        let err = h
            .service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: signed_hex(&raw, &kp(1)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::Canceled);
        assert!(err
            .to_string()
            .starts_with("couldn't add to transaction pool: "));
        assert_eq!(h.pool.calls.load(Ordering::SeqCst), 1);
    }

    fn service_over(pool: Arc<MemoryPool>) -> TransactionService {
        let ledger = Arc::new(MemoryLedger::new());
        TransactionService::new(ledger.clone(), pool, Arc::new(FixedFee), ledger)
    }

    #[tokio::test]
    async fn subsidy_broadcast_is_canceled_by_pool() {
        let pool = Arc::new(MemoryPool::default());
        let service = service_over(pool.clone());
        let me = kp(9).public_key().account_address();
        let subsidy = Transaction::new_subsidy(1, me, Amount::new(40_000_000_000_000_000));

        let err = service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: subsidy.to_hex(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(PoolError::SubsidyNotAllowed)));
        assert_eq!(err.code(), Code::Canceled);
        assert!(!pool.contains(&subsidy.id()));
    }

    #[tokio::test]
    async fn keyless_signature_is_canceled_by_pool() {
        let pool = Arc::new(MemoryPool::default());
        let service = service_over(pool.clone());
        let mut forged = Transaction::new_transfer(
            1,
            kp(1).public_key().account_address(),
            kp(9).public_key().account_address(),
            Amount::new(5_000_000),
            Amount::new(1_000),
        );
        forged.signature = Some(NovaSignature::from_bytes([0u8; 64]));

        let err = service
            .broadcast_transaction(&BroadcastTransactionRequest {
                signed_raw_transaction: forged.to_hex(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(PoolError::MissingPublicKey)));
        assert_eq!(err.code(), Code::Canceled);
        assert!(pool.is_empty());
    }

    // -- GetTransaction ----------------------------------------------------

    #[test]
    fn lookup_miss_is_invalid_argument() {
        let h = harness();
        let err = h
            .service
            .get_transaction(&GetTransactionRequest {
                id: Hash::digest(b"missing").to_hex(),
                verbosity: TransactionVerbosity::Info,
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound));
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.to_string(), "transaction not found");
    }

    #[test]
    fn bad_id_is_malformed() {
        let h = harness();
        let err = h
            .service
            .get_transaction(&GetTransactionRequest {
                id: "abc".into(),
                verbosity: TransactionVerbosity::Data,
            })
            .unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
        assert!(err.to_string().starts_with("invalid transaction ID: "));
    }

    #[test]
    fn data_verbosity_returns_raw_bytes_only() {
        let h = harness();
        let tx = Transaction::new_subsidy(1, kp(2).public_key().account_address(), Amount::new(3));
        h.ledger.commit_block(vec![tx.clone()], 55);

        let got = h
            .service
            .get_transaction(&GetTransactionRequest {
                id: tx.id().to_hex(),
                verbosity: TransactionVerbosity::Data,
            })
            .unwrap();
        assert_eq!(got.block_height, 1);
        assert_eq!(got.block_time, 55);
        assert_eq!(
            got.transaction,
            TransactionView::Data(TransactionData {
                id: tx.id().to_hex(),
                data: tx.to_hex(),
            })
        );
        let json = serde_json::to_value(&got).unwrap();
        assert!(json["transaction"].get("fee").is_none());
        assert!(json["transaction"].get("version").is_none());
    }

    #[test]
    fn corrupt_committed_data_is_internal() {
        let h = harness();
        let id = Hash::digest(b"corrupt");
        h.ledger.insert(CommittedTx {
            tx_id: id,
            height: 3,
            block_time: 0,
            data: vec![0xFF],
        });

        let err = h
            .service
            .get_transaction(&GetTransactionRequest {
                id: id.to_hex(),
                verbosity: TransactionVerbosity::Info,
            })
            .unwrap_err();
        assert_eq!(err.code(), Code::Internal);
        assert_eq!(err.to_string(), "internal error");

        // Data verbosity never decodes, so it still works.
        assert!(h
            .service
            .get_transaction(&GetTransactionRequest {
                id: id.to_hex(),
                verbosity: TransactionVerbosity::Data,
            })
            .is_ok());
    }

    // -- Decode ------------------------------------------------------------

    #[test]
    fn decode_raw_skips_verification() {
        let h = harness();
        let raw = h
            .service
            .get_raw_transfer_transaction(&transfer_request(5_000_000, 0, 0))
            .unwrap()
            .raw_transaction;
        let resp = h
            .service
            .decode_raw_transaction(&DecodeRawTransactionRequest {
                raw_transaction: raw.clone(),
            })
            .unwrap();
        assert_eq!(resp.transaction.id, decode(&raw).id().to_hex());
        assert!(resp.transaction.signature.is_empty());
    }

    #[test]
    fn decode_raw_bad_hex() {
        let err = decode_raw("not hex").unwrap_err();
        assert_eq!(err.to_string(), "invalid raw transaction");
    }

    #[test]
    fn address_parse_error_text_is_stable() {
        let err = parse_address("nova1qqqq").unwrap_err();
        assert!(matches!(err, GatewayError::Malformed(_)));
        // Bech32 failures surface the underlying parse error.
        let direct: AddressError = Address::from_str("nova1qqqq").unwrap_err();
        assert_eq!(err.to_string(), direct.to_string());
    }
}
