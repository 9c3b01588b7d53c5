//! Projection of transactions into their external JSON shape.

use nova_tx::rpc::{PayloadInfo, TransactionInfo};
use nova_tx::transaction::{Payload, Transaction};

/// Maps a transaction to [`TransactionInfo`]. Pure apart from logging.
///
/// A payload with no projection (batch transfers) is logged and the
/// envelope is returned without a body.
pub fn transaction_to_info(tx: &Transaction) -> TransactionInfo {
    let id = tx.id();
    TransactionInfo {
        id: id.to_hex(),
        version: tx.version,
        lock_time: tx.lock_time,
        fee: tx.fee,
        value: tx.value(),
        payload_type: Some(tx.payload.payload_type()),
        memo: tx.memo.clone(),
        public_key: tx.public_key.map(|pk| pk.to_hex()).unwrap_or_default(),
        signature: tx.signature.map(|sig| sig.to_hex()).unwrap_or_default(),
        payload: payload_info(&tx.payload, &id.to_hex()),
    }
}

fn payload_info(payload: &Payload, id: &str) -> Option<PayloadInfo> {
    let info = match payload {
        Payload::Transfer(p) => PayloadInfo::Transfer {
            sender: p.from.to_string(),
            receiver: p.to.to_string(),
            amount: p.amount,
        },
        Payload::Bond(p) => PayloadInfo::Bond {
            sender: p.from.to_string(),
            receiver: p.to.to_string(),
            stake: p.stake,
            public_key: p.public_key.map(|pk| pk.to_hex()).unwrap_or_default(),
        },
        Payload::Sortition(p) => PayloadInfo::Sortition {
            address: p.validator.to_string(),
            proof: hex::encode(p.proof),
        },
        Payload::Unbond(p) => PayloadInfo::Unbond {
            validator: p.validator.to_string(),
        },
        Payload::Withdraw(p) => PayloadInfo::Withdraw {
            validator_address: p.from.to_string(),
            account_address: p.to.to_string(),
            amount: p.amount,
        },
        Payload::BatchTransfer(p) => {
            tracing::error!(
                id,
                recipients = p.recipients.len(),
                "batch transfer projection not implemented"
            );
            return None;
        }
    };
    Some(info)
}
