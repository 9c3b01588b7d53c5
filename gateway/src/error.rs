//! # Gateway Errors
//!
//! Every gateway operation fails with a [`GatewayError`]. The variant says
//! what went wrong; [`GatewayError::code`] says how the caller should treat
//! it. Several variants share a code on purpose: "couldn't parse", "parsed
//! but invalid" and "not found" are all `InvalidArgument`, and the
//! [`GatewayError::kind`] tag is what tells them apart on the wire.

use nova_tx::rpc::RpcError;
use nova_tx::state::PoolError;
use thiserror::Error;

/// Caller-facing status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// The request itself is wrong. Retrying it unchanged will fail again.
    InvalidArgument,
    /// The request was well-formed but the pool declined it.
    Canceled,
    /// The node is at fault.
    Internal,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Input that could not be parsed: hex, IDs, addresses, keys, bytes.
    #[error("{0}")]
    Malformed(String),

    /// Input that parsed but breaks a rule.
    #[error("{0}")]
    Invalid(String),

    #[error("transaction not found")]
    NotFound,

    #[error("couldn't add to transaction pool: {0}")]
    Rejected(#[source] PoolError),

    /// Holds the real cause for logs. Callers only see "internal error".
    #[error("internal error")]
    Internal(String),
}

impl GatewayError {
    pub fn code(&self) -> Code {
        match self {
            Self::Malformed(_) | Self::Invalid(_) | Self::NotFound => Code::InvalidArgument,
            Self::Rejected(_) => Code::Canceled,
            Self::Internal(_) => Code::Internal,
        }
    }

    /// Stable machine-readable tag, carried in the RPC error data.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::Invalid(_) => "invalid",
            Self::NotFound => "not_found",
            Self::Rejected(_) => "rejected",
            Self::Internal(_) => "internal",
        }
    }

    /// The JSON-RPC error object for this failure.
    pub fn to_rpc_error(&self) -> RpcError {
        let message = self.to_string();
        let err = match self.code() {
            Code::InvalidArgument => RpcError::invalid_params(message),
            Code::Canceled => RpcError::transaction_rejected(message),
            Code::Internal => RpcError::internal_error(message),
        };
        err.with_data(serde_json::json!({ "kind": self.kind() }))
    }
}
