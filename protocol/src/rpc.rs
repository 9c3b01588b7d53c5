//! # JSON-RPC API Definitions
//!
//! Type-safe definitions for the transaction gateway's JSON-RPC API. This
//! module defines the request/response types and the method enumeration;
//! the HTTP server lives in the gateway binary (using axum).
//!
//! The API follows JSON-RPC 2.0 with method names prefixed `nova_`.
//! `params` is always a single object, one of the `*Request` structs below.
//! Optional request fields default to zero or empty, and zero means
//! "unset": the gateway fills in its default.
//!
//! ## Method Index
//!
//! | Method                            | Description                                |
//! |-----------------------------------|--------------------------------------------|
//! | `nova_getTransaction`             | Committed transaction by ID                |
//! | `nova_broadcastTransaction`       | Submit a signed raw transaction            |
//! | `nova_calculateFee`               | Fee for an amount and payload type         |
//! | `nova_getRawTransferTransaction`  | Unsigned raw transfer                      |
//! | `nova_getRawBondTransaction`      | Unsigned raw bond                          |
//! | `nova_getRawUnbondTransaction`    | Unsigned raw unbond                        |
//! | `nova_getRawWithdrawTransaction`  | Unsigned raw withdraw                      |
//! | `nova_decodeRawTransaction`       | Decode a raw transaction without checks    |

use serde::{Deserialize, Serialize};

use crate::transaction::{Amount, PayloadType};

// ---------------------------------------------------------------------------
// RPC Method Enumeration
// ---------------------------------------------------------------------------

/// Supported JSON-RPC methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpcMethod {
    /// Params: [`GetTransactionRequest`].
    #[serde(rename = "nova_getTransaction")]
    GetTransaction,
    /// Params: [`BroadcastTransactionRequest`].
    #[serde(rename = "nova_broadcastTransaction")]
    BroadcastTransaction,
    /// Params: [`CalculateFeeRequest`].
    #[serde(rename = "nova_calculateFee")]
    CalculateFee,
    /// Params: [`GetRawTransferTransactionRequest`].
    #[serde(rename = "nova_getRawTransferTransaction")]
    GetRawTransferTransaction,
    /// Params: [`GetRawBondTransactionRequest`].
    #[serde(rename = "nova_getRawBondTransaction")]
    GetRawBondTransaction,
    /// Params: [`GetRawUnbondTransactionRequest`].
    #[serde(rename = "nova_getRawUnbondTransaction")]
    GetRawUnbondTransaction,
    /// Params: [`GetRawWithdrawTransactionRequest`].
    #[serde(rename = "nova_getRawWithdrawTransaction")]
    GetRawWithdrawTransaction,
    /// Params: [`DecodeRawTransactionRequest`].
    #[serde(rename = "nova_decodeRawTransaction")]
    DecodeRawTransaction,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 8] = [
        Self::GetTransaction,
        Self::BroadcastTransaction,
        Self::CalculateFee,
        Self::GetRawTransferTransaction,
        Self::GetRawBondTransaction,
        Self::GetRawUnbondTransaction,
        Self::GetRawWithdrawTransaction,
        Self::DecodeRawTransaction,
    ];

    /// The wire name, e.g. `"nova_getTransaction"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetTransaction => "nova_getTransaction",
            Self::BroadcastTransaction => "nova_broadcastTransaction",
            Self::CalculateFee => "nova_calculateFee",
            Self::GetRawTransferTransaction => "nova_getRawTransferTransaction",
            Self::GetRawBondTransaction => "nova_getRawBondTransaction",
            Self::GetRawUnbondTransaction => "nova_getRawUnbondTransaction",
            Self::GetRawWithdrawTransaction => "nova_getRawWithdrawTransaction",
            Self::DecodeRawTransaction => "nova_decodeRawTransaction",
        }
    }

    /// Looks up a method by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

// ---------------------------------------------------------------------------
// RPC Request / Response
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
///
/// `method` stays a string so an unknown name can be answered with
/// "method not found" instead of failing the whole request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version. Always "2.0".
    pub jsonrpc: String,
    /// Request identifier. Echoed back in the response.
    #[serde(default)]
    pub id: serde_json::Value,
    pub method: String,
    /// Method-specific parameters object.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(id: serde_json::Value, method: RpcMethod, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.as_str().to_string(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response. Exactly one of `result` or `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// RPC Errors
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 error object.
///
/// Error codes:
/// - `-32700`: Parse error
/// - `-32600`: Invalid request
/// - `-32601`: Method not found
/// - `-32602`: Invalid params (also every invalid-argument gateway error)
/// - `-32603`: Internal error
/// - `-32003`: Transaction rejected by the pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const TRANSACTION_REJECTED: i32 = -32003;

    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(Self::PARSE_ERROR, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(Self::INVALID_REQUEST, msg)
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            Self::METHOD_NOT_FOUND,
            format!("method not found: {}", method.into()),
        )
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(Self::INVALID_PARAMS, msg)
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL_ERROR, msg)
    }

    /// The pending pool refused the transaction.
    pub fn transaction_rejected(reason: impl Into<String>) -> Self {
        Self::new(Self::TRANSACTION_REJECTED, reason)
    }

    /// Attaches structured error data.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

// ---------------------------------------------------------------------------
// GetTransaction
// ---------------------------------------------------------------------------

/// How much of a committed transaction to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionVerbosity {
    /// ID and raw bytes only.
    #[default]
    Data,
    /// Decoded fields and payload.
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionRequest {
    /// Hex transaction ID.
    pub id: String,
    #[serde(default)]
    pub verbosity: TransactionVerbosity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionResponse {
    pub block_height: u32,
    pub block_time: u32,
    pub transaction: TransactionView,
}

/// A committed transaction at the requested verbosity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionView {
    Data(TransactionData),
    Info(TransactionInfo),
}

impl TransactionView {
    /// Hex transaction ID, present at every verbosity.
    pub fn id(&self) -> &str {
        match self {
            Self::Data(d) => &d.id,
            Self::Info(i) => &i.id,
        }
    }
}

/// `data` verbosity: the ID and the canonical bytes, nothing decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionData {
    pub id: String,
    /// Hex of the canonical bytes.
    pub data: String,
}

// ---------------------------------------------------------------------------
// BroadcastTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastTransactionRequest {
    /// Hex of the signed canonical bytes.
    pub signed_raw_transaction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastTransactionResponse {
    pub id: String,
}

// ---------------------------------------------------------------------------
// CalculateFee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateFeeRequest {
    pub amount: Amount,
    pub payload_type: PayloadType,
    /// When set, the fee comes out of `amount` rather than on top of it.
    #[serde(default)]
    pub fixed_amount: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateFeeResponse {
    pub amount: Amount,
    pub fee: Amount,
}

// ---------------------------------------------------------------------------
// Raw transaction builders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRawTransferTransactionRequest {
    pub sender: String,
    pub receiver: String,
    pub amount: Amount,
    #[serde(default)]
    pub fee: Amount,
    #[serde(default)]
    pub lock_time: u32,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRawBondTransactionRequest {
    pub sender: String,
    pub receiver: String,
    /// Hex validator public key; empty when the validator is already known.
    #[serde(default)]
    pub public_key: String,
    pub stake: Amount,
    #[serde(default)]
    pub fee: Amount,
    #[serde(default)]
    pub lock_time: u32,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRawUnbondTransactionRequest {
    pub validator_address: String,
    #[serde(default)]
    pub lock_time: u32,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRawWithdrawTransactionRequest {
    pub validator_address: String,
    pub account_address: String,
    pub amount: Amount,
    #[serde(default)]
    pub fee: Amount,
    #[serde(default)]
    pub lock_time: u32,
    #[serde(default)]
    pub memo: String,
}

/// Response of every raw builder: lowercase hex of the unsigned bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRawTransactionResponse {
    pub raw_transaction: String,
}

// ---------------------------------------------------------------------------
// DecodeRawTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeRawTransactionRequest {
    pub raw_transaction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeRawTransactionResponse {
    pub transaction: TransactionInfo,
}

// ---------------------------------------------------------------------------
// Transaction projection
// ---------------------------------------------------------------------------

/// The decoded external shape of a transaction.
///
/// Every envelope field is set. `payload` holds the variant body, or `None`
/// for payload types that have no projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub id: String,
    #[serde(default)]
    pub version: u8,
    #[serde(default)]
    pub lock_time: u32,
    #[serde(default)]
    pub fee: Amount,
    #[serde(default)]
    pub value: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<PayloadType>,
    #[serde(default)]
    pub memo: String,
    /// Hex; empty when absent.
    #[serde(default)]
    pub public_key: String,
    /// Hex; empty when absent.
    #[serde(default)]
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadInfo>,
}

/// Variant body of a projected transaction. Addresses are Bech32 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadInfo {
    Transfer {
        sender: String,
        receiver: String,
        amount: Amount,
    },
    Bond {
        sender: String,
        receiver: String,
        stake: Amount,
        /// Hex; empty when the bond carries no key.
        public_key: String,
    },
    Sortition {
        address: String,
        /// Hex.
        proof: String,
    },
    Unbond {
        validator: String,
    },
    Withdraw {
        validator_address: String,
        account_address: String,
        amount: Amount,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rpc_request_serialization() {
        let req = RpcRequest::new(json!(1), RpcMethod::CalculateFee, json!({}));

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("nova_calculateFee"));

        let recovered: RpcRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(
            RpcMethod::from_name(&recovered.method),
            Some(RpcMethod::CalculateFee)
        );
    }

    #[test]
    fn rpc_error_response() {
        let resp = RpcResponse::error(json!(1), RpcError::internal_error("something broke"));
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, -32603);
    }

    #[test]
    fn error_codes_are_correct() {
        assert_eq!(RpcError::parse_error("").code, -32700);
        assert_eq!(RpcError::invalid_request("").code, -32600);
        assert_eq!(RpcError::method_not_found("").code, -32601);
        assert_eq!(RpcError::invalid_params("").code, -32602);
        assert_eq!(RpcError::internal_error("").code, -32603);
        assert_eq!(RpcError::transaction_rejected("").code, -32003);
    }

    #[test]
    fn all_methods_have_matching_names() {
        for method in RpcMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
            assert_eq!(RpcMethod::from_name(method.as_str()), Some(method));
        }
        assert_eq!(RpcMethod::from_name("nova_getBalance"), None);
    }

    #[test]
    fn optional_fields_default_to_sentinels() {
        let req: GetRawTransferTransactionRequest = serde_json::from_value(json!({
            "sender": "a",
            "receiver": "b",
            "amount": 5_000_000
        }))
        .unwrap();
        assert_eq!(req.fee, Amount::ZERO);
        assert_eq!(req.lock_time, 0);
        assert!(req.memo.is_empty());

        let req: GetTransactionRequest = serde_json::from_value(json!({ "id": "00" })).unwrap();
        assert_eq!(req.verbosity, TransactionVerbosity::Data);
    }

    #[test]
    fn verbosity_and_payload_type_names() {
        let req: GetTransactionRequest =
            serde_json::from_value(json!({ "id": "00", "verbosity": "info" })).unwrap();
        assert_eq!(req.verbosity, TransactionVerbosity::Info);

        let req: CalculateFeeRequest = serde_json::from_value(json!({
            "amount": 1000,
            "payload_type": "bond",
            "fixed_amount": true
        }))
        .unwrap();
        assert_eq!(req.payload_type, PayloadType::Bond);
        assert!(req.fixed_amount);
    }

    #[test]
    fn payload_info_is_tagged_by_variant() {
        let info = PayloadInfo::Unbond {
            validator: "nova1xyz".into(),
        };
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({ "unbond": { "validator": "nova1xyz" } })
        );
    }

    #[test]
    fn data_view_carries_only_id_and_bytes() {
        let view = TransactionView::Data(TransactionData {
            id: "ab".into(),
            data: "cd".into(),
        });
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({ "id": "ab", "data": "cd" })
        );
        assert_eq!(view.id(), "ab");
    }

    #[test]
    fn views_deserialize_by_shape() {
        let data: TransactionView =
            serde_json::from_value(json!({ "id": "ab", "data": "cd" })).unwrap();
        assert!(matches!(data, TransactionView::Data(_)));

        let info = TransactionInfo {
            id: "ab".into(),
            version: 1,
            payload_type: Some(PayloadType::Unbond),
            ..Default::default()
        };
        let back: TransactionView =
            serde_json::from_value(serde_json::to_value(&info).unwrap()).unwrap();
        assert_eq!(back, TransactionView::Info(info));
    }
}
