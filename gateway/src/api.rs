//! # JSON-RPC + REST API
//!
//! Builds the axum router that exposes the gateway's HTTP interface.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                 | Description                     |
//! |--------|----------------------|---------------------------------|
//! | GET    | `/health`            | Liveness check                  |
//! | POST   | `/rpc`               | JSON-RPC 2.0 gateway            |
//! | GET    | `/transactions/:id`  | Committed transaction by ID     |

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use nova_tx::rpc::{
    GetTransactionRequest, RpcError, RpcMethod, RpcRequest, RpcResponse, TransactionVerbosity,
};

use crate::error::GatewayError;
use crate::metrics::SharedMetrics;
use crate::service::TransactionService;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gateway's reported version string.
    pub version: String,
    pub service: Arc<TransactionService>,
    pub metrics: SharedMetrics,
}

/// Error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// One of `malformed`, `invalid`, `not_found`, `rejected`, `internal`.
    pub kind: String,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/rpc", post(rpc_handler))
        .route("/transactions/:id", get(transaction_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: Returns 200 while the process is serving.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "version": state.version })),
    )
}

/// `POST /rpc`: JSON-RPC 2.0 gateway.
///
/// The body is taken as raw bytes so that unparseable JSON is answered with
/// a JSON-RPC parse error rather than axum's plain-text rejection.
async fn rpc_handler(State(state): State<AppState>, body: Bytes) -> Json<RpcResponse> {
    let _timer = state.metrics.rpc_latency_seconds.start_timer();

    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            return reply_error(
                &state,
                serde_json::Value::Null,
                RpcError::parse_error(format!("parse error: {e}")),
            )
        }
    };

    let id = value.get("id").cloned().unwrap_or(serde_json::Value::Null);
    let req: RpcRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return reply_error(
                &state,
                id,
                RpcError::invalid_request(format!("invalid request: {e}")),
            )
        }
    };

    if req.jsonrpc != "2.0" {
        return reply_error(
            &state,
            req.id,
            RpcError::invalid_request("invalid request: jsonrpc must be \"2.0\""),
        );
    }

    let Some(method) = RpcMethod::from_name(&req.method) else {
        state
            .metrics
            .rpc_requests_total
            .with_label_values(&["unknown"])
            .inc();
        return reply_error(&state, req.id, RpcError::method_not_found(&req.method));
    };

    state
        .metrics
        .rpc_requests_total
        .with_label_values(&[method.as_str()])
        .inc();

    match dispatch(&state, method, req.params).await {
        Ok(result) => Json(RpcResponse::success(req.id, result)),
        Err(err) => reply_error(&state, req.id, err),
    }
}

/// `GET /transactions/:id`: Committed transaction with decoded fields.
async fn transaction_handler(Path(id): Path<String>, State(state): State<AppState>) -> Response {
    let req = GetTransactionRequest {
        id,
        verbosity: TransactionVerbosity::Info,
    };

    match state.service.get_transaction(&req) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => {
            let status = match &e {
                GatewayError::NotFound => StatusCode::NOT_FOUND,
                GatewayError::Internal(cause) => {
                    tracing::error!(cause = %cause, "transaction lookup failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::BAD_REQUEST,
            };
            let body = ErrorResponse {
                error: e.to_string(),
                kind: e.kind().to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

async fn dispatch(
    state: &AppState,
    method: RpcMethod,
    params: serde_json::Value,
) -> Result<serde_json::Value, RpcError> {
    let service = &state.service;
    match method {
        RpcMethod::GetTransaction => into_result(service.get_transaction(&params_as(params)?)),
        RpcMethod::BroadcastTransaction => {
            let result = service.broadcast_transaction(&params_as(params)?).await;
            if result.is_ok() {
                state.metrics.transactions_broadcast_total.inc();
            }
            into_result(result)
        }
        RpcMethod::CalculateFee => into_result(service.calculate_fee(&params_as(params)?)),
        RpcMethod::GetRawTransferTransaction => {
            into_result(service.get_raw_transfer_transaction(&params_as(params)?))
        }
        RpcMethod::GetRawBondTransaction => {
            into_result(service.get_raw_bond_transaction(&params_as(params)?))
        }
        RpcMethod::GetRawUnbondTransaction => {
            into_result(service.get_raw_unbond_transaction(&params_as(params)?))
        }
        RpcMethod::GetRawWithdrawTransaction => {
            into_result(service.get_raw_withdraw_transaction(&params_as(params)?))
        }
        RpcMethod::DecodeRawTransaction => {
            into_result(service.decode_raw_transaction(&params_as(params)?))
        }
    }
}

fn params_as<T: DeserializeOwned>(params: serde_json::Value) -> Result<T, RpcError> {
    serde_json::from_value(params)
        .map_err(|e| RpcError::invalid_params(format!("invalid params: {e}")))
}

fn into_result<T: Serialize>(result: Result<T, GatewayError>) -> Result<serde_json::Value, RpcError> {
    match result {
        Ok(resp) => serde_json::to_value(resp).map_err(|e| {
            tracing::error!(error = %e, "failed to serialize rpc result");
            RpcError::internal_error("internal error")
        }),
        Err(e) => {
            if let GatewayError::Internal(cause) = &e {
                tracing::error!(cause = %cause, "rpc call failed");
            }
            Err(e.to_rpc_error())
        }
    }
}

fn reply_error(state: &AppState, id: serde_json::Value, err: RpcError) -> Json<RpcResponse> {
    let code = err.code.to_string();
    state
        .metrics
        .rpc_errors_total
        .with_label_values(&[code.as_str()])
        .inc();
    Json(RpcResponse::error(id, err))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
