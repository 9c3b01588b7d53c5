//! # Prometheus Metrics
//!
//! Operational metrics for the gateway. Scraped by Prometheus at the
//! `/metrics` HTTP endpoint on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the gateway.
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    /// RPC calls, by method.
    pub rpc_requests_total: IntCounterVec,
    /// Failed RPC calls, by JSON-RPC error code.
    pub rpc_errors_total: IntCounterVec,
    /// Transactions accepted into the pending pool.
    pub transactions_broadcast_total: IntCounter,
    /// Blocks committed by the local block loop.
    pub blocks_committed_total: IntCounter,
    /// Transactions committed by the local block loop.
    pub transactions_committed_total: IntCounter,
    /// Current number of pending transactions.
    pub transactions_in_pool: IntGauge,
    /// Height of the last committed block.
    pub block_height: IntGauge,
    /// RPC handling latency in seconds.
    pub rpc_latency_seconds: Histogram,
}

impl GatewayMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("nova_gateway".into()), None)?;

        let rpc_requests_total = IntCounterVec::new(
            Opts::new("rpc_requests_total", "Total JSON-RPC requests by method"),
            &["method"],
        )?;
        registry.register(Box::new(rpc_requests_total.clone()))?;

        let rpc_errors_total = IntCounterVec::new(
            Opts::new("rpc_errors_total", "Total JSON-RPC errors by error code"),
            &["code"],
        )?;
        registry.register(Box::new(rpc_errors_total.clone()))?;

        let transactions_broadcast_total = IntCounter::new(
            "transactions_broadcast_total",
            "Total transactions accepted into the pending pool",
        )?;
        registry.register(Box::new(transactions_broadcast_total.clone()))?;

        let blocks_committed_total =
            IntCounter::new("blocks_committed_total", "Total blocks committed")?;
        registry.register(Box::new(blocks_committed_total.clone()))?;

        let transactions_committed_total = IntCounter::new(
            "transactions_committed_total",
            "Total transactions included in committed blocks",
        )?;
        registry.register(Box::new(transactions_committed_total.clone()))?;

        let transactions_in_pool = IntGauge::new(
            "transactions_in_pool",
            "Current number of pending transactions in the pool",
        )?;
        registry.register(Box::new(transactions_in_pool.clone()))?;

        let block_height = IntGauge::new("block_height", "Height of the last committed block")?;
        registry.register(Box::new(block_height.clone()))?;

        let rpc_latency_seconds = Histogram::with_opts(
            HistogramOpts::new("rpc_latency_seconds", "JSON-RPC handling latency in seconds")
                .buckets(vec![
                    0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
                ]),
        )?;
        registry.register(Box::new(rpc_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            rpc_requests_total,
            rpc_errors_total,
            transactions_broadcast_total,
            blocks_committed_total,
            transactions_committed_total,
            transactions_in_pool,
            block_height,
            rpc_latency_seconds,
        })
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<GatewayMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
