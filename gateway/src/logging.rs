//! Log setup for the gateway binary.
//!
//! `run` logs gateway and core events at info and HTTP spans at debug.
//! `decode` and `keygen` only surface warnings. Output always goes to
//! stderr because those two subcommands print their JSON result on stdout
//! for scripts to consume. `NOVA_LOG_FORMAT` (or `--log-format`) picks
//! pretty or JSON lines for `run`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for `run`.
pub const SERVE_FILTER: &str = "nova_gateway=info,nova_tx=info,tower_http=debug";

/// Filter for the offline subcommands, keeping stdout output uncluttered.
pub const OFFLINE_FILTER: &str = "nova_gateway=warn,nova_tx=warn";

/// Line format of the `run` subcommand's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Colored lines with source locations.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// `"json"` in any case selects JSON; anything else falls back to pretty
    /// rather than failing startup over a typo.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the process-wide subscriber. Each subcommand calls it once
/// before doing any work; a second call panics because the global default
/// is already set.
///
/// `RUST_LOG` replaces `default_level` entirely when set, e.g.
/// `RUST_LOG=nova_tx::state=debug` to trace pool admission.
pub fn init_logging(default_level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
    }

    tracing::debug!(?format, "logging initialized");
}
