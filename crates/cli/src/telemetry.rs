//! Tracing initialisation for the envelope tools.
//!
//! Logs always go to stderr. Stdout carries the tool's primary output (the
//! envelope, or the decoded report) and must stay clean.
//!
//! # Telemetry invariants
//!
//! - **No key material or payloads** appear in any log field. A secret may
//!   only be referred to by its fingerprint.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str, format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
