//! Telemetry initialisation for host processes embedding the engine.
//!
//! Structured logs only. The engine itself emits `debug` events on failed
//! operations and `trace` spans per call, never key or message bytes.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, Settings};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`Settings::log_level`] when set.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match settings.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to initialise gcm-engine tracing subscriber: {e}"))
}
