//! Tracing initialization.
//!
//! Logs go to stderr so screen output on stdout stays clean. The level is
//! read from `RUST_LOG` and defaults to `warn`.
//!
//! ```bash
//! RUST_LOG=debug taskdesk tasks
//! RUST_LOG=taskdesk_core::session=debug,taskdesk_reqwest=trace taskdesk login ...
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "warn";

/// Initializes the tracing subscriber for structured logging.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}
