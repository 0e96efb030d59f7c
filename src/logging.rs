//! Logging setup for the `cairn` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the binary's job.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the filter directives (e.g. `cairn=debug`)
pub const LOG_ENV: &str = "CAIRN_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install a stderr `fmt` subscriber filtered by `CAIRN_LOG`.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
