//! Tracing setup for the `codesearch` binary.

use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "CODESEARCH_LOG";

/// Installs a `tracing` subscriber writing to stderr, level controlled by
/// the `CODESEARCH_LOG` environment variable (`RUST_LOG`-style filter
/// syntax), defaulting to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
