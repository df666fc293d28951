//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "hivemind=info";

/// Installs a `tracing` subscriber that writes formatted events to stderr.
///
/// Verbosity comes from `RUST_LOG` (for example
/// `RUST_LOG=hivemind_session=debug`), falling back to
/// [`DEFAULT_LOG_FILTER`]. Calling this more than once is harmless; only
/// the first call installs anything.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
