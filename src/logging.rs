//! Logging configuration for askdb.
//!
//! Logs go to stderr so that stdout stays clean for the answer (and for
//! `--json` output piped into other tools).

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging.
///
/// The filter is taken from `RUST_LOG` when set, defaulting to `info`.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
