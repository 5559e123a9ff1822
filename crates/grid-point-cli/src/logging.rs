//! Logging setup for the command-line front end

use tracing_subscriber::prelude::*;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info";

/// Initialize logging with sensible defaults
///
/// Log lines go to stderr so stdout only carries query results.
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!("Logging initialized");
}
