use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset; keeps the spinner and printed
/// outcome free of debug noise
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize structured logging on stderr
///
/// Must be called once at startup, before the first request.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    debug!("Logging initialized");
}
