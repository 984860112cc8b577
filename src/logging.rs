//! Process-wide `tracing` subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_VAR: &str = "OBITUARY_LOG";

/// Filter used when the environment does not provide one.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "code_obituary=info"
    } else {
        "code_obituary=warn"
    }
}

/// Installs a stderr fmt layer filtered by [`LOG_VAR`].
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
