//! Tracing subscriber setup for the binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global fmt subscriber filtered by `directives`.
///
/// Falls back to `info` when the directives do not parse. Calling this twice
/// is harmless: the second install is ignored.
pub fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
