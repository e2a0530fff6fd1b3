//! Tracing setup for the `spmc` binary.
//!
//! Events go to stderr so that schedules, links and JSON on stdout stay
//! clean. `RUST_LOG` overrides the level the caller asks for.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the stderr subscriber with `default_level` (debug, info, warn,
/// error). A second call keeps the subscriber already installed.
pub fn init_with_level(default_level: &str) {
    let installed = tracing_subscriber::registry()
        .with(filter(default_level))
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Capture logs in test output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
