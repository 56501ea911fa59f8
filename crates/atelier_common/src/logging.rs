//! Logging utilities for the Atelier application.
//!
//! Every crate logs through `tracing`; the binary calls [`init_with_filter`]
//! once at startup to install the subscriber.

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a default filter directive.
///
/// `RUST_LOG` takes precedence over `default_directive` when it is set and
/// valid. Calling this more than once is harmless: the second call finds a
/// global subscriber already installed and does nothing.
///
/// # Arguments
///
/// * `default_directive` - e.g. `"info"` or `"atelier_booking=debug,info"`
pub fn init_with_filter(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized with default filter: {}", default_directive);
    }
}
