//! Tracing setup for the command-line front end.
//!
//! Enable with `RUST_LOG=aidl=debug` (state transitions) or
//! `RUST_LOG=aidl=trace` (one event per declaration).

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr subscriber, only when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
