//! Process-wide `tracing` subscriber for the server binary.
//!
//! `RUST_LOG` sets the filter. `LOG_FORMAT=text` switches from JSON lines
//! to human-readable output for local runs.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,gatehouse=info";

pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let text = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("text"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if text {
        registry
            .with(fmt::layer().with_target(true).compact())
            .init();
    } else {
        // Request span fields (trace id, method, path) ride along on every event
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(false)
                    .with_ansi(false),
            )
            .init();
    }
}
