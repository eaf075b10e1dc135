use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,container=debug";

fn env_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(DEFAULT_FILTER)))
}

/// Initialize tracing subscriber with compact output on stdout.
/// - Respects `RUST_LOG` if set
/// - Falls back to `filter`, or `info,container=debug` when none is given
pub fn init_logging_default(filter: Option<&str>) {
    let _ = fmt()
        .with_env_filter(env_filter(filter))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// Same filter resolution as [`init_logging_default`].
pub fn init_logging_json(filter: Option<&str>) {
    let _ = fmt()
        .with_env_filter(env_filter(filter))
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
