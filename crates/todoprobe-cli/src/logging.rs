//! `tracing` subscriber setup
//!
//! `RUST_LOG` wins over the `-v`/`-q` flags. `TODOPROBE_LOG_FORMAT=json`
//! switches to JSON lines.

use crate::config::Verbosity;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "TODOPROBE_LOG_FORMAT";

/// Filter from `RUST_LOG`, else from verbosity
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()))
}

/// Install the global subscriber; later calls are ignored
pub fn init_tracing(verbosity: Verbosity, use_color: bool) {
    let registry = tracing_subscriber::registry().with(env_filter(verbosity));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(use_color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}
