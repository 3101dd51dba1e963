//! Logging setup for the barbershop backend.
//!
//! All crates log through the `tracing` macros; the binary calls [`init`] or
//! [`init_with_level`] once at startup. `RUST_LOG` is honoured in addition to
//! the configured level for the `barbershop*` targets.

use std::str::FromStr;
use tracing::{info, warn, Level};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber from a configured level name such as
/// `"debug"`. Unknown names fall back to INFO.
pub fn init_from_name(level: Option<&str>) {
    let parsed = level.map(Level::from_str);
    match parsed {
        Some(Ok(level)) => init_with_level(level),
        Some(Err(_)) => {
            init();
            warn!("Unknown log level {:?}, using INFO", level);
        }
        None => init(),
    }
}

/// Initialize the tracing subscriber with a specific log level.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = Directive::from_str(&format!("barbershop={}", level)) {
        filter = filter.add_directive(directive);
    }

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log a result, at INFO on success and at ERROR with context on failure.
/// Returns the result unchanged so it can be chained.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => tracing::error!("{}: {}", error_context, e),
    }
    result
}
