#![forbid(unsafe_code)]

//! Logging glue.
//!
//! With the `tracing` feature the `tracing` macros are re-exported here and
//! at the crate root so downstream crates can log without naming the
//! dependency. With `tracing-json` a JSON subscriber can be installed for
//! production hosts; filtering follows `RUST_LOG`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "popmenu=info";

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
}
