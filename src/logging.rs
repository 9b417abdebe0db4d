use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the given level, e.g. `RUST_LOG=scroogecoin_lib=debug`
/// shows why each transaction was rejected.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
