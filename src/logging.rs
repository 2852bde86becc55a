//! Tracing setup for binaries and demos.
//!
//! The library only emits `tracing` events. Call [`init_tracing`] from a
//! binary to see them; the filter comes from `SPARK_FIBER_LOG`
//! (e.g. `SPARK_FIBER_LOG=spark_fiber=trace`), defaulting to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SPARK_FIBER_LOG";

/// Install a stderr fmt subscriber. Does nothing if one is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}
