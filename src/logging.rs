//! Diagnostic tracing for the simulator and controllers.
//!
//! Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr so it never
//! mixes with report files or the summary printed on stdout.
//!
//! ```bash
//! RUST_LOG=vacuum_explorer::simulation::agent=debug vacuum_explorer run --house-path houses
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Call once from `main`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
