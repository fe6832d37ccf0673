//! Log subscriber setup
//!
//! Logs go to stderr so that stdout carries only the report.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Without `-v` the `RUST_LOG` environment variable decides and defaults to
/// `warn`; `-v` selects `info`, `-vv` and more select `debug`.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
