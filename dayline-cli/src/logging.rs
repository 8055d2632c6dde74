use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `DAYLINE_LOG` beats the configured level.
///
/// Stdout stays reserved for command output (JSON, ICS) so it can be piped.
pub fn init_logging(config_level: &str) {
    let filter = EnvFilter::try_from_env("DAYLINE_LOG")
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests, embedding) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
