//! Subscriber setup for the binary

use dlv_model::LogConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to stderr
///
/// `RUST_LOG` wins over the configured filter. JSON output is used when
/// either the config or `force_json` asks for it.
///
/// # Errors
/// Returns an error for an invalid filter or when a subscriber is already set
pub fn init(config: &LogConfig, force_json: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = if config.json || force_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
