//! Tracing subscriber setup
//!
//! Pretty output for local development, JSON lines when `LOG_FORMAT=json`.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured default filter applies.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.log_json {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}
