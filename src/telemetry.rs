//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::error::{Error, Result};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => filter_for(&directives)?,
        _ => filter_for(level)?,
    };

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::internal(format!("Failed to install tracing subscriber: {}", e)))
}

fn filter_for(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| Error::configuration(format!("Invalid log level '{}': {}", directives, e)))
}
