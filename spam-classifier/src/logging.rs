//! Tracing subscriber setup shared by `train-model` and `predict-api`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Filter used when RUST_LOG is unset: `config.level` for each target
pub fn default_directives(config: &LoggingConfig, targets: &[&str]) -> String {
    targets
        .iter()
        .map(|target| format!("{}={}", target, config.level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. RUST_LOG takes precedence over the
/// configured level.
pub fn init(config: &LoggingConfig, targets: &[&str]) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config, targets)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}
