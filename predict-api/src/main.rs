//! predict-api: Spam prediction HTTP server

use predict_api::ApiServer;
use spam_classifier::{logging, Config};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_arg = std::env::args().nth(1).map(PathBuf::from);
    let config_path = Config::locate(config_arg.as_deref());
    let config = Config::load(config_path.as_deref())?;

    // Initialize logging
    logging::init(
        &config.logging,
        &["predict_api", "spam_classifier", "tower_http"],
    );

    info!("Starting predict-api v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("  Config: {}", path.display()),
        None => info!("  Config: defaults (no config file found)"),
    }
    info!("  Model: {}", config.paths.model.display());
    info!("  Vectorizer: {}", config.paths.vectorizer.display());
    info!("  CORS origin: {}", config.server.cors_origin);

    let server = ApiServer::from_config(&config);
    server.run().await?;

    Ok(())
}
