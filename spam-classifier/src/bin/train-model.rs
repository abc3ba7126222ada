//! Train the spam classifier and write its artifacts
//!
//! Usage: train-model [config.toml]

use spam_classifier::{logging, training, Config};
use std::path::PathBuf;
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    let config_arg = std::env::args().nth(1).map(PathBuf::from);
    let config_path = Config::locate(config_arg.as_deref());
    let config = Config::load(config_path.as_deref())?;

    logging::init(&config.logging, &["train_model", "spam_classifier"]);

    info!("Starting train-model v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let report = match training::train(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("Training failed: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Training complete: {} train / {} test samples, {} features, train accuracy {:.4}, test accuracy {:.4}",
        report.train_samples,
        report.test_samples,
        report.vocabulary_size,
        report.train_accuracy,
        report.test_accuracy
    );
    if !report.converged {
        warn!("The solver stopped before converging; predictions may be underfit");
    }

    Ok(())
}
