//! API Server - HTTP server for the prediction endpoint

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use spam_classifier::{Config, ModelState};

use crate::handlers::{self, AppState};

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
    cors_origin: String,
}

impl ApiServer {
    /// Load the artifacts named in `config` and prepare the server
    pub fn from_config(config: &Config) -> Self {
        let model = ModelState::load(&config.artifact_paths());
        Self::new(
            model,
            config.server.listen_addr.clone(),
            config.server.cors_origin.clone(),
        )
    }

    pub fn new(model: ModelState, addr: String, cors_origin: String) -> Self {
        Self {
            state: Arc::new(AppState::new(model)),
            addr,
            cors_origin,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.state.model.is_loaded()
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/predict", post(handlers::predict))
            .layer(cors_layer(&self.cors_origin))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);
        if !self.model_loaded() {
            warn!("Serving without a model: /predict will return 500");
        }

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// CORS for a single origin with credentials. Wildcards are not allowed
/// alongside credentials, so methods and headers mirror the request.
/// Requests from any other origin get no CORS headers.
fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(origin) => cors.allow_origin(AllowOrigin::list([origin])),
        Err(e) => {
            warn!("Invalid CORS origin {:?}: {}; cross-origin requests disabled", origin, e);
            cors
        }
    }
}
