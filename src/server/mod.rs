mod extract;
pub mod handlers;
pub mod types;

pub use extract::ValidatedJson;
pub use handlers::AppState;

use crate::{config::Config, model, predictor::Predictor, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // The listener is only bound once the model is in memory
    let classifier = model::load_classifier(&config.model).await?;

    let app_state = AppState {
        predictor: Arc::new(Predictor::new(classifier)),
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);
    info!("  GET  /        - Health check");
    info!("  POST /predict - Churn prediction");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
