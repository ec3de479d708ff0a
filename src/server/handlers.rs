use super::extract::ValidatedJson;
use super::types::{CustomerData, ErrorResponse, HealthResponse, PredictionResult};
use crate::predictor::Predictor;
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{error, info, info_span};
use uuid::Uuid;

pub const HEALTH_MESSAGE: &str = "Churn Prediction API is up!";

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: HEALTH_MESSAGE.to_string(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    ValidatedJson(customer): ValidatedJson<CustomerData>,
) -> Result<Json<PredictionResult>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    let span = info_span!("predict", %request_id);

    span.in_scope(|| match state.predictor.predict(&customer) {
        Ok(result) => {
            info!(
                "Prediction: {} (confidence {})",
                result.prediction, result.confidence
            );
            Ok(Json(result))
        }
        Err(e) => {
            error!("Error during prediction: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: format!("Internal server error: {}", e),
                }),
            ))
        }
    })
}
