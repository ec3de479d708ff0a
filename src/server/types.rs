use serde::{Deserialize, Serialize};

pub use crate::customer::CustomerData;
pub use crate::predictor::PredictionResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
