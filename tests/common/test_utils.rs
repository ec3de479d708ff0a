use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use churn_api::{
    model::Classifier,
    predictor::Predictor,
    server::{AppState, router},
};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

/// Build the full router around the given classifier
pub fn create_test_app(classifier: Arc<dyn Classifier>) -> Router {
    router(AppState {
        predictor: Arc::new(Predictor::new(classifier)),
    })
}

/// The documented example customer as a JSON body
pub fn example_payload() -> Value {
    json!({
        "Gender": "Female",
        "Senior_Citizen": "No",
        "Partner": "Yes",
        "Dependents": "No",
        "Tenure_Months": 1,
        "Phone_Service": "No",
        "Multiple_Lines": "Phone_service",
        "Internet_Service": "DSL",
        "Online_Security": "No",
        "Online_Backup": "Yes",
        "Device_Protection": "No",
        "Tech_Support": "No",
        "Streaming_TV": "No",
        "Streaming_Movies": "No",
        "Contract": "Month-to-month",
        "Paperless_Billing": "Yes",
        "Payment_Method": "Electronic_check",
        "Monthly_Charges": 29.85,
        "Total_Charges": 29.85
    })
}

pub fn predict_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and decode the JSON response body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Pipeline shipped with the repository
pub fn bundled_pipeline_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts/pipeline.json")
}

/// Small tree pipeline: churn when tenure is short on a monthly contract
pub const SAMPLE_PIPELINE_JSON: &str = r#"
{
  "name": "churn-trees-test",
  "version": "0.0.1",
  "features": [
    { "column": "Tenure_Months", "encoder": { "type": "numeric" } },
    { "column": "Contract", "encoder": {
        "type": "one_hot",
        "categories": ["Month-to-month", "One_year", "Two_year"]
    }}
  ],
  "estimator": {
    "type": "tree_ensemble",
    "base_score": 0.0,
    "trees": [
      { "nodes": [
        { "type": "split", "feature": 0, "threshold": 12.0, "left": 1, "right": 2 },
        { "type": "leaf", "value": 1.2 },
        { "type": "leaf", "value": -1.0 }
      ]},
      { "nodes": [
        { "type": "split", "feature": 1, "threshold": 0.5, "left": 1, "right": 2 },
        { "type": "leaf", "value": -0.8 },
        { "type": "leaf", "value": 0.6 }
      ]}
    ]
  }
}
"#;

/// Write a file into the directory, creating parents as needed
pub fn write_file(dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
