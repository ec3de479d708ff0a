use super::{Classifier, Pipeline};
use crate::config::ModelConfig;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Returns the first candidate path that exists, in the given order.
pub fn resolve_model_path(candidates: &[PathBuf]) -> Result<PathBuf> {
    for path in candidates {
        if path.exists() {
            return Ok(path.clone());
        }
        warn!("Model artifact not found at: {}", path.display());
    }

    Err(Error::ModelNotFound {
        tried: candidates.to_vec(),
    })
}

pub async fn load_pipeline(path: &Path) -> Result<Pipeline> {
    let json = tokio::fs::read_to_string(path).await?;
    Pipeline::from_json(&json)
}

/// Locates and loads the classification pipeline. Any failure here is
/// fatal for the service.
pub async fn load_classifier(config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
    let path = resolve_model_path(&config.paths)?;

    let pipeline = load_pipeline(&path).await.map_err(|e| {
        error!("Failed to load model artifact {}: {}", path.display(), e);
        Error::model(format!("failed to load {}: {}", path.display(), e))
    })?;

    info!(
        "{} loaded successfully (pipeline: {}, version: {}, estimator: {}, features: {})",
        path.display(),
        pipeline.name(),
        pipeline.version().unwrap_or("unversioned"),
        pipeline.estimator().kind(),
        pipeline.features().len()
    );

    Ok(Arc::new(pipeline))
}
