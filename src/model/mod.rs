pub mod frame;
pub mod loader;
pub mod pipeline;

pub use frame::{FeatureFrame, FeatureValue};
pub use loader::{load_classifier, resolve_model_path};
pub use pipeline::Pipeline;

use crate::Result;

/// A pre-trained binary classifier over one customer row.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait Classifier: Send + Sync {
    /// Predicted class index.
    fn predict(&self, frame: &FeatureFrame) -> Result<usize>;

    /// Probability of each class, indexed by class.
    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<f64>>;
}
