use crate::customer::CustomerData;
use crate::model::{Classifier, FeatureFrame};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const CHURN_LABEL: &str = "Yes";
pub const NO_CHURN_LABEL: &str = "No";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub confidence: String,
}

/// Runs one customer through the classifier and formats the outcome.
pub struct Predictor {
    classifier: Arc<dyn Classifier>,
}

impl Predictor {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn predict(&self, customer: &CustomerData) -> Result<PredictionResult> {
        let frame = FeatureFrame::from(customer);

        let class = self.classifier.predict(&frame)?;
        let proba = self.classifier.predict_proba(&frame)?;
        debug!("Predicted class {} with probabilities {:?}", class, proba);

        let label = label_for(class)?;
        let confidence = proba.get(class).copied().ok_or_else(|| {
            Error::inference(format!(
                "predicted class {} has no entry in probability vector of length {}",
                class,
                proba.len()
            ))
        })?;

        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::inference(format!(
                "probability {} for class {} is outside [0, 1]",
                confidence, class
            )));
        }

        Ok(PredictionResult {
            prediction: label.to_string(),
            confidence: format_confidence(confidence),
        })
    }
}

fn label_for(class: usize) -> Result<&'static str> {
    match class {
        0 => Ok(NO_CHURN_LABEL),
        1 => Ok(CHURN_LABEL),
        other => Err(Error::inference(format!(
            "classifier returned unexpected class {}",
            other
        ))),
    }
}

/// Probability as a percentage with two decimals, e.g. `0.8742` -> `"87.42%"`.
pub fn format_confidence(probability: f64) -> String {
    // -0.0 == 0.0, so a negative zero is replaced and never prints as "-0.00%"
    let percent = if probability == 0.0 { 0.0 } else { probability * 100.0 };
    format!("{:.2}%", percent)
}
