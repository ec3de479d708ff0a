//! Serialized classification pipeline: per-column encoders followed by a
//! binary estimator whose raw score goes through the logistic sigmoid.

use super::{Classifier, FeatureFrame, FeatureValue};
use crate::customer::COLUMNS;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// A validated pipeline. Every way of building one, including serde,
/// goes through validation, so evaluation never indexes out of bounds.
#[derive(Debug, Clone, Serialize)]
pub struct Pipeline {
    name: String,
    version: Option<String>,
    features: Vec<FeatureSpec>,
    estimator: Estimator,
}

/// On-disk shape of a pipeline, before validation.
#[derive(Debug, Deserialize)]
struct PipelineDocument {
    name: String,
    #[serde(default)]
    version: Option<String>,
    features: Vec<FeatureSpec>,
    estimator: Estimator,
}

impl<'de> Deserialize<'de> for Pipeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let doc = PipelineDocument::deserialize(deserializer)?;
        Pipeline::new(doc.name, doc.version, doc.features, doc.estimator)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub column: String,
    pub encoder: Encoder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Encoder {
    /// Text column to an indicator vector, one slot per known category.
    OneHot { categories: Vec<String> },
    /// Text column to the index of its category.
    Ordinal { categories: Vec<String> },
    /// Numeric column, standardized as `(x - center) / scale`.
    Numeric {
        #[serde(default)]
        center: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        #[serde(default)]
        base_score: f64,
        trees: Vec<Tree>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// Node of a binary decision tree. The root is `nodes[0]`; a split sends
/// the row left when `x[feature] <= threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

fn default_scale() -> f64 {
    1.0
}

impl Encoder {
    fn width(&self) -> usize {
        match self {
            Self::OneHot { categories } => categories.len(),
            Self::Ordinal { .. } | Self::Numeric { .. } => 1,
        }
    }

    fn validate(&self, column: &str) -> Result<()> {
        match self {
            Self::OneHot { categories } | Self::Ordinal { categories } => {
                if categories.is_empty() {
                    return Err(Error::model(format!(
                        "encoder for column '{}' has no categories",
                        column
                    )));
                }
                let mut seen = HashSet::new();
                for category in categories {
                    if !seen.insert(category.as_str()) {
                        return Err(Error::model(format!(
                            "duplicate category '{}' for column '{}'",
                            category, column
                        )));
                    }
                }
            }
            Self::Numeric { center, scale } => {
                if !center.is_finite() || !scale.is_finite() || *scale == 0.0 {
                    return Err(Error::model(format!(
                        "invalid scaling for column '{}': center={}, scale={}",
                        column, center, scale
                    )));
                }
            }
        }
        Ok(())
    }

    fn encode(&self, column: &str, value: &FeatureValue, out: &mut Vec<f64>) -> Result<()> {
        match self {
            Self::OneHot { categories } => {
                let index = category_index(categories, column, value)?;
                out.extend((0..categories.len()).map(|i| if i == index { 1.0 } else { 0.0 }));
            }
            Self::Ordinal { categories } => {
                let index = category_index(categories, column, value)?;
                out.push(index as f64);
            }
            Self::Numeric { center, scale } => {
                let x = value.as_f64().ok_or_else(|| {
                    Error::inference(format!(
                        "column '{}' expects a numeric value, got {}",
                        column, value
                    ))
                })?;
                out.push((x - center) / scale);
            }
        }
        Ok(())
    }
}

fn category_index(categories: &[String], column: &str, value: &FeatureValue) -> Result<usize> {
    let text = value.as_str().ok_or_else(|| {
        Error::inference(format!(
            "column '{}' expects a categorical value, got {}",
            column, value
        ))
    })?;

    categories.iter().position(|c| c == text).ok_or_else(|| {
        Error::inference(format!(
            "Found unknown category {} in column '{}' during transform",
            value, column
        ))
    })
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic { .. } => "logistic",
            Self::TreeEnsemble { .. } => "tree_ensemble",
        }
    }

    fn validate(&self, width: usize) -> Result<()> {
        match self {
            Self::Logistic {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != width {
                    return Err(Error::model(format!(
                        "logistic estimator has {} coefficients but the encoded row has {} values",
                        coefficients.len(),
                        width
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(Error::model("logistic estimator has non-finite parameters"));
                }
            }
            Self::TreeEnsemble { base_score, trees } => {
                if trees.is_empty() {
                    return Err(Error::model("tree ensemble has no trees"));
                }
                if !base_score.is_finite() {
                    return Err(Error::model("tree ensemble base_score is not finite"));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(width)
                        .map_err(|e| Error::model(format!("tree {}: {}", i, e)))?;
                }
            }
        }
        Ok(())
    }

    /// Raw score (log-odds of class 1).
    fn decision(&self, x: &[f64]) -> f64 {
        match self {
            Self::Logistic {
                coefficients,
                intercept,
            } => intercept + coefficients.iter().zip(x).map(|(w, v)| w * v).sum::<f64>(),
            Self::TreeEnsemble { base_score, trees } => {
                base_score + trees.iter().map(|t| t.evaluate(x)).sum::<f64>()
            }
        }
    }
}

impl Tree {
    /// Children must point forward, which rules out cycles and
    /// guarantees `evaluate` terminates.
    fn validate(&self, width: usize) -> std::result::Result<(), String> {
        let n = self.nodes.len();
        if n == 0 {
            return Err("no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= width {
                        return Err(format!(
                            "node {} splits on feature {} but the encoded row has {} values",
                            i, feature, width
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", i));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= n {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} is not finite", i));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Pipeline {
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        features: Vec<FeatureSpec>,
        estimator: Estimator,
    ) -> Result<Self> {
        let pipeline = Self {
            name: name.into(),
            version,
            features,
            estimator,
        };
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Parses and validates a JSON pipeline document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: PipelineDocument = serde_json::from_str(json)?;
        Self::new(doc.name, doc.version, doc.features, doc.estimator)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(Error::model("pipeline declares no features"));
        }

        let mut seen = HashSet::new();
        for spec in &self.features {
            if !COLUMNS.contains(&spec.column.as_str()) {
                return Err(Error::model(format!(
                    "pipeline expects unknown column '{}'",
                    spec.column
                )));
            }
            if !seen.insert(spec.column.as_str()) {
                return Err(Error::model(format!(
                    "column '{}' is encoded more than once",
                    spec.column
                )));
            }
            spec.encoder.validate(&spec.column)?;
        }

        self.estimator.validate(self.encoded_width())
    }

    /// Number of values the encoders produce for one row.
    pub fn encoded_width(&self) -> usize {
        self.features.iter().map(|f| f.encoder.width()).sum()
    }

    pub fn transform(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.encoded_width());
        for spec in &self.features {
            let value = frame.get(&spec.column).ok_or_else(|| {
                Error::inference(format!("column '{}' missing from input row", spec.column))
            })?;
            spec.encoder.encode(&spec.column, value, &mut out)?;
        }
        Ok(out)
    }

    fn positive_probability(&self, frame: &FeatureFrame) -> Result<f64> {
        let x = self.transform(frame)?;
        let p = sigmoid(self.estimator.decision(&x));
        if !p.is_finite() {
            return Err(Error::inference("estimator produced a non-finite score"));
        }
        Ok(p)
    }
}

impl Classifier for Pipeline {
    fn predict(&self, frame: &FeatureFrame) -> Result<usize> {
        let proba = self.predict_proba(frame)?;
        // argmax, ties go to the lower class
        let class = if proba[1] > proba[0] { 1 } else { 0 };
        Ok(class)
    }

    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        let p = self.positive_probability(frame)?;
        Ok(vec![1.0 - p, p])
    }
}
