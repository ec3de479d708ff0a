use churn_api::{
    Error, Result,
    model::{Classifier, FeatureFrame},
};
use mockall::mock;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Classifier returning a fixed class and probability vector
#[derive(Debug)]
pub struct StubClassifier {
    pub class: usize,
    pub proba: Vec<f64>,
    pub calls: Arc<AtomicUsize>,
}

impl StubClassifier {
    pub fn new(class: usize, proba: Vec<f64>) -> Self {
        Self {
            class,
            proba,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn churn(probability: f64) -> Self {
        Self::new(1, vec![1.0 - probability, probability])
    }

    pub fn no_churn(probability: f64) -> Self {
        Self::new(0, vec![probability, 1.0 - probability])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for StubClassifier {
    fn predict(&self, _frame: &FeatureFrame) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.class)
    }

    fn predict_proba(&self, _frame: &FeatureFrame) -> Result<Vec<f64>> {
        Ok(self.proba.clone())
    }
}

/// Classifier whose every call fails the way an encoder rejects input
#[derive(Debug)]
pub struct FailingClassifier {
    pub message: String,
}

impl FailingClassifier {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Classifier for FailingClassifier {
    fn predict(&self, _frame: &FeatureFrame) -> Result<usize> {
        Err(Error::inference(self.message.clone()))
    }

    fn predict_proba(&self, _frame: &FeatureFrame) -> Result<Vec<f64>> {
        Err(Error::inference(self.message.clone()))
    }
}

mock! {
    pub Model {}

    impl Classifier for Model {
        fn predict(&self, frame: &FeatureFrame) -> Result<usize>;
        fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<f64>>;
    }
}

/// Mock that fails the test if the model is ever reached
pub fn untouchable_classifier() -> MockModel {
    let mut mock = MockModel::new();
    mock.expect_predict().times(0);
    mock.expect_predict_proba().times(0);
    mock
}
