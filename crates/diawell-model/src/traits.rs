use thiserror::Error;

use crate::FeatureVector;

/// Failure raised while running a loaded classifier.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("non-finite input for feature `{feature}`")]
    NonFiniteInput { feature: &'static str },

    #[error("classifier internal error: {0}")]
    Internal(String),
}

/// Trained binary classifier, shared read-only across requests.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Predicted class label for one sample.
    fn predict_class(&self, features: &FeatureVector) -> Result<i64, ClassifierError>;

    /// Class probabilities for one sample, indexed like the class labels.
    fn predict_probability(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError>;
}
