pub mod features;
pub mod logistic;
pub mod traits;

pub use features::{Feature, FeatureVector, FEATURE_COUNT};
pub use logistic::{ClassifierLoadError, LogisticModel, ModelArtifact, ModelInfo};
pub use traits::{Classifier, ClassifierError};
