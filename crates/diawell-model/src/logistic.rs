use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Classifier, ClassifierError, Feature, FeatureVector, FEATURE_COUNT};

/// Startup failure while reading a model artifact. Fatal to the process.
#[derive(Debug, Error)]
pub enum ClassifierLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// On-disk form of a fitted binary logistic regression.
///
/// Shapes follow the fitted estimator: `coef` is one row per decision
/// function, `intercept` one entry per row.
///
/// `feature_names`, when present, must list the columns in training order.
/// Either the form names (`pregnancies`, ..., `dpf`, `age`) or the Pima
/// headers (`Pregnancies`, ..., `DiabetesPedigreeFunction`, `Age`) are
/// accepted, see [`Feature::is_named`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

/// Parameters reported by the debug endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub classes: Vec<i64>,
    pub intercept: Vec<f64>,
    pub coef: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct LogisticModel {
    classes: [i64; 2],
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ClassifierLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&raw)?;
        tracing::info!(
            target: "diawell_model",
            path = %path.display(),
            classes = ?model.classes,
            "classifier loaded"
        );
        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self, ClassifierLoadError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierLoadError> {
        if let Some(names) = &artifact.feature_names {
            let in_order = names.len() == FEATURE_COUNT
                && Feature::ORDER.iter().zip(names).all(|(f, n)| f.is_named(n));
            if !in_order {
                let expected: Vec<&str> = Feature::ORDER.iter().map(|f| f.name()).collect();
                return Err(ClassifierLoadError::Invalid(format!(
                    "feature_names {names:?} do not match training order {expected:?}"
                )));
            }
        }

        let classes: [i64; 2] = artifact.classes.as_slice().try_into().map_err(|_| {
            ClassifierLoadError::Invalid(format!(
                "expected 2 classes, got {}",
                artifact.classes.len()
            ))
        })?;
        if classes[0] == classes[1] {
            return Err(ClassifierLoadError::Invalid(format!(
                "class labels must be distinct, got {classes:?}"
            )));
        }

        let [row] = artifact.coef.as_slice() else {
            return Err(ClassifierLoadError::Invalid(format!(
                "expected a single coefficient row, got {}",
                artifact.coef.len()
            )));
        };
        let weights: [f64; FEATURE_COUNT] = row.as_slice().try_into().map_err(|_| {
            ClassifierLoadError::Invalid(format!(
                "expected {FEATURE_COUNT} coefficients, got {}",
                row.len()
            ))
        })?;

        let &[intercept] = artifact.intercept.as_slice() else {
            return Err(ClassifierLoadError::Invalid(format!(
                "expected a single intercept, got {}",
                artifact.intercept.len()
            )));
        };

        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ClassifierLoadError::Invalid(
                "coefficients and intercept must be finite".into(),
            ));
        }

        Ok(Self {
            classes,
            weights,
            intercept,
        })
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            classes: self.classes.to_vec(),
            intercept: vec![self.intercept],
            coef: vec![self.weights.to_vec()],
        }
    }

    fn decision(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        if let Some((feature, _)) = features.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ClassifierError::NonFiniteInput {
                feature: feature.name(),
            });
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
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

impl Classifier for LogisticModel {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict_class(&self, features: &FeatureVector) -> Result<i64, ClassifierError> {
        let z = self.decision(features)?;
        Ok(if z > 0.0 { self.classes[1] } else { self.classes[0] })
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let p = sigmoid(self.decision(features)?);
        Ok(vec![1.0 - p, p])
    }
}
