use diawell_model::{Classifier, FeatureVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Class index the classifier uses for "has diabetes".
pub const POSITIVE_CLASS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Diabetes Risk")]
    DiabetesRisk,
    #[serde(rename = "No Risk")]
    NoRisk,
}

impl RiskLabel {
    pub fn from_class(class: i64) -> Self {
        if class == POSITIVE_CLASS {
            RiskLabel::DiabetesRisk
        } else {
            RiskLabel::NoRisk
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::DiabetesRisk => "Diabetes Risk",
            RiskLabel::NoRisk => "No Risk",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output translated for the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: RiskLabel,
    /// Positive-class probability, in `[0, 1]`.
    pub probability: f64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ScoringError {
    pub message: String,
}

impl ScoringError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn score(
        &self,
        features: &FeatureVector,
        classifier: &dyn Classifier,
    ) -> Result<Verdict, ScoringError> {
        let probabilities = classifier
            .predict_probability(features)
            .map_err(|err| ScoringError::new(err.to_string()))?;
        let &[_, probability] = probabilities.as_slice() else {
            return Err(ScoringError::new(format!(
                "expected 2 class probabilities, got {}",
                probabilities.len()
            )));
        };
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::new(format!(
                "positive class probability {probability} outside [0, 1]"
            )));
        }

        let class = classifier
            .predict_class(features)
            .map_err(|err| ScoringError::new(err.to_string()))?;

        Ok(Verdict {
            label: RiskLabel::from_class(class),
            probability,
        })
    }
}
