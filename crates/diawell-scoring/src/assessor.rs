use std::sync::Arc;

use diawell_model::{Classifier, FeatureVector};
use thiserror::Error;

use crate::normalize::{FeatureNormalizer, RawInput, ValidationError};
use crate::scorer::{RiskScorer, ScoringError, Verdict};

#[derive(Debug, Error)]
pub enum AssessError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Model prediction error: {0}")]
    Scoring(#[from] ScoringError),
}

/// Result of one successful assessment, handed to storage and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub name: String,
    pub features: FeatureVector,
    pub verdict: Verdict,
}

/// Request pipeline: normalize, then score against the shared classifier.
#[derive(Clone)]
pub struct Assessor {
    classifier: Arc<dyn Classifier>,
    normalizer: FeatureNormalizer,
    scorer: RiskScorer,
}

impl Assessor {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            normalizer: FeatureNormalizer,
            scorer: RiskScorer,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn assess(&self, raw: &RawInput) -> Result<Assessment, AssessError> {
        let features = match self.normalizer.normalize(raw) {
            Ok(features) => features,
            Err(err) => {
                tracing::info!(
                    target: "diawell_scoring",
                    missing = ?err.missing_fields,
                    "submission rejected"
                );
                return Err(err.into());
            }
        };

        let verdict = match self.scorer.score(&features, self.classifier()) {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(
                    target: "diawell_scoring",
                    classifier = self.classifier.name(),
                    error = %err,
                    "scoring failed"
                );
                return Err(err.into());
            }
        };

        tracing::info!(
            target: "diawell_scoring",
            label = %verdict.label,
            probability = verdict.probability,
            "assessment complete"
        );

        Ok(Assessment {
            name: raw.name().to_string(),
            features,
            verdict,
        })
    }
}

impl std::fmt::Debug for Assessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assessor")
            .field("classifier", &self.classifier.name())
            .finish_non_exhaustive()
    }
}
