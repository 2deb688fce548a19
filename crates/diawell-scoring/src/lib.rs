pub mod assessor;
pub mod normalize;
pub mod scorer;

pub use assessor::{AssessError, Assessment, Assessor};
pub use normalize::{FeatureNormalizer, RawInput, ValidationError};
pub use scorer::{RiskLabel, RiskScorer, ScoringError, Verdict};
