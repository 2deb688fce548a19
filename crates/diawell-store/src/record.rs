use diawell_model::{Feature, FeatureVector};
use serde::{Deserialize, Serialize};

/// Row id assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized inputs as displayed and stored, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientInputs {
    pub pregnancies: i64,
    pub age: i64,
    pub glucose: i64,
    pub bloodpressure: i64,
    pub skinthickness: i64,
    pub insulin: i64,
    pub bmi: f64,
    pub dpf: f64,
}

impl From<&FeatureVector> for PatientInputs {
    fn from(features: &FeatureVector) -> Self {
        // integer fields are whole numbers after normalization
        let int = |feature: Feature| features.get(feature) as i64;
        Self {
            pregnancies: int(Feature::Pregnancies),
            age: int(Feature::Age),
            glucose: int(Feature::Glucose),
            bloodpressure: int(Feature::BloodPressure),
            skinthickness: int(Feature::SkinThickness),
            insulin: int(Feature::Insulin),
            bmi: features.get(Feature::Bmi),
            dpf: features.get(Feature::Dpf),
        }
    }
}

/// One scored submission. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub inputs: PatientInputs,
    pub probability: f64,
    pub prediction: String,
}

impl PatientRecord {
    pub fn new(
        name: impl Into<String>,
        features: &FeatureVector,
        probability: f64,
        prediction: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            inputs: PatientInputs::from(features),
            probability,
            prediction: prediction.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: PatientRecord,
}
