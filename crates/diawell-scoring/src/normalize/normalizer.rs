use diawell_model::FeatureVector;
use thiserror::Error;

use super::fields::{spec_for, FORM_ORDER};
use super::input::{ParsedField, RawInput};

/// Required fields that were blank or unparsable, in form order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "Missing or invalid fields: {}. Please provide valid numeric values.",
    .missing_fields.join(", ")
)]
pub struct ValidationError {
    pub missing_fields: Vec<&'static str>,
}

/// Turns a raw submission into a bounded, ordered feature vector.
///
/// Required fields must parse; optional fields fall back to their default
/// only when absent or unparsable, never when zero. Every value is then
/// clamped into its range.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureNormalizer;

impl FeatureNormalizer {
    pub fn normalize(&self, raw: &RawInput) -> Result<FeatureVector, ValidationError> {
        let mut features = FeatureVector::default();
        let mut missing_fields = Vec::new();

        for feature in FORM_ORDER {
            let spec = spec_for(feature);
            let parsed = spec.parse(raw.get(spec.name()));

            let value = match (parsed, spec.default) {
                (ParsedField::Present(value), _) => value,
                (ParsedField::Absent | ParsedField::Invalid, Some(default)) => default,
                (ParsedField::Absent | ParsedField::Invalid, None) => {
                    missing_fields.push(spec.name());
                    continue;
                }
            };

            let clamped = spec.clamp(value);
            if clamped != value {
                tracing::debug!(
                    target: "diawell_scoring",
                    field = spec.name(),
                    raw = value,
                    clamped,
                    "value clamped into range"
                );
            }
            features.set(feature, clamped);
        }

        if !missing_fields.is_empty() {
            return Err(ValidationError { missing_fields });
        }
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diawell_model::Feature;

    fn base() -> RawInput {
        RawInput::new()
            .with("age", "45")
            .with("glucose", "180")
            .with("bloodpressure", "90")
            .with("insulin", "120")
            .with("bmi", "32.5")
    }

    #[test]
    fn optional_fields_blank_use_defaults() {
        let raw = base()
            .with("pregnancies", "")
            .with("skinthickness", "")
            .with("dpf", "");
        let features = FeatureNormalizer.normalize(&raw).unwrap();
        assert_eq!(
            features.as_slice(),
            &[0.0, 180.0, 90.0, 10.0, 120.0, 32.5, 0.2, 45.0]
        );
    }

    #[test]
    fn optional_fields_missing_use_defaults() {
        let features = FeatureNormalizer.normalize(&base()).unwrap();
        assert_eq!(features.get(Feature::Pregnancies), 0.0);
        assert_eq!(features.get(Feature::SkinThickness), 10.0);
        assert_eq!(features.get(Feature::Dpf), 0.2);
    }

    #[test]
    fn unparsable_optional_fields_use_defaults() {
        let raw = base()
            .with("pregnancies", "two")
            .with("skinthickness", "12.5")
            .with("dpf", "high");
        let features = FeatureNormalizer.normalize(&raw).unwrap();
        assert_eq!(features.get(Feature::Pregnancies), 0.0);
        assert_eq!(features.get(Feature::SkinThickness), 10.0);
        assert_eq!(features.get(Feature::Dpf), 0.2);
    }

    #[test]
    fn zero_optional_values_are_kept() {
        let raw = base()
            .with("pregnancies", "0")
            .with("dpf", "0.0")
            .with("skinthickness", "0");
        let features = FeatureNormalizer.normalize(&raw).unwrap();
        assert_eq!(features.get(Feature::Pregnancies), 0.0);
        assert_eq!(features.get(Feature::Dpf), 0.0);
        // zero is below the floor, so it clamps rather than defaulting
        assert_eq!(features.get(Feature::SkinThickness), 5.0);
    }

    #[test]
    fn non_numeric_required_field_is_named() {
        let raw = base().with("bloodpressure", "abc");
        let err = FeatureNormalizer.normalize(&raw).unwrap_err();
        assert_eq!(err.missing_fields, ["bloodpressure"]);
    }

    #[test]
    fn every_invalid_required_field_is_reported_at_once() {
        let raw = RawInput::new()
            .with("age", "")
            .with("glucose", "x")
            .with("bloodpressure", "90")
            .with("bmi", "thin");
        let err = FeatureNormalizer.normalize(&raw).unwrap_err();
        assert_eq!(err.missing_fields, ["age", "glucose", "insulin", "bmi"]);
        assert_eq!(
            err.to_string(),
            "Missing or invalid fields: age, glucose, insulin, bmi. Please provide valid numeric values."
        );
    }

    #[test]
    fn each_required_field_is_individually_enforced() {
        for name in ["age", "glucose", "bloodpressure", "insulin", "bmi"] {
            for bad in ["", "n/a"] {
                let raw = base().with(name, bad);
                let err = FeatureNormalizer.normalize(&raw).unwrap_err();
                assert_eq!(err.missing_fields, [name], "{name}={bad:?}");
            }
        }
    }

    #[test]
    fn out_of_range_values_clamp_to_bounds() {
        let high = base()
            .with("pregnancies", "40")
            .with("age", "300")
            .with("glucose", "9999")
            .with("bloodpressure", "500")
            .with("skinthickness", "250")
            .with("insulin", "5000")
            .with("bmi", "99.9")
            .with("dpf", "7.5");
        let features = FeatureNormalizer.normalize(&high).unwrap();
        assert_eq!(
            features.as_slice(),
            &[20.0, 500.0, 200.0, 100.0, 900.0, 70.0, 3.0, 120.0]
        );

        let low = base()
            .with("pregnancies", "-2")
            .with("age", "0")
            .with("glucose", "5")
            .with("bloodpressure", "1")
            .with("skinthickness", "1")
            .with("insulin", "-10")
            .with("bmi", "2.5")
            .with("dpf", "-0.5");
        let features = FeatureNormalizer.normalize(&low).unwrap();
        assert_eq!(
            features.as_slice(),
            &[0.0, 20.0, 20.0, 5.0, 0.0, 10.0, 0.0, 1.0]
        );
    }

    #[test]
    fn overflowing_integer_clamps_instead_of_failing() {
        let raw = base().with("glucose", "123456789012345678901234567890");
        let features = FeatureNormalizer.normalize(&raw).unwrap();
        assert_eq!(features.get(Feature::Glucose), 500.0);
    }

    #[test]
    fn feature_order_is_independent_of_insertion_order() {
        let forward = base().with("pregnancies", "3").with("dpf", "0.5");
        let reversed: RawInput = [
            ("dpf", "0.5"),
            ("bmi", "32.5"),
            ("insulin", "120"),
            ("pregnancies", "3"),
            ("bloodpressure", "90"),
            ("glucose", "180"),
            ("age", "45"),
        ]
        .into_iter()
        .collect();

        let a = FeatureNormalizer.normalize(&forward).unwrap();
        let b = FeatureNormalizer.normalize(&reversed).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_slice(), &[3.0, 180.0, 90.0, 10.0, 120.0, 32.5, 0.5, 45.0]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = base().with("cholesterol", "250").with("name", "Ada");
        assert!(FeatureNormalizer.normalize(&raw).is_ok());
    }
}
