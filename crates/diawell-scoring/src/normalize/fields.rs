use diawell_model::{Feature, FEATURE_COUNT};

use super::input::ParsedField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
}

/// Parse, default and range policy for one form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub feature: Feature,
    pub kind: FieldKind,
    pub lo: f64,
    pub hi: f64,
    /// Substituted when the field is absent or unparsable. `None` marks the
    /// field as required.
    pub default: Option<f64>,
}

impl FieldSpec {
    pub fn name(&self) -> &'static str {
        self.feature.name()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn parse(&self, raw: Option<&str>) -> ParsedField {
        match self.kind {
            FieldKind::Int => ParsedField::parse_int(raw),
            FieldKind::Float => ParsedField::parse_float(raw),
        }
    }

    /// Saturates into `[lo, hi]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lo, self.hi)
    }
}

const fn spec(feature: Feature, kind: FieldKind, lo: f64, hi: f64, default: Option<f64>) -> FieldSpec {
    FieldSpec {
        feature,
        kind,
        lo,
        hi,
        default,
    }
}

/// Indexed by [`Feature::index`].
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    spec(Feature::Pregnancies, FieldKind::Int, 0.0, 20.0, Some(0.0)),
    spec(Feature::Glucose, FieldKind::Int, 20.0, 500.0, None),
    spec(Feature::BloodPressure, FieldKind::Int, 20.0, 200.0, None),
    spec(Feature::SkinThickness, FieldKind::Int, 5.0, 100.0, Some(10.0)),
    spec(Feature::Insulin, FieldKind::Int, 0.0, 900.0, None),
    spec(Feature::Bmi, FieldKind::Float, 10.0, 70.0, None),
    spec(Feature::Dpf, FieldKind::Float, 0.0, 3.0, Some(0.2)),
    spec(Feature::Age, FieldKind::Int, 1.0, 120.0, None),
];

/// Order fields appear on the intake form. Missing-field reports and
/// rendered inputs follow it.
pub const FORM_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Pregnancies,
    Feature::Age,
    Feature::Glucose,
    Feature::BloodPressure,
    Feature::SkinThickness,
    Feature::Insulin,
    Feature::Bmi,
    Feature::Dpf,
];

pub fn spec_for(feature: Feature) -> &'static FieldSpec {
    &FIELD_SPECS[feature.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_feature() {
        for feature in Feature::ORDER {
            assert_eq!(spec_for(feature).feature, feature);
        }
    }

    #[test]
    fn only_three_fields_are_optional() {
        let optional: Vec<_> = FIELD_SPECS
            .iter()
            .filter(|spec| !spec.is_required())
            .map(|spec| (spec.name(), spec.default))
            .collect();
        assert_eq!(
            optional,
            [
                ("pregnancies", Some(0.0)),
                ("skinthickness", Some(10.0)),
                ("dpf", Some(0.2)),
            ]
        );
    }

    #[test]
    fn defaults_sit_inside_their_ranges() {
        for spec in FIELD_SPECS {
            if let Some(default) = spec.default {
                assert_eq!(spec.clamp(default), default, "{}", spec.name());
            }
        }
    }
}
