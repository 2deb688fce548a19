use serde::{Deserialize, Serialize};

/// Number of inputs the classifier consumes.
pub const FEATURE_COUNT: usize = 8;

/// One classifier input. Declaration order is the training column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    Dpf,
    Age,
}

impl Feature {
    /// Column order the model was trained with. Never reorder.
    pub const ORDER: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::Dpf,
        Feature::Age,
    ];

    /// Form field name, also used as the column name in storage.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "pregnancies",
            Feature::Glucose => "glucose",
            Feature::BloodPressure => "bloodpressure",
            Feature::SkinThickness => "skinthickness",
            Feature::Insulin => "insulin",
            Feature::Bmi => "bmi",
            Feature::Dpf => "dpf",
            Feature::Age => "age",
        }
    }

    /// Column header in the Pima training data.
    pub fn column(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "BloodPressure",
            Feature::SkinThickness => "SkinThickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::Dpf => "DiabetesPedigreeFunction",
            Feature::Age => "Age",
        }
    }

    /// Whether `label` names this feature, by form name or training column.
    pub fn is_named(self, label: &str) -> bool {
        label == self.name() || label == self.column()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered classifier input.
///
/// Values are indexed by [`Feature`], so the layout always follows
/// [`Feature::ORDER`] no matter how the vector was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pairs each value with its feature, in training order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ORDER.iter().map(move |feature| (*feature, self.get(*feature)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_declaration_indices() {
        for (position, feature) in Feature::ORDER.iter().enumerate() {
            assert_eq!(feature.index(), position, "{feature} out of place");
        }
    }

    #[test]
    fn set_places_value_by_feature_not_by_call_order() {
        let mut vector = FeatureVector::default();
        vector.set(Feature::Age, 45.0);
        vector.set(Feature::Pregnancies, 2.0);
        vector.set(Feature::Dpf, 0.2);

        assert_eq!(vector.as_slice()[0], 2.0);
        assert_eq!(vector.as_slice()[6], 0.2);
        assert_eq!(vector.as_slice()[7], 45.0);
    }

    #[test]
    fn names_are_form_field_names() {
        let names: Vec<_> = Feature::ORDER.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "pregnancies",
                "glucose",
                "bloodpressure",
                "skinthickness",
                "insulin",
                "bmi",
                "dpf",
                "age"
            ]
        );
    }
}
