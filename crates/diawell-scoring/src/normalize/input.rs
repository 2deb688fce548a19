use std::collections::HashMap;
use std::num::IntErrorKind;

/// Name recorded when the form leaves `name` blank.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Raw form submission: field name to optional text.
///
/// Built from key/value pairs; a repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    fields: HashMap<String, Option<String>>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Text for `name`, or `None` when the key is missing or carries no value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|value| value.as_deref())
    }

    /// Submitter name, falling back to [`UNKNOWN_NAME`] when blank.
    pub fn name(&self) -> &str {
        match self.get("name").map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_NAME,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = Self::new();
        for (name, value) in iter {
            input.insert(name, Some(value.into()));
        }
        input
    }
}

/// Outcome of parsing one field. Absent and invalid stay distinct from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedField {
    Present(f64),
    Absent,
    Invalid,
}

impl ParsedField {
    /// Whole numbers only. Out-of-range integers saturate rather than fail,
    /// the range clamp brings them back into bounds afterwards.
    pub fn parse_int(raw: Option<&str>) -> Self {
        let Some(text) = non_blank(raw) else {
            return ParsedField::Absent;
        };
        match text.parse::<i64>() {
            Ok(value) => ParsedField::Present(value as f64),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => ParsedField::Present(i64::MAX as f64),
                IntErrorKind::NegOverflow => ParsedField::Present(i64::MIN as f64),
                _ => ParsedField::Invalid,
            },
        }
    }

    /// Finite decimals only; `nan` and `inf` are rejected.
    pub fn parse_float(raw: Option<&str>) -> Self {
        let Some(text) = non_blank(raw) else {
            return ParsedField::Absent;
        };
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => ParsedField::Present(value),
            _ => ParsedField::Invalid,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            ParsedField::Present(value) => Some(value),
            ParsedField::Absent | ParsedField::Invalid => None,
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|text| !text.is_empty())
}
