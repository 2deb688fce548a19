pub mod fields;
pub mod input;
pub mod normalizer;

pub use fields::{spec_for, FieldKind, FieldSpec, FIELD_SPECS, FORM_ORDER};
pub use input::{ParsedField, RawInput, UNKNOWN_NAME};
pub use normalizer::{FeatureNormalizer, ValidationError};
