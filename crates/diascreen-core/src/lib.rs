//! DiaScreen Core
//!
//! Types and pure logic shared across DiaScreen components.
//!
//! This crate provides:
//! - The screening data model (requests, feature vectors, results)
//! - Input validation turning raw JSON into a range-checked request
//! - Derived feature computation (BMI, binary encodings)
//! - Error types and result handling

pub mod error;
pub mod features;
pub mod types;
pub mod validation;

pub use error::{Error, FieldError, Result, ValidationErrors, Violation};
pub use features::{
    bmi, bmi_preview, column_kind, round_to, ColumnKind, DerivedFeatures, FeatureValue, FeatureVector,
    FEATURE_COLUMNS,
};
pub use types::{
    Gender, RiskLabel, ScreeningRequest, ScreeningResult, SmokingHistory, YesNo,
};
pub use validation::validate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::features::{FeatureVector, FEATURE_COLUMNS};
    pub use crate::types::{RiskLabel, ScreeningRequest, ScreeningResult};
    pub use crate::validation::validate;
}
