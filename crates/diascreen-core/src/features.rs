//! Derived feature computation and the classifier feature vector
//!
//! Rounding policy: [`round_to`] scales by `10^d` and rounds the scaled `f64`
//! half away from zero. Ties are judged on the scaled binary value, not the
//! decimal one, and exact ties go up in magnitude rather than to even
//! (78.125 becomes 78.13). BMI is rounded to 2 decimals before it enters
//! the feature vector, and the rounded value is what the classifier sees.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{Gender, ScreeningRequest, SmokingHistory};

/// Column names, in the order the classifier was trained on
pub const FEATURE_COLUMNS: [&str; 6] = [
    "age",
    "gender",
    "smoking_history",
    "bmi",
    "hypertension",
    "heart_disease",
];

/// Decimals BMI is rounded to
pub const BMI_DECIMALS: u32 = 2;

/// Round the `10^decimals`-scaled value half away from zero
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Body Mass Index, `weight / height²`, rounded to 2 decimals.
///
/// A non-positive or non-finite height is an invariant violation and yields
/// [`Error::Computation`] instead of an infinite or NaN result.
pub fn bmi(height: f64, weight: f64) -> Result<f64> {
    if !height.is_finite() || !weight.is_finite() {
        return Err(Error::computation(format!(
            "BMI inputs must be finite (height={}, weight={})",
            height, weight
        )));
    }
    if height <= 0.0 {
        return Err(Error::computation(format!(
            "height must be positive to compute BMI, got {}",
            height
        )));
    }

    let raw = weight / (height * height);
    if !raw.is_finite() {
        return Err(Error::computation(format!(
            "BMI is not finite for height={}, weight={}",
            height, weight
        )));
    }

    Ok(round_to(raw, BMI_DECIMALS))
}

/// BMI as shown by the form before submission; 0 when it cannot be computed
pub fn bmi_preview(height: f64, weight: f64) -> f64 {
    bmi(height, weight).unwrap_or(0.0)
}

/// Features computed from a validated request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedFeatures {
    pub bmi: f64,
    pub hypertension_bin: u8,
    pub heart_disease_bin: u8,
}

impl DerivedFeatures {
    pub fn compute(request: &ScreeningRequest) -> Result<Self> {
        Ok(Self {
            bmi: bmi(request.height(), request.weight())?,
            hypertension_bin: request.hypertension().as_bin(),
            heart_disease_bin: request.heart_disease().as_bin(),
        })
    }
}

/// Kind of value a feature column carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnKind {
    Numeric,
    /// Categorical column and every category the validator admits
    Categorical(&'static [&'static str]),
}

/// Kind of the column at `index` in [`FEATURE_COLUMNS`]
pub fn column_kind(index: usize) -> Option<ColumnKind> {
    match index {
        0 | 3 | 4 | 5 => Some(ColumnKind::Numeric),
        1 => Some(ColumnKind::Categorical(Gender::NAMES)),
        2 => Some(ColumnKind::Categorical(SmokingHistory::NAMES)),
        _ => None,
    }
}

/// A single cell of the feature vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(&'static str),
}

/// The record presented to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub age: f64,
    pub gender: Gender,
    pub smoking_history: SmokingHistory,
    pub bmi: f64,
    pub hypertension: u8,
    pub heart_disease: u8,
}

impl FeatureVector {
    /// Assemble from a request and its derived features
    pub fn from_parts(request: &ScreeningRequest, derived: &DerivedFeatures) -> Self {
        Self {
            age: request.age(),
            gender: request.gender(),
            smoking_history: request.smoking_history(),
            bmi: derived.bmi,
            hypertension: derived.hypertension_bin,
            heart_disease: derived.heart_disease_bin,
        }
    }

    /// Derive features and assemble in one step
    pub fn from_request(request: &ScreeningRequest) -> Result<Self> {
        let derived = DerivedFeatures::compute(request)?;
        Ok(Self::from_parts(request, &derived))
    }

    /// Values in [`FEATURE_COLUMNS`] order
    pub fn values(&self) -> [FeatureValue; 6] {
        [
            FeatureValue::Numeric(self.age),
            FeatureValue::Categorical(self.gender.as_str()),
            FeatureValue::Categorical(self.smoking_history.as_str()),
            FeatureValue::Numeric(self.bmi),
            FeatureValue::Numeric(f64::from(self.hypertension)),
            FeatureValue::Numeric(f64::from(self.heart_disease)),
        ]
    }

    /// Column name and value pairs in training order
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> {
        FEATURE_COLUMNS.into_iter().zip(self.values())
    }
}
