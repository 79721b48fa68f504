//! Core types for DiaScreen

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ValidationErrors, Violation};

/// Exclusive numeric bounds for an input field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Check `lower < value < upper`; NaN and infinities never satisfy it
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value > self.lower && value < self.upper
    }

    pub fn violation(&self) -> Violation {
        Violation::OutOfRange {
            lower: self.lower,
            upper: self.upper,
        }
    }
}

/// Age in years
pub const AGE_BOUNDS: Bounds = Bounds::new(0.0, 120.0);

/// Height in meters
pub const HEIGHT_BOUNDS: Bounds = Bounds::new(0.5, 2.5);

/// Weight in kilograms
pub const WEIGHT_BOUNDS: Bounds = Bounds::new(20.0, 300.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
    pub const NAMES: &'static [&'static str] = &["Male", "Female", "Other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Exact, case-sensitive parse
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmokingHistory {
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "former")]
    Former,
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "ever")]
    Ever,
    #[serde(rename = "not current")]
    NotCurrent,
}

impl SmokingHistory {
    pub const ALL: [SmokingHistory; 5] = [
        SmokingHistory::Never,
        SmokingHistory::Former,
        SmokingHistory::Current,
        SmokingHistory::Ever,
        SmokingHistory::NotCurrent,
    ];
    pub const NAMES: &'static [&'static str] = &["never", "former", "current", "ever", "not current"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Former => "former",
            Self::Current => "current",
            Self::Ever => "ever",
            Self::NotCurrent => "not current",
        }
    }

    /// Exact, case-sensitive parse
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == s)
    }
}

impl fmt::Display for SmokingHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Yes/No answer from the screening form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const NAMES: &'static [&'static str] = &["Yes", "No"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Exact, case-sensitive parse
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }

    /// Binary encoding fed to the classifier
    pub fn as_bin(&self) -> u8 {
        match self {
            Self::Yes => 1,
            Self::No => 0,
        }
    }
}

/// A validated screening request.
///
/// Only constructed through [`crate::validation::validate`] or
/// [`ScreeningRequest::new`], so every numeric field is within its bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningRequest {
    pub(crate) age: f64,
    pub(crate) gender: Gender,
    pub(crate) height: f64,
    pub(crate) weight: f64,
    pub(crate) smoking_history: SmokingHistory,
    pub(crate) hypertension: YesNo,
    pub(crate) heart_disease: YesNo,
}

impl ScreeningRequest {
    /// Build a request from typed values, rejecting out-of-range numbers
    pub fn new(
        age: f64,
        gender: Gender,
        height: f64,
        weight: f64,
        smoking_history: SmokingHistory,
        hypertension: YesNo,
        heart_disease: YesNo,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, value, bounds) in [
            ("age", age, AGE_BOUNDS),
            ("height", height, HEIGHT_BOUNDS),
            ("weight", weight, WEIGHT_BOUNDS),
        ] {
            if !bounds.contains(value) {
                errors.push(field, bounds.violation());
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            age,
            gender,
            height,
            weight,
            smoking_history,
            hypertension,
            heart_disease,
        })
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn smoking_history(&self) -> SmokingHistory {
        self.smoking_history
    }

    pub fn hypertension(&self) -> YesNo {
        self.hypertension
    }

    pub fn heart_disease(&self) -> YesNo {
        self.heart_disease
    }
}

/// Binary screening outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighRisk => "High Risk",
            Self::LowRisk => "Low Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screening outcome returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    /// Probability of the positive class, rounded to 3 decimals
    #[serde(rename = "diabetes_risk_probability")]
    pub probability: f64,

    #[serde(rename = "screening_result")]
    pub label: RiskLabel,

    /// Threshold the label was decided against, rounded to 3 decimals
    #[serde(rename = "screening_threshold")]
    pub threshold_used: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_exclusive() {
        assert!(!AGE_BOUNDS.contains(0.0));
        assert!(!AGE_BOUNDS.contains(120.0));
        assert!(AGE_BOUNDS.contains(0.5));
        assert!(!HEIGHT_BOUNDS.contains(0.5));
        assert!(HEIGHT_BOUNDS.contains(1.72));
        assert!(!WEIGHT_BOUNDS.contains(300.0));
        assert!(!WEIGHT_BOUNDS.contains(f64::NAN));
        assert!(!WEIGHT_BOUNDS.contains(f64::INFINITY));
    }

    #[test]
    fn test_enum_parse_is_case_sensitive() {
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("female"), None);
        assert_eq!(
            SmokingHistory::parse("not current"),
            Some(SmokingHistory::NotCurrent)
        );
        assert_eq!(SmokingHistory::parse("Never"), None);
        assert_eq!(YesNo::parse("Yes"), Some(YesNo::Yes));
        assert_eq!(YesNo::parse("yes"), None);
        assert_eq!(YesNo::parse("maybe"), None);
    }

    #[test]
    fn test_names_match_variants() {
        let genders: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(genders, Gender::NAMES);

        let histories: Vec<&str> = SmokingHistory::ALL.iter().map(|h| h.as_str()).collect();
        assert_eq!(histories, SmokingHistory::NAMES);
    }

    #[test]
    fn test_new_collects_range_violations() {
        let err = ScreeningRequest::new(
            0.0,
            Gender::Male,
            3.0,
            75.0,
            SmokingHistory::Never,
            YesNo::No,
            YesNo::No,
        )
        .unwrap_err();

        assert_eq!(err.len(), 2);
        assert!(err.contains_field("age"));
        assert!(err.contains_field("height"));
    }

    #[test]
    fn test_result_wire_names() {
        let result = ScreeningResult {
            probability: 0.412,
            label: RiskLabel::HighRisk,
            threshold_used: 0.35,
        };

        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["diabetes_risk_probability"], 0.412);
        assert_eq!(json["screening_result"], "High Risk");
        assert_eq!(json["screening_threshold"], 0.35);
    }
}
