//! Screening threshold

use diascreen_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Probability cut-off at or above which a case is labeled High Risk
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ScreeningThreshold(f64);

#[derive(Deserialize)]
struct ThresholdDocument {
    threshold: f64,
}

impl ScreeningThreshold {
    /// Create a threshold; must be finite and within `[0, 1]`
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::model_unavailable(format!(
                "Screening threshold {} is outside [0, 1]",
                value
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Decode a threshold artifact: a bare number or `{"threshold": <number>}`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::model_unavailable(format!("Threshold artifact is not UTF-8: {}", e)))?
            .trim();

        if let Ok(value) = text.parse::<f64>() {
            return Self::new(value);
        }

        let document: ThresholdDocument = serde_json::from_str(text)
            .map_err(|e| Error::model_unavailable(format!("Malformed threshold artifact: {}", e)))?;
        Self::new(document.threshold)
    }
}
