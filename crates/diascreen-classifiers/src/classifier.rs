//! Classifier trait and common types

use diascreen_core::{FeatureVector, Result};
use serde::Serialize;

/// A pre-trained binary classifier
///
/// Implementations are immutable once constructed and shared across request
/// handlers without synchronization.
pub trait Classifier: Send + Sync {
    /// Probability that the positive class applies to `features`
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Describe the loaded model
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: self.name().to_string(),
            version: None,
            kind: ModelKind::Custom,
        }
    }
}

/// Family of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Ensemble of decision trees
    Forest,
    /// Logistic regression
    Logistic,
    /// Any other implementation of [`Classifier`]
    Custom,
}

/// Descriptive information about a loaded model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetadata {
    /// Model name/identifier
    pub name: String,

    /// Model version
    pub version: Option<String>,

    pub kind: ModelKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant;

    impl Classifier for Constant {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(0.5)
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    #[test]
    fn test_default_metadata() {
        let metadata = Constant.metadata();
        assert_eq!(metadata.name, "constant");
        assert_eq!(metadata.version, None);
        assert_eq!(metadata.kind, ModelKind::Custom);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ModelKind::Forest).unwrap(), "forest");
    }
}
