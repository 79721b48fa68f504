//! Model artifact decoding
//!
//! Artifacts are JSON documents tagged with a `kind`. Every artifact declares
//! the feature columns it was trained on; loading fails unless they match
//! [`FEATURE_COLUMNS`] exactly, in order.

mod forest;
mod logistic;

pub use forest::ForestClassifier;
pub use logistic::LogisticClassifier;

use diascreen_core::{column_kind, ColumnKind, Error, FeatureValue, Result, FEATURE_COLUMNS};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::classifier::Classifier;

/// Fields shared by every artifact kind
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ArtifactHeader {
    pub kind: ArtifactKind,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    pub features: Vec<String>,

    /// Category order for ordinal-encoded columns
    #[serde(default)]
    pub categories: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ArtifactKind {
    Forest,
    Logistic,
}

fn default_name() -> String {
    "unnamed".to_string()
}

/// Decoder for serialized classifier artifacts
pub struct ModelArtifact;

impl ModelArtifact {
    /// Decode a classifier from artifact bytes
    pub fn decode(bytes: &[u8]) -> Result<Arc<dyn Classifier>> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::model_unavailable(format!("Malformed model artifact: {}", e)))?;
        let header: ArtifactHeader = serde_json::from_value(value.clone())
            .map_err(|e| Error::model_unavailable(format!("Invalid model artifact header: {}", e)))?;

        check_feature_schema(&header.features)?;
        debug!(kind = ?header.kind, name = %header.name, "Decoding model artifact");

        let classifier: Arc<dyn Classifier> = match header.kind {
            ArtifactKind::Forest => Arc::new(ForestClassifier::from_artifact(header, value)?),
            ArtifactKind::Logistic => Arc::new(LogisticClassifier::from_artifact(header, value)?),
        };

        Ok(classifier)
    }
}

/// Reject artifacts trained on a different column set or order
pub(crate) fn check_feature_schema(features: &[String]) -> Result<()> {
    let matches = features.len() == FEATURE_COLUMNS.len()
        && features.iter().zip(FEATURE_COLUMNS).all(|(a, b)| a == b);

    if matches {
        Ok(())
    } else {
        Err(Error::model_unavailable(format!(
            "Model feature schema mismatch: expected {:?}, artifact declares {:?}",
            FEATURE_COLUMNS, features
        )))
    }
}

/// Ordinal encoding of categorical columns, by position in the artifact's
/// category list
#[derive(Debug, Clone)]
pub(crate) struct OrdinalEncoder {
    columns: Vec<Option<Vec<String>>>,
}

impl OrdinalEncoder {
    /// Build from the artifact's category table; every category the validator
    /// admits must be present
    pub fn new(categories: &HashMap<String, Vec<String>>) -> Result<Self> {
        let mut columns = Vec::with_capacity(FEATURE_COLUMNS.len());

        for (index, column) in FEATURE_COLUMNS.iter().enumerate() {
            match column_kind(index) {
                Some(ColumnKind::Categorical(admitted)) => {
                    let Some(known) = categories.get(*column) else {
                        return Err(Error::model_unavailable(format!(
                            "Model artifact has no category list for column '{}'",
                            column
                        )));
                    };
                    if let Some(missing) = admitted.iter().find(|c| !known.iter().any(|k| k == *c)) {
                        return Err(Error::model_unavailable(format!(
                            "Model artifact does not know category '{}' of column '{}'",
                            missing, column
                        )));
                    }
                    columns.push(Some(known.clone()));
                }
                _ => columns.push(None),
            }
        }

        Ok(Self { columns })
    }

    /// Numeric row for the given feature values
    pub fn encode(&self, values: &[FeatureValue; 6]) -> Result<[f64; 6]> {
        let mut row = [0.0; 6];
        for (index, value) in values.iter().enumerate() {
            row[index] = match (value, &self.columns[index]) {
                (FeatureValue::Numeric(x), None) => *x,
                (FeatureValue::Categorical(category), Some(known)) => known
                    .iter()
                    .position(|k| k == category)
                    .map(|p| p as f64)
                    .ok_or_else(|| {
                        Error::computation(format!(
                            "Unknown category '{}' for column '{}'",
                            category, FEATURE_COLUMNS[index]
                        ))
                    })?,
                _ => {
                    return Err(Error::computation(format!(
                        "Feature kind mismatch for column '{}'",
                        FEATURE_COLUMNS[index]
                    )))
                }
            };
        }
        Ok(row)
    }
}
