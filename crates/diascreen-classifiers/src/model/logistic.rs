//! Logistic regression over the screening features

use diascreen_core::{column_kind, ColumnKind, Error, FeatureValue, FeatureVector, Result, FEATURE_COLUMNS};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::ArtifactHeader;
use crate::classifier::{Classifier, ModelKind, ModelMetadata};

#[derive(Debug, Deserialize)]
struct LogisticSpec {
    intercept: f64,

    /// Weight per numeric column
    coefficients: HashMap<String, f64>,

    /// One-hot weights per categorical column; absent categories weigh 0
    #[serde(default)]
    categorical_coefficients: HashMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Clone)]
enum Term {
    Numeric(f64),
    OneHot(HashMap<String, f64>),
}

#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    name: String,
    version: Option<String>,
    intercept: f64,
    /// One term per column, in [`FEATURE_COLUMNS`] order
    terms: Vec<Term>,
}

impl LogisticClassifier {
    pub(crate) fn from_artifact(header: ArtifactHeader, value: Value) -> Result<Self> {
        let mut spec: LogisticSpec = serde_json::from_value(value)
            .map_err(|e| Error::model_unavailable(format!("Invalid logistic artifact: {}", e)))?;

        if !spec.intercept.is_finite() {
            return Err(Error::model_unavailable("Logistic intercept is not finite"));
        }

        let mut terms = Vec::with_capacity(FEATURE_COLUMNS.len());
        for (index, column) in FEATURE_COLUMNS.iter().enumerate() {
            let term = match column_kind(index) {
                Some(ColumnKind::Categorical(admitted)) => {
                    let weights = spec.categorical_coefficients.remove(*column).unwrap_or_default();
                    if let Some(unknown) = weights.keys().find(|k| !admitted.contains(&k.as_str())) {
                        return Err(Error::model_unavailable(format!(
                            "Logistic artifact weighs unknown category '{}' of column '{}'",
                            unknown, column
                        )));
                    }
                    if weights.values().any(|w| !w.is_finite()) {
                        return Err(Error::model_unavailable(format!(
                            "Non-finite categorical weight for column '{}'",
                            column
                        )));
                    }
                    Term::OneHot(weights)
                }
                _ => {
                    let weight = spec.coefficients.get(*column).copied().ok_or_else(|| {
                        Error::model_unavailable(format!(
                            "Logistic artifact has no coefficient for column '{}'",
                            column
                        ))
                    })?;
                    if !weight.is_finite() {
                        return Err(Error::model_unavailable(format!(
                            "Non-finite coefficient for column '{}'",
                            column
                        )));
                    }
                    Term::Numeric(weight)
                }
            };
            terms.push(term);
        }

        Ok(Self {
            name: header.name,
            version: header.version,
            intercept: spec.intercept,
            terms,
        })
    }

    fn logit(&self, features: &FeatureVector) -> Result<f64> {
        let mut z = self.intercept;
        for (index, (term, value)) in self.terms.iter().zip(features.values()).enumerate() {
            z += match (term, value) {
                (Term::Numeric(weight), FeatureValue::Numeric(x)) => weight * x,
                (Term::OneHot(weights), FeatureValue::Categorical(category)) => {
                    weights.get(category).copied().unwrap_or(0.0)
                }
                _ => {
                    return Err(Error::computation(format!(
                        "Feature kind mismatch for column '{}'",
                        FEATURE_COLUMNS[index]
                    )))
                }
            };
        }
        Ok(z)
    }
}

/// Logistic function without overflow for large |z|
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        Ok(sigmoid(self.logit(features)?))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            kind: ModelKind::Logistic,
        }
    }
}
