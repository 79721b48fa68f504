//! Decision tree ensemble

use diascreen_core::{Error, FeatureVector, Result, FEATURE_COLUMNS};
use serde::Deserialize;
use serde_json::Value;

use super::{ArtifactHeader, OrdinalEncoder};
use crate::classifier::{Classifier, ModelKind, ModelMetadata};

#[derive(Debug, Deserialize)]
struct ForestSpec {
    trees: Vec<TreeSpec>,
}

#[derive(Debug, Deserialize)]
struct TreeSpec {
    nodes: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Copy)]
enum Node {
    /// Go left when `row[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Positive-class probability at this leaf
    Leaf(f64),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Children always sit after their parent, so traversal terminates
    fn from_spec(index: usize, spec: TreeSpec) -> Result<Self> {
        let len = spec.nodes.len();
        if len == 0 {
            return Err(Error::model_unavailable(format!("Tree {} has no nodes", index)));
        }

        let mut nodes = Vec::with_capacity(len);
        for (position, node) in spec.nodes.into_iter().enumerate() {
            let node = match node {
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COLUMNS.len() {
                        return Err(Error::model_unavailable(format!(
                            "Tree {} node {} splits on unknown feature index {}",
                            index, position, feature
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(Error::model_unavailable(format!(
                            "Tree {} node {} has a non-finite threshold",
                            index, position
                        )));
                    }
                    for child in [left, right] {
                        if child <= position || child >= len {
                            return Err(Error::model_unavailable(format!(
                                "Tree {} node {} has invalid child index {}",
                                index, position, child
                            )));
                        }
                    }
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    }
                }
                NodeSpec::Leaf { value } => {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(Error::model_unavailable(format!(
                            "Tree {} leaf {} has probability {} outside [0, 1]",
                            index, position, value
                        )));
                    }
                    Node::Leaf(value)
                }
            };
            nodes.push(node);
        }

        Ok(Self { nodes })
    }

    fn predict(&self, row: &[f64; 6]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Random-forest style classifier averaging per-tree leaf probabilities
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    name: String,
    version: Option<String>,
    encoder: OrdinalEncoder,
    trees: Vec<Tree>,
}

impl ForestClassifier {
    pub(crate) fn from_artifact(header: ArtifactHeader, value: Value) -> Result<Self> {
        let spec: ForestSpec = serde_json::from_value(value)
            .map_err(|e| Error::model_unavailable(format!("Invalid forest artifact: {}", e)))?;

        if spec.trees.is_empty() {
            return Err(Error::model_unavailable("Forest artifact has no trees"));
        }

        let encoder = OrdinalEncoder::new(&header.categories)?;
        let trees = spec
            .trees
            .into_iter()
            .enumerate()
            .map(|(index, tree)| Tree::from_spec(index, tree))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: header.name,
            version: header.version,
            encoder,
            trees,
        })
    }

    /// Number of trees in the ensemble
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for ForestClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        let row = self.encoder.encode(&features.values())?;
        let total: f64 = self.trees.iter().map(|tree| tree.predict(&row)).sum();
        Ok(total / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            kind: ModelKind::Forest,
        }
    }
}
