//! DiaScreen Classifiers
//!
//! Model loading and inference for diabetes risk screening.
//!
//! - [`Classifier`] is the single scoring capability the service depends on
//! - [`ModelArtifact`] decodes serialized forest and logistic models
//! - [`ScreeningThreshold`] is the decision cut-off loaded alongside the model
//! - [`ScreeningService`] ties them together: feature vector, probability, label
//!
//! Artifacts are loaded once at startup, locally or from a remote URL cached
//! on disk, and are read-only afterwards.

pub mod classifier;
pub mod config;
pub mod loader;
pub mod model;
pub mod service;
pub mod threshold;

pub use classifier::{Classifier, ModelKind, ModelMetadata};
pub use config::{ArtifactSpec, ModelSettings};
pub use loader::ArtifactSource;
pub use model::{ForestClassifier, LogisticClassifier, ModelArtifact};
pub use service::{decide, ScreeningService, OUTPUT_DECIMALS};
pub use threshold::ScreeningThreshold;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::service::ScreeningService;
    pub use crate::threshold::ScreeningThreshold;
}
