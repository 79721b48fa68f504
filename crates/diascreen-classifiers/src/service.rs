//! Screening service: validated request in, risk label out

use diascreen_core::{
    round_to, validate, Error, FeatureVector, Result, RiskLabel, ScreeningRequest,
    ScreeningResult,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::classifier::{Classifier, ModelMetadata};
use crate::config::ModelSettings;
use crate::model::ModelArtifact;
use crate::threshold::ScreeningThreshold;

/// Decimals for the reported probability and threshold
pub const OUTPUT_DECIMALS: u32 = 3;

/// Owns the loaded classifier and threshold.
///
/// Both are immutable after construction; clones share them.
#[derive(Clone)]
pub struct ScreeningService {
    classifier: Arc<dyn Classifier>,
    threshold: ScreeningThreshold,
}

impl ScreeningService {
    pub fn new(classifier: Arc<dyn Classifier>, threshold: ScreeningThreshold) -> Self {
        Self {
            classifier,
            threshold,
        }
    }

    /// Resolve, fetch if needed, and decode both artifacts.
    ///
    /// Any failure is [`Error::ModelUnavailable`]; callers must not serve
    /// traffic without a loaded service.
    pub async fn load(settings: &ModelSettings) -> Result<Self> {
        let started = Instant::now();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.download_timeout_secs))
            .build()
            .map_err(|e| Error::model_unavailable(format!("Failed to build HTTP client: {}", e)))?;

        let classifier_source = settings.classifier.to_source();
        info!("Loading classifier from: {:?}", classifier_source.local_path());
        let classifier = ModelArtifact::decode(&classifier_source.read(&client).await?)?;

        let threshold_source = settings.threshold.to_source();
        info!("Loading screening threshold from: {:?}", threshold_source.local_path());
        let threshold = ScreeningThreshold::decode(&threshold_source.read(&client).await?)?;

        let metadata = classifier.metadata();
        info!(
            model = %metadata.name,
            kind = ?metadata.kind,
            threshold = threshold.value(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Screening model loaded"
        );

        Ok(Self::new(classifier, threshold))
    }

    /// Score a validated request
    pub fn screen(&self, request: &ScreeningRequest) -> Result<ScreeningResult> {
        let features = FeatureVector::from_request(request)?;
        let probability = self.classifier.predict_proba(&features)?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(Error::computation(format!(
                "Classifier '{}' returned probability {} outside [0, 1]",
                self.classifier.name(),
                probability
            )));
        }

        let result = decide(probability, self.threshold);
        debug!(
            bmi = features.bmi,
            probability = result.probability,
            label = %result.label,
            "Screened request"
        );
        Ok(result)
    }

    /// Validate a raw body, then score it
    pub fn screen_raw(&self, raw: &Value) -> Result<ScreeningResult> {
        let request = validate(raw)?;
        self.screen(&request)
    }

    pub fn threshold(&self) -> ScreeningThreshold {
        self.threshold
    }

    pub fn model_metadata(&self) -> ModelMetadata {
        self.classifier.metadata()
    }
}

/// Apply the threshold policy.
///
/// The label compares the unrounded probability with the unrounded threshold
/// (`>=`, so a probability equal to the threshold is High Risk). Both values
/// are rounded to [`OUTPUT_DECIMALS`] only for the response.
pub fn decide(probability: f64, threshold: ScreeningThreshold) -> ScreeningResult {
    let label = if probability >= threshold.value() {
        RiskLabel::HighRisk
    } else {
        RiskLabel::LowRisk
    };

    ScreeningResult {
        probability: round_to(probability, OUTPUT_DECIMALS),
        label,
        threshold_used: round_to(threshold.value(), OUTPUT_DECIMALS),
    }
}
