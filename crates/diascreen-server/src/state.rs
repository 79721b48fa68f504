//! Application state

use anyhow::Result;
use diascreen_classifiers::ScreeningService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Loaded classifier and threshold
    pub service: ScreeningService,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Load the screening model and build the state.
    ///
    /// Fails if either artifact is unavailable; the server must not start.
    pub async fn new(config: ServerConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        info!("Initializing application state");

        let service = ScreeningService::load(&config.model)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load screening model: {}", e))?;

        Ok(Self::with_service(config, service, metrics_handle))
    }

    /// Build the state around an already constructed service
    pub fn with_service(
        config: ServerConfig,
        service: ScreeningService,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service,
            metrics_handle,
        }
    }
}
