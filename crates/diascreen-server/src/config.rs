//! Server configuration

use diascreen_classifiers::{ArtifactSpec, ModelSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body, in bytes
    #[serde(default = "default_body_limit")]
    pub request_body_limit: usize,

    /// Origins allowed to call the service from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Classifier and threshold artifacts
    #[serde(default)]
    pub model: ModelSettings,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.model.classifier = ArtifactSpec::Local { path: model.clone() };
        }

        if let Some(threshold) = &cli.threshold {
            config.model.threshold = ArtifactSpec::Local {
                path: threshold.clone(),
            };
        }

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        Ok(config)
    }

    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            request_body_limit: default_body_limit(),
            cors_origins: default_cors_origins(),
            model: ModelSettings::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    16 * 1024
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8501".to_string(),
        "http://127.0.0.1:8501".to_string(),
    ]
}
