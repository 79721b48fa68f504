//! Configuration for model and threshold artifacts

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::ArtifactSource;

/// Where the classifier and threshold artifacts come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Serialized classifier artifact
    pub classifier: ArtifactSpec,

    /// Serialized threshold artifact
    pub threshold: ArtifactSpec,

    /// Timeout for remote artifact downloads, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

/// Artifact source specification (for config files)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactSpec {
    /// Downloaded once into a local cache
    Remote {
        url: String,
        cache_path: PathBuf,
        sha256: Option<String>,
    },

    /// Local file path
    Local { path: PathBuf },
}

impl ArtifactSpec {
    /// Convert to a runtime source
    pub fn to_source(&self) -> ArtifactSource {
        match self {
            Self::Remote {
                url,
                cache_path,
                sha256,
            } => ArtifactSource::Remote {
                url: url.clone(),
                cache_path: cache_path.clone(),
                sha256: sha256.as_ref().map(|d| d.to_ascii_lowercase()),
            },
            Self::Local { path } => ArtifactSource::Local(path.clone()),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            classifier: ArtifactSpec::Local {
                path: PathBuf::from("./models/screening_model.json"),
            },
            threshold: ArtifactSpec::Local {
                path: PathBuf::from("./models/screening_threshold.json"),
            },
            download_timeout_secs: default_download_timeout(),
        }
    }
}

impl ModelSettings {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

fn default_download_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_settings_yaml() {
        let yaml = r#"
classifier:
  path: ./models/rf.json
threshold:
  url: https://models.example.org/threshold.json
  cache_path: ./models/threshold.json
  sha256: ABCDEF
download_timeout_secs: 10
"#;

        let settings = ModelSettings::from_yaml(yaml).unwrap();
        assert_eq!(
            settings.classifier,
            ArtifactSpec::Local {
                path: PathBuf::from("./models/rf.json")
            }
        );
        assert_eq!(settings.download_timeout_secs, 10);

        match settings.threshold.to_source() {
            ArtifactSource::Remote { url, sha256, .. } => {
                assert_eq!(url, "https://models.example.org/threshold.json");
                assert_eq!(sha256.as_deref(), Some("abcdef"));
            }
            other => panic!("Expected remote source, got {:?}", other),
        }
    }

    #[test]
    fn test_default_timeout() {
        let yaml = r#"
classifier: { path: a.json }
threshold: { path: b.json }
"#;
        let settings = ModelSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.download_timeout_secs, 60);
    }
}
