//! Artifact source resolution
//!
//! Remote artifacts are fetched at most once: when the cache file already
//! exists the download is skipped. Every failure here is fatal to startup.

use diascreen_core::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source location for an artifact
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactSource {
    /// Load from local file system
    Local(PathBuf),

    /// Download into `cache_path` unless already present
    Remote {
        url: String,
        cache_path: PathBuf,
        /// Expected lowercase hex SHA-256 of the artifact bytes
        sha256: Option<String>,
    },
}

impl ArtifactSource {
    /// Local path the artifact is read from
    pub fn local_path(&self) -> &Path {
        match self {
            Self::Local(path) => path,
            Self::Remote { cache_path, .. } => cache_path,
        }
    }

    /// Resolve the source and return the artifact bytes
    pub async fn read(&self, client: &reqwest::Client) -> Result<Vec<u8>> {
        match self {
            Self::Local(path) => read_file(path).await,
            Self::Remote {
                url,
                cache_path,
                sha256,
            } => {
                if tokio::fs::try_exists(cache_path).await.unwrap_or(false) {
                    debug!("Artifact already cached at {:?}, skipping download", cache_path);
                    let bytes = read_file(cache_path).await?;
                    verify_digest(&bytes, sha256.as_deref(), cache_path.display())?;
                    return Ok(bytes);
                }

                let bytes = download(client, url).await?;
                verify_digest(&bytes, sha256.as_deref(), url)?;
                store(cache_path, &bytes).await?;
                info!("Downloaded {} ({} bytes) to {:?}", url, bytes.len(), cache_path);
                Ok(bytes)
            }
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| Error::model_unavailable(format!("Failed to read artifact {:?}: {}", path, e)))
}

async fn download(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::model_unavailable(format!("Failed to download {}: {}", url, e)))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::model_unavailable(format!("Failed to read body of {}: {}", url, e)))?;

    Ok(bytes.to_vec())
}

/// Write next to the cache path, then rename into place
async fn store(cache_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            Error::model_unavailable(format!("Failed to create cache directory {:?}: {}", parent, e))
        })?;
    }

    let mut partial = cache_path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    tokio::fs::write(&partial, bytes)
        .await
        .map_err(|e| Error::model_unavailable(format!("Failed to write {:?}: {}", partial, e)))?;
    tokio::fs::rename(&partial, cache_path)
        .await
        .map_err(|e| Error::model_unavailable(format!("Failed to move artifact into {:?}: {}", cache_path, e)))?;

    Ok(())
}

fn verify_digest(bytes: &[u8], expected: Option<&str>, origin: impl std::fmt::Display) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let actual = format!("{:x}", Sha256::digest(bytes));
    if actual == expected {
        Ok(())
    } else {
        Err(Error::model_unavailable(format!(
            "Checksum mismatch for {}: expected {}, got {}",
            origin, expected, actual
        )))
    }
}
