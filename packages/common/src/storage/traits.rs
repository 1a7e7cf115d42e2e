use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::StorageError;
use super::token::VersionToken;
use crate::website::AssetUrl;

/// Metadata of an object that already exists at a path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExistingAsset {
    pub sha: VersionToken,
}

/// Body of a create-or-update write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutContents {
    pub message: String,
    /// Base64 of the full payload.
    pub content: String,
    pub branch: String,
    /// Present iff the metadata read found an object at the path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<VersionToken>,
}

/// Versioned, path-addressed asset store.
///
/// Backends provide the metadata read and the conditional write; [`publish`] builds
/// the create-or-update sequence on top of them.
///
/// [`publish`]: AssetStore::publish
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Look up the current version at `path`. `Ok(None)` when nothing is stored there.
    async fn existing(&self, path: &str) -> Result<Option<ExistingAsset>, StorageError>;

    /// Submit a conditional write. Precondition failures are rejected by the store.
    async fn put_contents(&self, path: &str, body: &PutContents) -> Result<(), StorageError>;

    /// Branch that writes target.
    fn branch(&self) -> &str;

    /// Public URL of `path` on the write branch.
    fn public_url(&self, path: &str) -> AssetUrl;

    /// Whether the configured credentials can see the store at all.
    async fn check_access(&self) -> Result<bool, StorageError>;

    /// Create or update the object at `path` and return its public URL.
    ///
    /// Exactly one write attempt is made; a stale token surfaces as an error
    /// and retrying is left to the caller.
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn publish(&self, data: &[u8], path: &str) -> Result<AssetUrl, StorageError> {
        validate_path(path)?;

        let existing = self.existing(path).await?;
        debug!(exists = existing.is_some(), "Read asset metadata");

        let body = PutContents {
            message: format!("Upload {path}"),
            content: STANDARD.encode(data),
            branch: self.branch().to_string(),
            sha: existing.map(|e| e.sha),
        };
        self.put_contents(path, &body).await?;

        Ok(self.public_url(path))
    }
}

/// Reject paths that are empty, absolute, or contain `.`/`..` segments.
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("path is empty".into()));
    }
    if path.starts_with('/') {
        return Err(StorageError::InvalidPath(format!("{path} is absolute")));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidPath(format!(
            "{path} has an empty or relative segment"
        )));
    }
    Ok(())
}
