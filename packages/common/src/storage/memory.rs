use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::sync::RwLock;

use super::error::StorageError;
use super::token::VersionToken;
use super::traits::{AssetStore, ExistingAsset, PutContents};
use crate::website::AssetUrl;

struct StoredObject {
    data: Vec<u8>,
    sha: VersionToken,
}

/// In-process asset store with the same version-token precondition as the
/// remote store: updating an existing path requires its current token, and
/// creating a new path must not carry one.
pub struct MemoryAssetStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    base_url: String,
    branch: String,
}

impl MemoryAssetStore {
    /// Create an empty store whose public URLs are `{base_url}/{branch}/{path}`.
    pub fn new(base_url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            branch: branch.into(),
        }
    }

    /// Current bytes at `path`.
    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(path).map(|o| o.data.clone())
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn existing(&self, path: &str) -> Result<Option<ExistingAsset>, StorageError> {
        Ok(self.objects.read().await.get(path).map(|o| ExistingAsset {
            sha: o.sha.clone(),
        }))
    }

    async fn put_contents(&self, path: &str, body: &PutContents) -> Result<(), StorageError> {
        let data = STANDARD
            .decode(&body.content)
            .map_err(|e| StorageError::RemoteWrite {
                status: 400,
                body: format!("content is not valid Base64: {e}"),
            })?;

        let mut objects = self.objects.write().await;
        let current = objects.get(path).map(|o| &o.sha);
        if current != body.sha.as_ref() {
            return Err(StorageError::Conflict {
                path: path.to_string(),
            });
        }

        let sha = VersionToken::of_content(&data);
        objects.insert(path.to_string(), StoredObject { data, sha });
        Ok(())
    }

    fn branch(&self) -> &str {
        &self.branch
    }

    fn public_url(&self, path: &str) -> AssetUrl {
        AssetUrl::new(format!("{}/{}/{path}", self.base_url, self.branch))
    }

    async fn check_access(&self) -> Result<bool, StorageError> {
        Ok(true)
    }
}
