/// Local-filesystem blob store
///
/// Writes blobs under a configured root directory and reports their location
/// under a configured public base URL, the way a front proxy or static file
/// route would serve them.
use crate::error::{AppError, Result};
use crate::storage::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Public URL for a stored key
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        // Keys are caller-derived from URLs; never let one walk out of root
        let traversal = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || traversal {
            return Err(AppError::Store(format!("Invalid blob key: {:?}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Store(format!("Failed to create {:?}: {}", parent, e)))?;
        }

        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Store(format!("Failed to write {:?}: {}", path, e)))?;

        tracing::debug!(key = %key, size = data.len(), "blob stored");
        Ok(self.public_url(key))
    }
}
