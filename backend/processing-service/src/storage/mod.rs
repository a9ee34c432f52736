/// Blob store boundary
///
/// One verb: store bytes under a key, get back the public location. Keys are
/// slash-separated; the leading segment is the logical namespace. Transcoded
/// images and summary artifacts share the interface but never a namespace.
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub mod local;

pub use local::LocalBlobStore;

/// Key prefix for transcoded images
pub const IMAGE_PREFIX: &str = "processed_images";

/// Key prefix for summary artifacts
pub const RESULT_PREFIX: &str = "results";

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Durably store `data` under `key` and return its public location
    async fn store(&self, key: &str, data: Bytes) -> Result<String>;
}
