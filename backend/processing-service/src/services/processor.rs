//! Product processor - runs the fetch/transcode/store cycle for one product
//!
//! Failure policy, per input URL in order:
//! - fetch failure: item-fatal, the whole product (and batch) aborts and the
//!   product's processed flag is left untouched
//! - transcode failure: that single image is skipped, the rest of the product
//!   continues
//! - blob store failure: fatal
//!
//! A fetch failure means the manifest points at something unreachable and an
//! operator should see it; one malformed picture should not sink an
//! otherwise-good batch.

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::fetcher::ImageFetcher;
use crate::services::transcoder::Transcoder;
use crate::storage::{BlobStore, IMAGE_PREFIX};
use std::sync::Arc;
use tracing::{debug, warn};

/// Marker prepended to the source basename for stored outputs
pub const OUTPUT_NAME_PREFIX: &str = "compressed_";

pub struct ProductProcessor {
    fetcher: ImageFetcher,
    transcoder: Arc<Transcoder>,
    blobs: Arc<dyn BlobStore>,
}

impl ProductProcessor {
    pub fn new(fetcher: ImageFetcher, transcoder: Arc<Transcoder>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            fetcher,
            transcoder,
            blobs,
        }
    }

    /// Process every input URL of `product`, returning the stored output
    /// locations in input order. Skipped images leave no placeholder.
    pub async fn process(&self, product: &Product) -> Result<Vec<String>> {
        let mut output_urls = Vec::new();

        for url in product.input_urls() {
            debug!(product_id = %product.id, url = %url, "processing image");

            let raw = self.fetcher.fetch(&url).await?;

            let transcoded = match self.transcoder.clone().transcode_async(raw).await {
                Ok(bytes) => bytes,
                Err(AppError::Transcode(reason)) => {
                    warn!(
                        product_id = %product.id,
                        url = %url,
                        reason = %reason,
                        "skipping image that could not be transcoded"
                    );
                    continue;
                }
                Err(other) => return Err(other),
            };

            let key = format!("{}/{}{}", IMAGE_PREFIX, OUTPUT_NAME_PREFIX, url_basename(&url));
            let location = self.blobs.store(&key, transcoded).await?;
            output_urls.push(location);
        }

        Ok(output_urls)
    }
}

/// Final path segment of a URL, the way a filesystem basename would see it
fn url_basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
