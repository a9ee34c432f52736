//! Batch runner - drives one job from triggered to completed
//!
//! State machine per job:
//!
//! ```text
//! created --(load products)--> processing --(all processed)--> summarized --(artifact persisted)--> completed
//! ```
//!
//! Products run sequentially in manifest order; each one's outcome is
//! persisted the moment it finishes so status queries see partial progress.
//! A fatal failure halts the batch where it stands: already-processed
//! products keep their state, nothing rolls back, and the job stays
//! not-completed. The completed flag is always the final durable write.

use crate::db::JobStore;
use crate::error::{AppError, Result};
use crate::models::join_url_list;
use crate::services::processor::ProductProcessor;
use crate::services::summary::{self, SummaryRow};
use crate::storage::BlobStore;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info};

pub struct BatchRunner {
    store: Arc<dyn JobStore>,
    blobs: Arc<dyn BlobStore>,
    processor: ProductProcessor,
}

impl BatchRunner {
    pub fn new(
        store: Arc<dyn JobStore>,
        blobs: Arc<dyn BlobStore>,
        processor: ProductProcessor,
    ) -> Self {
        Self {
            store,
            blobs,
            processor,
        }
    }

    /// Fire-and-forget trigger boundary. The caller has already committed the
    /// job and its products; failures inside the run are logged, never
    /// propagated back to the submitter.
    pub fn submit(self: &Arc<Self>, job_id: String) {
        let runner = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = runner.run(&job_id).await {
                error!(job_id = %job_id, error = %e, "batch run failed");
            }
        });
    }

    /// Run one job to completion or first fatal error
    pub async fn run(&self, job_id: &str) -> Result<()> {
        info!(job_id = %job_id, "starting batch run");

        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job not found: {}", job_id)))?;

        let products = self.store.get_products(job_id).await?;
        let mut summary_rows = Vec::with_capacity(products.len());

        for product in &products {
            let output_urls = self.processor.process(product).await?;
            let output_image_urls = join_url_list(&output_urls);

            // Persist before moving on so mid-run status queries see this
            // product done; the flag never reverts.
            self.store
                .update_product(product.id, &output_image_urls, true)
                .await?;

            info!(
                job_id = %job_id,
                serial_number = product.serial_number,
                images_in = product.input_urls().len(),
                images_out = output_urls.len(),
                "product processed"
            );

            summary_rows.push(SummaryRow {
                serial_number: product.serial_number,
                name: product.name.clone(),
                input_image_urls: product.input_image_urls.clone(),
                output_image_urls,
            });
        }

        let artifact = summary::render(&summary_rows);
        let location = self
            .blobs
            .store(&summary::summary_key(job_id), Bytes::from(artifact))
            .await?;
        self.store.set_job_summary(job_id, &location).await?;

        self.store.complete_job(job_id).await?;

        info!(
            job_id = %job_id,
            products = products.len(),
            summary = %location,
            "batch run completed"
        );
        Ok(())
    }
}
