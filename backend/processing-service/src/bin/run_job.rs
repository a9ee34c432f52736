//! Run Job - runs the batch pipeline for one existing job from the CLI
//!
//! Useful when a job got stuck before its trigger fired, or for re-driving a
//! fresh job without going through the HTTP front door. Takes the job id as
//! the single argument and uses the same configuration as the server.
//!
//! Environment variables: DATABASE_URL, BLOB_STORAGE_ROOT,
//! BLOB_PUBLIC_BASE_URL, TRANSCODE_QUALITY (see `config.rs` for defaults).

use processing_service::db::{JobStore, PgJobStore};
use processing_service::services::{
    BatchRunner, ImageFetcher, ProductProcessor, Transcoder, TranscoderConfig,
};
use processing_service::storage::{BlobStore, LocalBlobStore};
use processing_service::Config;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("run_job=info".parse().expect("valid directive"))
                .add_directive("processing_service=info".parse().expect("valid directive")),
        )
        .init();

    dotenvy::dotenv().ok();

    let job_id = std::env::args()
        .nth(1)
        .ok_or("usage: run-job <job-id>")?;

    let config = Config::from_env()?;
    info!(job_id = %job_id, "Configuration loaded");

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| format!("Failed to connect to database: {e}"))?;

    let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(db_pool));
    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
        config.storage.root.clone(),
        config.storage.public_base_url.clone(),
    ));
    let transcoder = Arc::new(Transcoder::new(TranscoderConfig {
        quality: config.pipeline.transcode_quality,
    }));
    let processor = ProductProcessor::new(ImageFetcher::new(), transcoder, blobs.clone());
    let runner = BatchRunner::new(store, blobs, processor);

    runner.run(&job_id).await.map_err(|e| format!("{e}"))?;

    info!(job_id = %job_id, "Job finished");
    Ok(())
}
