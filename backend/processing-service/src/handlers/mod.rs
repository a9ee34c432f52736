/// HTTP handlers for processing-service
pub mod jobs;

pub use jobs::{job_status, upload_manifest};
