/// Record store boundary for jobs and products
///
/// The pipeline only ever talks to this trait; persistence technology stays
/// behind it. Identifiers are opaque caller-supplied strings for jobs and
/// store-assigned UUIDs for products.
use crate::error::Result;
use crate::models::{Job, NewProduct, Product};
use async_trait::async_trait;
use uuid::Uuid;

pub mod postgres;

pub use postgres::PgJobStore;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a freshly-created job
    async fn create_job(&self, job: &Job) -> Result<()>;

    /// Fetch one job, `None` when the identifier is unknown
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>>;

    /// Persist the intake rows for a job, preserving manifest order
    async fn create_products(&self, job_id: &str, rows: &[NewProduct]) -> Result<Vec<Product>>;

    /// All products of a job, in manifest order
    async fn get_products(&self, job_id: &str) -> Result<Vec<Product>>;

    /// Record a product's outcome; the only mutation products ever see
    async fn update_product(
        &self,
        product_id: Uuid,
        output_image_urls: &str,
        processed: bool,
    ) -> Result<()>;

    /// Attach the summary artifact reference to a job
    async fn set_job_summary(&self, job_id: &str, summary_url: &str) -> Result<()>;

    /// Flip the job's completed flag; must be the final write of a run
    async fn complete_job(&self, job_id: &str) -> Result<()>;
}
