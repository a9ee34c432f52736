/// Data models for processing-service
///
/// This module defines structures for:
/// - Job: One batch submission, tracked to a single completion flag
/// - Product: One manifest row with its input and output image URLs
///
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delimiter for URL-list fields at the storage and artifact boundary.
/// URLs themselves must not contain it (accepted limitation).
pub const URL_LIST_DELIMITER: char = ',';

// ========================================
// Job Models
// ========================================

/// Batch job database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub summary_url: Option<String>,
}

impl Job {
    /// A fresh, not-yet-completed job with the given identifier
    pub fn new(id: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            completed: false,
            summary_url: None,
        }
    }
}

// ========================================
// Product Models
// ========================================

/// Product database entity (one manifest row)
///
/// Input fields are immutable after intake; only `output_image_urls` and
/// `processed` mutate, and only through the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub job_id: String,
    /// Manifest-order index within the job
    pub position: i64,
    pub serial_number: i64,
    pub name: String,
    pub input_image_urls: String,
    pub output_image_urls: String,
    pub processed: bool,
}

impl Product {
    /// Ordered input URLs, decoded from the stored comma-joined form
    pub fn input_urls(&self) -> Vec<String> {
        split_url_list(&self.input_image_urls)
    }
}

/// Product fields known at intake time, before the store assigns identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub serial_number: i64,
    pub name: String,
    pub input_image_urls: String,
}

/// Split a comma-joined URL-list field into its ordered entries.
/// Entries are trimmed and empties dropped; the stored string keeps its
/// original bytes.
pub fn split_url_list(raw: &str) -> Vec<String> {
    raw.split(URL_LIST_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Join ordered URLs back into the storage encoding
pub fn join_url_list(urls: &[String]) -> String {
    urls.join(&URL_LIST_DELIMITER.to_string())
}

// ========================================
// Status DTOs
// ========================================

/// Per-product slice of the status projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStatusResponse {
    pub serial_number: i64,
    pub name: String,
    pub input_image_urls: String,
    pub output_image_urls: String,
    pub processed: bool,
}

impl From<Product> for ProductStatusResponse {
    fn from(product: Product) -> Self {
        Self {
            serial_number: product.serial_number,
            name: product.name,
            input_image_urls: product.input_image_urls,
            output_image_urls: product.output_image_urls,
            processed: product.processed,
        }
    }
}

/// Read-only projection of one job and its products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub request_id: String,
    pub created_at: i64,
    pub completed: bool,
    pub summary_url: Option<String>,
    pub products: Vec<ProductStatusResponse>,
}

impl JobStatusResponse {
    /// Create a response DTO from database entities
    pub fn from_entities(job: Job, products: Vec<Product>) -> Self {
        Self {
            request_id: job.id,
            created_at: job.created_at.timestamp(),
            completed: job.completed,
            summary_url: job.summary_url,
            products: products.into_iter().map(Into::into).collect(),
        }
    }
}
