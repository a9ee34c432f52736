//! Shared test support: in-memory store implementations and image fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use processing_service::db::JobStore;
use processing_service::error::{AppError, Result};
use processing_service::models::{Job, NewProduct, Product};
use processing_service::storage::BlobStore;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory record store. Also keeps an operation log so tests can assert
/// write ordering (product updates before summary, summary before completed).
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<String, Job>>,
    products: Mutex<Vec<Product>>,
    pub ops: Mutex<Vec<String>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(&self, job_id: &str) -> Option<Job> {
        self.jobs.lock().unwrap().get(job_id).cloned()
    }

    pub fn products_of(&self, job_id: &str) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.job_id == job_id)
            .cloned()
            .collect();
        products.sort_by_key(|p| p.position);
        products
    }

    pub fn op_log(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    fn log(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create_job(&self, job: &Job) -> Result<()> {
        self.jobs
            .lock()
            .unwrap()
            .insert(job.id.clone(), job.clone());
        self.log(format!("create_job:{}", job.id));
        Ok(())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        Ok(self.jobs.lock().unwrap().get(job_id).cloned())
    }

    async fn create_products(&self, job_id: &str, rows: &[NewProduct]) -> Result<Vec<Product>> {
        let mut created = Vec::with_capacity(rows.len());
        let mut products = self.products.lock().unwrap();
        for (position, row) in rows.iter().enumerate() {
            let product = Product {
                id: Uuid::new_v4(),
                job_id: job_id.to_string(),
                position: position as i64,
                serial_number: row.serial_number,
                name: row.name.clone(),
                input_image_urls: row.input_image_urls.clone(),
                output_image_urls: String::new(),
                processed: false,
            };
            products.push(product.clone());
            created.push(product);
        }
        Ok(created)
    }

    async fn get_products(&self, job_id: &str) -> Result<Vec<Product>> {
        Ok(self.products_of(job_id))
    }

    async fn update_product(
        &self,
        product_id: Uuid,
        output_image_urls: &str,
        processed: bool,
    ) -> Result<()> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound(format!("Product not found: {}", product_id)))?;
        product.output_image_urls = output_image_urls.to_string();
        product.processed = processed;
        let serial = product.serial_number;
        drop(products);
        self.log(format!("update_product:{}", serial));
        Ok(())
    }

    async fn set_job_summary(&self, job_id: &str, summary_url: &str) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| AppError::NotFound(format!("Job not found: {}", job_id)))?;
        job.summary_url = Some(summary_url.to_string());
        drop(jobs);
        self.log(format!("set_job_summary:{}", job_id));
        Ok(())
    }

    async fn complete_job(&self, job_id: &str) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| AppError::NotFound(format!("Job not found: {}", job_id)))?;
        job.completed = true;
        drop(jobs);
        self.log(format!("complete_job:{}", job_id));
        Ok(())
    }
}

/// In-memory blob store reporting `memory://` locations
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Bytes>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.blobs.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, key: &str, data: Bytes) -> Result<String> {
        self.blobs.lock().unwrap().insert(key.to_string(), data);
        Ok(format!("memory://{}", key))
    }
}

fn test_image() -> DynamicImage {
    let img = RgbImage::from_fn(48, 48, |x, y| {
        let v = ((x * 29 + y * 13) % 256) as u8;
        image::Rgb([v, v.wrapping_add(64), v.wrapping_add(128)])
    });
    DynamicImage::ImageRgb8(img)
}

/// Real JPEG bytes for fixture servers
pub fn jpeg_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    test_image()
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(90))
        .expect("encode jpeg fixture");
    buf
}

/// Real PNG bytes for fixture servers
pub fn png_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    test_image()
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .expect("encode png fixture");
    buf
}
