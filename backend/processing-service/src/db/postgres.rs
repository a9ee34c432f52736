/// PostgreSQL-backed job store
///
/// Expected schema:
///
/// ```sql
/// CREATE TABLE jobs (
///     id          TEXT PRIMARY KEY,
///     created_at  TIMESTAMPTZ NOT NULL,
///     completed   BOOLEAN NOT NULL DEFAULT FALSE,
///     summary_url TEXT
/// );
///
/// CREATE TABLE products (
///     id                UUID PRIMARY KEY,
///     job_id            TEXT NOT NULL REFERENCES jobs (id),
///     position          BIGINT NOT NULL,
///     serial_number     BIGINT NOT NULL,
///     name              TEXT NOT NULL,
///     input_image_urls  TEXT NOT NULL,
///     output_image_urls TEXT NOT NULL DEFAULT '',
///     processed         BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
use crate::db::JobStore;
use crate::error::{AppError, Result};
use crate::models::{Job, NewProduct, Product};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create_job(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, created_at, completed, summary_url)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&job.id)
        .bind(job.created_at)
        .bind(job.completed)
        .bind(&job.summary_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, created_at, completed, summary_url
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn create_products(&self, job_id: &str, rows: &[NewProduct]) -> Result<Vec<Product>> {
        let mut tx = self.pool.begin().await?;
        let mut products = Vec::with_capacity(rows.len());

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

            sqlx::query(
                r#"
                INSERT INTO products
                    (id, job_id, position, serial_number, name,
                     input_image_urls, output_image_urls, processed)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(product.id)
            .bind(&product.job_id)
            .bind(product.position)
            .bind(product.serial_number)
            .bind(&product.name)
            .bind(&product.input_image_urls)
            .bind(&product.output_image_urls)
            .bind(product.processed)
            .execute(&mut *tx)
            .await?;

            products.push(product);
        }

        tx.commit().await?;
        Ok(products)
    }

    async fn get_products(&self, job_id: &str) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, job_id, position, serial_number, name,
                   input_image_urls, output_image_urls, processed
            FROM products
            WHERE job_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn update_product(
        &self,
        product_id: Uuid,
        output_image_urls: &str,
        processed: bool,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET output_image_urls = $2, processed = $3
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .bind(output_image_urls)
        .bind(processed)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product not found: {}",
                product_id
            )));
        }
        Ok(())
    }

    async fn set_job_summary(&self, job_id: &str, summary_url: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET summary_url = $2
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(summary_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Job not found: {}", job_id)));
        }
        Ok(())
    }

    async fn complete_job(&self, job_id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET completed = TRUE
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Job not found: {}", job_id)));
        }
        Ok(())
    }
}
