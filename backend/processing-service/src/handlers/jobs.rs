/// Job handlers - HTTP endpoints for manifest intake and status queries
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::JobStore;
use crate::error::{AppError, Result};
use crate::manifest;
use crate::models::{Job, JobStatusResponse};
use crate::services::BatchRunner;

/// Upload a CSV manifest, creating one job plus its products and triggering
/// the batch run fire-and-forget
///
/// POST /api/v1/upload
pub async fn upload_manifest(
    store: web::Data<Arc<dyn JobStore>>,
    runner: web::Data<Arc<BatchRunner>>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4().to_string();
    tracing::info!(request_id = %request_id, "received manifest upload");

    let mut manifest_bytes: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        match file_name {
            Some(name) if name.to_ascii_lowercase().ends_with(".csv") => {}
            _ => {
                return Err(AppError::BadRequest(
                    "Uploaded file must be a CSV".to_string(),
                ))
            }
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes = chunk
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            data.extend_from_slice(&bytes);
        }
        manifest_bytes = Some(data);
    }

    let manifest_bytes = manifest_bytes
        .ok_or_else(|| AppError::BadRequest("No file was uploaded".to_string()))?;
    let content = String::from_utf8(manifest_bytes)
        .map_err(|_| AppError::BadRequest("Manifest must be UTF-8 encoded".to_string()))?;

    // Validate the whole manifest before creating anything
    let rows = manifest::parse_manifest(&content)?;

    store.create_job(&Job::new(request_id.clone())).await?;
    store.create_products(&request_id, &rows).await?;
    tracing::info!(
        request_id = %request_id,
        products = rows.len(),
        "job created from manifest"
    );

    runner.submit(request_id.clone());

    Ok(HttpResponse::Created().json(serde_json::json!({ "request_id": request_id })))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub request_id: Option<String>,
}

/// Status projection of one job and its products
///
/// GET /api/v1/status?request_id=...
pub async fn job_status(
    store: web::Data<Arc<dyn JobStore>>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse> {
    let request_id = query
        .request_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("request_id query parameter is required".to_string()))?;

    let job = store
        .get_job(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job not found: {}", request_id)))?;
    let products = store.get_products(request_id).await?;

    Ok(HttpResponse::Ok().json(JobStatusResponse::from_entities(job, products)))
}
