/// Processing Service - HTTP Server
///
/// Accepts CSV manifest uploads, triggers batch image processing, and serves
/// job status queries.
use actix_web::{middleware as actix_middleware, web, App, HttpResponse, HttpServer};
use processing_service::db::{JobStore, PgJobStore};
use processing_service::handlers;
use processing_service::services::{
    BatchRunner, ImageFetcher, ProductProcessor, Transcoder, TranscoderConfig,
};
use processing_service::storage::{BlobStore, LocalBlobStore};
use processing_service::Config;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    println!(
        "🖼️ Processing Service starting HTTP server on {}",
        bind_address
    );

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    let store: Arc<dyn JobStore> = Arc::new(PgJobStore::new(db_pool));
    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
        config.storage.root.clone(),
        config.storage.public_base_url.clone(),
    ));
    let transcoder = Arc::new(Transcoder::new(TranscoderConfig {
        quality: config.pipeline.transcode_quality,
    }));
    let processor = ProductProcessor::new(ImageFetcher::new(), transcoder, blobs.clone());
    let runner = Arc::new(BatchRunner::new(store.clone(), blobs.clone(), processor));

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(runner.clone()))
            .wrap(actix_middleware::Logger::default())
            .route(
                "/api/v1/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .route(
                "/api/v1/health/ready",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/api/v1/health/live",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .service(
                web::scope("/api/v1")
                    .route("/upload", web::post().to(handlers::upload_manifest))
                    .route("/status", web::get().to(handlers::job_status)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
