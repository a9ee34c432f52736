/// Configuration management for processing-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory the blob store writes under
    pub root: String,
    /// Base URL reported for stored blobs
    pub public_base_url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PipelineConfig {
    /// Re-encode quality for quality-bearing formats (0-100)
    pub transcode_quality: u8,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("PROCESSING_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("PROCESSING_SERVICE_PORT")
                    .unwrap_or_else(|_| "8083".to_string())
                    .parse()
                    .unwrap_or(8083),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/processing".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            storage: StorageConfig {
                root: std::env::var("BLOB_STORAGE_ROOT").unwrap_or_else(|_| "./media".to_string()),
                public_base_url: std::env::var("BLOB_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8083/media".to_string()),
            },
            pipeline: PipelineConfig {
                transcode_quality: std::env::var("TRANSCODE_QUALITY")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(50),
            },
        })
    }
}
