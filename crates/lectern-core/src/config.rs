//! Configuration module
//!
//! Environment-driven configuration for the gateway: HTTP server, database,
//! storage backend selection, logical bucket names, upload caps, and the
//! stream read timeout.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const STREAM_READ_TIMEOUT_SECS: u64 = 30;
const MAX_DOCUMENT_SIZE_MB: usize = 50;
const MAX_VIDEO_SIZE_MB: usize = 2048;
const DEFAULT_DOCUMENTS_BUCKET: &str = "documents";
const DEFAULT_VIDEOS_BUCKET: &str = "videos";
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/objects";

/// Base configuration shared across services
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Media gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: String,
    // Logical bucket names; keys are namespaced under these
    pub documents_bucket: String,
    pub videos_bucket: String,
    // Upload caps
    pub max_document_size_bytes: usize,
    pub max_video_size_bytes: usize,
    // A backing-store read stalling longer than this aborts the stream
    pub stream_read_timeout_secs: u64,
}

/// Application configuration (media gateway).
#[derive(Clone, Debug)]
pub struct Config(pub Box<GatewayConfig>);

impl Config {
    fn as_gateway(&self) -> &GatewayConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_gateway().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = GatewayConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_gateway().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_gateway().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_gateway().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_gateway().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_gateway().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_gateway().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.as_gateway().database_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_gateway().storage_backend
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_gateway().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_gateway().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_gateway().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> &str {
        &self.as_gateway().local_storage_path
    }

    pub fn documents_bucket(&self) -> &str {
        &self.as_gateway().documents_bucket
    }

    pub fn videos_bucket(&self) -> &str {
        &self.as_gateway().videos_bucket
    }

    pub fn max_document_size_bytes(&self) -> usize {
        self.as_gateway().max_document_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_gateway().max_video_size_bytes
    }

    pub fn stream_read_timeout_secs(&self) -> u64 {
        self.as_gateway().stream_read_timeout_secs
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|s| s.parse::<StorageBackend>().ok())
            .unwrap_or(StorageBackend::Local);

        let config = GatewayConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            documents_bucket: env::var("LECTERN_DOCUMENTS_BUCKET")
                .unwrap_or_else(|_| DEFAULT_DOCUMENTS_BUCKET.to_string()),
            videos_bucket: env::var("LECTERN_VIDEOS_BUCKET")
                .unwrap_or_else(|_| DEFAULT_VIDEOS_BUCKET.to_string()),
            max_document_size_bytes: env::var("MAX_DOCUMENT_SIZE_MB")
                .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_DOCUMENT_SIZE_MB)
                * 1024
                * 1024,
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
            stream_read_timeout_secs: env::var("LECTERN_STREAM_READ_TIMEOUT_SECS")
                .unwrap_or_else(|_| STREAM_READ_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(STREAM_READ_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.documents_bucket.trim().is_empty() || self.videos_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("Bucket names must not be empty"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must not be empty when using local storage backend"
                    ));
                }
            }
        }

        if self.stream_read_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "LECTERN_STREAM_READ_TIMEOUT_SECS must be greater than zero"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(backend: StorageBackend) -> GatewayConfig {
        GatewayConfig {
            base: BaseConfig {
                server_port: 3000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
                environment: "development".to_string(),
            },
            database_url: "postgresql://localhost/lectern".to_string(),
            storage_backend: backend,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: DEFAULT_LOCAL_STORAGE_PATH.to_string(),
            documents_bucket: DEFAULT_DOCUMENTS_BUCKET.to_string(),
            videos_bucket: DEFAULT_VIDEOS_BUCKET.to_string(),
            max_document_size_bytes: MAX_DOCUMENT_SIZE_MB * 1024 * 1024,
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            stream_read_timeout_secs: STREAM_READ_TIMEOUT_SECS,
        }
    }

    #[test]
    fn test_local_backend_validates_with_defaults() {
        assert!(test_config(StorageBackend::Local).validate().is_ok());
    }

    #[test]
    fn test_s3_backend_requires_region() {
        let mut config = test_config(StorageBackend::S3);
        assert!(config.validate().is_err());

        config.aws_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_url_must_be_postgres() {
        let mut config = test_config(StorageBackend::Local);
        config.database_url = "mysql://localhost/lectern".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_stream_timeout_rejected() {
        let mut config = test_config(StorageBackend::Local);
        config.stream_read_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
