use crate::traits::{ByteStream, ObjectStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    GetOptions, GetRange, GetResult, ObjectStore as _, ObjectStoreExt, PutPayload,
    Result as ObjectResult,
};
use std::collections::HashMap;
use std::time::Instant;

/// S3 object store implementation
///
/// Holds one client handle per logical bucket. Handles share the underlying
/// connection pool and are safe to use from many requests concurrently.
pub struct S3ObjectStore {
    stores: HashMap<String, AmazonS3>,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore serving the given logical buckets
    ///
    /// # Arguments
    /// * `buckets` - bucket names the gateway serves (documents, videos)
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        buckets: &[String],
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut stores = HashMap::new();

        for bucket in buckets {
            // Build AmazonS3 object store from environment and explicit settings.
            let mut builder = AmazonS3Builder::from_env()
                .with_region(region.clone())
                .with_bucket_name(bucket.clone());

            if let Some(ref endpoint) = endpoint_url {
                let allow_http = endpoint.starts_with("http://");
                builder = builder
                    .with_endpoint(endpoint.clone())
                    .with_allow_http(allow_http);
            }

            let store = builder
                .build()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?;

            stores.insert(bucket.clone(), store);
        }

        Ok(S3ObjectStore { stores })
    }

    fn store_for(&self, bucket: &str) -> StorageResult<&AmazonS3> {
        self.stores
            .get(bucket)
            .ok_or_else(|| StorageError::UnknownBucket(bucket.to_string()))
    }

    /// Wrap a `GetResult` body into a `ByteStream`, logging chunk failures.
    fn chunk_stream(result: GetResult, bucket: &str, key: &str, start: Instant) -> ByteStream {
        let bucket = bucket.to_string();
        let key = key.to_string();

        let stream = result.into_stream().map(move |res| match res {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 read stream error"
                );
                Err(StorageError::ReadFailed(e.to_string()))
            }
        });

        Box::pin(stream)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> StorageResult<()> {
        let store = self.store_for(bucket)?;
        let size = data.len() as u64;
        let location = Path::from(key);
        let start = Instant::now();

        let result: ObjectResult<_> = store.put(&location, PutPayload::from(data)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 put failed"
            );
            StorageError::WriteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(())
    }

    async fn stat(&self, bucket: &str, key: &str) -> StorageResult<u64> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key);

        match store.head(&location).await {
            Ok(meta) => Ok(meta.size),
            Err(ObjectStoreError::NotFound { .. }) => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    async fn get(&self, bucket: &str, key: &str) -> StorageResult<ByteStream> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key);
        let start = Instant::now();

        let result: ObjectResult<_> = store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 get failed"
                );
                StorageError::Unavailable(other.to_string())
            }
        })?;

        Ok(Self::chunk_stream(result, bucket, key, start))
    }

    async fn get_range(
        &self,
        bucket: &str,
        key: &str,
        offset: u64,
        length: u64,
    ) -> StorageResult<ByteStream> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key);
        let start = Instant::now();

        let options = GetOptions {
            range: Some(GetRange::Bounded(offset..offset + length)),
            ..Default::default()
        };

        let result: ObjectResult<_> = store.get_opts(&location, options).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %bucket,
                    key = %key,
                    offset = offset,
                    length = length,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 ranged get failed"
                );
                StorageError::Unavailable(other.to_string())
            }
        })?;

        Ok(Self::chunk_stream(result, bucket, key, start))
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key);

        match store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key);
        let start = Instant::now();

        let result: ObjectResult<_> = store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
