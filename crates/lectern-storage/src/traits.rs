//! Object store abstraction trait
//!
//! This module defines the ObjectStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Unknown bucket: {0}")]
    UnknownBucket(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stream of body chunks from a backend read.
///
/// Chunk boundaries are whatever the backend produces; callers must not
/// assume any particular chunk size.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Object store abstraction trait
///
/// All storage backends (S3-compatible, local filesystem) must implement this
/// trait. Every operation addresses an object by `(bucket, key)`, so a single
/// shared client instance can serve many concurrent requests without holding
/// any per-request state.
///
/// **Key format:** keys are opaque names generated at upload time (a UUID plus
/// the original file extension). Keys must not contain `..` or start with `/`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write a whole object, replacing any existing object under the same key.
    async fn put(&self, bucket: &str, key: &str, data: Bytes) -> StorageResult<()>;

    /// Get the size in bytes of a stored object.
    ///
    /// Returns `NotFound` when no object exists under the key.
    async fn stat(&self, bucket: &str, key: &str) -> StorageResult<u64>;

    /// Read a whole object as a stream of chunks.
    ///
    /// A failed connection or missing object surfaces here, before any body
    /// bytes are produced. Failures after the first chunk surface as an `Err`
    /// item on the returned stream instead.
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<ByteStream>;

    /// Read `length` bytes starting at byte `offset` as a stream of chunks.
    ///
    /// The caller is responsible for validating the interval against the
    /// object's recorded size before asking for it; an interval that runs past
    /// the end of the stored object is an error, not a short read.
    async fn get_range(
        &self,
        bucket: &str,
        key: &str,
        offset: u64,
        length: u64,
    ) -> StorageResult<ByteStream>;

    /// Check if an object exists.
    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
