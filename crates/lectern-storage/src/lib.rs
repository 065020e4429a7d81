//! Lectern Storage Library
//!
//! This crate provides the object store abstraction and backends for the
//! Lectern media gateway. It includes the ObjectStore trait and
//! implementations for S3-compatible services and the local filesystem.
//!
//! # Addressing
//!
//! Every operation addresses an object by `(bucket, key)`. Buckets are the
//! gateway's logical stores (documents, videos); keys are opaque names minted
//! at upload time from a UUID plus the original file extension, so they never
//! collide and never leak uploader-chosen names into storage paths.
//!
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_object_store;
pub use lectern_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalObjectStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStore;
pub use traits::{ByteStream, ObjectStore, StorageError, StorageResult};
