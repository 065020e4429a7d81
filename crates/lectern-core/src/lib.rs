//! Lectern Core Library
//!
//! This crate provides the domain models, byte-range negotiation, error types,
//! configuration, and the access-policy seam shared across all Lectern crates.

pub mod access;
pub mod config;
pub mod error;
pub mod models;
pub mod range;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use access::{AccessDecision, AccessPolicy, Caller, StandardAccessPolicy};
pub use config::{BaseConfig, Config, GatewayConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use range::{negotiate, RangeDecision};
pub use storage_types::StorageBackend;
