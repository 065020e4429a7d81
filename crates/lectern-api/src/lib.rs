//! Lectern API Library
//!
//! This crate provides the HTTP surface of the media delivery gateway:
//! streaming and download handlers, the upload path, application state,
//! error mapping, and setup.

// Module declarations
mod handlers;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
