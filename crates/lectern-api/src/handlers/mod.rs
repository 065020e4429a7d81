//! HTTP handlers for the media delivery gateway.
//!
//! Every serve-path handler runs the same request pipeline: look the object
//! up by id (soft-deleted records count as missing), ask the access policy,
//! then dispatch. The shared pieces live in [`delivery`].

pub mod download;
pub mod health;
pub mod stream;
pub mod upload;

mod delivery;
