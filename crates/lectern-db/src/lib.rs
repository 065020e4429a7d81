//! Lectern Database Library
//!
//! Repositories for the media gateway's persistence layer. Each repository
//! owns the queries for one table and returns domain models from
//! `lectern-core`; no SQL leaks into handlers.

pub mod stored_object;

pub use stored_object::StoredObjectRepository;
