//! Domain models shared across Lectern crates.

pub mod stored_object;

pub use stored_object::{
    AccessLevel, ObjectKind, ObjectStatus, StoredObject, StoredObjectResponse,
};
