//! Application state.
//!
//! One state struct for the whole gateway: the metadata repository, the
//! backing object store, and the access policy, injected into every handler.
//! The store and the policy are trait objects chosen at startup, so handlers
//! never name a concrete backend.

use lectern_core::{AccessPolicy, Config};
use lectern_db::StoredObjectRepository;
use lectern_storage::ObjectStore;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub objects: StoredObjectRepository,
    pub store: Arc<dyn ObjectStore>,
    pub access_policy: Arc<dyn AccessPolicy>,
    pub config: Config,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
