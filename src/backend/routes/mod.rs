//! Backend routes for both wire variants

pub mod path;
pub mod query;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::Router;

use crate::backend::state::BackendState;

pub type SharedState = Arc<RwLock<BackendState>>;

pub(crate) fn read(state: &SharedState) -> RwLockReadGuard<'_, BackendState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write(state: &SharedState) -> RwLockWriteGuard<'_, BackendState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Create the combined router. The two variants don't share any paths
/// so they are served side by side.
pub fn router() -> Router<SharedState> {
    Router::new()
        // `/user/..` and `/channel/..`
        .merge(path::router())
        // `/register`, `/alias` and `/send`
        .merge(query::router())
}
