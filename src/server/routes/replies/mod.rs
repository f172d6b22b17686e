use crate::server::router::AppState;
use axum::{
    Router,
    routing::{get, patch, put},
};

pub mod extract;
pub mod handlers;

use handlers::{create, destroy, list, record_use, retrieve, update};

/// Canned reply routes, relative to the mount point.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(destroy))
        .route("/{id}/reply", get(retrieve))
        .route("/{id}/use", patch(record_use))
}
