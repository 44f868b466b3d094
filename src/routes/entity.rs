//! Generic CRUD routes. The table is a path parameter resolved against the registry by the handlers.
//! `/:table/` is routed too, so a trailing slash reaches the same handlers.

use crate::handlers::entity::{create, delete as delete_handler, list, update};
use crate::state::AppState;
use axum::{routing::get, routing::put, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:table", get(list).post(create))
        .route("/:table/", get(list).post(create))
        .route("/:table/:id", put(update).delete(delete_handler))
        .with_state(state)
}
