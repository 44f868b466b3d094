//! Route tables and the assembled application router.

mod auth;
mod common;
mod entity;

pub use auth::auth_routes;
pub use common::common_routes;
pub use entity::entity_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::Router;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request bodies above this size are rejected.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Full application: common routes at the root, auth under `/api/auth`, CRUD under `/api`.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .merge(entity_routes(state.clone()));

    Router::new()
        .merge(common_routes(state))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
