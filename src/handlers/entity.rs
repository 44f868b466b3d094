//! Entity CRUD handlers: list, create, update, delete for registry tables.

use crate::error::AppError;
use crate::response::ok;
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

/// Bodies must be JSON objects; anything else is a bad request with the usual envelope.
pub(crate) fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::BadRequest("Body must be a JSON object.".into())),
        Err(e) => Err(AppError::BadRequest(e.body_text())),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let envelope = CrudService::list(state.store.as_ref(), &table).await?;
    Ok(ok(envelope))
}

pub async fn create(
    State(state): State<AppState>,
    Path(table): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let envelope = CrudService::create(state.store.as_ref(), &table, &body).await?;
    Ok(ok(envelope))
}

pub async fn update(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let envelope = CrudService::update(state.store.as_ref(), &table, &id, &body).await?;
    Ok(ok(envelope))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let envelope = CrudService::delete(state.store.as_ref(), &table, &id).await?;
    Ok(ok(envelope))
}
