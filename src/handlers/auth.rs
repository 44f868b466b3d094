//! Auth handlers: register, login, and token introspection.

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::handlers::entity::body_to_map;
use crate::response::ok;
use crate::service::{AuthService, LoginRequest, RegisterRequest};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn parse_body<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Result<T, AppError> {
    let map = body_to_map(body)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req: RegisterRequest = parse_body(body)?;
    let envelope = AuthService::register(state.store.as_ref(), &state.auth, &req).await?;
    Ok(ok(envelope))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req: LoginRequest = parse_body(body)?;
    let envelope = AuthService::login(state.store.as_ref(), &state.auth, &req).await?;
    Ok(ok(envelope))
}

pub async fn me(State(state): State<AppState>, BearerToken(token): BearerToken) -> Result<impl IntoResponse, AppError> {
    let envelope = AuthService::me(&state.auth, &token)?;
    Ok(ok(envelope))
}
