//! Generic CRUD dispatch over the table registry. Each operation is one statement against the store.

use crate::error::AppError;
use crate::response::{Envelope, MSG_CREATED, MSG_DELETED, MSG_LOADED, MSG_UPDATED};
use crate::schema::TableName;
use crate::service::translate::{classify, ConstraintViolationKind};
use crate::service::RequestValidator;
use crate::sql::{delete, insert, select_all, update};
use crate::store::{Store, StoreError};
use serde_json::{Map, Value};

pub struct CrudService;

impl CrudService {
    /// All rows of a table, newest first.
    pub async fn list(store: &dyn Store, table: &str) -> Result<Envelope, AppError> {
        let table = resolve_table(table)?;
        let q = select_all(table);
        let rows = store
            .fetch_all(&q)
            .await
            .map_err(|e| store_failure(table, "list", e))?;
        Ok(Envelope::success_many(rows, MSG_LOADED))
    }

    /// Validate and insert; returns the persisted row including its new id.
    pub async fn create(store: &dyn Store, table: &str, body: &Map<String, Value>) -> Result<Envelope, AppError> {
        let table = resolve_table(table)?;
        RequestValidator::validate(table, body)?;
        let q = insert(table, body);
        let row = store
            .fetch_optional(&q)
            .await
            .map_err(|e| store_failure(table, "create", e))?
            .ok_or(AppError::Store(ConstraintViolationKind::Unexpected.message()))?;
        Ok(Envelope::success(row, MSG_CREATED))
    }

    /// Validate and update by id; `NotFound` when no row has that id.
    pub async fn update(
        store: &dyn Store,
        table: &str,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Envelope, AppError> {
        let table = resolve_table(table)?;
        let id = parse_id(id)?;
        RequestValidator::validate(table, body)?;
        let q = update(table, id, body);
        let row = store
            .fetch_optional(&q)
            .await
            .map_err(|e| store_failure(table, "update", e))?
            .ok_or(AppError::NotFound)?;
        Ok(Envelope::success(row, MSG_UPDATED))
    }

    /// Delete by id; `NotFound` when no row has that id.
    pub async fn delete(store: &dyn Store, table: &str, id: &str) -> Result<Envelope, AppError> {
        let table = resolve_table(table)?;
        let id = parse_id(id)?;
        let q = delete(table, id);
        let affected = store
            .execute(&q)
            .await
            .map_err(|e| store_failure(table, "delete", e))?;
        if affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(Envelope::success(Value::Null, MSG_DELETED))
    }
}

pub fn resolve_table(raw: &str) -> Result<TableName, AppError> {
    TableName::parse(raw).ok_or(AppError::InvalidTable)
}

/// Identifiers are positive integers; anything else is a numeric-field error.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Validation(
            ConstraintViolationKind::InvalidNumber.message().to_string(),
        )),
    }
}

pub(crate) fn store_failure(table: impl std::fmt::Display, op: &'static str, e: StoreError) -> AppError {
    let kind = classify(e.code.as_deref(), &e.message);
    tracing::warn!(
        table = %table,
        op,
        sqlstate = e.code.as_deref().unwrap_or("-"),
        kind = ?kind,
        error = %e.message,
        "statement failed"
    );
    AppError::Store(kind.message())
}
