//! Request validation against the table registry.

use crate::error::AppError;
use crate::schema::{TableName, NUMERIC_FIELDS};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid table.")]
    InvalidTable,
    #[error("All fields are required, fill everything in correctly (missing '{0}').")]
    MissingField(&'static str),
    #[error("The field '{0}' must contain only numbers.")]
    NotNumeric(&'static str),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::InvalidTable => AppError::InvalidTable,
            other => AppError::Validation(other.to_string()),
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create/update payload for a raw table name.
    pub fn validate_raw(table: &str, body: &Map<String, Value>) -> Result<(), ValidationError> {
        let table = TableName::parse(table).ok_or(ValidationError::InvalidTable)?;
        Self::validate(table, body)
    }

    /// Numeric fields that hold a value must coerce to a number; then every required field must hold a value.
    /// Zero is a valid number. Blank strings count as absent, so they fail the required pass instead.
    pub fn validate(table: TableName, body: &Map<String, Value>) -> Result<(), ValidationError> {
        for &field in NUMERIC_FIELDS {
            let value = body.get(field);
            if has_value(value) && !value.is_some_and(is_numeric) {
                return Err(ValidationError::NotNumeric(field));
            }
        }
        for &field in table.spec().required {
            if !has_value(body.get(field)) {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }
}

fn has_value(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(f64::is_finite).unwrap_or(false),
        Some(_) => true,
    }
}

/// True for JSON numbers and for strings holding a finite number.
pub fn is_numeric(v: &Value) -> bool {
    match v {
        Value::Number(n) => n.as_f64().map(f64::is_finite).unwrap_or(false),
        Value::String(s) => s.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false),
        _ => false,
    }
}
