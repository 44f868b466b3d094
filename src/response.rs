//! Standard response envelope: `{success, message, data}` on every path.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MSG_LOADED: &str = "Data loaded successfully.";
pub const MSG_CREATED: &str = "Record created successfully.";
pub const MSG_UPDATED: &str = "Record updated successfully.";
pub const MSG_DELETED: &str = "Record deleted successfully.";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    /// Always serialized; `null` when the operation has no payload.
    pub data: Value,
}

impl Envelope {
    pub fn success(data: Value, message: impl Into<String>) -> Self {
        Envelope {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn success_many(rows: Vec<Value>, message: impl Into<String>) -> Self {
        Self::success(Value::Array(rows), message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            message: message.into(),
            data: Value::Null,
        }
    }
}

pub fn ok(envelope: Envelope) -> (StatusCode, Json<Envelope>) {
    (StatusCode::OK, Json(envelope))
}
