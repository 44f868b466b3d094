//! Storage seam: the dispatcher talks to `Store`; `PgStore` runs each statement on a shared `PgPool`.

use crate::config::DatabaseConfig;
use crate::sql::{PgBindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{PgPool, Postgres};
use std::str::FromStr;
use thiserror::Error;

/// A failed statement. `code` is the SQLSTATE when the server reported one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        StoreError {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) => StoreError {
                code: db.code().map(|c| c.into_owned()),
                message: db.message().to_string(),
            },
            _ => StoreError {
                code: None,
                message: e.to_string(),
            },
        }
    }
}

/// One statement per call; rows come back as JSON objects keyed by column name.
#[async_trait]
pub trait Store: Send + Sync {
    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Value>, StoreError>;
    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Value>, StoreError>;
    /// Returns rows affected.
    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bind_all(q: &QueryBuf) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(PgBindValue::from_json(p));
    }
    query
}

#[async_trait]
impl Store for PgStore {
    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Value>, StoreError> {
        let rows = bind_all(q).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Value>, StoreError> {
        let row = bind_all(q).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        let done = bind_all(q).execute(&self.pool).await?;
        Ok(done.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Build the process-wide pool. A hosted `DATABASE_URL` connects with TLS required (no certificate verification).
pub async fn connect(config: &DatabaseConfig, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let options = match config {
        DatabaseConfig::Url { url, require_tls } => {
            let opts = PgConnectOptions::from_str(url)?;
            if *require_tls {
                opts.ssl_mode(PgSslMode::Require)
            } else {
                opts
            }
        }
        DatabaseConfig::Parts {
            host,
            port,
            user,
            password,
            database,
        } => {
            let opts = PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .database(database);
            match password {
                Some(p) => opts.password(p),
                None => opts,
            }
        }
    };
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}
