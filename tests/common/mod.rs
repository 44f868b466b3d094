//! In-memory `Store` for router tests. Understands the statement shapes produced by `vetclinic_api::sql`
//! and enforces the same foreign-key and unique rules as the bootstrap DDL.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode, Router};
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use vetclinic_api::sql::QueryBuf;
use vetclinic_api::{app, AppState, Authenticator, Store, StoreError};

pub const SECRET: &str = "test-secret";

#[derive(Default)]
struct Tables {
    next_id: BTreeMap<String, i64>,
    rows: BTreeMap<String, BTreeMap<i64, Map<String, Value>>>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Identifiers between double quotes, in order of appearance.
fn quoted_idents(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '"' {
            continue;
        }
        let mut ident = String::new();
        while let Some(c) = chars.next() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    ident.push('"');
                    continue;
                }
                break;
            }
            ident.push(c);
        }
        out.push(ident);
    }
    out
}

fn id_of(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

fn err(code: &str, message: &str) -> StoreError {
    StoreError::new(Some(code), message)
}

const FOREIGN_KEYS: &[(&str, &str, &str)] = &[
    ("pets", "tutor_id", "tutors"),
    ("appointments", "tutor_id", "tutors"),
    ("appointments", "pet_id", "pets"),
    ("appointments", "service_id", "services"),
];

impl Tables {
    fn check_row(&self, table: &str, row: &Map<String, Value>, own_id: Option<i64>) -> Result<(), StoreError> {
        for (t, col, target) in FOREIGN_KEYS {
            if *t != table {
                continue;
            }
            if let Some(v) = row.get(*col).filter(|v| !v.is_null()) {
                let exists = self.rows.get(*target).map(|r| r.contains_key(&id_of(v))).unwrap_or(false);
                if !exists {
                    return Err(err("23503", "insert or update violates foreign key constraint"));
                }
            }
        }
        if table == "users" {
            let email = row.get("email");
            let dup = self
                .rows
                .get("users")
                .map(|r| r.iter().any(|(id, u)| Some(*id) != own_id && u.get("email") == email))
                .unwrap_or(false);
            if dup {
                return Err(err("23505", "duplicate key value violates unique constraint \"users_email_key\""));
            }
        }
        Ok(())
    }

    fn public(table: &str, row: &Map<String, Value>) -> Value {
        let mut row = row.clone();
        if table == "users" {
            row.remove("password");
        }
        Value::Object(row)
    }

    fn insert(&mut self, q: &QueryBuf) -> Result<Option<Value>, StoreError> {
        let head = q.sql.split(" VALUES ").next().unwrap_or_default();
        let idents = quoted_idents(head);
        let table = idents[0].clone();
        let mut row = Map::new();
        for (col, v) in idents[1..].iter().zip(&q.params) {
            row.insert(col.clone(), v.clone());
        }
        self.check_row(&table, &row, None)?;
        let next = self.next_id.entry(table.clone()).or_insert(0);
        *next += 1;
        let id = *next;
        row.insert("id".into(), Value::from(id));
        let out = Self::public(&table, &row);
        self.rows.entry(table).or_default().insert(id, row);
        Ok(Some(out))
    }

    fn update(&mut self, q: &QueryBuf) -> Result<Option<Value>, StoreError> {
        let head = q.sql.split(" WHERE ").next().unwrap_or_default();
        let idents = quoted_idents(head);
        let table = idents[0].clone();
        let id = q.params.last().map(id_of).unwrap_or(0);
        let Some(existing) = self.rows.get(&table).and_then(|r| r.get(&id)).cloned() else {
            return Ok(None);
        };
        let mut row = existing;
        for (col, v) in idents[1..].iter().zip(&q.params) {
            row.insert(col.clone(), v.clone());
        }
        self.check_row(&table, &row, Some(id))?;
        let out = Self::public(&table, &row);
        self.rows.entry(table).or_default().insert(id, row);
        Ok(Some(out))
    }

    fn name_of(&self, table: &str, id: Option<&Value>) -> Value {
        id.and_then(|v| self.rows.get(table)?.get(&id_of(v)))
            .and_then(|r| r.get("name").cloned())
            .unwrap_or(Value::Null)
    }

    fn select_all(&self, q: &QueryBuf) -> Vec<Value> {
        if q.sql.contains("FROM \"appointments\" a") {
            let rows = self.rows.get("appointments").cloned().unwrap_or_default();
            return rows
                .iter()
                .rev()
                .map(|(id, r)| {
                    serde_json::json!({
                        "id": id,
                        "tutor_name": self.name_of("tutors", r.get("tutor_id")),
                        "pet_name": self.name_of("pets", r.get("pet_id")),
                        "service_name": self.name_of("services", r.get("service_id")),
                        "datetime": r.get("datetime").cloned().unwrap_or(Value::Null),
                        "status": r.get("status").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect();
        }
        let tail = q.sql.split(" FROM ").nth(1).unwrap_or_default();
        let table = quoted_idents(tail).into_iter().next().unwrap_or_default();
        self.rows
            .get(&table)
            .map(|r| r.values().rev().map(|row| Self::public(&table, row)).collect())
            .unwrap_or_default()
    }

    fn user_by_email(&self, q: &QueryBuf) -> Option<Value> {
        let email = q.params.first()?;
        self.rows
            .get("users")?
            .values()
            .find(|u| u.get("email") == Some(email))
            .map(|u| Value::Object(u.clone()))
    }

    fn delete(&mut self, q: &QueryBuf) -> u64 {
        let table = quoted_idents(&q.sql).into_iter().next().unwrap_or_default();
        let id = q.params.first().map(id_of).unwrap_or(0);
        let removed = self.rows.get_mut(&table).and_then(|r| r.remove(&id)).is_some();
        if removed && table == "tutors" {
            if let Some(pets) = self.rows.get_mut("pets") {
                pets.retain(|_, p| p.get("tutor_id").map(id_of) != Some(id));
            }
        }
        removed as u64
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Value>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.lock().unwrap().select_all(q))
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Value>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        if q.sql.starts_with("INSERT") {
            tables.insert(q)
        } else if q.sql.starts_with("UPDATE") {
            tables.update(q)
        } else if q.sql.contains("FROM \"users\" WHERE \"email\"") {
            Ok(tables.user_by_email(q))
        } else {
            Err(err("42601", "syntax error"))
        }
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.lock().unwrap().delete(q))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::new(store.clone(), Authenticator::new(SECRET, 3600, 4));
    (app(state), store)
}

pub async fn request_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .expect("valid request"),
        None => builder.body(Body::empty()).expect("valid request"),
    };
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body bytes").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
