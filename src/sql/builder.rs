//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for registry tables.
//! Table identifiers come only from `TableName`; payload keys are quoted, values are always parameters.

use crate::schema::{ColumnType, TableName, TableSpec};
use serde_json::{Map, Value};

/// Primary key column of every registry table.
pub const PK: &str = "id";

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Placeholder with a cast to the column's type when the registry knows the column.
fn placeholder(spec: &TableSpec, column: &str, n: usize) -> String {
    match spec.column(column) {
        Some(c) => format!("${}::{}", n, c.ty.pg_type()),
        None => format!("${}", n),
    }
}

/// SELECT list for a table. NUMERIC columns come back as float8 so they decode as JSON numbers.
fn select_column_list(spec: &TableSpec, alias: Option<&str>) -> String {
    spec.columns
        .iter()
        .map(|c| {
            let q = quoted(c.name);
            let expr = match alias {
                Some(a) => format!("{}.{}", a, q),
                None => q.clone(),
            };
            match c.ty {
                ColumnType::Numeric => format!("{}::float8 AS {}", expr, q),
                _ if alias.is_some() => format!("{} AS {}", expr, q),
                _ => expr,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// All rows, newest first. Appointments resolve tutor, pet and service names through left joins.
pub fn select_all(table: TableName) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = match table {
        TableName::Appointments => concat!(
            "SELECT a.\"id\", t.\"name\" AS \"tutor_name\", p.\"name\" AS \"pet_name\", ",
            "s.\"name\" AS \"service_name\", a.\"datetime\", a.\"status\" ",
            "FROM \"appointments\" a ",
            "LEFT JOIN \"tutors\" t ON a.\"tutor_id\" = t.\"id\" ",
            "LEFT JOIN \"pets\" p ON a.\"pet_id\" = p.\"id\" ",
            "LEFT JOIN \"services\" s ON a.\"service_id\" = s.\"id\" ",
            "ORDER BY a.\"id\" DESC"
        )
        .to_string(),
        _ => format!(
            "SELECT {} FROM {} ORDER BY {} DESC",
            select_column_list(table.spec(), None),
            quoted(table.as_str()),
            quoted(PK)
        ),
    };
    q
}

/// INSERT: columns and placeholders from the payload's own keys. `id` is left to the database.
pub fn insert(table: TableName, body: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let spec = table.spec();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (k, v) in body {
        if k == PK {
            continue;
        }
        let n = q.push_param(v.clone());
        cols.push(quoted(k));
        placeholders.push(placeholder(spec, k, n));
    }
    let returning = select_column_list(spec, None);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", quoted(table.as_str()), returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            quoted(table.as_str()),
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id: SET every payload key except `id`. Zero returned rows means the id does not exist.
pub fn update(table: TableName, id: i64, body: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let spec = table.spec();
    let name = quoted(table.as_str());
    let returning = select_column_list(spec, None);
    let mut sets = Vec::new();
    for (k, v) in body {
        if k == PK {
            continue;
        }
        let n = q.push_param(v.clone());
        sets.push(format!("{} = {}", quoted(k), placeholder(spec, k, n)));
    }
    let id_param = q.push_param(Value::from(id));
    q.sql = if sets.is_empty() {
        format!("SELECT {} FROM {} WHERE {} = ${}::int8", returning, name, quoted(PK), id_param)
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = ${}::int8 RETURNING {}",
            name,
            sets.join(", "),
            quoted(PK),
            id_param,
            returning
        )
    };
    q
}

/// DELETE by id. Caller checks rows affected.
pub fn delete(table: TableName, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(Value::from(id));
    q.sql = format!("DELETE FROM {} WHERE {} = $1::int8", quoted(table.as_str()), quoted(PK));
    q
}

pub fn insert_user(username: &str, email: &str, password_hash: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(Value::from(username));
    q.push_param(Value::from(email));
    q.push_param(Value::from(password_hash));
    q.sql = "INSERT INTO \"users\" (\"username\", \"email\", \"password\") VALUES ($1::text, $2::text, $3::text) \
             RETURNING \"id\", \"username\", \"email\""
        .to_string();
    q
}

pub fn select_user_by_email(email: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(Value::from(email));
    q.sql = "SELECT \"id\", \"username\", \"email\", \"password\" FROM \"users\" WHERE \"email\" = $1::text"
        .to_string();
    q
}
