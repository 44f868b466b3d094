//! Convert serde_json::Value to a bindable PostgreSQL parameter.
//! Values are sent as text; the placeholder cast (`$n::int4`, `$n::numeric`, ...) lets the server coerce them,
//! so bad input surfaces as the server's own type error.

use serde_json::{Number, Value};
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Text(String),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Text(b.to_string()),
            Value::Number(n) => PgBindValue::Text(number_text(n)),
            Value::String(s) => PgBindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Text(v.to_string()),
        }
    }
}

/// Integral floats lose their fraction (`3.0` becomes `"3"`) so they still cast to `int4`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Largest magnitude an f64 represents without gaps between integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            PgBindValue::Null => Ok(IsNull::Yes),
            PgBindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
        }
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_become_text() {
        assert_eq!(PgBindValue::from_json(&json!(3)), PgBindValue::Text("3".into()));
        assert_eq!(PgBindValue::from_json(&json!(9.5)), PgBindValue::Text("9.5".into()));
        assert_eq!(PgBindValue::from_json(&json!(true)), PgBindValue::Text("true".into()));
        assert_eq!(PgBindValue::from_json(&json!("Rex")), PgBindValue::Text("Rex".into()));
        assert_eq!(PgBindValue::from_json(&Value::Null), PgBindValue::Null);
    }

    #[test]
    fn integral_floats_bind_without_fraction() {
        assert_eq!(PgBindValue::from_json(&json!(3.0)), PgBindValue::Text("3".into()));
        assert_eq!(PgBindValue::from_json(&json!(-12.0)), PgBindValue::Text("-12".into()));
        assert_eq!(PgBindValue::from_json(&json!(0.5)), PgBindValue::Text("0.5".into()));
        assert_eq!(PgBindValue::from_json(&json!(1e300)), PgBindValue::Text("1e300".into()));
    }
}
