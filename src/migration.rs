//! Bootstrap DDL. Idempotent: every table is CREATE TABLE IF NOT EXISTS, in foreign-key order.

use sqlx::PgPool;

const DDL: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL
        )
        "#,
    ),
    (
        "tutors",
        r#"
        CREATE TABLE IF NOT EXISTS tutors (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT,
            address TEXT
        )
        "#,
    ),
    (
        "pets",
        r#"
        CREATE TABLE IF NOT EXISTS pets (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            species TEXT,
            breed TEXT,
            age INT,
            tutor_id INT REFERENCES tutors(id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "services",
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            price NUMERIC(10,2)
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            price NUMERIC(10,2),
            stock INT DEFAULT 0
        )
        "#,
    ),
    (
        "appointments",
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id SERIAL PRIMARY KEY,
            tutor_id INT REFERENCES tutors(id) ON DELETE SET NULL,
            pet_id INT REFERENCES pets(id) ON DELETE SET NULL,
            service_id INT REFERENCES services(id) ON DELETE SET NULL,
            datetime TIMESTAMP,
            status TEXT DEFAULT 'scheduled'
        )
        "#,
    ),
];

/// Create the users table and the five clinic tables if absent.
pub async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    for &(table, ddl) in DDL {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table, "table ensured");
    }
    tracing::info!(tables = DDL.len(), "schema bootstrap complete");
    Ok(())
}
