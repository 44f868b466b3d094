//! Server: loads `.env`, connects the pool, bootstraps tables, serves the API.
//!
//! Run from repo root: `cargo run -p server`

use std::sync::Arc;
use tokio::net::TcpListener;
use vetclinic_api::{app, connect, create_tables, init_tracing, AppConfig, AppState, Authenticator, PgStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("vetclinic_api=info,server=info,tower_http=info");

    let config = AppConfig::from_env()?;
    let pool = connect(&config.database, config.max_connections).await?;
    tracing::info!("connected to PostgreSQL");
    create_tables(&pool).await?;

    let auth = Authenticator::new(&config.jwt_secret, config.token_ttl_secs, config.bcrypt_cost);
    let state = AppState::new(Arc::new(PgStore::new(pool)), auth);

    let listener = TcpListener::bind((config.bind_addr.as_str(), config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
