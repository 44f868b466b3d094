//! Veterinary clinic API: generic table-driven CRUD over PostgreSQL plus register/login.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::Authenticator;
pub use config::{init_tracing, AppConfig, DatabaseConfig};
pub use error::{AppError, ConfigError};
pub use migration::create_tables;
pub use response::Envelope;
pub use routes::{app, auth_routes, common_routes, entity_routes};
pub use schema::{fields_for, TableName};
pub use service::{AuthService, CrudService};
pub use state::AppState;
pub use store::{connect, PgStore, Store, StoreError};
