//! Services: CRUD dispatch, validation, storage error translation and auth.

mod auth;
mod crud;
pub mod translate;
mod validation;
pub use auth::{AuthService, LoginRequest, RegisterRequest, MSG_EMAIL_NOT_FOUND, MSG_WRONG_PASSWORD};
pub use crud::{parse_id, resolve_table, CrudService};
pub use translate::{classify, translate, ConstraintViolationKind};
pub use validation::{is_numeric, RequestValidator, ValidationError};
