//! Register and login against the users table.

use crate::auth::{AuthError, Authenticator};
use crate::error::AppError;
use crate::response::Envelope;
use crate::service::crud::store_failure;
use crate::sql::{insert_user, select_user_by_email};
use crate::store::Store;
use serde::Deserialize;
use serde_json::{json, Value};

pub const MSG_EMAIL_NOT_FOUND: &str = "Email not found.";
pub const MSG_WRONG_PASSWORD: &str = "Wrong password.";

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenExpired | AuthError::InvalidToken => AppError::Unauthorized(e.to_string()),
            AuthError::Hash(_) | AuthError::TokenGeneration => AppError::Internal(e.to_string()),
        }
    }
}

pub struct AuthService;

impl AuthService {
    /// Store a new user with a hashed password. The response never includes the hash.
    pub async fn register(store: &dyn Store, auth: &Authenticator, req: &RegisterRequest) -> Result<Envelope, AppError> {
        let email = req.email.trim();
        if req.username.trim().is_empty() || email.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation(
                "Username, email and password are required.".into(),
            ));
        }
        let digest = auth.hasher.hash(&req.password).await?;
        let q = insert_user(req.username.trim(), email, &digest);
        let user = store
            .fetch_optional(&q)
            .await
            .map_err(|e| store_failure("users", "register", e))?
            .ok_or_else(|| AppError::Internal("insert returned no row".into()))?;
        tracing::info!(user_id = ?user.get("id"), "user registered");
        Ok(Envelope::success(user, "User registered successfully."))
    }

    /// Check credentials and issue a token. Unknown email and wrong password are reported separately.
    pub async fn login(store: &dyn Store, auth: &Authenticator, req: &LoginRequest) -> Result<Envelope, AppError> {
        let q = select_user_by_email(req.email.trim());
        let user = store
            .fetch_optional(&q)
            .await
            .map_err(|e| store_failure("users", "login", e))?
            .ok_or_else(|| AppError::BadRequest(MSG_EMAIL_NOT_FOUND.into()))?;

        let digest = user.get("password").and_then(Value::as_str).unwrap_or_default();
        if !auth.hasher.verify(&req.password, digest).await {
            return Err(AppError::BadRequest(MSG_WRONG_PASSWORD.into()));
        }

        let id = user
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| AppError::Internal("user row without id".into()))?;
        let username = user.get("username").and_then(Value::as_str).unwrap_or_default();
        let token = auth.tokens.issue(id, username)?;
        Ok(Envelope::success(
            json!({
                "token": token,
                "user": {
                    "id": id,
                    "username": username,
                    "email": user.get("email").cloned().unwrap_or(Value::Null),
                }
            }),
            "Login successful.",
        ))
    }

    /// Claims of a valid bearer token.
    pub fn me(auth: &Authenticator, token: &str) -> Result<Envelope, AppError> {
        let claims = auth.tokens.verify(token)?;
        let data = serde_json::to_value(claims).map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Envelope::success(data, "Token is valid."))
    }
}
