use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{PasswordHasher, TokenIssuer, MAX_PASSWORD_BYTES, TOKEN_LIFETIME_SECS};
use crate::database::models::{NewUser, UserProfile};
use crate::database::schema::{EMAIL_MAX_CHARS, USERNAME_MAX_CHARS};
use crate::database::{DatabaseError, UserStore};
use crate::error::ApiError;
use crate::services::validation::{normalize_email, validate_email_format, FieldErrors};
use crate::state::AppState;

/// Single message for every failed login so callers cannot tell an unknown
/// email from a wrong password
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Account registration and credential exchange
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, issuer: TokenIssuer) -> Self {
        Self { users, hasher, issuer }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.hasher, state.issuer.clone())
    }

    /// Create an account and return its public profile. The plaintext
    /// password is hashed before anything is stored.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserProfile, ApiError> {
        let username = request.username.trim().to_string();
        let email = normalize_email(&request.email);

        let mut errors = FieldErrors::new();
        errors.require("username", &username);
        errors.require("email", &email);
        errors.require("password", &request.password);
        errors.into_result("Username, email, and password are required")?;

        let mut errors = FieldErrors::new();
        errors.limit("username", &username, USERNAME_MAX_CHARS);
        errors.limit("email", &email, EMAIL_MAX_CHARS);
        if let Err(problem) = validate_email_format(&email) {
            errors.add("email", problem);
        }
        if request.password.len() > MAX_PASSWORD_BYTES {
            errors.add("password", format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES));
        }
        errors.into_result("Invalid registration")?;

        let password_hash = self.hasher.hash_blocking(request.password).await?;

        let user = self
            .users
            .create_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::UniqueViolation(_) => ApiError::conflict("Email is already registered"),
                other => other.into(),
            })?;

        tracing::info!("Registered user {} ({})", user.email, user.id);
        Ok(user.into())
    }

    /// Exchange email and password for a bearer token
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let email = normalize_email(&request.email);

        let mut errors = FieldErrors::new();
        errors.require("email", &email);
        errors.require("password", &request.password);
        errors.into_result("Email and password are required")?;

        // No stored password can be this long, so skip the lookup entirely
        if request.password.len() > MAX_PASSWORD_BYTES {
            tracing::debug!("Login rejected for {}: password over length limit", email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let user = match self.users.get_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login rejected for {}: unknown email", email);
                return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let matches = self
            .hasher
            .verify_blocking(request.password, user.password_hash.clone())
            .await?;
        if !matches {
            tracing::debug!("Login rejected for {}: wrong password", email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.issuer.issue(user.id, &user.email)?;
        tracing::info!("User {} logged in", user.id);

        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: TOKEN_LIFETIME_SECS,
            user: user.into(),
        })
    }
}
