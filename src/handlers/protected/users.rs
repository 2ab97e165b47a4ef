use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::MAX_PASSWORD_BYTES;
use crate::database::models::{UserChanges, UserProfile};
use crate::database::schema::{EMAIL_MAX_CHARS, USERNAME_MAX_CHARS};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::validation::{normalize_email, validate_email_format, FieldErrors};
use crate::state::AppState;

/// Fields omitted from the body keep their stored values
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/users/:id - Update the caller's own account
///
/// Expected Input:
/// ```json
/// {
///   "username": "amy",          // Optional
///   "email": "amy@y.com",       // Optional, must be unused
///   "password": "new-password"  // Optional, re-hashed
/// }
/// ```
pub async fn user_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Path(id) = path?;
    auth.ensure_owns(id, "account")?;
    let Json(request) = payload?;

    let username = request.username.map(|u| u.trim().to_string());
    let email = request.email.as_deref().map(normalize_email);

    let mut errors = FieldErrors::new();
    if let Some(username) = &username {
        errors.require("username", username);
        errors.limit("username", username, USERNAME_MAX_CHARS);
    }
    if let Some(email) = &email {
        errors.limit("email", email, EMAIL_MAX_CHARS);
        if let Err(problem) = validate_email_format(email) {
            errors.add("email", problem);
        }
    }
    if let Some(password) = &request.password {
        errors.require("password", password);
        if password.len() > MAX_PASSWORD_BYTES {
            errors.add("password", format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES));
        }
    }
    errors.into_result("Invalid account update")?;

    let password_hash = match request.password {
        Some(password) => Some(state.hasher.hash_blocking(password).await?),
        None => None,
    };

    let user = state
        .users
        .update_user(
            id,
            UserChanges {
                username,
                email,
                password_hash,
            },
        )
        .await?;

    tracing::info!("User {} updated their account", id);
    Ok(ApiResponse::success(user.into()))
}

/// DELETE /api/users/:id - Delete the caller's own account and its recipes
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    auth.ensure_owns(id, "account")?;

    state.users.delete_user(id).await?;
    tracing::info!("User {} deleted their account", id);
    Ok(ApiResponse::no_content())
}
