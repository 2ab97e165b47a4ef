use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthService, RegisterRequest};
use crate::state::AppState;

/// POST /auth/signup - Register a new account
///
/// Expected Input:
/// ```json
/// {
///   "username": "amy",
///   "email": "amy@x.com",
///   "password": "pw123456"
/// }
/// ```
///
/// Expected Output (201):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "user_uuid",
///     "username": "amy",
///     "email": "amy@x.com",
///     "created_at": "...",
///     "updated_at": "..."
///   }
/// }
/// ```
///
/// 400 when a field is missing or malformed, 409 when the email is taken.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(request) = payload?;
    let profile = AuthService::from_state(&state).register(request).await?;
    Ok(ApiResponse::created(profile))
}
