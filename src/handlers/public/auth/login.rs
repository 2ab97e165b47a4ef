use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthService, LoginRequest, LoginResponse};
use crate::state::AppState;

/// POST /auth/login - Authenticate and receive a JWT
///
/// Expected Input:
/// ```json
/// {
///   "email": "amy@x.com",
///   "password": "pw123456"
/// }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "token_type": "Bearer",
///     "expires_in": 86400,
///     "user": { "id": "user_uuid", "username": "amy", "email": "amy@x.com", ... }
///   }
/// }
/// ```
///
/// Unknown email and wrong password both answer 401 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload?;
    let response = AuthService::from_state(&state).login(request).await?;
    Ok(ApiResponse::success(response))
}
