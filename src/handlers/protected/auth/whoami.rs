use axum::{extract::State, Extension};

use crate::database::models::UserProfile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/auth/whoami - Profile of the authenticated caller
///
/// Read fresh from the store, so a token that outlives its account is
/// answered with 401.
pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let user = state
        .users
        .get_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for deleted account {} presented", auth.user_id);
            ApiError::unauthorized("Account no longer exists")
        })?;

    Ok(ApiResponse::success(user.into()))
}
