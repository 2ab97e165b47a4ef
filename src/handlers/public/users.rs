use axum::extract::{rejection::PathRejection, Path, State};
use uuid::Uuid;

use crate::database::models::UserProfile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /users/:id - Public profile of one account
pub async fn user_get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<UserProfile> {
    let Path(id) = path?;
    let user = state
        .users
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))?;

    Ok(ApiResponse::success(user.into()))
}
