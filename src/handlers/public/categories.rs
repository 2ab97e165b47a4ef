use axum::extract::{rejection::PathRejection, Path, State};
use uuid::Uuid;

use crate::database::models::Category;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /categories - All categories ordered by name
pub async fn category_list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.categories.list_categories().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /categories/:id
pub async fn category_get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Category> {
    let Path(id) = path?;
    let category = state
        .categories
        .get_category(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category {} not found", id)))?;

    Ok(ApiResponse::success(category))
}
