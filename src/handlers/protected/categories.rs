use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Category;
use crate::database::schema::CATEGORY_NAME_MAX_CHARS;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::validation::FieldErrors;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryRequest {
    pub name: String,
}

impl CategoryRequest {
    fn validated_name(&self) -> Result<&str, ApiError> {
        let name = self.name.trim();
        let mut errors = FieldErrors::new();
        errors.require("name", name);
        errors.limit("name", name, CATEGORY_NAME_MAX_CHARS);
        errors.into_result("Invalid category")?;
        Ok(name)
    }
}

/// POST /api/categories - Create a category. Names are unique.
pub async fn category_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Category> {
    let Json(request) = payload?;
    let category = state.categories.create_category(request.validated_name()?).await?;

    tracing::info!("User {} created category {:?}", auth.user_id, category.name);
    Ok(ApiResponse::created(category))
}

/// PUT /api/categories/:id - Rename a category
pub async fn category_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Category> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let category = state.categories.update_category(id, request.validated_name()?).await?;

    tracing::info!("User {} renamed category {} to {:?}", auth.user_id, id, category.name);
    Ok(ApiResponse::success(category))
}

/// DELETE /api/categories/:id - Recipes in the category become uncategorized
pub async fn category_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state.categories.delete_category(id).await?;

    tracing::info!("User {} deleted category {}", auth.user_id, id);
    Ok(ApiResponse::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> CategoryRequest {
        CategoryRequest { name: name.to_string() }
    }

    #[test]
    fn trims_name() {
        assert_eq!(named("  Breakfast ").validated_name().unwrap(), "Breakfast");
    }

    #[test]
    fn rejects_blank_oversized_and_nul_names() {
        let body = named("   ").validated_name().unwrap_err().to_json();
        assert_eq!(body["field_errors"]["name"], "This field is required");

        let at_limit = "c".repeat(CATEGORY_NAME_MAX_CHARS);
        assert!(named(&at_limit).validated_name().is_ok());

        let err = named(&"c".repeat(CATEGORY_NAME_MAX_CHARS + 1)).validated_name().unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_json()["field_errors"]["name"],
            format!("Must be at most {} characters", CATEGORY_NAME_MAX_CHARS)
        );

        let body = named("Des\u{0}serts").validated_name().unwrap_err().to_json();
        assert_eq!(body["field_errors"]["name"], "Contains invalid characters");
    }
}
