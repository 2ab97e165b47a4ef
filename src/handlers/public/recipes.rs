use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Recipe, RecipeFilter};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    pub category_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
}

/// GET /recipes - List recipes, newest first
///
/// Query Parameters:
/// - category_id: only recipes in this category
/// - creator_id: only recipes created by this account
pub async fn recipe_list(
    State(state): State<AppState>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> ApiResult<Vec<Recipe>> {
    let Query(query) = query?;
    let filter = RecipeFilter {
        category_id: query.category_id,
        creator_id: query.creator_id,
    };

    let recipes = state.recipes.list_recipes(filter).await?;
    tracing::debug!("Listed {} recipes", recipes.len());
    Ok(ApiResponse::success(recipes))
}

/// GET /recipes/:id - One recipe with its ingredients and steps
pub async fn recipe_get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Recipe> {
    let Path(id) = path?;
    let recipe = state
        .recipes
        .get_recipe(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Recipe {} not found", id)))?;

    Ok(ApiResponse::success(recipe))
}
