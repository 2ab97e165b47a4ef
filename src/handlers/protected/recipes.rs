use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Ingredient, Recipe, RecipeDraft};
use crate::database::schema::{INGREDIENT_NAME_MAX_CHARS, INGREDIENT_QUANTITY_MAX_CHARS, RECIPE_TITLE_MAX_CHARS};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::validation::FieldErrors;
use crate::state::AppState;

/// Body of both create and update. Update replaces every field, so omitted
/// lists end up empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecipeRequest {
    pub title: String,
    pub description: String,
    pub prep_time: i32,
    pub category_id: Option<Uuid>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub images: Vec<String>,
}

impl RecipeRequest {
    pub fn into_draft(self) -> Result<RecipeDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title);
        errors.limit("title", self.title.trim(), RECIPE_TITLE_MAX_CHARS);
        errors.text("description", &self.description);
        if self.prep_time < 0 {
            errors.add("prep_time", "Preparation time cannot be negative");
        }
        for ingredient in &self.ingredients {
            if ingredient.name.trim().is_empty() {
                errors.add("ingredients", "Every ingredient needs a name");
            }
            errors.limit("ingredients", ingredient.name.trim(), INGREDIENT_NAME_MAX_CHARS);
            errors.limit("ingredients", ingredient.quantity.trim(), INGREDIENT_QUANTITY_MAX_CHARS);
        }
        for step in &self.steps {
            if step.trim().is_empty() {
                errors.add("steps", "Steps cannot be empty");
            }
            errors.text("steps", step);
        }
        for image in &self.images {
            if image.trim().is_empty() {
                errors.add("images", "Image references cannot be empty");
            }
            errors.text("images", image);
        }
        errors.into_result("Invalid recipe")?;

        Ok(RecipeDraft {
            title: self.title.trim().to_string(),
            description: self.description,
            prep_time: self.prep_time,
            category_id: self.category_id,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| Ingredient {
                    name: i.name.trim().to_string(),
                    quantity: i.quantity.trim().to_string(),
                })
                .collect(),
            steps: self.steps.into_iter().map(|s| s.trim().to_string()).collect(),
            images: self.images,
        })
    }
}

/// POST /api/recipes - Create a recipe owned by the caller
///
/// Expected Input:
/// ```json
/// {
///   "title": "Pancakes",                 // Required
///   "description": "Fluffy",
///   "prep_time": 20,                     // Minutes, >= 0
///   "category_id": "category_uuid",      // Optional, must exist
///   "ingredients": [{ "name": "Flour", "quantity": "200g" }],
///   "steps": ["Mix", "Fry"],             // Numbered from 1 in order
///   "images": ["pancakes.jpg"]
/// }
/// ```
pub async fn recipe_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> ApiResult<Recipe> {
    let Json(request) = payload?;
    let draft = request.into_draft()?;

    let recipe = state.recipes.create_recipe(auth.user_id, draft).await?;
    tracing::info!("User {} created recipe {}", auth.user_id, recipe.id);
    Ok(ApiResponse::created(recipe))
}

/// PUT /api/recipes/:id - Replace a recipe the caller created
pub async fn recipe_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RecipeRequest>, JsonRejection>,
) -> ApiResult<Recipe> {
    let Path(id) = path?;
    load_owned(&state, &auth, id).await?;

    let Json(request) = payload?;
    let draft = request.into_draft()?;

    let recipe = state.recipes.update_recipe(id, draft).await?;
    tracing::info!("User {} updated recipe {}", auth.user_id, id);
    Ok(ApiResponse::success(recipe))
}

/// DELETE /api/recipes/:id - Delete a recipe the caller created
pub async fn recipe_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    load_owned(&state, &auth, id).await?;

    state.recipes.delete_recipe(id).await?;
    tracing::info!("User {} deleted recipe {}", auth.user_id, id);
    Ok(ApiResponse::no_content())
}

/// 404 when absent, 403 when someone else created it
async fn load_owned(state: &AppState, auth: &AuthUser, id: Uuid) -> Result<Recipe, ApiError> {
    let recipe = state
        .recipes
        .get_recipe(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Recipe {} not found", id)))?;
    auth.ensure_owns(recipe.creator_id, "recipe")?;
    Ok(recipe)
}
