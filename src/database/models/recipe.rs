use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub step_number: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub prep_time: i32,
    pub category_id: Option<Uuid>,
    pub creator_id: Uuid,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated recipe content used for both create and full update. Steps are
/// numbered from 1 in the order given.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub prep_time: i32,
    pub category_id: Option<Uuid>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub images: Vec<String>,
}

impl RecipeDraft {
    pub fn numbered_steps(&self) -> Vec<Step> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, description)| Step {
                step_number: i as i32 + 1,
                description: description.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub category_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
}
