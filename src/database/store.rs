use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Category, NewUser, Recipe, RecipeDraft, RecipeFilter, User, UserChanges};
use crate::database::DatabaseError;

/// Account persistence. Email is unique; a duplicate insert or update fails
/// with `DatabaseError::UniqueViolation` and leaves existing rows untouched.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// `DatabaseError::NotFound` when no such account exists
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError>;

    /// Removes the account and, by cascade, the recipes it created
    async fn delete_user(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Newest first
    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, DatabaseError>;

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError>;

    /// Unknown `category_id` fails with `DatabaseError::ForeignKeyViolation`
    async fn create_recipe(&self, creator_id: Uuid, draft: RecipeDraft) -> Result<Recipe, DatabaseError>;

    /// Replaces every editable field, including ingredients and steps
    async fn update_recipe(&self, id: Uuid, draft: RecipeDraft) -> Result<Recipe, DatabaseError>;

    async fn delete_recipe(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, DatabaseError>;

    async fn create_category(&self, name: &str) -> Result<Category, DatabaseError>;

    async fn update_category(&self, id: Uuid, name: &str) -> Result<Category, DatabaseError>;

    /// Recipes in the category become uncategorized
    async fn delete_category(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}
