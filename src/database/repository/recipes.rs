use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use std::collections::HashMap;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::{Ingredient, Recipe, RecipeDraft, RecipeFilter, Step};
use crate::database::store::RecipeStore;
use crate::database::DatabaseError;

const RECIPE_COLUMNS: &str =
    "id, title, description, prep_time, category_id, creator_id, images, created_at, updated_at";

fn classify(err: sqlx::Error) -> DatabaseError {
    DatabaseError::from_sqlx(err, "Recipe already exists", "Category or creator does not exist")
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: Uuid,
    title: String,
    description: String,
    prep_time: i32,
    category_id: Option<Uuid>,
    creator_id: Uuid,
    images: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecipeRow {
    fn into_recipe(self, ingredients: Vec<Ingredient>, steps: Vec<Step>) -> Recipe {
        Recipe {
            id: self.id,
            title: self.title,
            description: self.description,
            prep_time: self.prep_time,
            category_id: self.category_id,
            creator_id: self.creator_id,
            ingredients,
            steps,
            images: self.images,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl PgStore {
    /// Attach ingredients and steps to a batch of recipe rows
    async fn hydrate(&self, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, DatabaseError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let ingredient_rows = sqlx::query_as::<_, (Uuid, String, String)>(
            r#"
            SELECT recipe_id, name, quantity
            FROM ingredients
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let step_rows = sqlx::query_as::<_, (Uuid, i32, String)>(
            r#"
            SELECT recipe_id, step_number, description
            FROM steps
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id, step_number
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let mut ingredients: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
        for (recipe_id, name, quantity) in ingredient_rows {
            ingredients.entry(recipe_id).or_default().push(Ingredient { name, quantity });
        }

        let mut steps: HashMap<Uuid, Vec<Step>> = HashMap::new();
        for (recipe_id, step_number, description) in step_rows {
            steps.entry(recipe_id).or_default().push(Step { step_number, description });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_recipe(
                    ingredients.remove(&id).unwrap_or_default(),
                    steps.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

/// Write the child rows of a recipe inside the caller's transaction
async fn insert_children(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    draft: &RecipeDraft,
) -> Result<(Vec<Ingredient>, Vec<Step>), DatabaseError> {
    for (position, ingredient) in draft.ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO ingredients (id, recipe_id, position, name, quantity)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(recipe_id)
        .bind(position as i32)
        .bind(&ingredient.name)
        .bind(&ingredient.quantity)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    }

    let steps = draft.numbered_steps();
    for step in &steps {
        sqlx::query(
            r#"
            INSERT INTO steps (id, recipe_id, step_number, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(recipe_id)
        .bind(step.step_number)
        .bind(&step.description)
        .execute(&mut *conn)
        .await
        .map_err(classify)?;
    }

    Ok((draft.ingredients.clone(), steps))
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::uuid IS NULL OR creator_id = $2)
            ORDER BY created_at DESC, id
            "#
        );

        let rows = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(filter.category_id)
            .bind(filter.creator_id)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        self.hydrate(rows).await
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1");

        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_recipe(&self, creator_id: Uuid, draft: RecipeDraft) -> Result<Recipe, DatabaseError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let sql = format!(
            r#"
            INSERT INTO recipes (id, title, description, prep_time, category_id, creator_id, images, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {RECIPE_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.prep_time)
            .bind(draft.category_id)
            .bind(creator_id)
            .bind(&draft.images)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify)?;

        let (ingredients, steps) = insert_children(&mut *tx, row.id, &draft).await?;
        tx.commit().await.map_err(classify)?;

        Ok(row.into_recipe(ingredients, steps))
    }

    async fn update_recipe(&self, id: Uuid, draft: RecipeDraft) -> Result<Recipe, DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let sql = format!(
            r#"
            UPDATE recipes
            SET title = $2, description = $3, prep_time = $4, category_id = $5, images = $6, updated_at = $7
            WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.prep_time)
            .bind(draft.category_id)
            .bind(&draft.images)
            .bind(Utc::now())
            .fetch_optional(&mut *tx)
            .await
            .map_err(classify)?
            .ok_or_else(|| DatabaseError::NotFound(format!("Recipe {} not found", id)))?;

        sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        sqlx::query("DELETE FROM steps WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        let (ingredients, steps) = insert_children(&mut *tx, id, &draft).await?;
        tx.commit().await.map_err(classify)?;

        Ok(row.into_recipe(ingredients, steps))
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Recipe {} not found", id)));
        }
        Ok(())
    }
}
