use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::database::models::Category;
use crate::database::store::CategoryStore;
use crate::database::DatabaseError;

fn classify(err: sqlx::Error) -> DatabaseError {
    DatabaseError::from_sqlx(err, "Category already exists", "Category is still referenced")
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn create_category(&self, name: &str) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn update_category(&self, id: Uuid, name: &str) -> Result<Category, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        category.ok_or_else(|| DatabaseError::NotFound(format!("Category {} not found", id)))
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }
}
