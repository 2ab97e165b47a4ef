//! In-memory stores and request helpers for exercising the router without a
//! database. Behaves like the Postgres schema: unique emails and category
//! names, recipe creators cascade, deleted categories leave recipes
//! uncategorized.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::{Category, NewUser, Recipe, RecipeDraft, RecipeFilter, User, UserChanges};
use crate::database::{CategoryStore, DatabaseError, HealthCheck, RecipeStore, UserStore};
use crate::state::AppState;

pub const TEST_SECRET: &str = "router-test-secret";

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    recipes: HashMap<Uuid, (u64, Recipe)>,
    next_seq: u64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("Email is already registered".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables().users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let mut tables = self.tables();
        if let Some(email) = &changes.email {
            if tables.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(DatabaseError::UniqueViolation("Email is already registered".into()));
            }
        }
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables();
        if tables.users.remove(&id).is_none() {
            return Err(DatabaseError::NotFound(format!("User {} not found", id)));
        }
        tables.recipes.retain(|_, (_, recipe)| recipe.creator_id != id);
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>, DatabaseError> {
        let tables = self.tables();
        let mut rows: Vec<&(u64, Recipe)> = tables
            .recipes
            .values()
            .filter(|(_, recipe)| matches_filter(&filter, recipe))
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(rows.into_iter().map(|(_, recipe)| recipe.clone()).collect())
    }

    async fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>, DatabaseError> {
        Ok(self.tables().recipes.get(&id).map(|(_, recipe)| recipe.clone()))
    }

    async fn create_recipe(&self, creator_id: Uuid, draft: RecipeDraft) -> Result<Recipe, DatabaseError> {
        let mut tables = self.tables();
        check_references(&tables, Some(creator_id), draft.category_id)?;

        let now = Utc::now();
        let steps = draft.numbered_steps();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            prep_time: draft.prep_time,
            category_id: draft.category_id,
            creator_id,
            ingredients: draft.ingredients,
            steps,
            images: draft.images,
            created_at: now,
            updated_at: now,
        };
        tables.next_seq += 1;
        let seq = tables.next_seq;
        tables.recipes.insert(recipe.id, (seq, recipe.clone()));
        Ok(recipe)
    }

    async fn update_recipe(&self, id: Uuid, draft: RecipeDraft) -> Result<Recipe, DatabaseError> {
        let mut tables = self.tables();
        check_references(&tables, None, draft.category_id)?;

        let steps = draft.numbered_steps();
        let (_, recipe) = tables
            .recipes
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Recipe {} not found", id)))?;
        recipe.title = draft.title;
        recipe.description = draft.description;
        recipe.prep_time = draft.prep_time;
        recipe.category_id = draft.category_id;
        recipe.ingredients = draft.ingredients;
        recipe.steps = steps;
        recipe.images = draft.images;
        recipe.updated_at = Utc::now();
        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<(), DatabaseError> {
        match self.tables().recipes.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("Recipe {} not found", id))),
        }
    }
}

/// Same predicate the Postgres store builds into its WHERE clause
fn matches_filter(filter: &RecipeFilter, recipe: &Recipe) -> bool {
    filter.category_id.map_or(true, |id| recipe.category_id == Some(id))
        && filter.creator_id.map_or(true, |id| recipe.creator_id == id)
}

fn check_references(tables: &Tables, creator_id: Option<Uuid>, category_id: Option<Uuid>) -> Result<(), DatabaseError> {
    let creator_missing = creator_id.map_or(false, |id| !tables.users.contains_key(&id));
    let category_missing = category_id.map_or(false, |id| !tables.categories.contains_key(&id));
    if creator_missing || category_missing {
        return Err(DatabaseError::ForeignKeyViolation("Category or creator does not exist".into()));
    }
    Ok(())
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let mut categories: Vec<Category> = self.tables().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        Ok(self.tables().categories.get(&id).cloned())
    }

    async fn create_category(&self, name: &str) -> Result<Category, DatabaseError> {
        let mut tables = self.tables();
        if tables.categories.values().any(|c| c.name == name) {
            return Err(DatabaseError::UniqueViolation("Category already exists".into()));
        }
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, name: &str) -> Result<Category, DatabaseError> {
        let mut tables = self.tables();
        if tables.categories.values().any(|c| c.id != id && c.name == name) {
            return Err(DatabaseError::UniqueViolation("Category already exists".into()));
        }
        let category = tables
            .categories
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Category {} not found", id)))?;
        category.name = name.to_string();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tables = self.tables();
        if tables.categories.remove(&id).is_none() {
            return Err(DatabaseError::NotFound(format!("Category {} not found", id)));
        }
        for (_, recipe) in tables.recipes.values_mut() {
            if recipe.category_id == Some(id) {
                recipe.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Config with a fixed secret and the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgres://unused@localhost/unused"),
        ("JWT_SECRET", TEST_SECRET),
        ("BCRYPT_COST", "4"),
        ("API_ENABLE_REQUEST_LOGGING", "false"),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .unwrap_or_else(|e| panic!("test config: {}", e))
}

/// Router over a fresh memory store, plus the store for direct inspection
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let config = test_config();
    let store = Arc::new(MemoryStore::default());
    let state = AppState::new(store.clone(), &config.security);
    (crate::app::app(state, &config), store)
}

/// Send one request through the router and decode the JSON body
/// (`Value::Null` when the body is empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_else(|e| panic!("building request: {}", e));

    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|e| panic!("router error: {}", e));
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|e| panic!("reading body: {}", e));

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("non-JSON body ({}): {:?}", e, bytes))
    };
    (status, json)
}

/// Register an account and log in, returning `(user_id, token)`
pub async fn signup_and_login(app: &Router, username: &str, email: &str, password: &str) -> (Uuid, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/signup",
        None,
        Some(serde_json::json!({ "username": username, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    let user_id = body["data"]["user"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("login response without user id: {}", body));
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("login response without token: {}", body))
        .to_string();
    (user_id, token)
}
