use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full HTTP surface: public routes, `/api` routes behind the auth
/// gate, and the global layers the config asks for
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let protected_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(recipe_routes())
        .merge(category_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API
        .merge(protected_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::{auth, categories, recipes, users};

    Router::new()
        // Token acquisition
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        // Read-only views
        .route("/users/:id", get(users::user_get))
        .route("/recipes", get(recipes::recipe_list))
        .route("/recipes/:id", get(recipes::recipe_get))
        .route("/categories", get(categories::category_list))
        .route("/categories/:id", get(categories::category_get))
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new().route("/api/auth/whoami", get(auth::whoami))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new().route("/api/users/:id", axum::routing::put(users::user_put).delete(users::user_delete))
}

fn recipe_routes() -> Router<AppState> {
    use protected::recipes;

    Router::new()
        .route("/api/recipes", post(recipes::recipe_post))
        .route(
            "/api/recipes/:id",
            axum::routing::put(recipes::recipe_put).delete(recipes::recipe_delete),
        )
}

fn category_routes() -> Router<AppState> {
    use protected::categories;

    Router::new()
        .route("/api/categories", post(categories::category_post))
        .route(
            "/api/categories/:id",
            axum::routing::put(categories::category_put).delete(categories::category_delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Recipe API",
            "version": version,
            "description": "Recipe sharing backend with JWT authentication",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/signup, /auth/login (public - token acquisition)",
                "users": "/users/:id (public)",
                "recipes": "/recipes[/:id] (public)",
                "categories": "/categories[/:id] (public)",
                "auth": "/api/auth/whoami (protected)",
                "account": "/api/users/:id (protected, owner only)",
                "recipe_admin": "/api/recipes[/:id] (protected, owner only for changes)",
                "category_admin": "/api/categories[/:id] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
