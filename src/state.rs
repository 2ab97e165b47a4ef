use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenIssuer, TokenVerifier};
use crate::config::SecurityConfig;
use crate::database::{CategoryStore, HealthCheck, RecipeStore, UserStore};

/// Everything a handler needs, built once at startup and cloned per request.
/// Holds no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub recipes: Arc<dyn RecipeStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub health: Arc<dyn HealthCheck>,
    pub hasher: PasswordHasher,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
}

impl AppState {
    /// Wire every store role to one backing store and derive the credential
    /// components from the security config
    pub fn new<S>(store: Arc<S>, security: &SecurityConfig) -> Self
    where
        S: UserStore + RecipeStore + CategoryStore + HealthCheck + 'static,
    {
        Self {
            users: store.clone(),
            recipes: store.clone(),
            categories: store.clone(),
            health: store,
            hasher: PasswordHasher::new(security.bcrypt_cost),
            issuer: TokenIssuer::new(&security.jwt_secret),
            verifier: TokenVerifier::new(&security.jwt_secret),
        }
    }
}
