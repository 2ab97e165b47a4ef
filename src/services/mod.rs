pub mod auth_service;
pub mod validation;

pub use auth_service::{AuthService, LoginRequest, LoginResponse, RegisterRequest};
