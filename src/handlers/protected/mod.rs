// Handlers mounted under /api behind `jwt_auth_middleware`. Each receives the
// caller as `Extension<AuthUser>`.
pub mod auth;
pub mod categories;
pub mod recipes;
pub mod users;
