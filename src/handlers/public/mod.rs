// Handlers reachable without a bearer token
pub mod auth;
pub mod categories;
pub mod recipes;
pub mod users;
