// Token acquisition endpoints
pub mod login; // POST /auth/login - exchange credentials for a JWT
pub mod signup; // POST /auth/signup - create an account

pub use login::login;
pub use signup::signup;
