use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{Claims, TokenError};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity extracted from a verified JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

impl AuthUser {
    /// Fails with 403 unless this identity is `owner_id`
    pub fn ensure_owns(&self, owner_id: Uuid, resource: &str) -> Result<(), ApiError> {
        if self.user_id == owner_id {
            return Ok(());
        }
        tracing::warn!(
            "Ownership check failed: user {} attempted to modify {} owned by {}",
            self.user_id,
            resource,
            owner_id
        );
        Err(ApiError::forbidden(format!("You do not own this {}", resource)))
    }
}

/// JWT authentication middleware. Rejects the request with 401 unless it
/// carries a valid, unexpired bearer token; otherwise inserts `AuthUser`
/// into the request extensions for the protected handler.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = state.verifier.verify(token).map_err(|e| match e {
        TokenError::InvalidSecret => {
            tracing::error!("JWT secret not configured");
            ApiError::internal_server_error("Authentication is not configured")
        }
        other => {
            tracing::warn!("Rejected request to {}: {}", request.uri().path(), other);
            ApiError::unauthorized(other.to_string())
        }
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated {} ({})", auth_user.email, auth_user.user_id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(
            extract_jwt_from_headers(&HeaderMap::new()),
            Err("Missing Authorization header")
        );
        assert_eq!(extract_jwt_from_headers(&headers("Bearer   ")), Err("Empty JWT token"));
        assert_eq!(
            extract_jwt_from_headers(&headers("Basic dXNlcjpwYXNz")),
            Err("Authorization header must use Bearer token format")
        );
        assert!(extract_jwt_from_headers(&headers("abc.def.ghi")).is_err());
    }

    #[test]
    fn ownership_check() {
        let me = AuthUser {
            user_id: Uuid::new_v4(),
            email: "amy@x.com".into(),
        };
        assert!(me.ensure_owns(me.user_id, "recipe").is_ok());

        let err = me.ensure_owns(Uuid::new_v4(), "recipe").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }
}
