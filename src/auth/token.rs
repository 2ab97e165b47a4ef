use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Tokens are valid for exactly 24 hours from issuance
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, issued_at: i64) -> Self {
        Self {
            sub: user_id,
            email,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    Generation(String),

    #[error("Invalid JWT token: {0}")]
    Invalid(String),

    #[error("JWT token has expired")]
    Expired,
}

/// Mints HS256 tokens with the shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    key: Option<EncodingKey>,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let key = (!secret.is_empty()).then(|| EncodingKey::from_secret(secret.as_bytes()));
        Self { key }
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: Uuid, email: &str, issued_at: i64) -> Result<String, TokenError> {
        let key = self.key.as_ref().ok_or(TokenError::InvalidSecret)?;
        let claims = Claims::new(user_id, email.to_string(), issued_at);

        encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }
}

/// Checks signature and expiry of tokens minted by a `TokenIssuer` holding
/// the same secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: Option<DecodingKey>,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let key = (!secret.is_empty()).then(|| DecodingKey::from_secret(secret.as_bytes()));
        Self { key }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify against an explicit clock. A token is accepted while
    /// `now < exp`, with no leeway.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let key = self.key.as_ref().ok_or(TokenError::InvalidSecret)?;

        // Expiry is checked below against `now` rather than the wall clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, key, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        if now >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
