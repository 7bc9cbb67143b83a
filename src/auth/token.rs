//! Session token issuance and validation
//!
//! Tokens are HS256 JWTs with a fixed 24 hour lifetime. They carry the
//! Hasura role claims so the same token authorizes the caller against the
//! remote data layer.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::models::{Claims, HasuraClaims};

pub const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret is not configured")]
    SecretNotConfigured,

    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct TokenService {
    secret: Option<String>,
    issuer: String,
}

impl TokenService {
    pub fn new(secret: Option<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            issuer: issuer.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issues a token as if it had been created at `issued_at` (unix seconds).
    pub fn issue_at(&self, subject: &str, issued_at: i64) -> Result<String, TokenError> {
        let secret = self.secret.as_ref().ok_or(TokenError::SecretNotConfigured)?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + Duration::hours(TOKEN_LIFETIME_HOURS).num_seconds(),
            iss: self.issuer.clone(),
            hasura: HasuraClaims::for_user(subject),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    /// Returns the subject of a valid token.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let secret = self.secret.as_ref().ok_or(TokenError::SecretNotConfigured)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })
    }
}
