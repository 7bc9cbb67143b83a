//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::TokenError;
use crate::common::{safe_token_log, ApiError, AppState};

/// Authenticated caller
///
/// Validates the `Authorization: Bearer <token>` header. The raw token is kept
/// so that remote calls can be made on the caller's behalf.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: Uuid,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => value.to_str().map_err(|_| {
                warn!("Authentication failed: non-ascii Authorization header");
                ApiError::Unauthorized("Invalid authorization header format".into())
            })?,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized(
                    "Missing authorization header".into(),
                ));
            }
        };

        let token = match header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => {
                warn!("Authentication failed: Authorization header is not a bearer token");
                return Err(ApiError::Unauthorized(
                    "Invalid authorization header format".into(),
                ));
            }
        };

        let subject = app_state.tokens.validate(&token).map_err(|e| {
            match e {
                TokenError::SecretNotConfigured => {
                    warn!("Token validation impossible: JWT secret is not configured")
                }
                other => warn!(error = %other, token = %safe_token_log(&token), "JWT token validation failed"),
            }
            ApiError::Unauthorized("Invalid token".into())
        })?;

        let id = Uuid::parse_str(&subject)
            .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))?;

        debug!(user_id = %id, "User authenticated via extractor");
        Ok(AuthedUser { id, token })
    }
}
