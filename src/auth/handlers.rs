//! Authentication HTTP handlers

use axum::{extract::Extension, http::StatusCode, response::Json};
use std::sync::Arc;

use super::models::{AuthResponse, LoginRequest, RegisterRequest};
use super::service::AuthService;
use crate::common::{ApiError, ApiJson, AppState};

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        state.graphql.admin(),
        state.tokens.clone(),
        state.config.bcrypt_cost,
    )
}

/// POST /api/auth/register
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let response = auth_service(&state).register(body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = auth_service(&state).login(body).await?;
    Ok(Json(response))
}
