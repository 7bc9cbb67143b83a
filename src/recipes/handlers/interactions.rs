// src/recipes/handlers/interactions.rs
//! Likes, bookmarks, ratings and comments

use axum::{
    extract::{Extension, Path},
    response::Json,
};
use std::sync::Arc;

use super::recipes::{recipes_service, INVALID_RECIPE_ID};
use crate::auth::AuthedUser;
use crate::common::{parse_uuid, ApiError, ApiJson, AppState};
use crate::recipes::models::*;

/// POST /api/recipes/:id/like
pub async fn like_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    Ok(Json(recipes_service(&state).like(recipe_id, &authed).await?))
}

/// DELETE /api/recipes/:id/like
pub async fn unlike_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    Ok(Json(recipes_service(&state).unlike(recipe_id, &authed).await?))
}

/// POST /api/recipes/:id/bookmark
pub async fn bookmark_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    Ok(Json(recipes_service(&state).bookmark(recipe_id, &authed).await?))
}

/// DELETE /api/recipes/:id/bookmark
pub async fn unbookmark_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<StatusMessage>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    Ok(Json(
        recipes_service(&state).unbookmark(recipe_id, &authed).await?,
    ))
}

/// POST /api/recipes/:id/rate
pub async fn rate_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RateRequest>,
) -> Result<Json<StatusMessage>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    Ok(Json(
        recipes_service(&state)
            .rate(recipe_id, &authed, body.rating)
            .await?,
    ))
}

/// POST /api/recipes/:id/comment
pub async fn comment_on_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CommentRequest>,
) -> Result<Json<StatusMessage>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    Ok(Json(
        recipes_service(&state)
            .comment(recipe_id, &authed, &body.comment)
            .await?,
    ))
}

/// GET /api/recipes/:id/comments - Public
pub async fn list_comments(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    Ok(Json(recipes_service(&state).list_comments(recipe_id).await?))
}
