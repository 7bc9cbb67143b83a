// src/recipes/handlers/recipes.rs
//! Recipe CRUD handlers

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::auth::AuthedUser;
use crate::common::{parse_uuid, ApiError, ApiJson, AppState};
use crate::recipes::models::*;
use crate::recipes::services::{RecipesService, RECIPE_NOT_FOUND};

pub(crate) const INVALID_RECIPE_ID: &str = "Invalid recipe ID";

pub(crate) fn recipes_service(state: &AppState) -> RecipesService {
    RecipesService::new(state.graphql.clone())
}

/// GET /api/recipes/all - Every recipe with its author and relations
pub async fn list_recipes(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = recipes_service(&state).list_recipes().await?;
    Ok(Json(recipes))
}

/// GET /api/recipes/:id
///
/// An id that is not a UUID cannot name a recipe, so it is reported as
/// missing without a remote lookup.
pub async fn get_recipe(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe_id = Uuid::parse_str(&id).map_err(|_| {
        debug!(id = %id, "Recipe lookup with malformed id");
        ApiError::NotFound(RECIPE_NOT_FOUND.to_string())
    })?;

    let recipe = recipes_service(&state).get_recipe(recipe_id).await?;
    Ok(Json(recipe))
}

/// POST /api/recipes
pub async fn create_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    ApiJson(body): ApiJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = recipes_service(&state).create_recipe(&authed, body).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /api/recipes/:id - Owner only
pub async fn update_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    let recipe = recipes_service(&state)
        .update_recipe(recipe_id, &authed, body)
        .await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/:id - Owner only
pub async fn delete_recipe(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteRecipeResponse>, ApiError> {
    let recipe_id = parse_uuid(&id, INVALID_RECIPE_ID)?;
    let deleted = recipes_service(&state)
        .delete_recipe(recipe_id, &authed)
        .await?;
    Ok(Json(deleted))
}
