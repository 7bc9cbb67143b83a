// src/recipes/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, uploads};

/// Create the recipes router
pub fn recipes_routes() -> Router {
    Router::new()
        // Public reads
        .route("/api/recipes/all", get(handlers::list_recipes))
        .route(
            "/api/recipes/:id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/api/recipes/:id/comments", get(handlers::list_comments))
        // Authoring
        .route("/api/recipes", post(handlers::create_recipe))
        .route("/api/recipes/", post(handlers::create_recipe))
        .route("/api/recipes/upload", post(uploads::upload_image))
        .route("/api/recipes/upload/files", post(uploads::upload_files))
        // Interactions
        .route(
            "/api/recipes/:id/like",
            post(handlers::like_recipe).delete(handlers::unlike_recipe),
        )
        .route(
            "/api/recipes/:id/bookmark",
            post(handlers::bookmark_recipe).delete(handlers::unbookmark_recipe),
        )
        .route("/api/recipes/:id/rate", post(handlers::rate_recipe))
        .route("/api/recipes/:id/comment", post(handlers::comment_on_recipe))
}
