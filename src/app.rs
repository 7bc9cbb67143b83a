// src/app.rs
//! Router composition and the layers shared by every route

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header, HeaderValue, Method},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::auth_routes;
use crate::common::{AppConfig, AppState};
use crate::logging_middleware::log_request_response;
use crate::payments::payments_routes;
use crate::recipes::recipes_routes;
use crate::services::uploads::PUBLIC_PREFIX;

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let config = state.config.clone();
    let uploads_dir = state.uploads.dir().to_path_buf();

    Router::new()
        .route("/health", get(health))
        // ====================================================================
        // AUTHENTICATION ROUTES
        // ====================================================================
        .merge(auth_routes())
        // ====================================================================
        // RECIPE ROUTES (Reads, Authoring, Interactions, Uploads)
        // ====================================================================
        .merge(recipes_routes())
        // ====================================================================
        // PAYMENT ROUTES
        // ====================================================================
        .merge(payments_routes())
        .nest_service(PUBLIC_PREFIX, ServeDir::new(uploads_dir))
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(log_request_response))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(Extension(state))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
}
