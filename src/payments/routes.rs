// src/payments/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the payments router. Both routes require an authenticated caller.
pub fn payments_routes() -> Router {
    Router::new()
        .route("/api/payments/verify/:tx_ref", get(handlers::verify_payment))
        .route("/api/payments/initialize", post(handlers::initialize_payment))
}
