// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode
//!
//! Only JSON bodies of a bounded size are buffered, and credentials are
//! redacted before anything is written. Without `debug` enabled, requests
//! pass through untouched.

use axum::{
    body::{to_bytes, Body, HttpBody as _},
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error, warn, Level};

use crate::common::{helpers::redact_json, ApiError};

/// Bodies larger than this are never buffered for logging
pub const MAX_LOGGED_BODY: usize = 64 * 1024;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

fn fits(body: &Body) -> bool {
    body.size_hint()
        .upper()
        .map(|upper| upper as usize <= MAX_LOGGED_BODY)
        .unwrap_or(false)
}

/// Parses, redacts and renders a JSON body for the log line.
pub fn render_body(bytes: &[u8]) -> Option<String> {
    let mut json: Value = serde_json::from_slice(bytes).ok()?;
    redact_json(&mut json);
    Some(json.to_string())
}

/// Buffers and logs a request body. A body that fails mid-read is answered
/// with 400 rather than forwarded empty.
async fn capture_request(request: Request) -> Result<Request, Response> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_LOGGED_BODY).await.map_err(|e| {
        warn!(error = %e, method = %parts.method, uri = %parts.uri, "Failed to read request body");
        ApiError::BadRequest("Failed to read request body".to_string()).into_response()
    })?;
    if let Some(rendered) = render_body(&bytes) {
        debug!(method = %parts.method, uri = %parts.uri, request_body = %rendered, "Request");
    }
    Ok(Request::from_parts(parts, Body::from(bytes)))
}

async fn capture_response(response: Response) -> Response {
    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, status = %parts.status, "Failed to read response body");
            return ApiError::InternalServer("Failed to read response body".to_string())
                .into_response();
        }
    };
    if let Some(rendered) = render_body(&bytes) {
        debug!(status = %parts.status, response_body = %rendered, "Response");
    }
    Response::from_parts(parts, Body::from(bytes))
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Response {
    if !tracing::enabled!(Level::DEBUG) {
        return next.run(request).await;
    }

    let request = if is_json(request.headers()) && fits(request.body()) {
        match capture_request(request).await {
            Ok(request) => request,
            Err(response) => return response,
        }
    } else {
        request
    };

    let response = next.run(request).await;

    if !is_json(response.headers()) || !fits(response.body()) {
        return response;
    }

    capture_response(response).await
}
