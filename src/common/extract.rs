// JSON body extractor that rejects with the API error shape

use axum::extract::FromRequest;

use super::ApiError;

/// Like `axum::Json`, but a malformed body yields a 400 `ApiError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
