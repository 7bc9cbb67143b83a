// src/payments/handlers.rs
//! Payment gateway handlers

use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::models::{InitializePaymentRequest, PaymentResponse};
use super::validators::{validate_initialize, validate_tx_ref};
use crate::auth::AuthedUser;
use crate::common::{ApiJson, AppState};
use crate::services::payment::{InitializedPayment, PaymentError};

/// GET /api/payments/verify/:tx_ref
pub async fn verify_payment(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(tx_ref): Path<String>,
) -> Result<Json<PaymentResponse<Value>>, PaymentError> {
    validate_tx_ref(&tx_ref)?;

    let data = state.payments.verify(&tx_ref).await?;
    info!(user_id = %authed.id, tx_ref = %tx_ref, "Payment verification succeeded");

    Ok(Json(PaymentResponse::success(
        "Payment verified successfully",
        data,
    )))
}

/// POST /api/payments/initialize
pub async fn initialize_payment(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    ApiJson(body): ApiJson<InitializePaymentRequest>,
) -> Result<Json<PaymentResponse<InitializedPayment>>, PaymentError> {
    let request = validate_initialize(body)?;

    let payment = state.payments.initialize(request).await?;
    info!(user_id = %authed.id, tx_ref = %payment.tx_ref, "Payment checkout created");

    Ok(Json(PaymentResponse::success(
        "Payment initialized successfully",
        payment,
    )))
}
