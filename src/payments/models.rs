// src/payments/models.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct InitializePaymentRequest {
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Success envelope shared by the payment routes
#[derive(Debug, Serialize)]
pub struct PaymentResponse<T: Serialize> {
    pub status: &'static str,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> PaymentResponse<T> {
    pub fn success(message: &'static str, data: T) -> Self {
        Self {
            status: "success",
            message,
            data,
        }
    }
}
