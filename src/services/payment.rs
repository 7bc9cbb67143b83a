// src/services/payment.rs
//! Chapa payment gateway client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::common::config::ChapaConfig;

pub const NOT_CONFIGURED_MESSAGE: &str = "Payment gateway is not configured";

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,

    #[error("{0}")]
    Invalid(String),

    #[error("{message}")]
    Gateway { status: u16, message: String },

    #[error("Payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl PaymentError {
    pub fn status(&self) -> StatusCode {
        match self {
            PaymentError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            PaymentError::Invalid(_) => StatusCode::BAD_REQUEST,
            PaymentError::Gateway { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            PaymentError::Request(_) | PaymentError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Payment failures use the `{status, message}` envelope of the payment routes.
impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            PaymentError::Request(e) => {
                error!(error = %e, "Payment gateway unreachable");
                "Payment gateway unavailable".to_string()
            }
            PaymentError::InvalidResponse(detail) => {
                error!(error = %detail, "Payment gateway returned an unusable response");
                "Payment gateway returned an invalid response".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

/// Envelope every gateway endpoint answers with
#[derive(Debug, Deserialize)]
pub struct GatewayEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub data: Value,
}

impl GatewayEnvelope {
    /// The gateway sometimes sends structured validation messages instead of a string.
    pub fn message_text(&self) -> String {
        match &self.message {
            Value::String(s) => s.clone(),
            Value::Null => "Payment gateway error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Turns a raw gateway reply into its envelope, or the error to relay.
pub fn interpret_gateway_response(status: u16, body: &str) -> Result<GatewayEnvelope, PaymentError> {
    let success = (200..300).contains(&status);

    let envelope: GatewayEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if success => return Err(PaymentError::InvalidResponse(e.to_string())),
        Err(_) => {
            return Err(PaymentError::Gateway {
                status,
                message: "Payment gateway error".to_string(),
            })
        }
    };

    if !success {
        return Err(PaymentError::Gateway {
            status,
            message: envelope.message_text(),
        });
    }

    if envelope.status != "success" {
        return Err(PaymentError::Gateway {
            status: StatusCode::BAD_GATEWAY.as_u16(),
            message: envelope.message_text(),
        });
    }

    Ok(envelope)
}

#[derive(Debug, Clone)]
pub struct InitializePayment {
    pub amount: f64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
struct InitializePayload<'a> {
    amount: String,
    currency: &'a str,
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    tx_ref: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct InitializedPayment {
    pub checkout_url: String,
    pub tx_ref: String,
}

pub fn new_tx_ref() -> String {
    format!("tx-ref-{}", Uuid::new_v4())
}

#[derive(Clone)]
pub struct PaymentService {
    http: Client,
    config: ChapaConfig,
}

impl PaymentService {
    pub fn new(http: Client, config: ChapaConfig) -> Self {
        Self { http, config }
    }

    fn secret(&self) -> Result<&str, PaymentError> {
        self.config
            .secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured)
    }

    /// Verifies a transaction and returns the gateway's `data` object.
    pub async fn verify(&self, tx_ref: &str) -> Result<Value, PaymentError> {
        let secret = self.secret()?;
        let url = format!("{}/transaction/verify/{}", self.config.base_url, tx_ref);
        debug!(tx_ref = %tx_ref, "Verifying payment");

        let response = self.http.get(&url).bearer_auth(secret).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let envelope = interpret_gateway_response(status, &body).map_err(|e| {
            warn!(tx_ref = %tx_ref, error = %e, "Payment verification failed");
            e
        })?;

        info!(tx_ref = %tx_ref, "Payment verified");
        Ok(envelope.data)
    }

    pub async fn initialize(&self, req: InitializePayment) -> Result<InitializedPayment, PaymentError> {
        let secret = self.secret()?;
        let tx_ref = new_tx_ref();
        let currency = req
            .currency
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(&self.config.currency);

        let payload = InitializePayload {
            amount: format!("{:.2}", req.amount),
            currency,
            email: &req.email,
            first_name: &req.first_name,
            last_name: &req.last_name,
            tx_ref: &tx_ref,
            callback_url: self.config.callback_url.as_deref(),
            return_url: self.config.return_url.as_deref(),
        };

        let url = format!("{}/transaction/initialize", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(secret)
            .json(&payload)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let envelope = interpret_gateway_response(status, &body)?;
        let checkout_url = envelope
            .data
            .get("checkout_url")
            .and_then(Value::as_str)
            .ok_or_else(|| PaymentError::InvalidResponse("missing checkout_url".to_string()))?
            .to_string();

        info!(tx_ref = %tx_ref, "Payment initialized");
        Ok(InitializedPayment {
            checkout_url,
            tx_ref,
        })
    }
}
