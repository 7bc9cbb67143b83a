// src/payments/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use super::models::InitializePaymentRequest;
use crate::services::payment::{InitializePayment, PaymentError};

fn tx_ref_regex() -> &'static Regex {
    static TX_REF_REGEX: OnceLock<Regex> = OnceLock::new();
    TX_REF_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]{1,100}$").expect("Failed to compile tx_ref regex")
    })
}

/// Rejects references that could not have come from the gateway, before any
/// outbound call is made.
pub fn validate_tx_ref(tx_ref: &str) -> Result<(), PaymentError> {
    if tx_ref.is_empty() {
        return Err(PaymentError::Invalid(
            "Transaction reference is required".to_string(),
        ));
    }
    if !tx_ref_regex().is_match(tx_ref) {
        return Err(PaymentError::Invalid(
            "Invalid transaction reference".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_initialize(req: InitializePaymentRequest) -> Result<InitializePayment, PaymentError> {
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(PaymentError::Invalid(
            "Amount must be greater than zero".to_string(),
        ));
    }

    let email = req.email.trim();
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    if email.is_empty() || first_name.is_empty() || last_name.is_empty() {
        return Err(PaymentError::Invalid(
            "Email, first name and last name are required".to_string(),
        ));
    }

    Ok(InitializePayment {
        amount: req.amount,
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        currency: req.currency,
    })
}
