// src/auth/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use super::models::{LoginRequest, RegisterRequest};
use crate::common::{ValidationResult, Validator};

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    })
}

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("username", &data.username, "Username is required");
        if data.username.trim().len() > 50 {
            result.add_error("username", "Username must be at most 50 characters");
        }

        let email = data.email.trim();
        if email.is_empty() {
            result.add_error("email", "Email is required");
        } else if !email_regex().is_match(email) {
            result.add_error("email", "Invalid email format");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require("email", &data.email, "Email is required");
        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }
        result
    }
}
