// src/common/config.rs
//! Application configuration
//!
//! Every setting is read once at startup into [`AppConfig`], which is then
//! shared by reference with the services that need it.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "http://localhost:8080/v1/graphql";
pub const DEFAULT_JWT_ISSUER: &str = "food-recipe-app";
pub const DEFAULT_CHAPA_BASE_URL: &str = "https://api.chapa.co/v1";
pub const DEFAULT_CURRENCY: &str = "ETB";
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Payment gateway settings
#[derive(Debug, Clone)]
pub struct ChapaConfig {
    pub secret_key: Option<String>,
    pub base_url: String,
    pub callback_url: Option<String>,
    pub return_url: Option<String>,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub graphql_endpoint: String,
    pub admin_secret: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_issuer: String,
    pub bcrypt_cost: u32,
    pub chapa: ChapaConfig,
    pub upload_dir: PathBuf,
    pub port: u16,
    /// Empty means any origin is allowed
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty() && origin != "*")
                    .collect()
            })
            .unwrap_or_default();

        Self {
            graphql_endpoint: get("HASURA_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_ENDPOINT.to_string()),
            admin_secret: get("HASURA_ADMIN_SECRET"),
            jwt_secret: get("JWT_SECRET"),
            jwt_issuer: get("JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string()),
            bcrypt_cost: get("BCRYPT_COST")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|cost| (4..=31).contains(cost))
                .unwrap_or(bcrypt::DEFAULT_COST),
            chapa: ChapaConfig {
                secret_key: get("CHAPA_SECRET_KEY"),
                base_url: get("CHAPA_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_CHAPA_BASE_URL.to_string()),
                callback_url: get("CHAPA_CALLBACK_URL"),
                return_url: get("CHAPA_RETURN_URL"),
                currency: get("CHAPA_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
            upload_dir: PathBuf::from(
                get("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            port: get("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_origins,
            max_body_bytes: get("MAX_BODY_BYTES")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }
}
