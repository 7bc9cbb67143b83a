// Application state shared across all modules

use reqwest::Client;
use std::sync::Arc;

use super::config::AppConfig;
use crate::auth::TokenService;
use crate::services::{GraphqlService, GraphqlTransport, HttpTransport, ImageStorage, PaymentService};

/// Configuration and service handles, built once at startup.
///
/// Immutable after construction, so handlers share it through a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub graphql: GraphqlService,
    pub tokens: TokenService,
    pub payments: PaymentService,
    pub uploads: ImageStorage,
}

impl AppState {
    pub fn new(config: AppConfig, http: Client) -> Self {
        let transport = Arc::new(HttpTransport::new(
            http.clone(),
            config.graphql_endpoint.clone(),
            config.admin_secret.clone(),
        ));
        Self::with_transport(config, http, transport)
    }

    pub fn with_transport(
        config: AppConfig,
        http: Client,
        transport: Arc<dyn GraphqlTransport>,
    ) -> Self {
        Self {
            graphql: GraphqlService::new(transport),
            tokens: TokenService::new(config.jwt_secret.clone(), config.jwt_issuer.clone()),
            payments: PaymentService::new(http, config.chapa.clone()),
            uploads: ImageStorage::new(config.upload_dir.clone()),
            config: Arc::new(config),
        }
    }
}
