// src/services/graphql.rs
//! Client for the remote GraphQL data layer
//!
//! Every persistent record lives behind the GraphQL endpoint. Requests go out
//! either with the caller's session token or with the administrative secret,
//! chosen per [`GraphqlClient`]. The wire is abstracted behind
//! [`GraphqlTransport`] so the domain services can be exercised without a
//! network.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

#[derive(Debug, thiserror::Error)]
pub enum GraphqlError {
    #[error("GraphQL transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL error ({kind}): {message}")]
    Remote {
        kind: RemoteErrorKind,
        message: String,
    },

    #[error("Failed to decode GraphQL response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GraphQL response carried no data")]
    MissingData,
}

/// Classification of an error reported by the remote layer, taken from
/// `extensions.code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteErrorKind {
    ConstraintViolation,
    AccessDenied,
    InvalidJwt,
    NotFound,
    Validation,
    Other(String),
}

impl RemoteErrorKind {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("constraint-violation") => RemoteErrorKind::ConstraintViolation,
            Some("access-denied") | Some("permission-error") => RemoteErrorKind::AccessDenied,
            Some("invalid-jwt") | Some("jwt-invalid-claims") | Some("invalid-headers") => {
                RemoteErrorKind::InvalidJwt
            }
            Some("not-found") => RemoteErrorKind::NotFound,
            Some("validation-failed") | Some("parse-failed") | Some("data-exception") => {
                RemoteErrorKind::Validation
            }
            Some(other) => RemoteErrorKind::Other(other.to_string()),
            None => RemoteErrorKind::Other("unknown".to_string()),
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorKind::ConstraintViolation => write!(f, "constraint-violation"),
            RemoteErrorKind::AccessDenied => write!(f, "access-denied"),
            RemoteErrorKind::InvalidJwt => write!(f, "invalid-jwt"),
            RemoteErrorKind::NotFound => write!(f, "not-found"),
            RemoteErrorKind::Validation => write!(f, "validation-failed"),
            RemoteErrorKind::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Which credential a request is sent with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    Admin,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }

    #[cfg(test)]
    pub fn is_mutation(&self) -> bool {
        self.query.trim_start().starts_with("mutation")
    }
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<RemoteError>>,
}

#[derive(Deserialize)]
struct RemoteError {
    message: String,
    #[serde(default)]
    extensions: Option<RemoteErrorExtensions>,
}

#[derive(Deserialize)]
struct RemoteErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

/// Splits a GraphQL response envelope into its `data` object or a classified error.
pub fn parse_response(payload: Value) -> Result<Value, GraphqlError> {
    let response: GraphqlResponse = serde_json::from_value(payload)?;

    if let Some(first) = response.errors.and_then(|errors| errors.into_iter().next()) {
        let code = first.extensions.as_ref().and_then(|ext| ext.code.as_deref());
        return Err(GraphqlError::Remote {
            kind: RemoteErrorKind::from_code(code),
            message: first.message,
        });
    }

    match response.data {
        Some(Value::Null) | None => Err(GraphqlError::MissingData),
        Some(data) => Ok(data),
    }
}

#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Executes one document and returns its `data` object.
    async fn execute(
        &self,
        credential: &Credential,
        request: &GraphqlRequest,
    ) -> Result<Value, GraphqlError>;
}

/// Production transport posting `{query, variables}` over HTTP
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    admin_secret: Option<String>,
}

impl HttpTransport {
    pub fn new(http: Client, endpoint: String, admin_secret: Option<String>) -> Self {
        Self {
            http,
            endpoint,
            admin_secret,
        }
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(
        &self,
        credential: &Credential,
        request: &GraphqlRequest,
    ) -> Result<Value, GraphqlError> {
        let mut builder = self.http.post(&self.endpoint).json(request);

        builder = match credential {
            Credential::Bearer(token) => builder.bearer_auth(token),
            Credential::Admin => match &self.admin_secret {
                Some(secret) => builder.header(ADMIN_SECRET_HEADER, secret),
                None => {
                    warn!("Admin secret not configured, sending unauthenticated GraphQL request");
                    builder
                }
            },
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GraphqlError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body)?;
        parse_response(payload)
    }
}

/// Hands out credential-scoped clients over a shared transport
#[derive(Clone)]
pub struct GraphqlService {
    transport: Arc<dyn GraphqlTransport>,
}

impl GraphqlService {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }

    pub fn with_token(&self, token: &str) -> GraphqlClient {
        GraphqlClient {
            transport: self.transport.clone(),
            credential: Credential::Bearer(token.to_string()),
        }
    }

    pub fn admin(&self) -> GraphqlClient {
        GraphqlClient {
            transport: self.transport.clone(),
            credential: Credential::Admin,
        }
    }
}

#[derive(Clone)]
pub struct GraphqlClient {
    transport: Arc<dyn GraphqlTransport>,
    credential: Credential,
}

impl GraphqlClient {
    pub async fn query<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<T, GraphqlError> {
        debug!(admin = self.is_admin(), "Executing GraphQL query");
        self.run(document, variables).await
    }

    pub async fn mutate<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<T, GraphqlError> {
        debug!(admin = self.is_admin(), "Executing GraphQL mutation");
        self.run(document, variables).await
    }

    async fn run<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<T, GraphqlError> {
        let request = GraphqlRequest::new(document, variables);
        let data = self.transport.execute(&self.credential, &request).await?;
        Ok(serde_json::from_value(data)?)
    }

    fn is_admin(&self) -> bool {
        matches!(self.credential, Credential::Admin)
    }
}
