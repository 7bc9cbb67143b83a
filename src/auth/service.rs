//! Registration and login against the remote user table

use serde_json::json;
use tracing::{error, info, warn};

use super::models::{
    AuthResponse, InsertUserData, LoginRequest, RegisterRequest, UserRow, UsersData,
};
use super::token::{TokenError, TokenService};
use super::validators::{LoginValidator, RegisterValidator};
use crate::common::{safe_email_log, ApiError, ValidationResult, Validator};
use crate::services::graphql::{GraphqlClient, GraphqlError, RemoteErrorKind};

const FIND_EXISTING_USER: &str = r#"
query FindExistingUser($email: String!, $username: String!) {
  users(where: {_or: [{email: {_eq: $email}}, {username: {_eq: $username}}]}, limit: 1) {
    id
    username
    email
  }
}"#;

const INSERT_USER: &str = r#"
mutation InsertUser($username: String!, $email: String!, $password_hash: String!, $full_name: String!) {
  insert_users_one(object: {username: $username, email: $email, password_hash: $password_hash, full_name: $full_name}) {
    id
    username
    email
    full_name
  }
}"#;

const FIND_USER_BY_EMAIL: &str = r#"
query FindUserByEmail($email: String!) {
  users(where: {email: {_eq: $email}}, limit: 1) {
    id
    username
    email
    full_name
    password_hash
  }
}"#;

pub const CONFLICT_MESSAGE: &str = "Username or email already exists";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid input")]
    Invalid(ValidationResult),

    #[error("{}", CONFLICT_MESSAGE)]
    Conflict,

    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Remote(#[from] GraphqlError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Invalid(result) => ApiError::from(result),
            AuthError::Conflict => ApiError::Conflict(CONFLICT_MESSAGE.to_string()),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            AuthError::Token(e) => {
                error!(error = %e, "Failed to issue session token");
                ApiError::InternalServer("Failed to issue session token".to_string())
            }
            AuthError::Hash(e) => {
                error!(error = %e, "Password hashing failed");
                ApiError::InternalServer("Failed to process credentials".to_string())
            }
            AuthError::Remote(e) => ApiError::from(e),
        }
    }
}

/// Credential flows. Talks to the remote layer with the admin credential.
pub struct AuthService {
    graphql: GraphqlClient,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(graphql: GraphqlClient, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            graphql,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let validation = RegisterValidator.validate(&req);
        if !validation.is_valid {
            return Err(AuthError::Invalid(validation));
        }

        let username = req.username.trim().to_string();
        let email = req.email.trim().to_string();

        let existing: UsersData = self
            .graphql
            .query(
                FIND_EXISTING_USER,
                json!({ "email": email, "username": username }),
            )
            .await?;
        if !existing.users.is_empty() {
            warn!(email = %safe_email_log(&email), "Registration rejected: user already exists");
            return Err(AuthError::Conflict);
        }

        let password_hash = self.hash_password(req.password).await?;

        let inserted: InsertUserData = self
            .graphql
            .mutate(
                INSERT_USER,
                json!({
                    "username": username,
                    "email": email,
                    "password_hash": password_hash,
                    "full_name": req.full_name.trim(),
                }),
            )
            .await
            .map_err(|e| match e {
                GraphqlError::Remote {
                    kind: RemoteErrorKind::ConstraintViolation,
                    ..
                } => AuthError::Conflict,
                other => AuthError::Remote(other),
            })?;

        let user = inserted
            .insert_users_one
            .ok_or(AuthError::Remote(GraphqlError::MissingData))?;

        info!(user_id = %user.id, email = %safe_email_log(&user.email), "User registered");
        self.respond(user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        let validation = LoginValidator.validate(&req);
        if !validation.is_valid {
            return Err(AuthError::Invalid(validation));
        }

        let email = req.email.trim().to_string();
        let found: UsersData = self
            .graphql
            .query(FIND_USER_BY_EMAIL, json!({ "email": email }))
            .await?;

        let Some(user) = found.users.into_iter().next() else {
            warn!(email = %safe_email_log(&email), "Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let stored_hash = user.password_hash.clone().unwrap_or_default();
        if !self.verify_password(req.password, stored_hash).await? {
            warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        self.respond(user)
    }

    fn respond(&self, user: UserRow) -> Result<AuthResponse, AuthError> {
        let token = self.tokens.issue(&user.id.to_string())?;
        Ok(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name.unwrap_or_default(),
        })
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// An unparseable stored hash counts as a mismatch.
    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(verified.unwrap_or(false))
    }
}
