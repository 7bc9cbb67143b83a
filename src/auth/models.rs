//! Authentication data models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ROLE: &str = "user";

/// Role claims read by the remote authorization layer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HasuraClaims {
    #[serde(rename = "x-hasura-default-role")]
    pub default_role: String,
    #[serde(rename = "x-hasura-allowed-roles")]
    pub allowed_roles: Vec<String>,
    #[serde(rename = "x-hasura-user-id")]
    pub user_id: String,
}

impl HasuraClaims {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            default_role: DEFAULT_ROLE.to_string(),
            allowed_roles: vec![DEFAULT_ROLE.to_string()],
            user_id: user_id.to_string(),
        }
    }
}

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    #[serde(rename = "https://hasura.io/jwt/claims")]
    pub hasura: HasuraClaims,
}

#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body returned by both register and login
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// User record as returned by the remote data layer
#[derive(Deserialize, Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UsersData {
    pub users: Vec<UserRow>,
}

#[derive(Deserialize, Debug)]
pub struct InsertUserData {
    pub insert_users_one: Option<UserRow>,
}
