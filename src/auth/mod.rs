//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Registration and login against the remote user table
//! - Session token issuance and validation
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod token;
pub mod validators;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
pub use token::{TokenError, TokenService};
