// src/recipes/mod.rs

pub mod handlers;
pub mod models;
pub mod queries;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::recipes_routes;
