// src/recipes/handlers/mod.rs

pub mod interactions;
pub mod recipes;
pub mod uploads;

pub use interactions::*;
pub use recipes::*;
