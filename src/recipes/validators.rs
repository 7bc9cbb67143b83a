// src/recipes/validators.rs

use super::models::*;
use crate::common::{ValidationResult, Validator};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

// ============================================================================
// Recipe Validators
// ============================================================================

pub struct RecipeValidator;

impl Validator<CreateRecipeRequest> for RecipeValidator {
    fn validate(&self, data: &CreateRecipeRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("title", &data.title, "Title is required");
        result.require("description", &data.description, "Description is required");

        if data.preparation_time < 0 {
            result.add_error("preparation_time", "Preparation time cannot be negative");
        }
        if data.price < 0.0 || !data.price.is_finite() {
            result.add_error("price", "Price cannot be negative");
        }
        if let Some(servings) = data.servings {
            if servings <= 0 {
                result.add_error("servings", "Servings must be positive");
            }
        }

        for (idx, step) in data.steps.iter().enumerate() {
            if step.step_number <= 0 {
                result.add_error(
                    &format!("steps[{}].step_number", idx),
                    "Step number must be positive",
                );
            }
            if step.description.trim().is_empty() {
                result.add_error(
                    &format!("steps[{}].description", idx),
                    "Step description is required",
                );
            }
        }

        for (idx, ingredient) in data.ingredients.iter().enumerate() {
            if ingredient.name.trim().is_empty() {
                result.add_error(
                    &format!("ingredients[{}].name", idx),
                    "Ingredient name is required",
                );
            }
            if ingredient.quantity.trim().is_empty() {
                result.add_error(
                    &format!("ingredients[{}].quantity", idx),
                    "Ingredient quantity is required",
                );
            }
        }

        for (idx, category) in data.categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                result.add_error(
                    &format!("categories[{}].name", idx),
                    "Category name is required",
                );
            }
        }

        for (idx, image) in data.images.iter().enumerate() {
            if image.image_url.trim().is_empty() {
                result.add_error(
                    &format!("images[{}].image_url", idx),
                    "Image URL is required",
                );
            }
        }

        result
    }
}

impl Validator<UpdateRecipeRequest> for RecipeValidator {
    fn validate(&self, data: &UpdateRecipeRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.is_empty() {
            result.add_error("body", "At least one field must be provided");
            return result;
        }

        if let Some(title) = &data.title {
            result.require("title", title, "Title cannot be empty");
        }
        if let Some(preparation_time) = data.preparation_time {
            if preparation_time < 0 {
                result.add_error("preparation_time", "Preparation time cannot be negative");
            }
        }
        if let Some(price) = data.price {
            if price < 0.0 || !price.is_finite() {
                result.add_error("price", "Price cannot be negative");
            }
        }
        if let Some(servings) = data.servings {
            if servings <= 0 {
                result.add_error("servings", "Servings must be positive");
            }
        }

        result
    }
}

pub fn validate_rating(rating: i64) -> ValidationResult {
    let mut result = ValidationResult::new();
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        result.add_error("rating", "Rating must be between 1 and 5");
    }
    result
}

pub fn validate_comment(content: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.require("comment", content, "Comment content is required");
    result
}
