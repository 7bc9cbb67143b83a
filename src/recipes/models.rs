// src/recipes/models.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Response Models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeAuthor {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeStep {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub step_number: i32,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: String,
    pub unit: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeCategory {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeImage {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
}

/// A recipe with its author and nested relations
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub servings: Option<i32>,
    pub preparation_time: i32,
    pub user_id: Uuid,
    pub featured_image: Option<String>,
    pub price: f64,
    pub created_at: Option<String>,
    pub user: Option<RecipeAuthor>,
    pub steps: Vec<RecipeStep>,
    pub ingredients: Vec<RecipeIngredient>,
    pub categories: Vec<RecipeCategory>,
    pub images: Vec<RecipeImage>,
}

impl Recipe {
    pub fn from_row(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            difficulty: row.difficulty,
            servings: row.servings,
            preparation_time: row.preparation_time.unwrap_or_default(),
            user_id: row.user_id,
            featured_image: row.featured_image,
            price: row.price.unwrap_or_default(),
            created_at: row.created_at,
            user: None,
            steps: Vec::new(),
            ingredients: Vec::new(),
            categories: Vec::new(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedRecipe {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub message: String,
    pub recipe: DeletedRecipe,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentAuthor {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub created_at: String,
    pub user: Option<CommentAuthor>,
}

/// Uniform `{status, message}` envelope for interaction endpoints
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadedFiles {
    pub files: Vec<crate::services::uploads::StoredFile>,
}

// ============================================================================
// Request Models
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct StepInput {
    pub step_number: i32,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    /// Existing ingredient; a new one is created when absent
    #[serde(default)]
    pub ingredient_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageInput {
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub preparation_time: i32,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub steps: Vec<StepInput>,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
    #[serde(default)]
    pub categories: Vec<CategoryInput>,
    #[serde(default)]
    pub images: Vec<ImageInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub servings: Option<i32>,
    pub preparation_time: Option<i32>,
    pub featured_image: Option<String>,
    pub price: Option<f64>,
}

impl UpdateRecipeRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.difficulty.is_none()
            && self.servings.is_none()
            && self.preparation_time.is_none()
            && self.featured_image.is_none()
            && self.price.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default, alias = "content")]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadImageRequest {
    #[serde(default)]
    pub image: String,
}

// ============================================================================
// Remote Rows
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRow {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub preparation_time: Option<i32>,
    pub user_id: Uuid,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameOnly {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientLinkRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub ingredient: Option<NameOnly>,
}

impl IngredientLinkRow {
    pub fn into_ingredient(self, name: Option<String>) -> RecipeIngredient {
        let joined = self.ingredient.map(|i| i.name);
        RecipeIngredient {
            id: self.id,
            recipe_id: self.recipe_id,
            ingredient_id: self.ingredient_id,
            quantity: self.quantity,
            unit: self.unit,
            name: name.or(joined).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryLinkRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub category_id: Uuid,
    #[serde(default)]
    pub category: Option<NameOnly>,
}

impl CategoryLinkRow {
    pub fn into_category(self, name: Option<String>) -> RecipeCategory {
        let joined = self.category.map(|c| c.name);
        RecipeCategory {
            id: self.id,
            recipe_id: self.recipe_id,
            category_id: self.category_id,
            name: name.or(joined).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerRow {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentUserRow {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// `insert_recipes_one` result with nested relations
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRecipeRow {
    #[serde(flatten)]
    pub recipe: RecipeRow,
    #[serde(default)]
    pub recipe_steps: Vec<RecipeStep>,
    #[serde(default)]
    pub recipe_ingredients: Vec<IngredientLinkRow>,
    #[serde(default)]
    pub recipe_categories: Vec<CategoryLinkRow>,
    #[serde(default)]
    pub recipe_images: Vec<RecipeImage>,
}

#[derive(Debug, Deserialize)]
pub struct AffectedRows {
    pub affected_rows: i64,
}

#[derive(Debug, Deserialize)]
pub struct MutationReturning<T> {
    pub affected_rows: i64,
    #[serde(default = "Vec::new")]
    pub returning: Vec<T>,
}
