// src/recipes/services.rs
//! Recipe operations against the remote data layer
//!
//! Public reads go out with the admin credential. Everything a caller
//! changes goes out with the caller's own token so the remote layer can apply
//! its row-level permissions as well.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::models::*;
use super::queries::*;
use super::validators::{validate_comment, validate_rating, RecipeValidator};
use crate::auth::AuthedUser;
use crate::common::{ApiError, Validator};
use crate::services::graphql::{GraphqlClient, GraphqlError, GraphqlService};

pub const RECIPE_NOT_FOUND: &str = "Recipe not found";

#[derive(Deserialize)]
struct RecipesData {
    recipes: Vec<RecipeRow>,
}

#[derive(Deserialize)]
struct AuthorsData {
    users: Vec<RecipeAuthor>,
}

#[derive(Deserialize)]
struct StepsData {
    recipe_steps: Vec<RecipeStep>,
}

#[derive(Deserialize)]
struct IngredientLinksData {
    recipe_ingredients: Vec<IngredientLinkRow>,
}

#[derive(Deserialize)]
struct IngredientsData {
    ingredients: Vec<NamedRow>,
}

#[derive(Deserialize)]
struct CategoryLinksData {
    recipe_categories: Vec<CategoryLinkRow>,
}

#[derive(Deserialize)]
struct CategoriesData {
    categories: Vec<NamedRow>,
}

#[derive(Deserialize)]
struct ImagesData {
    recipe_images: Vec<RecipeImage>,
}

#[derive(Deserialize)]
struct RecipeByPk {
    recipes_by_pk: Option<RecipeRow>,
}

#[derive(Deserialize)]
struct UserByPk {
    users_by_pk: Option<RecipeAuthor>,
}

#[derive(Deserialize)]
struct OwnerByPk {
    recipes_by_pk: Option<OwnerRow>,
}

#[derive(Deserialize)]
struct CreateData {
    insert_recipes_one: Option<CreatedRecipeRow>,
}

#[derive(Deserialize)]
struct UpdateData {
    update_recipes: Option<MutationReturning<RecipeRow>>,
}

#[derive(Deserialize)]
struct DeleteData {
    delete_recipes: Option<MutationReturning<DeletedRecipe>>,
}

#[derive(Deserialize)]
struct CommentsData {
    recipe_comments: Vec<CommentRow>,
}

#[derive(Deserialize)]
struct CommentAuthorsData {
    users: Vec<CommentUserRow>,
}

fn group_by<T>(items: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(key(&item)).or_default().push(item);
    }
    grouped
}

fn unique_ids<T>(items: &[T], key: impl Fn(&T) -> Uuid) -> Vec<Uuid> {
    items.iter().map(key).collect::<BTreeSet<_>>().into_iter().collect()
}

fn names_by_id(rows: Vec<NamedRow>) -> HashMap<Uuid, String> {
    rows.into_iter().map(|row| (row.id, row.name)).collect()
}

pub struct RecipesService {
    graphql: GraphqlService,
}

impl RecipesService {
    pub fn new(graphql: GraphqlService) -> Self {
        Self { graphql }
    }

    fn public(&self) -> GraphqlClient {
        self.graphql.admin()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Every recipe with author and relations, joined in memory.
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let client = self.public();

        let data: RecipesData = client.query(LIST_RECIPES, json!({})).await?;
        if data.recipes.is_empty() {
            return Ok(Vec::new());
        }

        let recipe_ids = unique_ids(&data.recipes, |r| r.id);
        let owner_ids = unique_ids(&data.recipes, |r| r.user_id);

        let authors: AuthorsData = client
            .query(USERS_BY_IDS, json!({ "ids": owner_ids }))
            .await?;
        let steps: StepsData = client
            .query(STEPS_FOR_RECIPES, json!({ "recipe_ids": recipe_ids }))
            .await?;
        let ingredient_links: IngredientLinksData = client
            .query(INGREDIENT_LINKS_FOR_RECIPES, json!({ "recipe_ids": recipe_ids }))
            .await?;

        let ingredient_ids = unique_ids(&ingredient_links.recipe_ingredients, |l| l.ingredient_id);
        let ingredient_names = if ingredient_ids.is_empty() {
            HashMap::new()
        } else {
            let rows: IngredientsData = client
                .query(INGREDIENTS_BY_IDS, json!({ "ids": ingredient_ids }))
                .await?;
            names_by_id(rows.ingredients)
        };

        let category_links: CategoryLinksData = client
            .query(CATEGORY_LINKS_FOR_RECIPES, json!({ "recipe_ids": recipe_ids }))
            .await?;
        let category_names = self
            .category_names(&client, &category_links.recipe_categories)
            .await?;

        let images: ImagesData = client
            .query(IMAGES_FOR_RECIPES, json!({ "recipe_ids": recipe_ids }))
            .await?;

        let authors: HashMap<Uuid, RecipeAuthor> = authors
            .users
            .into_iter()
            .map(|author| (author.id, author))
            .collect();
        let mut steps = group_by(steps.recipe_steps, |s| s.recipe_id);
        let mut ingredients = group_by(ingredient_links.recipe_ingredients, |l| l.recipe_id);
        let mut categories = group_by(category_links.recipe_categories, |l| l.recipe_id);
        let mut images = group_by(images.recipe_images, |i| i.recipe_id);

        let recipes = data
            .recipes
            .into_iter()
            .map(|row| {
                let mut recipe = Recipe::from_row(row);
                recipe.user = authors.get(&recipe.user_id).cloned();
                recipe.steps = steps.remove(&recipe.id).unwrap_or_default();
                recipe.ingredients = ingredients
                    .remove(&recipe.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|link| {
                        let name = ingredient_names.get(&link.ingredient_id).cloned();
                        link.into_ingredient(name)
                    })
                    .collect();
                recipe.categories = categories
                    .remove(&recipe.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|link| {
                        let name = category_names.get(&link.category_id).cloned();
                        link.into_category(name)
                    })
                    .collect();
                recipe.images = images.remove(&recipe.id).unwrap_or_default();
                recipe
            })
            .collect::<Vec<_>>();

        debug!(count = recipes.len(), "Listed recipes");
        Ok(recipes)
    }

    pub async fn get_recipe(&self, recipe_id: Uuid) -> Result<Recipe, ApiError> {
        let client = self.public();
        let vars = json!({ "recipe_id": recipe_id });

        let data: RecipeByPk = client.query(GET_RECIPE, json!({ "id": recipe_id })).await?;
        let row = data
            .recipes_by_pk
            .ok_or_else(|| ApiError::NotFound(RECIPE_NOT_FOUND.to_string()))?;
        let mut recipe = Recipe::from_row(row);

        let author: UserByPk = client
            .query(GET_USER, json!({ "id": recipe.user_id }))
            .await?;
        let steps: StepsData = client.query(STEPS_FOR_RECIPE, vars.clone()).await?;
        let ingredients: IngredientLinksData =
            client.query(INGREDIENTS_FOR_RECIPE, vars.clone()).await?;
        let category_links: CategoryLinksData =
            client.query(CATEGORY_LINKS_FOR_RECIPE, vars.clone()).await?;
        let category_names = self
            .category_names(&client, &category_links.recipe_categories)
            .await?;
        let images: ImagesData = client.query(IMAGES_FOR_RECIPE, vars).await?;

        recipe.user = author.users_by_pk;
        recipe.steps = steps.recipe_steps;
        recipe.ingredients = ingredients
            .recipe_ingredients
            .into_iter()
            .map(|link| link.into_ingredient(None))
            .collect();
        recipe.categories = category_links
            .recipe_categories
            .into_iter()
            .map(|link| {
                let name = category_names.get(&link.category_id).cloned();
                link.into_category(name)
            })
            .collect();
        recipe.images = images.recipe_images;

        Ok(recipe)
    }

    /// Looks up category names; no remote call when there are no links.
    async fn category_names(
        &self,
        client: &GraphqlClient,
        links: &[CategoryLinkRow],
    ) -> Result<HashMap<Uuid, String>, ApiError> {
        let ids = unique_ids(links, |l| l.category_id);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: CategoriesData = client.query(CATEGORIES_BY_IDS, json!({ "ids": ids })).await?;
        Ok(names_by_id(rows.categories))
    }

    pub async fn list_comments(&self, recipe_id: Uuid) -> Result<Vec<CommentView>, ApiError> {
        let client = self.public();

        let data: CommentsData = client
            .query(COMMENTS_FOR_RECIPE, json!({ "recipe_id": recipe_id }))
            .await?;

        let author_ids = unique_ids(&data.recipe_comments, |c| c.user_id);
        let authors: HashMap<Uuid, CommentAuthor> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            let rows: CommentAuthorsData = client
                .query(COMMENT_AUTHORS, json!({ "ids": author_ids }))
                .await?;
            rows.users
                .into_iter()
                .map(|u| {
                    (
                        u.id,
                        CommentAuthor {
                            id: u.id,
                            name: u.full_name.unwrap_or_default(),
                        },
                    )
                })
                .collect()
        };

        Ok(data
            .recipe_comments
            .into_iter()
            .map(|c| CommentView {
                user: authors.get(&c.user_id).cloned(),
                id: c.id,
                content: c.content,
                created_at: c.created_at,
            })
            .collect())
    }

    // ========================================================================
    // Recipe mutations
    // ========================================================================

    pub async fn create_recipe(
        &self,
        user: &AuthedUser,
        req: CreateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        RecipeValidator.validate(&req).into_result()?;

        let variables = build_create_variables(user.id, &req);
        let created: CreateData = self
            .graphql
            .with_token(&user.token)
            .mutate(CREATE_RECIPE, variables)
            .await?;

        let row = created.insert_recipes_one.ok_or_else(|| {
            warn!(user_id = %user.id, "Recipe insert returned no row");
            ApiError::from(GraphqlError::MissingData)
        })?;

        let mut recipe = Recipe::from_row(row.recipe);
        recipe.steps = row.recipe_steps;
        recipe.ingredients = row
            .recipe_ingredients
            .into_iter()
            .map(|link| link.into_ingredient(None))
            .collect();
        recipe.categories = row
            .recipe_categories
            .into_iter()
            .map(|link| link.into_category(None))
            .collect();
        recipe.images = row.recipe_images;

        info!(recipe_id = %recipe.id, user_id = %user.id, "Recipe created");
        Ok(recipe)
    }

    pub async fn update_recipe(
        &self,
        recipe_id: Uuid,
        user: &AuthedUser,
        req: UpdateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        RecipeValidator.validate(&req).into_result()?;
        self.ensure_owner(recipe_id, user.id, "update").await?;

        let updated: UpdateData = self
            .graphql
            .with_token(&user.token)
            .mutate(
                UPDATE_OWN_RECIPE,
                json!({
                    "id": recipe_id,
                    "user_id": user.id,
                    "changes": build_changes(&req),
                }),
            )
            .await?;

        let row = updated
            .update_recipes
            .filter(|result| result.affected_rows > 0)
            .and_then(|result| result.returning.into_iter().next())
            .ok_or_else(|| {
                warn!(recipe_id = %recipe_id, user_id = %user.id, "Guarded update matched no rows");
                ApiError::Forbidden(permission_message("update"))
            })?;

        info!(recipe_id = %recipe_id, user_id = %user.id, "Recipe updated");
        Ok(Recipe::from_row(row))
    }

    pub async fn delete_recipe(
        &self,
        recipe_id: Uuid,
        user: &AuthedUser,
    ) -> Result<DeleteRecipeResponse, ApiError> {
        self.ensure_owner(recipe_id, user.id, "delete").await?;

        let deleted: DeleteData = self
            .graphql
            .with_token(&user.token)
            .mutate(
                DELETE_OWN_RECIPE,
                json!({ "id": recipe_id, "user_id": user.id }),
            )
            .await?;

        let recipe = deleted
            .delete_recipes
            .filter(|result| result.affected_rows > 0)
            .and_then(|result| result.returning.into_iter().next())
            .ok_or_else(|| {
                warn!(recipe_id = %recipe_id, user_id = %user.id, "Guarded delete matched no rows");
                ApiError::Forbidden(permission_message("delete"))
            })?;

        info!(recipe_id = %recipe_id, user_id = %user.id, "Recipe deleted");
        Ok(DeleteRecipeResponse {
            message: "Recipe deleted successfully".to_string(),
            recipe,
        })
    }

    /// Fails with 404 for a missing recipe and 403 for someone else's.
    async fn ensure_owner(&self, recipe_id: Uuid, user_id: Uuid, action: &str) -> Result<(), ApiError> {
        let owner: OwnerByPk = self
            .public()
            .query(RECIPE_OWNER, json!({ "id": recipe_id }))
            .await?;

        match owner.recipes_by_pk {
            None => Err(ApiError::NotFound(RECIPE_NOT_FOUND.to_string())),
            Some(row) if row.user_id != user_id => {
                warn!(
                    recipe_id = %row.id,
                    owner_id = %row.user_id,
                    user_id = %user_id,
                    "Rejected {} of a recipe owned by another user",
                    action
                );
                Err(ApiError::Forbidden(permission_message(action)))
            }
            Some(_) => Ok(()),
        }
    }

    // ========================================================================
    // Interactions
    // ========================================================================

    pub async fn like(&self, recipe_id: Uuid, user: &AuthedUser) -> Result<StatusMessage, ApiError> {
        self.interact(recipe_id, user, LIKE_RECIPE, "insert_recipe_likes", json!({}))
            .await?;
        Ok(StatusMessage::success("Recipe liked successfully"))
    }

    pub async fn unlike(&self, recipe_id: Uuid, user: &AuthedUser) -> Result<StatusMessage, ApiError> {
        self.interact(recipe_id, user, UNLIKE_RECIPE, "delete_recipe_likes", json!({}))
            .await?;
        Ok(StatusMessage::success("Recipe unliked successfully"))
    }

    pub async fn bookmark(&self, recipe_id: Uuid, user: &AuthedUser) -> Result<StatusMessage, ApiError> {
        self.interact(recipe_id, user, BOOKMARK_RECIPE, "insert_recipe_bookmarks", json!({}))
            .await?;
        Ok(StatusMessage::success("Recipe bookmarked successfully"))
    }

    pub async fn unbookmark(&self, recipe_id: Uuid, user: &AuthedUser) -> Result<StatusMessage, ApiError> {
        self.interact(recipe_id, user, UNBOOKMARK_RECIPE, "delete_recipe_bookmarks", json!({}))
            .await?;
        Ok(StatusMessage::success("Recipe unbookmarked successfully"))
    }

    /// Ratings outside 1..=5 are rejected without touching the remote layer.
    pub async fn rate(
        &self,
        recipe_id: Uuid,
        user: &AuthedUser,
        rating: i64,
    ) -> Result<StatusMessage, ApiError> {
        validate_rating(rating).into_result()?;
        self.interact(
            recipe_id,
            user,
            RATE_RECIPE,
            "insert_recipe_ratings",
            json!({ "rating": rating }),
        )
        .await?;
        Ok(StatusMessage::success("Recipe rated successfully"))
    }

    pub async fn comment(
        &self,
        recipe_id: Uuid,
        user: &AuthedUser,
        content: &str,
    ) -> Result<StatusMessage, ApiError> {
        validate_comment(content).into_result()?;
        self.interact(
            recipe_id,
            user,
            COMMENT_ON_RECIPE,
            "insert_recipe_comments",
            json!({ "content": content.trim() }),
        )
        .await?;
        Ok(StatusMessage::success("Comment added successfully"))
    }

    /// Runs a single interaction mutation as the caller. Zero affected rows
    /// is logged and otherwise treated as success.
    async fn interact(
        &self,
        recipe_id: Uuid,
        user: &AuthedUser,
        document: &str,
        field: &str,
        extra: Value,
    ) -> Result<i64, ApiError> {
        let mut variables = Map::new();
        variables.insert("recipe_id".to_string(), json!(recipe_id));
        variables.insert("user_id".to_string(), json!(user.id));
        if let Value::Object(extra) = extra {
            variables.extend(extra);
        }

        let data: HashMap<String, Option<AffectedRows>> = self
            .graphql
            .with_token(&user.token)
            .mutate(document, Value::Object(variables))
            .await?;

        let affected = data
            .get(field)
            .and_then(|rows| rows.as_ref())
            .map(|rows| rows.affected_rows)
            .unwrap_or(0);

        if affected == 0 {
            warn!(recipe_id = %recipe_id, user_id = %user.id, operation = field, "Mutation affected no rows");
        } else {
            debug!(recipe_id = %recipe_id, user_id = %user.id, operation = field, "Mutation applied");
        }
        Ok(affected)
    }
}

fn permission_message(action: &str) -> String {
    format!("You don't have permission to {} this recipe", action)
}

/// Variables for [`CREATE_RECIPE`]. Ingredients and categories without an id
/// get a fresh one; duplicates collapse to a single upsert row.
fn build_create_variables(user_id: Uuid, req: &CreateRecipeRequest) -> Value {
    let mut ingredient_rows: Vec<Value> = Vec::new();
    let mut ingredient_links: Vec<Value> = Vec::new();
    let mut seen = BTreeSet::new();
    for ingredient in &req.ingredients {
        let id = ingredient.ingredient_id.unwrap_or_else(Uuid::new_v4);
        if seen.insert(id) {
            ingredient_rows.push(json!({ "id": id, "name": ingredient.name.trim() }));
        }
        ingredient_links.push(json!({
            "ingredient_id": id,
            "quantity": ingredient.quantity.trim(),
            "unit": ingredient.unit,
        }));
    }

    let mut category_rows: Vec<Value> = Vec::new();
    let mut category_links: Vec<Value> = Vec::new();
    let mut seen = BTreeSet::new();
    for category in &req.categories {
        let id = category.category_id.unwrap_or_else(Uuid::new_v4);
        if seen.insert(id) {
            category_rows.push(json!({ "id": id, "name": category.name.trim() }));
            category_links.push(json!({ "category_id": id }));
        }
    }

    let steps: Vec<Value> = req
        .steps
        .iter()
        .map(|step| {
            json!({
                "step_number": step.step_number,
                "description": step.description.trim(),
                "image_url": step.image_url,
            })
        })
        .collect();

    let images: Vec<Value> = req
        .images
        .iter()
        .map(|image| json!({ "image_url": image.image_url, "is_featured": image.is_featured }))
        .collect();

    let featured_image = req.featured_image.clone().or_else(|| {
        req.images
            .iter()
            .find(|image| image.is_featured)
            .map(|image| image.image_url.clone())
    });

    json!({
        "ingredients": ingredient_rows,
        "categories": category_rows,
        "recipe": {
            "title": req.title.trim(),
            "description": req.description.trim(),
            "difficulty": req.difficulty,
            "servings": req.servings,
            "preparation_time": req.preparation_time,
            "user_id": user_id,
            "featured_image": featured_image,
            "price": req.price,
            "recipe_steps": { "data": steps },
            "recipe_ingredients": { "data": ingredient_links },
            "recipe_categories": { "data": category_links },
            "recipe_images": { "data": images },
        }
    })
}

/// `_set` object holding only the provided fields
fn build_changes(req: &UpdateRecipeRequest) -> Value {
    let mut changes = Map::new();
    if let Some(title) = &req.title {
        changes.insert("title".to_string(), json!(title.trim()));
    }
    if let Some(description) = &req.description {
        changes.insert("description".to_string(), json!(description));
    }
    if let Some(difficulty) = &req.difficulty {
        changes.insert("difficulty".to_string(), json!(difficulty));
    }
    if let Some(servings) = req.servings {
        changes.insert("servings".to_string(), json!(servings));
    }
    if let Some(preparation_time) = req.preparation_time {
        changes.insert("preparation_time".to_string(), json!(preparation_time));
    }
    if let Some(featured_image) = &req.featured_image {
        changes.insert("featured_image".to_string(), json!(featured_image));
    }
    if let Some(price) = req.price {
        changes.insert("price".to_string(), json!(price));
    }
    Value::Object(changes)
}

