//! Tests for recipes module
//!
//! These tests cover the recipe service against a fake data layer:
//! - In-memory joins for listing, single reads and comments
//! - Ownership checks before update and delete
//! - Input validation that must run before any remote call

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::auth::AuthedUser;
    use crate::common::{ApiError, Validator};
    use crate::services::graphql::{
        Credential, GraphqlError, GraphqlRequest, GraphqlService, RemoteErrorKind,
    };
    use crate::test_support::FakeTransport;
    use models::*;
    use serde_json::{json, Value};
    use services::RecipesService;
    use std::sync::Arc;
    use uuid::Uuid;
    use validators::RecipeValidator;

    fn user(id: Uuid) -> AuthedUser {
        AuthedUser {
            id,
            token: "caller-token".to_string(),
        }
    }

    fn service(transport: &Arc<FakeTransport>) -> RecipesService {
        RecipesService::new(GraphqlService::new(transport.clone()))
    }

    fn recipe_row(id: Uuid, owner: Uuid, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "description": "Tasty",
            "difficulty": "easy",
            "servings": 2,
            "preparation_time": 20,
            "user_id": owner,
            "featured_image": null,
            "price": 12.5,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    fn owned_by(
        owner: Uuid,
    ) -> impl Fn(&GraphqlRequest) -> Result<Value, GraphqlError> + Send + Sync + 'static {
        move |request| {
            if request.query.contains("query RecipeOwner") {
                return Ok(json!({
                    "recipes_by_pk": { "id": request.variables["id"], "user_id": owner }
                }));
            }
            Ok(json!({
                "update_recipes": { "affected_rows": 1, "returning": [recipe_row(Uuid::new_v4(), owner, "Renamed")] },
                "delete_recipes": { "affected_rows": 1, "returning": [{ "id": request.variables["id"], "title": "Stew", "description": null }] }
            }))
        }
    }

    fn create_request() -> CreateRecipeRequest {
        serde_json::from_value(json!({
            "title": "Shiro",
            "description": "Chickpea stew",
            "preparation_time": 30,
            "price": 4.0,
            "steps": [{ "step_number": 1, "description": "Boil water" }],
            "ingredients": [
                { "name": "Chickpea flour", "quantity": "2 cups" },
                { "name": "Onion", "quantity": "1" }
            ],
            "categories": [{ "name": "Stew" }],
            "images": [{ "image_url": "/uploads/a.webp", "is_featured": true }]
        }))
        .unwrap()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn test_create_requires_title_and_description() {
        let req: CreateRecipeRequest = serde_json::from_value(json!({})).unwrap();
        let result = RecipeValidator.validate(&req);
        assert!(!result.is_valid);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"description"));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let result = RecipeValidator.validate(&UpdateRecipeRequest::default());
        assert!(!result.is_valid);
    }

    #[tokio::test]
    async fn test_rating_out_of_range_never_reaches_remote() {
        let transport = FakeTransport::unreachable();
        let svc = service(&transport);
        let caller = user(Uuid::new_v4());

        for rating in [0, 6, 7, -1] {
            let err = svc.rate(Uuid::new_v4(), &caller, rating).await.unwrap_err();
            match err {
                ApiError::ValidationError(msg) => assert!(msg.contains("between 1 and 5")),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_rating_bounds_are_accepted() {
        let transport = FakeTransport::new(|_| Ok(json!({ "insert_recipe_ratings": { "affected_rows": 1 } })));
        let svc = service(&transport);
        let caller = user(Uuid::new_v4());

        for rating in [1, 5] {
            let response = svc.rate(Uuid::new_v4(), &caller, rating).await.unwrap();
            assert_eq!(response.status, "success");
        }

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].request.variables["rating"], json!(1));
        assert_eq!(calls[0].credential, Credential::Bearer("caller-token".to_string()));
    }

    #[tokio::test]
    async fn test_blank_comment_is_rejected() {
        let transport = FakeTransport::unreachable();
        let err = service(&transport)
            .comment(Uuid::new_v4(), &user(Uuid::new_v4()), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_comment_sends_trimmed_content_as_caller() {
        let transport = FakeTransport::new(|_| Ok(json!({ "insert_recipe_comments": { "affected_rows": 1 } })));
        let caller = user(Uuid::new_v4());

        service(&transport)
            .comment(Uuid::new_v4(), &caller, "  lovely  ")
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].request.variables["content"], json!("lovely"));
        assert_eq!(calls[0].request.variables["user_id"], json!(caller.id));
    }

    #[tokio::test]
    async fn test_interaction_with_zero_rows_still_succeeds() {
        let transport = FakeTransport::new(|_| Ok(json!({ "delete_recipe_likes": { "affected_rows": 0 } })));
        let response = service(&transport)
            .unlike(Uuid::new_v4(), &user(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(response.message, "Recipe unliked successfully");
    }

    #[tokio::test]
    async fn test_duplicate_like_maps_to_conflict() {
        let transport = FakeTransport::new(|_| {
            Err(GraphqlError::Remote {
                kind: RemoteErrorKind::ConstraintViolation,
                message: "Uniqueness violation".to_string(),
            })
        });
        let err = service(&transport)
            .like(Uuid::new_v4(), &user(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_like_of_unknown_recipe_maps_to_not_found() {
        let transport = FakeTransport::new(|_| {
            Err(GraphqlError::Remote {
                kind: RemoteErrorKind::ConstraintViolation,
                message: "Foreign key violation. insert or update on table \"likes\" violates foreign key constraint \"likes_recipe_id_fkey\"".to_string(),
            })
        });
        let err = service(&transport)
            .like(Uuid::new_v4(), &user(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    // ========================================================================
    // Ownership
    // ========================================================================

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let owner = Uuid::new_v4();
        let transport = FakeTransport::new(owned_by(owner));
        let svc = service(&transport);
        let stranger = user(Uuid::new_v4());
        let recipe_id = Uuid::new_v4();

        let update = UpdateRecipeRequest {
            title: Some("Mine now".to_string()),
            ..Default::default()
        };
        let err = svc.update_recipe(recipe_id, &stranger, update).await.unwrap_err();
        match err {
            ApiError::Forbidden(msg) => {
                assert_eq!(msg, "You don't have permission to update this recipe")
            }
            other => panic!("expected forbidden, got {:?}", other),
        }

        let err = svc.delete_recipe(recipe_id, &stranger).await.unwrap_err();
        match err {
            ApiError::Forbidden(msg) => {
                assert_eq!(msg, "You don't have permission to delete this recipe")
            }
            other => panic!("expected forbidden, got {:?}", other),
        }

        assert_eq!(transport.mutation_count(), 0);
        assert!(transport
            .calls()
            .iter()
            .all(|call| call.credential == Credential::Admin));
    }

    #[tokio::test]
    async fn test_owner_update_runs_guarded_mutation() {
        let owner = Uuid::new_v4();
        let transport = FakeTransport::new(owned_by(owner));
        let caller = user(owner);
        let recipe_id = Uuid::new_v4();

        let update = UpdateRecipeRequest {
            title: Some("  Renamed ".to_string()),
            price: Some(3.0),
            ..Default::default()
        };
        let recipe = service(&transport)
            .update_recipe(recipe_id, &caller, update)
            .await
            .unwrap();
        assert_eq!(recipe.title, "Renamed");

        let calls = transport.calls();
        let mutation = calls.iter().find(|c| c.request.is_mutation()).unwrap();
        assert!(mutation.request.query.contains("update_recipes"));
        assert_eq!(mutation.credential, Credential::Bearer("caller-token".to_string()));
        assert_eq!(mutation.request.variables["user_id"], json!(owner));
        assert_eq!(
            mutation.request.variables["changes"],
            json!({ "title": "Renamed", "price": 3.0 })
        );
    }

    #[tokio::test]
    async fn test_owner_delete_returns_deleted_recipe() {
        let owner = Uuid::new_v4();
        let transport = FakeTransport::new(owned_by(owner));
        let recipe_id = Uuid::new_v4();

        let response = service(&transport)
            .delete_recipe(recipe_id, &user(owner))
            .await
            .unwrap();
        assert_eq!(response.message, "Recipe deleted successfully");
        assert_eq!(response.recipe.id, recipe_id);
    }

    #[tokio::test]
    async fn test_missing_recipe_is_not_found_for_update() {
        let transport = FakeTransport::new(|_| Ok(json!({ "recipes_by_pk": null })));
        let update = UpdateRecipeRequest {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let err = service(&transport)
            .update_recipe(Uuid::new_v4(), &user(Uuid::new_v4()), update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(transport.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_guarded_update_matching_nothing_is_forbidden() {
        let owner = Uuid::new_v4();
        let transport = FakeTransport::new(move |request| {
            if request.query.contains("query RecipeOwner") {
                return Ok(json!({ "recipes_by_pk": { "id": request.variables["id"], "user_id": owner } }));
            }
            Ok(json!({ "update_recipes": { "affected_rows": 0, "returning": [] } }))
        });
        let update = UpdateRecipeRequest {
            servings: Some(4),
            ..Default::default()
        };
        let err = service(&transport)
            .update_recipe(Uuid::new_v4(), &user(owner), update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    // ========================================================================
    // Create
    // ========================================================================

    #[tokio::test]
    async fn test_create_sends_one_mutation_as_caller() {
        let owner = Uuid::new_v4();
        let recipe_id = Uuid::new_v4();
        let transport = FakeTransport::new(move |request| {
            let recipe = &request.variables["recipe"];
            let mut row = recipe_row(recipe_id, owner, recipe["title"].as_str().unwrap_or_default());
            row["recipe_steps"] = json!([{
                "id": Uuid::new_v4(),
                "recipe_id": recipe_id,
                "step_number": 1,
                "description": "Boil water"
            }]);
            row["recipe_ingredients"] = json!([{
                "id": Uuid::new_v4(),
                "recipe_id": recipe_id,
                "ingredient_id": request.variables["ingredients"][0]["id"],
                "quantity": "2 cups",
                "ingredient": { "name": "Chickpea flour" }
            }]);
            Ok(json!({
                "insert_ingredients": { "affected_rows": 2 },
                "insert_categories": { "affected_rows": 1 },
                "insert_recipes_one": row
            }))
        });

        let recipe = service(&transport)
            .create_recipe(&user(owner), create_request())
            .await
            .unwrap();

        assert_eq!(recipe.id, recipe_id);
        assert_eq!(recipe.title, "Shiro");
        assert_eq!(recipe.steps.len(), 1);
        assert_eq!(recipe.ingredients[0].name, "Chickpea flour");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].request.is_mutation());
        assert_eq!(calls[0].credential, Credential::Bearer("caller-token".to_string()));

        let vars = &calls[0].request.variables;
        assert_eq!(vars["ingredients"].as_array().unwrap().len(), 2);
        assert_eq!(vars["recipe"]["user_id"], json!(owner));
        assert_eq!(vars["recipe"]["featured_image"], json!("/uploads/a.webp"));
        assert_eq!(
            vars["recipe"]["recipe_ingredients"]["data"][0]["ingredient_id"],
            vars["ingredients"][0]["id"]
        );
    }

    #[tokio::test]
    async fn test_create_dedupes_repeated_ingredient_ids() {
        let transport = FakeTransport::new(|_| Err(GraphqlError::MissingData));
        let shared = Uuid::new_v4();
        let mut req = create_request();
        for ingredient in req.ingredients.iter_mut() {
            ingredient.ingredient_id = Some(shared);
        }

        let _ = service(&transport).create_recipe(&user(Uuid::new_v4()), req).await;

        let vars = &transport.calls()[0].request.variables;
        assert_eq!(vars["ingredients"].as_array().unwrap().len(), 1);
        assert_eq!(
            vars["recipe"]["recipe_ingredients"]["data"].as_array().unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_invalid_create_never_reaches_remote() {
        let transport = FakeTransport::unreachable();
        let mut req = create_request();
        req.title = "  ".to_string();

        let err = service(&transport)
            .create_recipe(&user(Uuid::new_v4()), req)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[tokio::test]
    async fn test_list_joins_relations_per_recipe() {
        let author = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let salt = Uuid::new_v4();

        let transport = FakeTransport::new(move |request| {
            let q = request.query.as_str();
            if q.contains("query ListRecipes") {
                Ok(json!({ "recipes": [recipe_row(first, author, "One"), recipe_row(second, author, "Two")] }))
            } else if q.contains("query UsersByIds") {
                Ok(json!({ "users": [{ "id": author, "username": "ana", "full_name": "Ana" }] }))
            } else if q.contains("query StepsForRecipes") {
                Ok(json!({ "recipe_steps": [
                    { "id": Uuid::new_v4(), "recipe_id": second, "step_number": 1, "description": "Stir" }
                ] }))
            } else if q.contains("query IngredientLinksForRecipes") {
                Ok(json!({ "recipe_ingredients": [
                    { "id": Uuid::new_v4(), "recipe_id": first, "ingredient_id": salt, "quantity": "1 tsp", "unit": null }
                ] }))
            } else if q.contains("query IngredientsByIds") {
                Ok(json!({ "ingredients": [{ "id": salt, "name": "Salt" }] }))
            } else if q.contains("query CategoryLinksForRecipes") {
                Ok(json!({ "recipe_categories": [] }))
            } else if q.contains("query ImagesForRecipes") {
                Ok(json!({ "recipe_images": [] }))
            } else {
                panic!("unexpected query: {}", q)
            }
        });

        let recipes = service(&transport).list_recipes().await.unwrap();
        assert_eq!(recipes.len(), 2);

        let one = recipes.iter().find(|r| r.id == first).unwrap();
        assert_eq!(one.ingredients.len(), 1);
        assert_eq!(one.ingredients[0].name, "Salt");
        assert!(one.steps.is_empty());
        assert_eq!(one.user.as_ref().and_then(|u| u.username.as_deref()), Some("ana"));

        let two = recipes.iter().find(|r| r.id == second).unwrap();
        assert_eq!(two.steps.len(), 1);
        assert!(two.ingredients.is_empty());

        // no category names lookup without links
        assert!(!transport
            .calls()
            .iter()
            .any(|c| c.request.query.contains("query CategoriesByIds")));
        assert!(transport.calls().iter().all(|c| c.credential == Credential::Admin));
    }

    #[tokio::test]
    async fn test_list_with_no_recipes_stops_after_first_query() {
        let transport = FakeTransport::new(|_| Ok(json!({ "recipes": [] })));
        let recipes = service(&transport).list_recipes().await.unwrap();
        assert!(recipes.is_empty());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_recipe_is_not_found() {
        let transport = FakeTransport::new(|_| Ok(json!({ "recipes_by_pk": null })));
        let err = service(&transport).get_recipe(Uuid::new_v4()).await.unwrap_err();
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Recipe not found"),
            other => panic!("expected not found, got {:?}", other),
        }
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_get_recipe_resolves_category_names() {
        let author = Uuid::new_v4();
        let recipe_id = Uuid::new_v4();
        let stew = Uuid::new_v4();

        let transport = FakeTransport::new(move |request| {
            let q = request.query.as_str();
            if q.contains("query GetRecipe") {
                Ok(json!({ "recipes_by_pk": recipe_row(recipe_id, author, "Stew") }))
            } else if q.contains("query GetUser") {
                Ok(json!({ "users_by_pk": { "id": author, "username": "ana", "full_name": "Ana" } }))
            } else if q.contains("query CategoryLinksForRecipe") {
                Ok(json!({ "recipe_categories": [
                    { "id": Uuid::new_v4(), "recipe_id": recipe_id, "category_id": stew }
                ] }))
            } else if q.contains("query CategoriesByIds") {
                Ok(json!({ "categories": [{ "id": stew, "name": "Stews" }] }))
            } else {
                Ok(json!({ "recipe_steps": [], "recipe_ingredients": [], "recipe_images": [] }))
            }
        });

        let recipe = service(&transport).get_recipe(recipe_id).await.unwrap();
        assert_eq!(recipe.categories.len(), 1);
        assert_eq!(recipe.categories[0].name, "Stews");
        assert_eq!(recipe.user.map(|u| u.id), Some(author));
    }

    #[tokio::test]
    async fn test_comments_carry_author_names() {
        let alice = Uuid::new_v4();
        let ghost = Uuid::new_v4();

        let transport = FakeTransport::new(move |request| {
            if request.query.contains("query CommentsForRecipe") {
                Ok(json!({ "recipe_comments": [
                    { "id": Uuid::new_v4(), "content": "Great", "created_at": "2024-01-02", "user_id": alice },
                    { "id": Uuid::new_v4(), "content": "Meh", "created_at": "2024-01-01", "user_id": ghost }
                ] }))
            } else {
                Ok(json!({ "users": [{ "id": alice, "full_name": "Alice" }] }))
            }
        });

        let comments = service(&transport).list_comments(Uuid::new_v4()).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(
            comments[0].user,
            Some(CommentAuthor {
                id: alice,
                name: "Alice".to_string()
            })
        );
        assert_eq!(comments[1].user, None);
    }

    #[tokio::test]
    async fn test_comments_without_rows_skip_author_lookup() {
        let transport = FakeTransport::new(|_| Ok(json!({ "recipe_comments": [] })));
        let comments = service(&transport).list_comments(Uuid::new_v4()).await.unwrap();
        assert!(comments.is_empty());
        assert_eq!(transport.call_count(), 1);
    }
}
