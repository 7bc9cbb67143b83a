// src/recipes/queries.rs
//! GraphQL documents used by the recipe operations

pub const LIST_RECIPES: &str = r#"
query ListRecipes {
  recipes(order_by: {created_at: desc}) {
    id
    title
    description
    difficulty
    servings
    preparation_time
    user_id
    featured_image
    price
    created_at
  }
}"#;

pub const USERS_BY_IDS: &str = r#"
query UsersByIds($ids: [uuid!]!) {
  users(where: {id: {_in: $ids}}) {
    id
    username
    full_name
  }
}"#;

pub const STEPS_FOR_RECIPES: &str = r#"
query StepsForRecipes($recipe_ids: [uuid!]!) {
  recipe_steps(where: {recipe_id: {_in: $recipe_ids}}, order_by: {step_number: asc}) {
    id
    recipe_id
    step_number
    description
    image_url
  }
}"#;

pub const INGREDIENT_LINKS_FOR_RECIPES: &str = r#"
query IngredientLinksForRecipes($recipe_ids: [uuid!]!) {
  recipe_ingredients(where: {recipe_id: {_in: $recipe_ids}}) {
    id
    recipe_id
    ingredient_id
    quantity
    unit
  }
}"#;

pub const INGREDIENTS_BY_IDS: &str = r#"
query IngredientsByIds($ids: [uuid!]!) {
  ingredients(where: {id: {_in: $ids}}) {
    id
    name
  }
}"#;

pub const CATEGORY_LINKS_FOR_RECIPES: &str = r#"
query CategoryLinksForRecipes($recipe_ids: [uuid!]!) {
  recipe_categories(where: {recipe_id: {_in: $recipe_ids}}) {
    id
    recipe_id
    category_id
  }
}"#;

pub const CATEGORIES_BY_IDS: &str = r#"
query CategoriesByIds($ids: [uuid!]!) {
  categories(where: {id: {_in: $ids}}) {
    id
    name
  }
}"#;

pub const IMAGES_FOR_RECIPES: &str = r#"
query ImagesForRecipes($recipe_ids: [uuid!]!) {
  recipe_images(where: {recipe_id: {_in: $recipe_ids}}) {
    id
    recipe_id
    image_url
    is_featured
  }
}"#;

pub const GET_RECIPE: &str = r#"
query GetRecipe($id: uuid!) {
  recipes_by_pk(id: $id) {
    id
    title
    description
    difficulty
    servings
    preparation_time
    user_id
    featured_image
    price
    created_at
  }
}"#;

pub const GET_USER: &str = r#"
query GetUser($id: uuid!) {
  users_by_pk(id: $id) {
    id
    username
    full_name
  }
}"#;

pub const STEPS_FOR_RECIPE: &str = r#"
query StepsForRecipe($recipe_id: uuid!) {
  recipe_steps(where: {recipe_id: {_eq: $recipe_id}}, order_by: {step_number: asc}) {
    id
    recipe_id
    step_number
    description
    image_url
  }
}"#;

pub const INGREDIENTS_FOR_RECIPE: &str = r#"
query IngredientsForRecipe($recipe_id: uuid!) {
  recipe_ingredients(where: {recipe_id: {_eq: $recipe_id}}) {
    id
    recipe_id
    ingredient_id
    quantity
    unit
    ingredient {
      name
    }
  }
}"#;

pub const CATEGORY_LINKS_FOR_RECIPE: &str = r#"
query CategoryLinksForRecipe($recipe_id: uuid!) {
  recipe_categories(where: {recipe_id: {_eq: $recipe_id}}) {
    id
    recipe_id
    category_id
  }
}"#;

pub const IMAGES_FOR_RECIPE: &str = r#"
query ImagesForRecipe($recipe_id: uuid!) {
  recipe_images(where: {recipe_id: {_eq: $recipe_id}}) {
    id
    recipe_id
    image_url
    is_featured
  }
}"#;

/// Ingredients and categories are upserted in batch, then the recipe and all
/// of its links are inserted as one nested object. The remote layer runs the
/// whole document in a single transaction.
pub const CREATE_RECIPE: &str = r#"
mutation CreateRecipe($ingredients: [ingredients_insert_input!]!, $categories: [categories_insert_input!]!, $recipe: recipes_insert_input!) {
  insert_ingredients(objects: $ingredients, on_conflict: {constraint: ingredients_pkey, update_columns: []}) {
    affected_rows
  }
  insert_categories(objects: $categories, on_conflict: {constraint: categories_pkey, update_columns: []}) {
    affected_rows
  }
  insert_recipes_one(object: $recipe) {
    id
    title
    description
    difficulty
    servings
    preparation_time
    user_id
    featured_image
    price
    created_at
    recipe_steps(order_by: {step_number: asc}) {
      id
      recipe_id
      step_number
      description
      image_url
    }
    recipe_ingredients {
      id
      recipe_id
      ingredient_id
      quantity
      unit
      ingredient {
        name
      }
    }
    recipe_categories {
      id
      recipe_id
      category_id
      category {
        name
      }
    }
    recipe_images {
      id
      recipe_id
      image_url
      is_featured
    }
  }
}"#;

pub const RECIPE_OWNER: &str = r#"
query RecipeOwner($id: uuid!) {
  recipes_by_pk(id: $id) {
    id
    user_id
  }
}"#;

pub const UPDATE_OWN_RECIPE: &str = r#"
mutation UpdateOwnRecipe($id: uuid!, $user_id: uuid!, $changes: recipes_set_input!) {
  update_recipes(where: {id: {_eq: $id}, user_id: {_eq: $user_id}}, _set: $changes) {
    affected_rows
    returning {
      id
      title
      description
      difficulty
      servings
      preparation_time
      user_id
      featured_image
      price
      created_at
    }
  }
}"#;

pub const DELETE_OWN_RECIPE: &str = r#"
mutation DeleteOwnRecipe($id: uuid!, $user_id: uuid!) {
  delete_recipes(where: {id: {_eq: $id}, user_id: {_eq: $user_id}}) {
    affected_rows
    returning {
      id
      title
      description
      user_id
    }
  }
}"#;

pub const LIKE_RECIPE: &str = r#"
mutation LikeRecipe($recipe_id: uuid!, $user_id: uuid!) {
  insert_recipe_likes(objects: [{recipe_id: $recipe_id, user_id: $user_id}]) {
    affected_rows
  }
}"#;

pub const UNLIKE_RECIPE: &str = r#"
mutation UnlikeRecipe($recipe_id: uuid!, $user_id: uuid!) {
  delete_recipe_likes(where: {recipe_id: {_eq: $recipe_id}, user_id: {_eq: $user_id}}) {
    affected_rows
  }
}"#;

pub const BOOKMARK_RECIPE: &str = r#"
mutation BookmarkRecipe($recipe_id: uuid!, $user_id: uuid!) {
  insert_recipe_bookmarks(objects: [{recipe_id: $recipe_id, user_id: $user_id}]) {
    affected_rows
  }
}"#;

pub const UNBOOKMARK_RECIPE: &str = r#"
mutation UnbookmarkRecipe($recipe_id: uuid!, $user_id: uuid!) {
  delete_recipe_bookmarks(where: {recipe_id: {_eq: $recipe_id}, user_id: {_eq: $user_id}}) {
    affected_rows
  }
}"#;

pub const RATE_RECIPE: &str = r#"
mutation RateRecipe($recipe_id: uuid!, $user_id: uuid!, $rating: Int!) {
  insert_recipe_ratings(objects: [{recipe_id: $recipe_id, user_id: $user_id, rating: $rating}]) {
    affected_rows
  }
}"#;

pub const COMMENT_ON_RECIPE: &str = r#"
mutation CommentOnRecipe($recipe_id: uuid!, $user_id: uuid!, $content: String!) {
  insert_recipe_comments(objects: [{recipe_id: $recipe_id, user_id: $user_id, content: $content}]) {
    affected_rows
  }
}"#;

pub const COMMENTS_FOR_RECIPE: &str = r#"
query CommentsForRecipe($recipe_id: uuid!) {
  recipe_comments(where: {recipe_id: {_eq: $recipe_id}}, order_by: {created_at: desc}) {
    id
    content
    created_at
    user_id
  }
}"#;

pub const COMMENT_AUTHORS: &str = r#"
query CommentAuthors($ids: [uuid!]!) {
  users(where: {id: {_in: $ids}}) {
    id
    full_name
  }
}"#;
