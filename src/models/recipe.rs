use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::{Tag, UserResponse};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    /// Path of the stored image relative to the media root
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub created_at: i64,
}

/// One ingredient link of a recipe joined with its catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct IngredientAmount {
    pub id: i64,

    #[validate(range(min = 1, max = 1000, message = "Amount must be between 1 and 1000"))]
    pub amount: i64,
}

/// Input of the recipe writer, shared by create and update.
///
/// Ingredient entries are kept in request order and never merged, so the
/// same ingredient id may appear more than once.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub text: String,

    #[validate(range(min = 1, max = 1440, message = "Cooking time must be between 1 and 1440 minutes"))]
    pub cooking_time: i64,

    /// Base64 data URL; required on create, optional on update
    #[serde(default)]
    pub image: Option<String>,

    #[validate(length(min = 1, message = "At least one tag is required"))]
    #[serde(default)]
    pub tags: Vec<i64>,

    #[validate(length(min = 1, message = "At least one ingredient is required"), nested)]
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Short form used by favorites, cart and subscription payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl RecipeSummary {
    pub fn from_recipe(recipe: &Recipe, media_url: &str) -> Self {
        RecipeSummary {
            id: recipe.id,
            name: recipe.name.clone(),
            image: image_url(media_url, &recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

pub fn image_url(media_url: &str, image: &str) -> String {
    format!("{}/{}", media_url.trim_end_matches('/'), image)
}

/// Recipe list filters; membership filters only apply to a known viewer.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author_id: Option<i64>,
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<i64>,
    pub in_cart_of: Option<i64>,
}
