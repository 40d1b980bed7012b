//! Fixtures shared by the unit tests.

use actix_web::web;
use tempfile::TempDir;

use crate::config::Config;
use crate::db::Database;
use crate::models::{
    CreateUserRequest, Ingredient, IngredientAmount, IngredientForm, Recipe, RecipeForm, Tag,
    TagForm, User,
};
use crate::services::{IngredientService, MediaStorage, TagService, UserService};
use crate::utils::auth::create_jwt;
use crate::utils::time::current_timestamp_seconds;
use crate::AppState;

pub const TEST_PASSWORD: &str = "Str0ng-pass!";

/// 1x1 transparent PNG.
pub const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn signup_form(username: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: format!("{}@example.com", username),
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password: TEST_PASSWORD.to_string(),
    }
}

/// Registers a user; the first one created in a database is an admin.
pub async fn create_user(db: &Database, username: &str) -> User {
    UserService::new(db)
        .create_user(&signup_form(username))
        .await
        .unwrap()
}

pub async fn create_tag(db: &Database, slug: &str) -> Tag {
    let service = TagService::new(db);
    let taken = service.list_tags().await.unwrap().len() as u32;

    service
        .create_tag(&TagForm {
            name: slug.to_uppercase(),
            color: format!("#{:06X}", 0x10_2030 + taken * 0x0101),
            slug: slug.to_string(),
        })
        .await
        .unwrap()
}

pub async fn create_ingredient(db: &Database, name: &str, unit: &str) -> Ingredient {
    IngredientService::new(db)
        .create_ingredient(&IngredientForm {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        })
        .await
        .unwrap()
}

/// Writes a recipe row and its ingredient links straight to the store.
/// Ingredients are created on first use.
pub async fn create_recipe(db: &Database, author: &User, ingredients: &[(&str, &str, i64)]) -> Recipe {
    let recipe_id = sqlx::query(
        "INSERT INTO recipe (author_id, name, image, text, cooking_time, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(author.id)
    .bind("Test recipe")
    .bind("recipes/images/test.png")
    .bind("Mix and serve")
    .bind(15)
    .bind(current_timestamp_seconds())
    .execute(&db.pool)
    .await
    .unwrap()
    .last_insert_rowid();

    for (name, unit, amount) in ingredients {
        sqlx::query("INSERT OR IGNORE INTO ingredient (name, measurement_unit) VALUES (?, ?)")
            .bind(*name)
            .bind(*unit)
            .execute(&db.pool)
            .await
            .unwrap();
        let (ingredient_id,): (i64,) =
            sqlx::query_as("SELECT id FROM ingredient WHERE name = ? AND measurement_unit = ?")
                .bind(*name)
                .bind(*unit)
                .fetch_one(&db.pool)
                .await
                .unwrap();

        sqlx::query("INSERT INTO recipe_ingredient (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(ingredient_id)
            .bind(*amount)
            .execute(&db.pool)
            .await
            .unwrap();
    }

    sqlx::query_as::<_, Recipe>(
        "SELECT id, author_id, name, image, text, cooking_time, created_at FROM recipe WHERE id = ?",
    )
    .bind(recipe_id)
    .fetch_one(&db.pool)
    .await
    .unwrap()
}

pub fn recipe_form(tags: Vec<i64>, ingredients: Vec<(i64, i64)>) -> RecipeForm {
    RecipeForm {
        name: "Pancakes".to_string(),
        text: "Whisk everything and fry".to_string(),
        cooking_time: 20,
        image: Some(PNG_DATA_URL.to_string()),
        tags,
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}

pub fn test_media() -> (TempDir, MediaStorage) {
    let dir = tempfile::tempdir().unwrap();
    let media = MediaStorage::new(dir.path(), 1024 * 1024);
    (dir, media)
}

/// App state over an in-memory database, with media in a temp directory.
pub async fn test_state() -> (web::Data<AppState>, TempDir) {
    let db = Database::in_memory().await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let config = Config {
        secret_key: "test-secret".to_string(),
        media_root: dir.path().to_path_buf(),
        ..Config::default()
    };

    (web::Data::new(AppState::new(db, config)), dir)
}

pub fn token_for(state: &AppState, user: &User) -> String {
    create_jwt(user.id, &state.config.secret_key, &state.config.jwt_expires_in).unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
