use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use validator::Validate;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{
    image_url, Recipe, RecipeFilter, RecipeForm, RecipeIngredient, RecipeResponse, User,
    UserResponse,
};
use crate::services::{
    IngredientService, MediaStorage, MembershipService, RecipeList, SubscriptionService,
    TagService, UserService,
};
use crate::utils::time::current_timestamp_seconds;

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.created_at";

pub struct RecipeService<'a> {
    db: &'a Database,
}

impl<'a> RecipeService<'a> {
    pub fn new(db: &'a Database) -> Self {
        RecipeService { db }
    }

    pub async fn get_recipe_by_id(&self, id: i64) -> AppResult<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {} FROM recipe r WHERE r.id = ?",
            RECIPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(recipe)
    }

    /// Field rules plus existence of every referenced tag and ingredient.
    /// Runs before anything is written.
    pub async fn validate_form(&self, form: &RecipeForm) -> AppResult<()> {
        form.validate()?;

        let tag_ids: BTreeSet<i64> = form.tags.iter().copied().collect();
        let found = TagService::new(self.db).count_existing(&tag_ids).await?;
        if found != tag_ids.len() as i64 {
            return Err(AppError::Validation(
                "Recipe references a tag that does not exist".to_string(),
            ));
        }

        let ingredient_ids: BTreeSet<i64> = form.ingredients.iter().map(|i| i.id).collect();
        let found = IngredientService::new(self.db)
            .count_existing(&ingredient_ids)
            .await?;
        if found != ingredient_ids.len() as i64 {
            return Err(AppError::Validation(
                "Recipe references an ingredient that does not exist".to_string(),
            ));
        }

        Ok(())
    }

    /// Persists a recipe together with its tags and ingredient amounts.
    ///
    /// The recipe row and all of its links are written in one transaction.
    /// The image is stored first and removed again if the write fails.
    pub async fn create_recipe(
        &self,
        author_id: i64,
        form: &RecipeForm,
        media: &MediaStorage,
    ) -> AppResult<Recipe> {
        self.validate_form(form).await?;
        let data_url = form
            .image
            .as_deref()
            .filter(|image| !image.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Image is required".to_string()))?;

        let image = media.store_recipe_image(data_url).await?;

        let id = match self.insert_recipe(author_id, form, &image).await {
            Ok(id) => id,
            Err(e) => {
                media.remove(&image).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Created recipe {} ({}) by user {} with {} tags and {} ingredients",
            form.name,
            id,
            author_id,
            form.tags.len(),
            form.ingredients.len()
        );

        self.get_recipe_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create recipe".to_string()))
    }

    async fn insert_recipe(&self, author_id: i64, form: &RecipeForm, image: &str) -> AppResult<i64> {
        let mut tx = self.db.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO recipe (author_id, name, image, text, cooking_time, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(author_id)
        .bind(&form.name)
        .bind(image)
        .bind(&form.text)
        .bind(form.cooking_time)
        .bind(current_timestamp_seconds())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        attach_links(&mut *tx, id, form).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Rewrites a recipe. Tags and ingredient amounts are replaced wholesale;
    /// the stored image is kept unless a new one is supplied.
    pub async fn update_recipe(
        &self,
        recipe: &Recipe,
        form: &RecipeForm,
        media: &MediaStorage,
    ) -> AppResult<Recipe> {
        self.validate_form(form).await?;

        let new_image = match form.image.as_deref().filter(|i| !i.trim().is_empty()) {
            Some(data_url) => Some(media.store_recipe_image(data_url).await?),
            None => None,
        };

        if let Err(e) = self
            .rewrite_recipe(recipe.id, form, new_image.as_deref())
            .await
        {
            if let Some(image) = &new_image {
                media.remove(image).await;
            }
            return Err(e);
        }

        if new_image.is_some() {
            media.remove(&recipe.image).await;
        }

        tracing::info!("Updated recipe {}", recipe.id);

        self.get_recipe_by_id(recipe.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))
    }

    async fn rewrite_recipe(&self, id: i64, form: &RecipeForm, image: Option<&str>) -> AppResult<()> {
        let mut tx = self.db.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE recipe
            SET name = ?, text = ?, cooking_time = ?, image = COALESCE(?, image)
            WHERE id = ?
            "#,
        )
        .bind(&form.name)
        .bind(&form.text)
        .bind(form.cooking_time)
        .bind(image)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe not found".to_string()));
        }

        sqlx::query("DELETE FROM recipe_ingredient WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipe_tag WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        attach_links(&mut *tx, id, form).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes the recipe; links, favorites and cart entries cascade.
    pub async fn delete_recipe(&self, recipe: &Recipe, media: &MediaStorage) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipe WHERE id = ?")
            .bind(recipe.id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe not found".to_string()));
        }

        media.remove(&recipe.image).await;

        tracing::info!("Deleted recipe {}", recipe.id);
        Ok(())
    }

    pub async fn list_recipes(
        &self,
        filter: &RecipeFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Recipe>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM recipe r WHERE 1 = 1", RECIPE_COLUMNS));
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let recipes = builder
            .build_query_as::<Recipe>()
            .fetch_all(&self.db.pool)
            .await?;

        Ok(recipes)
    }

    pub async fn count_recipes(&self, filter: &RecipeFilter) -> AppResult<i64> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM recipe r WHERE 1 = 1");
        push_filter(&mut builder, filter);

        let (count,): (i64,) = builder.build_query_as().fetch_one(&self.db.pool).await?;
        Ok(count)
    }

    /// Ingredient entries in insertion order.
    pub async fn get_recipe_ingredients(&self, recipe_id: i64) -> AppResult<Vec<RecipeIngredient>> {
        let ingredients = sqlx::query_as::<_, RecipeIngredient>(
            r#"
            SELECT i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredient ri
            JOIN ingredient i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ?
            ORDER BY ri.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(ingredients)
    }

    /// An author's recipes, newest first, optionally capped.
    pub async fn recipes_by_author(&self, author_id: i64, limit: Option<i64>) -> AppResult<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {} FROM recipe r
            WHERE r.author_id = ?
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ?
            "#,
            RECIPE_COLUMNS
        ))
        .bind(author_id)
        // SQLite treats a negative LIMIT as no limit
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.db.pool)
        .await?;

        Ok(recipes)
    }

    pub async fn count_by_author(&self, author_id: i64) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipe WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.db.pool)
            .await?;

        Ok(count)
    }

    /// Full read model of a recipe as seen by `viewer`.
    pub async fn to_response(
        &self,
        recipe: Recipe,
        viewer: Option<&User>,
        media_url: &str,
    ) -> AppResult<RecipeResponse> {
        let tags = TagService::new(self.db).get_tags_for_recipe(recipe.id).await?;
        let ingredients = self.get_recipe_ingredients(recipe.id).await?;

        let author = UserService::new(self.db)
            .get_user_by_id(recipe.author_id)
            .await?
            .ok_or_else(|| AppError::Internal("Recipe author is missing".to_string()))?;

        let (is_subscribed, is_favorited, is_in_shopping_cart) = match viewer {
            Some(viewer) => (
                SubscriptionService::new(self.db)
                    .is_subscribed(viewer.id, author.id)
                    .await?,
                MembershipService::new(self.db, RecipeList::Favorite)
                    .contains(viewer.id, recipe.id)
                    .await?,
                MembershipService::new(self.db, RecipeList::ShoppingCart)
                    .contains(viewer.id, recipe.id)
                    .await?,
            ),
            None => (false, false, false),
        };

        Ok(RecipeResponse {
            id: recipe.id,
            tags,
            author: UserResponse::from_user(author, is_subscribed),
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: image_url(media_url, &recipe.image),
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        })
    }
}

/// Tag set (duplicates collapse) and one ingredient row per entry.
async fn attach_links(conn: &mut SqliteConnection, recipe_id: i64, form: &RecipeForm) -> AppResult<()> {
    let tag_ids: BTreeSet<i64> = form.tags.iter().copied().collect();

    let mut tags: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT OR IGNORE INTO recipe_tag (recipe_id, tag_id) ");
    tags.push_values(&tag_ids, |mut row, tag_id| {
        row.push_bind(recipe_id).push_bind(*tag_id);
    });
    tags.build().execute(&mut *conn).await?;

    let mut links: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO recipe_ingredient (recipe_id, ingredient_id, amount) ");
    links.push_values(&form.ingredients, |mut row, entry| {
        row.push_bind(recipe_id)
            .push_bind(entry.id)
            .push_bind(entry.amount);
    });
    links.build().execute(&mut *conn).await?;

    Ok(())
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter) {
    if let Some(author_id) = filter.author_id {
        builder.push(" AND r.author_id = ").push_bind(author_id);
    }

    if !filter.tag_slugs.is_empty() {
        builder.push(
            " AND EXISTS (SELECT 1 FROM recipe_tag rt JOIN tag t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut separated = builder.separated(", ");
        for slug in &filter.tag_slugs {
            separated.push_bind(slug.clone());
        }
        separated.push_unseparated("))");
    }

    if let Some(user_id) = filter.favorited_by {
        builder
            .push(" AND EXISTS (SELECT 1 FROM favorite f WHERE f.recipe_id = r.id AND f.user_id = ")
            .push_bind(user_id)
            .push(")");
    }

    if let Some(user_id) = filter.in_cart_of {
        builder
            .push(" AND EXISTS (SELECT 1 FROM cart c WHERE c.recipe_id = r.id AND c.user_id = ")
            .push_bind(user_id)
            .push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientAmount;
    use crate::test_support::{
        create_ingredient, create_tag, create_user, recipe_form, test_media,
    };

    async fn count_rows(db: &Database, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&db.pool)
            .await
            .unwrap();
        count
    }

    #[actix_web::test]
    async fn test_create_links_every_tag_and_ingredient_entry() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let breakfast = create_tag(&db, "breakfast").await;
        let lunch = create_tag(&db, "lunch").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let milk = create_ingredient(&db, "Milk", "ml").await;

        let form = recipe_form(
            vec![breakfast.id, lunch.id, breakfast.id],
            vec![(salt.id, 5), (milk.id, 200), (salt.id, 3)],
        );
        let recipe = RecipeService::new(&db)
            .create_recipe(author.id, &form, &media)
            .await
            .unwrap();

        assert_eq!(count_rows(&db, "recipe_tag").await, 2);
        let ingredients = RecipeService::new(&db)
            .get_recipe_ingredients(recipe.id)
            .await
            .unwrap();
        let amounts: Vec<_> = ingredients.iter().map(|i| (i.id, i.amount)).collect();
        assert_eq!(amounts, vec![(salt.id, 5), (milk.id, 200), (salt.id, 3)]);
        assert!(media.root().join(&recipe.image).exists());
    }

    #[actix_web::test]
    async fn test_empty_lists_create_nothing() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let tag = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let service = RecipeService::new(&db);

        for form in [
            recipe_form(vec![], vec![(salt.id, 5)]),
            recipe_form(vec![tag.id], vec![]),
        ] {
            assert!(matches!(
                service.create_recipe(author.id, &form, &media).await,
                Err(AppError::Validation(_))
            ));
        }

        assert_eq!(count_rows(&db, "recipe").await, 0);
        assert_eq!(count_rows(&db, "recipe_tag").await, 0);
        assert_eq!(count_rows(&db, "recipe_ingredient").await, 0);
    }

    #[actix_web::test]
    async fn test_unknown_references_are_rejected() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let tag = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let service = RecipeService::new(&db);

        let unknown_tag = recipe_form(vec![tag.id, 999], vec![(salt.id, 5)]);
        let unknown_ingredient = recipe_form(vec![tag.id], vec![(salt.id, 5), (999, 1)]);
        assert!(service.create_recipe(author.id, &unknown_tag, &media).await.is_err());
        assert!(service
            .create_recipe(author.id, &unknown_ingredient, &media)
            .await
            .is_err());
        assert_eq!(count_rows(&db, "recipe").await, 0);
    }

    #[actix_web::test]
    async fn test_cooking_time_boundaries() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let tag = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let service = RecipeService::new(&db);

        for (cooking_time, accepted) in [(0, false), (1, true), (1440, true), (1441, false)] {
            let mut form = recipe_form(vec![tag.id], vec![(salt.id, 5)]);
            form.cooking_time = cooking_time;
            let result = service.create_recipe(author.id, &form, &media).await;
            assert_eq!(result.is_ok(), accepted, "cooking_time = {}", cooking_time);
        }
    }

    #[actix_web::test]
    async fn test_image_required_on_create() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let tag = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;

        let mut form = recipe_form(vec![tag.id], vec![(salt.id, 5)]);
        form.image = None;
        assert!(matches!(
            RecipeService::new(&db).create_recipe(author.id, &form, &media).await,
            Err(AppError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn test_update_replaces_links_and_keeps_image() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let breakfast = create_tag(&db, "breakfast").await;
        let dinner = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let milk = create_ingredient(&db, "Milk", "ml").await;
        let flour = create_ingredient(&db, "Flour", "g").await;
        let service = RecipeService::new(&db);

        let recipe = service
            .create_recipe(
                author.id,
                &recipe_form(vec![breakfast.id], vec![(salt.id, 5), (milk.id, 100)]),
                &media,
            )
            .await
            .unwrap();

        let mut form = recipe_form(vec![dinner.id], vec![(flour.id, 300)]);
        form.image = None;
        form.name = "Bread".to_string();
        let updated = service.update_recipe(&recipe, &form, &media).await.unwrap();

        assert_eq!(updated.name, "Bread");
        assert_eq!(updated.image, recipe.image);

        let ingredients = service.get_recipe_ingredients(recipe.id).await.unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].id, flour.id);

        let tags = TagService::new(&db)
            .get_tags_for_recipe(recipe.id)
            .await
            .unwrap();
        assert_eq!(tags, vec![dinner]);
    }

    #[actix_web::test]
    async fn test_failed_update_rolls_back() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let tag = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let service = RecipeService::new(&db);

        let recipe = service
            .create_recipe(author.id, &recipe_form(vec![tag.id], vec![(salt.id, 5)]), &media)
            .await
            .unwrap();

        // passes form validation but violates the amount CHECK in the store
        let mut form = recipe_form(vec![tag.id], vec![(salt.id, 7)]);
        form.image = None;
        form.ingredients.push(IngredientAmount { id: salt.id, amount: 5000 });
        assert!(service.rewrite_recipe(recipe.id, &form, None).await.is_err());

        let ingredients = service.get_recipe_ingredients(recipe.id).await.unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].amount, 5);
        assert_eq!(count_rows(&db, "recipe_tag").await, 1);
    }

    #[actix_web::test]
    async fn test_filters_and_ordering() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let chef = create_user(&db, "chef").await;
        let cook = create_user(&db, "cook").await;
        let breakfast = create_tag(&db, "breakfast").await;
        let dinner = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let service = RecipeService::new(&db);

        let first = service
            .create_recipe(chef.id, &recipe_form(vec![breakfast.id], vec![(salt.id, 1)]), &media)
            .await
            .unwrap();
        let second = service
            .create_recipe(cook.id, &recipe_form(vec![dinner.id], vec![(salt.id, 1)]), &media)
            .await
            .unwrap();
        let third = service
            .create_recipe(chef.id, &recipe_form(vec![dinner.id], vec![(salt.id, 1)]), &media)
            .await
            .unwrap();

        let ids = |recipes: Vec<Recipe>| recipes.into_iter().map(|r| r.id).collect::<Vec<_>>();

        let all = service.list_recipes(&RecipeFilter::default(), 0, 10).await.unwrap();
        assert_eq!(ids(all), vec![third.id, second.id, first.id]);

        let by_chef = RecipeFilter {
            author_id: Some(chef.id),
            ..Default::default()
        };
        assert_eq!(service.count_recipes(&by_chef).await.unwrap(), 2);

        let tagged = RecipeFilter {
            tag_slugs: vec!["breakfast".to_string(), "dinner".to_string()],
            ..Default::default()
        };
        assert_eq!(service.count_recipes(&tagged).await.unwrap(), 3);

        let dinner_by_chef = RecipeFilter {
            author_id: Some(chef.id),
            tag_slugs: vec!["dinner".to_string()],
            ..Default::default()
        };
        assert_eq!(
            ids(service.list_recipes(&dinner_by_chef, 0, 10).await.unwrap()),
            vec![third.id]
        );

        MembershipService::new(&db, RecipeList::Favorite)
            .add(cook.id, first.id)
            .await
            .unwrap();
        let favorited = RecipeFilter {
            favorited_by: Some(cook.id),
            ..Default::default()
        };
        assert_eq!(
            ids(service.list_recipes(&favorited, 0, 10).await.unwrap()),
            vec![first.id]
        );

        let in_cart = RecipeFilter {
            in_cart_of: Some(cook.id),
            ..Default::default()
        };
        assert_eq!(service.count_recipes(&in_cart).await.unwrap(), 0);

        assert_eq!(
            ids(service.list_recipes(&RecipeFilter::default(), 1, 1).await.unwrap()),
            vec![second.id]
        );
    }

    #[actix_web::test]
    async fn test_delete_cascades() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let tag = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let service = RecipeService::new(&db);

        let recipe = service
            .create_recipe(author.id, &recipe_form(vec![tag.id], vec![(salt.id, 5)]), &media)
            .await
            .unwrap();
        MembershipService::new(&db, RecipeList::ShoppingCart)
            .add(author.id, recipe.id)
            .await
            .unwrap();

        service.delete_recipe(&recipe, &media).await.unwrap();

        assert_eq!(count_rows(&db, "recipe_ingredient").await, 0);
        assert_eq!(count_rows(&db, "recipe_tag").await, 0);
        assert_eq!(count_rows(&db, "cart").await, 0);
        assert!(!media.root().join(&recipe.image).exists());
    }

    #[actix_web::test]
    async fn test_response_flags_follow_the_viewer() {
        let db = Database::in_memory().await.unwrap();
        let (_dir, media) = test_media();
        let author = create_user(&db, "chef").await;
        let reader = create_user(&db, "reader").await;
        let tag = create_tag(&db, "dinner").await;
        let salt = create_ingredient(&db, "Salt", "g").await;
        let service = RecipeService::new(&db);

        let recipe = service
            .create_recipe(author.id, &recipe_form(vec![tag.id], vec![(salt.id, 5)]), &media)
            .await
            .unwrap();
        MembershipService::new(&db, RecipeList::Favorite)
            .add(reader.id, recipe.id)
            .await
            .unwrap();
        SubscriptionService::new(&db)
            .subscribe(reader.id, author.id)
            .await
            .unwrap();

        let seen = service
            .to_response(recipe.clone(), Some(&reader), "/media")
            .await
            .unwrap();
        assert!(seen.is_favorited);
        assert!(!seen.is_in_shopping_cart);
        assert!(seen.author.is_subscribed);
        assert!(seen.image.starts_with("/media/recipes/images/"));

        let anonymous = service.to_response(recipe, None, "/media").await.unwrap();
        assert!(!anonymous.is_favorited);
        assert!(!anonymous.author.is_subscribed);
    }
}
