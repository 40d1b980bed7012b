use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{RecipeSummary, SubscriptionResponse, User};
use crate::services::{RecipeService, UserService};
use crate::utils::time::current_timestamp_seconds;

pub struct SubscriptionService<'a> {
    db: &'a Database,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        SubscriptionService { db }
    }

    /// Follows `author_id` and returns the author.
    pub async fn subscribe(&self, user_id: i64, author_id: i64) -> AppResult<User> {
        if user_id == author_id {
            return Err(AppError::Validation(
                "You cannot subscribe to yourself".to_string(),
            ));
        }

        let author = UserService::new(self.db)
            .get_user_by_id(author_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut tx = self.db.pool.begin().await?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM subscription WHERE user_id = ? AND author_id = ?")
                .bind(user_id)
                .bind(author_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_some() {
            return Err(already_subscribed());
        }

        sqlx::query("INSERT INTO subscription (user_id, author_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(author_id)
            .bind(current_timestamp_seconds())
            .execute(&mut *tx)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => already_subscribed(),
                other => other,
            })?;

        tx.commit().await?;

        tracing::info!("User {} subscribed to {}", user_id, author_id);
        Ok(author)
    }

    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> AppResult<()> {
        if UserService::new(self.db)
            .get_user_by_id(author_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let result = sqlx::query("DELETE FROM subscription WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::BadRequest(
                "You are not subscribed to this user".to_string(),
            ));
        }

        tracing::info!("User {} unsubscribed from {}", user_id, author_id);
        Ok(())
    }

    pub async fn is_subscribed(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM subscription WHERE user_id = ? AND author_id = ?)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.db.pool)
        .await?;

        Ok(exists)
    }

    /// Followed authors in the order they were followed.
    pub async fn list_authors(&self, user_id: i64, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        let authors = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.role, u.created_at
            FROM subscription s
            JOIN "user" u ON u.id = s.author_id
            WHERE s.user_id = ?
            ORDER BY s.id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(authors)
    }

    pub async fn count_subscriptions(&self, user_id: i64) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscription WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.db.pool)
            .await?;

        Ok(count)
    }

    /// Author profile with their newest recipes, capped by `recipes_limit`.
    pub async fn build_payload(
        &self,
        author: User,
        recipes_limit: Option<i64>,
        media_url: &str,
    ) -> AppResult<SubscriptionResponse> {
        if matches!(recipes_limit, Some(limit) if limit < 0) {
            return Err(AppError::Validation(
                "recipes_limit must not be negative".to_string(),
            ));
        }

        let recipe_service = RecipeService::new(self.db);
        let recipes = recipe_service
            .recipes_by_author(author.id, recipes_limit)
            .await?
            .iter()
            .map(|recipe| RecipeSummary::from_recipe(recipe, media_url))
            .collect();
        let recipes_count = recipe_service.count_by_author(author.id).await?;

        Ok(SubscriptionResponse::new(author, recipes, recipes_count))
    }
}

fn already_subscribed() -> AppError {
    AppError::Conflict("You are already subscribed to this user".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_recipe, create_user};

    #[actix_web::test]
    async fn test_self_subscription_always_fails() {
        let db = Database::in_memory().await.unwrap();
        let user = create_user(&db, "chef").await;
        let other = create_user(&db, "other").await;
        let service = SubscriptionService::new(&db);

        assert!(matches!(
            service.subscribe(user.id, user.id).await,
            Err(AppError::Validation(_))
        ));

        service.subscribe(other.id, user.id).await.unwrap();
        assert!(matches!(
            service.subscribe(user.id, user.id).await,
            Err(AppError::Validation(_))
        ));
        // no user with this id either
        assert!(matches!(
            service.subscribe(404, 404).await,
            Err(AppError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn test_subscribe_twice_and_unsubscribe() {
        let db = Database::in_memory().await.unwrap();
        let user = create_user(&db, "reader").await;
        let author = create_user(&db, "chef").await;
        let service = SubscriptionService::new(&db);

        let followed = service.subscribe(user.id, author.id).await.unwrap();
        assert_eq!(followed.id, author.id);
        assert!(service.is_subscribed(user.id, author.id).await.unwrap());
        assert!(!service.is_subscribed(author.id, user.id).await.unwrap());

        assert!(matches!(
            service.subscribe(user.id, author.id).await,
            Err(AppError::Conflict(_))
        ));

        service.unsubscribe(user.id, author.id).await.unwrap();
        assert!(matches!(
            service.unsubscribe(user.id, author.id).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.unsubscribe(user.id, 404).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_list_is_stable_and_paged() {
        let db = Database::in_memory().await.unwrap();
        let user = create_user(&db, "reader").await;
        let zed = create_user(&db, "zed").await;
        let amy = create_user(&db, "amy").await;
        let bob = create_user(&db, "bob").await;
        let service = SubscriptionService::new(&db);

        for author in [&zed, &amy, &bob] {
            service.subscribe(user.id, author.id).await.unwrap();
        }

        assert_eq!(service.count_subscriptions(user.id).await.unwrap(), 3);
        let page: Vec<_> = service
            .list_authors(user.id, 1, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(page, vec!["amy", "bob"]);
    }

    #[actix_web::test]
    async fn test_payload_caps_recipes() {
        let db = Database::in_memory().await.unwrap();
        let author = create_user(&db, "chef").await;
        for _ in 0..3 {
            create_recipe(&db, &author, &[("Salt", "g", 1)]).await;
        }
        let service = SubscriptionService::new(&db);

        let capped = service
            .build_payload(author.clone(), Some(2), "/media")
            .await
            .unwrap();
        assert_eq!(capped.recipes.len(), 2);
        assert_eq!(capped.recipes_count, 3);
        assert!(capped.is_subscribed);

        let full = service.build_payload(author.clone(), None, "/media").await.unwrap();
        assert_eq!(full.recipes.len(), 3);

        let empty = service.build_payload(author.clone(), Some(0), "/media").await.unwrap();
        assert!(empty.recipes.is_empty());

        assert!(service.build_payload(author, Some(-1), "/media").await.is_err());
    }
}
