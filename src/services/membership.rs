use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::Recipe;

/// The two per-user recipe lists. Both share one table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorite,
    ShoppingCart,
}

impl RecipeList {
    fn table(self) -> &'static str {
        match self {
            RecipeList::Favorite => "favorite",
            RecipeList::ShoppingCart => "cart",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RecipeList::Favorite => "favorites",
            RecipeList::ShoppingCart => "shopping cart",
        }
    }
}

pub struct MembershipService<'a> {
    db: &'a Database,
    list: RecipeList,
}

impl<'a> MembershipService<'a> {
    pub fn new(db: &'a Database, list: RecipeList) -> Self {
        MembershipService { db, list }
    }

    /// Puts a recipe on the user's list and returns it.
    pub async fn add(&self, user_id: i64, recipe_id: i64) -> AppResult<Recipe> {
        let mut tx = self.db.pool.begin().await?;

        let recipe = sqlx::query_as::<_, Recipe>(
            "SELECT id, author_id, name, image, text, cooking_time, created_at FROM recipe WHERE id = ?",
        )
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;

        let exists: Option<(i64,)> = sqlx::query_as(&format!(
            "SELECT id FROM {} WHERE user_id = ? AND recipe_id = ?",
            self.list.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_some() {
            return Err(self.duplicate());
        }

        sqlx::query(&format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES (?, ?)",
            self.list.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => self.duplicate(),
            other => other,
        })?;

        tx.commit().await?;

        tracing::debug!(
            "User {} added recipe {} to {}",
            user_id,
            recipe_id,
            self.list.label()
        );
        Ok(recipe)
    }

    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> AppResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = ? AND recipe_id = ?",
            self.list.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Recipe is not in {}",
                self.list.label()
            )));
        }

        tracing::debug!(
            "User {} removed recipe {} from {}",
            user_id,
            recipe_id,
            self.list.label()
        );
        Ok(())
    }

    pub async fn contains(&self, user_id: i64, recipe_id: i64) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = ? AND recipe_id = ?)",
            self.list.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.db.pool)
        .await?;

        Ok(exists)
    }

    fn duplicate(&self) -> AppError {
        AppError::Conflict(format!("Recipe is already in {}", self.list.label()))
    }
}
