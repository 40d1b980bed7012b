use crate::db::Database;
use crate::error::AppResult;
use crate::models::{render_shopping_list, ShoppingListItem};

pub struct ShoppingListService<'a> {
    db: &'a Database,
}

impl<'a> ShoppingListService<'a> {
    pub fn new(db: &'a Database) -> Self {
        ShoppingListService { db }
    }

    /// Sums ingredient amounts over every recipe in the user's cart,
    /// grouped by ingredient name and unit.
    pub async fn build(&self, user_id: i64) -> AppResult<Vec<ShoppingListItem>> {
        let items = sqlx::query_as::<_, ShoppingListItem>(
            r#"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount
            FROM cart c
            JOIN recipe_ingredient ri ON ri.recipe_id = c.recipe_id
            JOIN ingredient i ON i.id = ri.ingredient_id
            WHERE c.user_id = ?
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(items)
    }

    pub async fn render(&self, user_id: i64) -> AppResult<String> {
        let items = self.build(user_id).await?;
        tracing::debug!("Shopping list for user {} has {} lines", user_id, items.len());
        Ok(render_shopping_list(&items))
    }
}
