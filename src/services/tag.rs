use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite};
use validator::Validate;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Tag, TagForm};

pub struct TagService<'a> {
    db: &'a Database,
}

impl<'a> TagService<'a> {
    pub fn new(db: &'a Database) -> Self {
        TagService { db }
    }

    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tag ORDER BY id")
            .fetch_all(&self.db.pool)
            .await?;

        Ok(tags)
    }

    pub async fn get_tag_by_id(&self, id: i64) -> AppResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tag WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;

        Ok(tag)
    }

    pub async fn create_tag(&self, form: &TagForm) -> AppResult<Tag> {
        form.validate()?;

        let id = sqlx::query("INSERT INTO tag (name, color, slug) VALUES (?, ?, ?)")
            .bind(&form.name)
            .bind(&form.color)
            .bind(&form.slug)
            .execute(&self.db.pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict(
                    "A tag with this name, color or slug already exists".to_string(),
                ),
                other => other,
            })?
            .last_insert_rowid();

        tracing::info!("Created tag {} ({})", form.slug, id);

        self.get_tag_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create tag".to_string()))
    }

    pub async fn get_tags_for_recipe(&self, recipe_id: i64) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.color, t.slug
            FROM tag t
            JOIN recipe_tag rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = ?
            ORDER BY t.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db.pool)
        .await?;

        Ok(tags)
    }

    /// How many of `ids` refer to existing tags.
    pub async fn count_existing(&self, ids: &BTreeSet<i64>) -> AppResult<i64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM tag WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let (count,): (i64,) = builder.build_query_as().fetch_one(&self.db.pool).await?;
        Ok(count)
    }
}
