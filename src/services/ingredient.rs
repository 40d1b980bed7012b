use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite};
use validator::Validate;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Ingredient, IngredientForm};

/// SQLite caps bound parameters per statement; two binds per row.
const IMPORT_CHUNK_SIZE: usize = 400;

pub struct IngredientService<'a> {
    db: &'a Database,
}

impl<'a> IngredientService<'a> {
    pub fn new(db: &'a Database) -> Self {
        IngredientService { db }
    }

    /// Catalogue ordered by name, optionally narrowed to a name prefix.
    ///
    /// SQLite's LIKE only folds ASCII, so the prefix match is done here to
    /// stay case-insensitive for non-latin names.
    pub async fn list_ingredients(&self, name_prefix: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredient ORDER BY name, id",
        )
        .fetch_all(&self.db.pool)
        .await?;

        let prefix = name_prefix.map(|p| p.trim().to_lowercase());
        let filtered = match prefix {
            Some(prefix) if !prefix.is_empty() => ingredients
                .into_iter()
                .filter(|ingredient| ingredient.name.to_lowercase().starts_with(&prefix))
                .collect(),
            _ => ingredients,
        };

        Ok(filtered)
    }

    pub async fn get_ingredient_by_id(&self, id: i64) -> AppResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, measurement_unit FROM ingredient WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(ingredient)
    }

    pub async fn create_ingredient(&self, form: &IngredientForm) -> AppResult<Ingredient> {
        form.validate()?;

        let id = sqlx::query("INSERT INTO ingredient (name, measurement_unit) VALUES (?, ?)")
            .bind(form.name.trim())
            .bind(form.measurement_unit.trim())
            .execute(&self.db.pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict("Such ingredient already exists".to_string())
                }
                other => other,
            })?
            .last_insert_rowid();

        tracing::info!("Created ingredient {} ({})", form.name, id);

        self.get_ingredient_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create ingredient".to_string()))
    }

    /// How many of `ids` refer to existing ingredients.
    pub async fn count_existing(&self, ids: &BTreeSet<i64>) -> AppResult<i64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM ingredient WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let (count,): (i64,) = builder.build_query_as().fetch_one(&self.db.pool).await?;
        Ok(count)
    }

    /// Inserts catalogue entries in one transaction, skipping pairs that
    /// already exist. Returns the number of new rows.
    pub async fn bulk_insert(&self, entries: &[IngredientForm]) -> AppResult<u64> {
        let mut tx = self.db.pool.begin().await?;
        let mut inserted = 0;

        for chunk in entries.chunks(IMPORT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT OR IGNORE INTO ingredient (name, measurement_unit) ");
            builder.push_values(chunk, |mut row, entry| {
                row.push_bind(entry.name.trim())
                    .push_bind(entry.measurement_unit.trim());
            });

            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;

        tracing::info!(
            "Imported {} of {} ingredients",
            inserted,
            entries.len()
        );
        Ok(inserted)
    }
}

/// Reads `name,measurement_unit` rows. The first line is a header.
pub fn parse_ingredients_csv(content: &str) -> AppResult<Vec<IngredientForm>> {
    let mut entries = Vec::new();

    for (idx, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = split_csv_line(line);
        match fields.as_slice() {
            [name, unit] => entries.push(IngredientForm {
                name: name.clone(),
                measurement_unit: unit.clone(),
            }),
            _ => {
                return Err(AppError::Validation(format!(
                    "Line {}: expected 2 columns, found {}",
                    idx + 1,
                    fields.len()
                )))
            }
        }
    }

    validate_entries(&entries)?;
    Ok(entries)
}

/// Reads a JSON array of `{name, measurement_unit}` objects.
pub fn parse_ingredients_json(content: &str) -> AppResult<Vec<IngredientForm>> {
    let entries: Vec<IngredientForm> = serde_json::from_str(content)
        .map_err(|e| AppError::Validation(format!("Invalid ingredient JSON: {}", e)))?;

    validate_entries(&entries)?;
    Ok(entries)
}

fn validate_entries(entries: &[IngredientForm]) -> AppResult<()> {
    for (idx, entry) in entries.iter().enumerate() {
        entry
            .validate()
            .map_err(|e| AppError::Validation(format!("Entry {}: {}", idx + 1, e)))?;
    }
    Ok(())
}

// Comma separated fields; double quotes group a field and `""` escapes a quote.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
