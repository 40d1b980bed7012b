//! Loads the ingredient catalogue from a CSV (`name,measurement_unit` with a
//! header line) or JSON file.
//!
//! Usage: `import_ingredients <file>`

use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use foodgram_backend::{
    config::Config,
    db::Database,
    services::ingredient::{parse_ingredients_csv, parse_ingredients_json, IngredientService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = std::env::args()
        .nth(1)
        .context("usage: import_ingredients <file.csv|file.json>")?;
    let path = Path::new(&path);

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let entries = if is_json {
        parse_ingredients_json(&content)?
    } else {
        parse_ingredients_csv(&content)?
    };
    info!("Read {} ingredients from {}", entries.len(), path.display());

    let config = Config::from_env()?;
    let db = Database::new(&config.database_url, 1).await?;

    let result = async {
        db.run_migrations().await?;
        let inserted = IngredientService::new(&db).bulk_insert(&entries).await?;
        anyhow::Ok(inserted)
    }
    .await;

    db.close().await;

    let inserted = result?;
    info!(
        "Imported {} new ingredients, {} already present",
        inserted,
        entries.len() as u64 - inserted
    );
    Ok(())
}
