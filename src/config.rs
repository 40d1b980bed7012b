use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,

    // Auth
    pub secret_key: String,
    pub jwt_expires_in: String,

    // Recipe images
    pub media_root: PathBuf,
    pub media_url: String,
    pub max_image_bytes: usize,

    // Pagination
    pub page_size: i64,
    pub max_page_size: i64,

    pub cors_allow_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite://foodgram.db".to_string(),
            db_max_connections: 10,

            secret_key: "foodgram-insecure-secret-key".to_string(),
            jwt_expires_in: "7d".to_string(),

            media_root: PathBuf::from("media"),
            media_url: "/media".to_string(),
            max_image_bytes: 5 * 1024 * 1024,

            page_size: 6,
            max_page_size: 100,

            cors_allow_origin: "*".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }

        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT: {}", e))?;
        }

        if let Ok(database_url) = env::var("DATABASE_URL") {
            config.database_url = database_url;
        }

        if let Ok(max_connections) = env::var("DB_MAX_CONNECTIONS") {
            config.db_max_connections = max_connections
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid DB_MAX_CONNECTIONS: {}", e))?;
        }

        match env::var("SECRET_KEY") {
            Ok(secret_key) => config.secret_key = secret_key,
            Err(_) => tracing::warn!("SECRET_KEY is not set, using the built-in development key"),
        }

        if let Ok(expires_in) = env::var("JWT_EXPIRES_IN") {
            crate::utils::auth::parse_duration(&expires_in)
                .map_err(|e| anyhow::anyhow!("Invalid JWT_EXPIRES_IN: {}", e))?;
            config.jwt_expires_in = expires_in;
        }

        if let Ok(media_root) = env::var("MEDIA_ROOT") {
            config.media_root = PathBuf::from(media_root);
        }

        if let Ok(media_url) = env::var("MEDIA_URL") {
            config.media_url = media_url.trim_end_matches('/').to_string();
        }

        if let Ok(max_image) = env::var("MAX_IMAGE_BYTES") {
            config.max_image_bytes = max_image
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid MAX_IMAGE_BYTES: {}", e))?;
        }

        if let Ok(page_size) = env::var("PAGE_SIZE") {
            config.page_size = page_size
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PAGE_SIZE: {}", e))?;
        }

        if let Ok(max_page_size) = env::var("MAX_PAGE_SIZE") {
            config.max_page_size = max_page_size
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid MAX_PAGE_SIZE: {}", e))?;
        }

        if config.page_size < 1 || config.max_page_size < config.page_size {
            anyhow::bail!(
                "PAGE_SIZE must be at least 1 and not exceed MAX_PAGE_SIZE ({} > {})",
                config.page_size,
                config.max_page_size
            );
        }

        if let Ok(origin) = env::var("CORS_ALLOW_ORIGIN") {
            config.cors_allow_origin = origin;
        }

        Ok(config)
    }
}
