pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

use config::Config;
use db::Database;
use services::MediaStorage;

/// Shared application state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub media: MediaStorage,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let media = MediaStorage::from_config(&config);
        AppState { db, config, media }
    }
}
