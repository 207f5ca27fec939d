pub mod app_config;
pub mod database;
pub mod taxonomy;

pub use app_config::{AppConfig, ConfigError};
pub use database::establish_connection;
pub use taxonomy::{TaxonomyLoadError, TaxonomySet};
