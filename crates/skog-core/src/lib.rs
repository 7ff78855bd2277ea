pub mod app_config;
pub mod config;
pub mod products;
pub mod run;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Confidence, Measure, Product, ProductMetadata, ScrapedRecord};
pub use run::ScrapeSummary;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
