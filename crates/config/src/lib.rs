//! Configuration management for the shop assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files under `config/`
//! - Environment variables (SHOP_ASSISTANT__ prefix)
//!
//! Product catalogs are either the built-in demo catalog or a YAML/JSON
//! file named by `catalog.path`.

pub mod catalog;
pub mod constants;
pub mod settings;

pub use catalog::{
    demo_catalog, load_catalog_str, parse_catalog, validate_products, CatalogFormat,
};
pub use settings::{
    load_settings, AssistantConfig, CatalogSourceConfig, RuntimeEnvironment, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
