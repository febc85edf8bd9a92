//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{assistant, catalog};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Relaxed validation, catalog problems are logged and skipped
    #[default]
    Development,
    Staging,
    /// All validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Conversational behaviour
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Where products come from
    #[serde(default)]
    pub catalog: CatalogSourceConfig,
}

/// Assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Display name of the assistant
    #[serde(default = "default_name")]
    pub name: String,

    /// First bot message of every session
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Simulated typing delay before each bot response
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,

    /// Re-fetch the catalog before every turn instead of once
    #[serde(default = "default_refresh_catalog")]
    pub refresh_catalog_each_turn: bool,
}

fn default_name() -> String {
    assistant::DEFAULT_NAME.to_string()
}

fn default_greeting() -> String {
    assistant::INITIAL_GREETING.to_string()
}

fn default_typing_delay_ms() -> u64 {
    assistant::DEFAULT_TYPING_DELAY_MS
}

fn default_refresh_catalog() -> bool {
    true
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            greeting: default_greeting(),
            typing_delay_ms: default_typing_delay_ms(),
            refresh_catalog_each_turn: default_refresh_catalog(),
        }
    }
}

/// Catalog source configuration
///
/// Without a path the built-in demo catalog is served.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogSourceConfig {
    /// YAML or JSON catalog file
    #[serde(default)]
    pub path: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_assistant()?;
        self.validate_catalog()?;
        Ok(())
    }

    fn validate_assistant(&self) -> Result<(), ConfigError> {
        if self.assistant.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "assistant.name".to_string(),
                message: "Assistant name must not be empty".to_string(),
            });
        }

        if self.assistant.typing_delay_ms > assistant::MAX_TYPING_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "assistant.typing_delay_ms".to_string(),
                message: format!(
                    "Typing delay too high (maximum {}ms), got {}",
                    assistant::MAX_TYPING_DELAY_MS,
                    self.assistant.typing_delay_ms
                ),
            });
        }

        Ok(())
    }

    fn validate_catalog(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.catalog.path else {
            return Ok(());
        };

        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension {
            Some(ext) if catalog::SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "catalog.path".to_string(),
                    message: format!(
                        "Unsupported catalog file '{}' (expected one of: {})",
                        path,
                        catalog::SUPPORTED_EXTENSIONS.join(", ")
                    ),
                });
            }
        }

        if self.environment.is_strict() && !Path::new(path).exists() {
            return Err(ConfigError::FileNotFound(path.clone()));
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Layers, later wins: `config/default`, `config/{env}`, then
/// `SHOP_ASSISTANT__SECTION__KEY` environment variables.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("SHOP_ASSISTANT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::info!(
        environment = ?settings.environment,
        catalog = settings.catalog.path.as_deref().unwrap_or("demo"),
        "Loaded settings"
    );

    Ok(settings)
}
