//! Storefront Shop Assistant
//!
//! Features:
//! - Ordered keyword intent classification
//! - Product and category entity resolution
//! - Four-step guided recommendation dialogue
//! - Budget-filtered product scoring and tiering
//! - Catalog repository with explicit load state
//! - Async assistant facade with typing/response events

pub mod assistant;
pub mod catalog;
pub mod dialogue;
pub mod entity;
pub mod formatter;
pub mod intent;
pub mod scoring;
pub mod session;

pub use assistant::{AssistantEvent, ShopAssistant};
pub use catalog::{CatalogRepository, CatalogSnapshot, CatalogState, FileCatalog, StaticCatalog};
pub use dialogue::{FlowTransition, RecommendationFlow, RecommendationStep};
pub use entity::{MatchKind, ProductMatch};
pub use intent::{ClassifierContext, DetectedIntent, Intent, IntentClassifier, SmallTalkTopic};
pub use scoring::get_recommendations;
pub use session::ConversationSession;

use shop_assistant_config::ConfigError;
use thiserror::Error;

/// Agent errors
///
/// Conversation handling itself never fails; this only arises while
/// wiring the assistant to its settings and catalog source.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
