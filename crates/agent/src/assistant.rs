//! Shop Assistant
//!
//! Async facade over one [`ConversationSession`]. Turns are serialized:
//! the session lock is held for the whole turn, including the catalog
//! fetch and the typing delay, so a second utterance is handled only
//! after the first one's replies are in the transcript.

use std::sync::Arc;
use std::time::Duration;

use shop_assistant_config::constants::assistant::EVENT_CHANNEL_CAPACITY;
use shop_assistant_config::{demo_catalog, AssistantConfig, Settings};
use shop_assistant_core::{Category, CatalogProvider, ConversationMessage, ProductCategory};
use tokio::sync::{broadcast, Mutex};

use crate::catalog::{CatalogRepository, CatalogSnapshot, FileCatalog, StaticCatalog};
use crate::session::ConversationSession;
use crate::AgentError;

/// Assistant event
#[derive(Debug, Clone)]
pub enum AssistantEvent {
    /// A turn is being processed
    Typing { session_id: String },
    /// Bot reply appended to the transcript
    Response(ConversationMessage),
    /// Customer picked a category
    CategorySelected(ProductCategory),
    /// Conversation restarted under a new session id
    SessionReset { session_id: String },
}

/// Storefront chat assistant
pub struct ShopAssistant {
    config: AssistantConfig,
    catalog: Arc<CatalogRepository>,
    session: Mutex<ConversationSession>,
    event_tx: broadcast::Sender<AssistantEvent>,
}

impl ShopAssistant {
    pub fn new(config: AssistantConfig, provider: Arc<dyn CatalogProvider>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = ConversationSession::new(config.greeting.clone());

        tracing::info!(
            name = %config.name,
            provider = provider.name(),
            session_id = %session.id(),
            "Shop assistant created"
        );

        Self {
            catalog: Arc::new(CatalogRepository::new(provider)),
            session: Mutex::new(session),
            config,
            event_tx,
        }
    }

    /// Build from settings: a catalog file when configured, else the demo catalog
    pub fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        settings.validate()?;

        let provider: Arc<dyn CatalogProvider> = match &settings.catalog.path {
            Some(path) => Arc::new(FileCatalog::new(path, settings.environment.is_strict())?),
            None => Arc::new(StaticCatalog::new(demo_catalog())),
        };

        Ok(Self::new(settings.assistant.clone(), provider))
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<CatalogRepository> {
        &self.catalog
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.event_tx.subscribe()
    }

    pub async fn session_id(&self) -> String {
        self.session.lock().await.id().to_string()
    }

    /// Full transcript, oldest first
    pub async fn transcript(&self) -> Vec<ConversationMessage> {
        self.session.lock().await.transcript().to_vec()
    }

    pub async fn selected_category(&self) -> Option<ProductCategory> {
        self.session.lock().await.selected_category()
    }

    pub async fn in_recommendation_flow(&self) -> bool {
        self.session.lock().await.in_recommendation_flow()
    }

    /// Categories for the category picker
    pub async fn categories(&self) -> Vec<Category> {
        self.catalog.categories().await
    }

    async fn current_catalog(&self) -> Arc<CatalogSnapshot> {
        if self.config.refresh_catalog_each_turn {
            self.catalog.refresh().await
        } else {
            self.catalog.ensure_loaded().await
        }
    }

    /// Handle one customer utterance and return the bot replies
    ///
    /// Blank input is ignored. Never fails: catalog trouble shows up as a
    /// "no products available" reply.
    pub async fn process(&self, text: &str) -> Vec<ConversationMessage> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut session = self.session.lock().await;
        let _ = self.event_tx.send(AssistantEvent::Typing {
            session_id: session.id().to_string(),
        });

        let catalog = self.current_catalog().await;

        if self.config.typing_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.typing_delay_ms)).await;
        }

        let replies = session.handle_utterance(text, &catalog);
        for reply in &replies {
            let _ = self.event_tx.send(AssistantEvent::Response(reply.clone()));
        }
        replies
    }

    /// Select a category and return its greeting
    pub async fn select_category(&self, category: ProductCategory) -> ConversationMessage {
        let mut session = self.session.lock().await;
        let greeting = session.select_category(category);
        let _ = self.event_tx.send(AssistantEvent::CategorySelected(category));
        let _ = self.event_tx.send(AssistantEvent::Response(greeting.clone()));
        greeting
    }

    /// Start over with a fresh session; returns the initial greeting
    pub async fn start_over(&self) -> ConversationMessage {
        let mut session = self.session.lock().await;
        let greeting = session.reset();
        let _ = self.event_tx.send(AssistantEvent::SessionReset {
            session_id: session.id().to_string(),
        });
        greeting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_assistant_config::CatalogSourceConfig;

    fn assistant() -> ShopAssistant {
        ShopAssistant::new(
            AssistantConfig::default(),
            Arc::new(StaticCatalog::new(demo_catalog())),
        )
    }

    #[tokio::test]
    async fn test_initial_transcript() {
        let assistant = assistant();
        let transcript = assistant.transcript().await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].text, assistant.config().greeting);
        assert!(transcript[0].is_from_bot());
    }

    #[tokio::test]
    async fn test_process_emits_events() {
        let assistant = assistant();
        let mut rx = assistant.subscribe();

        let replies = assistant.process("how much is the ProBook X5").await;
        assert_eq!(replies.len(), 1);

        assert!(matches!(rx.recv().await, Ok(AssistantEvent::Typing { .. })));
        match rx.recv().await {
            Ok(AssistantEvent::Response(message)) => assert!(message.text.contains("$1299.99")),
            other => panic!("expected response event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_input_emits_nothing() {
        let assistant = assistant();
        let mut rx = assistant.subscribe();
        assert!(assistant.process("  \n").await.is_empty());
        assert!(rx.try_recv().is_err());
        assert_eq!(assistant.transcript().await.len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_cached_when_refresh_disabled() {
        let config = AssistantConfig {
            refresh_catalog_each_turn: false,
            ..AssistantConfig::default()
        };
        let assistant = ShopAssistant::new(config, Arc::new(StaticCatalog::new(demo_catalog())));
        assistant.process("hello").await;
        let first = assistant.catalog().snapshot();
        assistant.process("hello again").await;
        assert!(Arc::ptr_eq(&first, &assistant.catalog().snapshot()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_delay() {
        let config = AssistantConfig {
            typing_delay_ms: 1500,
            ..AssistantConfig::default()
        };
        let assistant = ShopAssistant::new(config, Arc::new(StaticCatalog::new(demo_catalog())));

        let start = tokio::time::Instant::now();
        assistant.process("hello").await;
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_from_settings_defaults_to_demo_catalog() {
        let assistant = ShopAssistant::from_settings(&Settings::default()).unwrap();
        let categories = assistant.categories().await;
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Laptops", "Smartphones", "Tablets"]);
    }

    #[test]
    fn test_from_settings_rejects_bad_catalog_path() {
        let settings = Settings {
            catalog: CatalogSourceConfig {
                path: Some("products.csv".to_string()),
            },
            ..Settings::default()
        };
        assert!(matches!(
            ShopAssistant::from_settings(&settings),
            Err(AgentError::Config(_))
        ));
    }
}
