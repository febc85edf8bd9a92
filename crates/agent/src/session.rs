//! Conversation Session
//!
//! One customer conversation: the append-only transcript, the selected
//! category and the recommendation flow in progress. Every operation is
//! total; catalog problems surface as "no products available" replies.

use shop_assistant_core::{
    ConversationMessage, MessageAttachment, Product, ProductCard, ProductCategory,
    RecommendationCard, UserPreference,
};

use crate::catalog::CatalogSnapshot;
use crate::dialogue::{FlowTransition, RecommendationFlow, RecommendationStep};
use crate::entity::{resolve_category, resolve_comparison, resolve_product};
use crate::formatter;
use crate::intent::{ClassifierContext, DetectedIntent, Intent, IntentClassifier, SmallTalkTopic};
use crate::scoring::{get_recommendations, is_gaming_product};

/// What an inquiry is about
enum Target<'a> {
    Product(&'a Product),
    Category(ProductCategory),
    Nothing,
}

/// Exact product names win, then a mentioned category, then a fuzzy hit
fn resolve_target<'a>(text: &str, catalog: &'a CatalogSnapshot) -> Target<'a> {
    let product = resolve_product(text, catalog.products());
    let category = resolve_category(text);
    match (product, category) {
        (Some(m), _) if m.is_exact() => Target::Product(m.product),
        (_, Some(category)) => Target::Category(category),
        (Some(m), None) => Target::Product(m.product),
        (None, None) => Target::Nothing,
    }
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn describes(product: &Product, words: &[&str]) -> bool {
    let description = product.description.to_lowercase();
    words.iter().any(|w| description.contains(w))
}

fn product_cards(products: &[&Product]) -> MessageAttachment {
    MessageAttachment::Products(products.iter().map(|p| ProductCard::from(*p)).collect())
}

/// A single customer conversation
#[derive(Debug)]
pub struct ConversationSession {
    id: String,
    greeting: String,
    transcript: Vec<ConversationMessage>,
    selected_category: Option<ProductCategory>,
    flow: Option<RecommendationFlow>,
    classifier: IntentClassifier,
}

impl ConversationSession {
    /// Start a session seeded with the initial greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        let mut session = Self {
            id: new_session_id(),
            greeting: greeting.into(),
            transcript: Vec::new(),
            selected_category: None,
            flow: None,
            classifier: IntentClassifier::new(),
        };
        session.seed_greeting();
        tracing::info!(session_id = %session.id, "Session started");
        session
    }

    fn seed_greeting(&mut self) -> ConversationMessage {
        let message = ConversationMessage::bot(self.greeting.clone());
        self.transcript.push(message.clone());
        message
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transcript(&self) -> &[ConversationMessage] {
        &self.transcript
    }

    pub fn selected_category(&self) -> Option<ProductCategory> {
        self.selected_category
    }

    pub fn in_recommendation_flow(&self) -> bool {
        self.flow.is_some()
    }

    /// Current dialogue step, `None` outside a recommendation flow
    pub fn recommendation_step(&self) -> Option<RecommendationStep> {
        self.flow.as_ref().map(RecommendationFlow::step)
    }

    pub fn current_preference(&self) -> Option<&UserPreference> {
        self.flow.as_ref().map(RecommendationFlow::preference)
    }

    pub fn context(&self) -> ClassifierContext {
        ClassifierContext {
            in_recommendation_flow: self.flow.is_some(),
            selected_category: self.selected_category,
        }
    }

    fn bot(&self, text: impl Into<String>) -> ConversationMessage {
        ConversationMessage::bot(text).with_category(self.selected_category)
    }

    /// Append a user utterance and return the bot replies
    ///
    /// Blank input is ignored and yields no replies.
    pub fn handle_utterance(&mut self, text: &str, catalog: &CatalogSnapshot) -> Vec<ConversationMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        self.transcript
            .push(ConversationMessage::user(text).with_category(self.selected_category));

        let detected = self.classifier.classify(text, &self.context());
        let replies = if detected.intent.needs_catalog() && catalog.is_empty() {
            vec![self.bot(formatter::NO_PRODUCTS)]
        } else {
            self.dispatch(&detected, text, catalog)
        };

        tracing::debug!(
            session_id = %self.id,
            intent = ?detected.intent,
            rule = detected.rule,
            replies = replies.len(),
            "Handled utterance"
        );

        self.transcript.extend(replies.iter().cloned());
        replies
    }

    fn dispatch(&mut self, detected: &DetectedIntent, text: &str, catalog: &CatalogSnapshot) -> Vec<ConversationMessage> {
        match detected.intent {
            Intent::RecommendationAnswer => {
                self.answer_recommendation_step(text, detected.choice, catalog)
            }
            Intent::Recommend => self.start_recommendation(),
            Intent::ListAvailable => vec![self.list_available(text, catalog)],
            Intent::Price => vec![self.price_inquiry(text, catalog)],
            Intent::Stock => vec![self.stock_inquiry(text, catalog)],
            Intent::Specs => vec![self.spec_inquiry(text, catalog)],
            Intent::Compare => vec![self.compare(text, catalog)],
            Intent::CategorySmallTalk(topic) => vec![self.small_talk(topic, catalog)],
            Intent::Greeting => vec![self.bot(formatter::GREETING)],
            Intent::Help => vec![self.bot(formatter::HELP)],
            Intent::Fallback => vec![self.clarification()],
        }
    }

    /// Select a product category and return its greeting
    pub fn select_category(&mut self, category: ProductCategory) -> ConversationMessage {
        self.selected_category = Some(category);
        let message = self.bot(formatter::category_greeting(category));
        self.transcript.push(message.clone());
        tracing::info!(session_id = %self.id, category = %category, "Category selected");
        message
    }

    /// Start over: new id, fresh transcript, no category, no flow
    pub fn reset(&mut self) -> ConversationMessage {
        let previous = std::mem::replace(&mut self.id, new_session_id());
        self.transcript.clear();
        self.selected_category = None;
        self.flow = None;
        tracing::info!(previous = %previous, session_id = %self.id, "Session reset");
        self.seed_greeting()
    }

    fn clarification(&self) -> ConversationMessage {
        match self.selected_category {
            Some(category) => self.bot(formatter::category_clarification(category)),
            None => self.bot(formatter::CLARIFICATION),
        }
    }

    fn start_recommendation(&mut self) -> Vec<ConversationMessage> {
        if self.flow.is_some() {
            tracing::debug!(session_id = %self.id, "Discarding previous recommendation flow");
        }
        self.flow = Some(RecommendationFlow::start());
        tracing::info!(session_id = %self.id, "Recommendation flow started");
        vec![self.bot(formatter::recommendation_intro())]
    }

    fn answer_recommendation_step(
        &mut self,
        text: &str,
        choice: Option<u8>,
        catalog: &CatalogSnapshot,
    ) -> Vec<ConversationMessage> {
        let Some(flow) = self.flow.take() else {
            return vec![self.clarification()];
        };

        match flow.advance(text, choice) {
            FlowTransition::Continue(next) => {
                self.flow = Some(next);
                vec![self.bot(formatter::step_prompt(next.step()))]
            }
            FlowTransition::Complete(preference) => {
                tracing::info!(session_id = %self.id, ?preference, "Recommendation flow complete");
                vec![
                    self.bot(formatter::preference_summary(&preference)),
                    self.recommendations(&preference, catalog),
                ]
            }
        }
    }

    fn recommendations(&self, preference: &UserPreference, catalog: &CatalogSnapshot) -> ConversationMessage {
        if catalog.is_empty() {
            return self.bot(formatter::NO_PRODUCTS);
        }

        let results = get_recommendations(preference, catalog.products());
        if results.is_empty() {
            return self.bot(formatter::NO_RECOMMENDATION_MATCH);
        }

        let cards = results.iter().map(RecommendationCard::from).collect();
        self.bot(formatter::recommendation_listing(&results))
            .with_attachment(MessageAttachment::Recommendations(cards))
    }

    fn in_stock_listing(&self, category: Option<ProductCategory>, catalog: &CatalogSnapshot) -> ConversationMessage {
        let products: Vec<&Product> = catalog
            .available()
            .into_iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect();

        if products.is_empty() {
            return self.bot(formatter::nothing_in_stock(category));
        }

        self.bot(formatter::availability_listing(
            &formatter::available_heading(category),
            &products,
        ))
        .with_attachment(product_cards(&products))
    }

    fn list_available(&self, text: &str, catalog: &CatalogSnapshot) -> ConversationMessage {
        let category = resolve_category(text).or(self.selected_category);
        self.in_stock_listing(category, catalog)
    }

    fn price_inquiry(&self, text: &str, catalog: &CatalogSnapshot) -> ConversationMessage {
        match resolve_target(text, catalog) {
            Target::Product(product) => self
                .bot(formatter::product_info(product))
                .with_attachment(product_cards(&[product])),
            Target::Category(category) => {
                let products = catalog.by_category(category);
                if products.is_empty() {
                    return self.bot(formatter::nothing_in_stock(Some(category)));
                }
                let heading = format!("Here are our {} and their prices:", category.plural().to_lowercase());
                self.bot(formatter::availability_listing(&heading, &products))
                    .with_attachment(product_cards(&products))
            }
            Target::Nothing => self.clarification(),
        }
    }

    fn stock_inquiry(&self, text: &str, catalog: &CatalogSnapshot) -> ConversationMessage {
        match resolve_target(text, catalog) {
            Target::Product(product) => self
                .bot(formatter::stock_status(product))
                .with_attachment(product_cards(&[product])),
            Target::Category(category) => self.in_stock_listing(Some(category), catalog),
            Target::Nothing => self.clarification(),
        }
    }

    fn spec_inquiry(&self, text: &str, catalog: &CatalogSnapshot) -> ConversationMessage {
        match resolve_target(text, catalog) {
            Target::Product(product) => self
                .bot(formatter::spec_sheet(product))
                .with_attachment(product_cards(&[product])),
            Target::Category(category) => {
                let products = catalog.by_category(category);
                if products.is_empty() {
                    return self.bot(formatter::nothing_in_stock(Some(category)));
                }
                let heading = format!(
                    "Which {} would you like to know more about?",
                    category.as_str().to_lowercase()
                );
                self.bot(formatter::availability_listing(&heading, &products))
                    .with_attachment(product_cards(&products))
            }
            Target::Nothing => self.clarification(),
        }
    }

    fn compare(&self, text: &str, catalog: &CatalogSnapshot) -> ConversationMessage {
        let products = resolve_comparison(text, catalog.products());
        match products.as_slice() {
            [] => self.bot(formatter::COMPARISON_NEEDS_TARGETS),
            [only] => self
                .bot(formatter::comparison_needs_second(only))
                .with_attachment(product_cards(&[*only])),
            _ => self
                .bot(formatter::comparison(&products))
                .with_attachment(product_cards(&products)),
        }
    }

    fn small_talk(&self, topic: SmallTalkTopic, catalog: &CatalogSnapshot) -> ConversationMessage {
        let Some(category) = self.selected_category else {
            return self.clarification();
        };

        let in_stock = |category: ProductCategory| {
            catalog
                .available()
                .into_iter()
                .filter(move |p| p.category == category)
        };

        let suggestions: Vec<&Product> = match topic {
            SmallTalkTopic::GamingLaptop => in_stock(ProductCategory::Laptop)
                .filter(|p| is_gaming_product(p))
                .collect(),
            SmallTalkTopic::BusinessLaptop => in_stock(ProductCategory::Laptop)
                .filter(|p| describes(p, &["business", "professional", "productivity"]))
                .collect(),
            SmallTalkTopic::PhoneCamera => in_stock(ProductCategory::Smartphone)
                .filter(|p| p.spec("camera").is_some())
                .collect(),
            SmallTalkTopic::TabletStylus => in_stock(ProductCategory::Tablet)
                .filter(|p| describes(p, &["stylus"]))
                .collect(),
            SmallTalkTopic::TabletReading => in_stock(ProductCategory::Tablet)
                .filter(|p| describes(p, &["reading", "entertainment"]))
                .collect(),
            _ => Vec::new(),
        };

        let message = self.bot(formatter::small_talk(topic, category, &suggestions));
        if suggestions.is_empty() {
            message
        } else {
            message.with_attachment(product_cards(&suggestions))
        }
    }
}
