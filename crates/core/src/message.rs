//! Conversation message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Product, ProductCategory, RecommendationLevel, RecommendationResult};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// Structured product data for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub price: f64,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url.clone(),
            rating: product.rating,
        }
    }
}

/// A product card tagged with its recommendation tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationCard {
    pub product: ProductCard,
    pub level: RecommendationLevel,
}

impl From<&RecommendationResult> for RecommendationCard {
    fn from(result: &RecommendationResult) -> Self {
        Self {
            product: ProductCard::from(&result.product),
            level: result.level,
        }
    }
}

/// Optional structured payload of a bot message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum MessageAttachment {
    Products(Vec<ProductCard>),
    Recommendations(Vec<RecommendationCard>),
}

/// One entry of the session transcript
///
/// Messages are created once and never mutated after they are appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_category: Option<ProductCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<MessageAttachment>,
}

impl ConversationMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            product_category: None,
            attachment: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    pub fn with_category(mut self, category: Option<ProductCategory>) -> Self {
        self.product_category = category;
        self
    }

    pub fn with_attachment(mut self, attachment: MessageAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_unique() {
        let a = ConversationMessage::user("hi");
        let b = ConversationMessage::user("hi");
        assert_ne!(a.id, b.id);
        assert!(!a.is_from_bot());
        assert!(ConversationMessage::bot("hello").is_from_bot());
    }

    #[test]
    fn test_attachment_serialization() {
        let product = Product::new("laptop-2", "UltraSlim 7", ProductCategory::Laptop, 899.99, 15);
        let msg = ConversationMessage::bot("Here you go")
            .with_category(Some(ProductCategory::Laptop))
            .with_attachment(MessageAttachment::Products(vec![ProductCard::from(&product)]));

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["product_category"], "Laptop");
        assert_eq!(json["attachment"]["type"], "products");
        assert_eq!(json["attachment"]["items"][0]["name"], "UltraSlim 7");
    }
}
