//! End-to-end conversations through the assistant facade

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use shop_assistant_agent::{formatter, AssistantEvent, ShopAssistant, StaticCatalog};
use shop_assistant_config::{demo_catalog, AssistantConfig, CatalogSourceConfig, Settings};
use shop_assistant_core::{
    CatalogError, CatalogProvider, MessageAttachment, Product, ProductCategory,
    RecommendationLevel, Sender,
};

fn assistant_with(products: Vec<Product>) -> ShopAssistant {
    ShopAssistant::new(AssistantConfig::default(), Arc::new(StaticCatalog::new(products)))
}

async fn ask(assistant: &ShopAssistant, text: &str) -> String {
    let replies = assistant.process(text).await;
    replies
        .last()
        .map(|m| m.text.clone())
        .unwrap_or_default()
}

struct OfflineCatalog;

#[async_trait]
impl CatalogProvider for OfflineCatalog {
    async fn fetch_products(&self) -> shop_assistant_core::Result<Vec<Product>> {
        Err(CatalogError::Unavailable("backend offline".to_string()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[tokio::test]
async fn test_category_listing_numbers_in_stock_products() {
    let assistant = assistant_with(vec![
        Product::new("l1", "ProBook X5", ProductCategory::Laptop, 1299.99, 23),
        Product::new("l2", "UltraSlim 7", ProductCategory::Laptop, 899.99, 15),
        Product::new("t1", "iPad Air", ProductCategory::Tablet, 599.99, 13),
        Product::new("l3", "GameMaster Pro", ProductCategory::Laptop, 1799.99, 7),
    ]);

    let replies = assistant.process("What laptops do you have?").await;
    assert_eq!(replies.len(), 1);

    let lines: Vec<&str> = replies[0].text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Here are the laptops we have in stock:",
            "1. ProBook X5 - $1299.99 (23 in stock)",
            "2. UltraSlim 7 - $899.99 (15 in stock)",
            "3. GameMaster Pro - $1799.99 (7 in stock)",
        ]
    );
    match &replies[0].attachment {
        Some(MessageAttachment::Products(cards)) => assert_eq!(cards.len(), 3),
        other => panic!("expected product cards, got {:?}", other),
    }
}

#[tokio::test]
async fn test_low_budget_gaming_dialogue() {
    let assistant = assistant_with(vec![
        Product::new("g1", "Budget Gamer 14", ProductCategory::Laptop, 450.0, 4)
            .with_description("Entry gaming laptop")
            .with_spec("processor", "Intel Core i9-13900H")
            .with_spec("display", "14-inch 144Hz")
            .with_spec("gpu", "NVIDIA RTX 4050"),
        Product::new("o1", "Office Note", ProductCategory::Laptop, 480.0, 9)
            .with_spec("display", "15.6-inch HD"),
    ]);

    let intro = ask(&assistant, "Can you recommend a laptop?").await;
    assert!(intro.contains("What's your budget?"));

    assert!(ask(&assistant, "low").await.starts_with("What will you mainly use it for?"));
    assert!(ask(&assistant, "gaming").await.starts_with("What size do you prefer?"));
    assert!(ask(&assistant, "compact").await.starts_with("How much performance do you need?"));

    let replies = assistant.process("high").await;
    assert_eq!(replies.len(), 2);
    assert!(replies[1]
        .text
        .contains("Highly recommended:\n1. Budget Gamer 14 - $450.00"));

    match &replies[1].attachment {
        Some(MessageAttachment::Recommendations(cards)) => {
            assert_eq!(cards[0].product.id, "g1");
            assert_eq!(cards[0].level, RecommendationLevel::High);
            assert_eq!(cards[1].product.id, "o1");
            assert_eq!(cards[1].level, RecommendationLevel::Low);
        }
        other => panic!("expected recommendations, got {:?}", other),
    }
    assert!(!assistant.in_recommendation_flow().await);
}

#[tokio::test]
async fn test_price_question_for_known_product() {
    let assistant = assistant_with(demo_catalog());
    let text = ask(&assistant, "how much is the UltraSlim 7").await;
    assert!(text.contains("$899.99"));
    assert!(text.contains("15"));
}

#[tokio::test]
async fn test_unknown_product_gets_clarification() {
    let assistant = assistant_with(demo_catalog());
    let text = ask(&assistant, "How much is the Quantum Widget?").await;
    assert_eq!(text, formatter::CLARIFICATION);
}

#[tokio::test]
async fn test_thousand_dollar_product_only_in_high_budget() {
    let catalog = vec![
        Product::new("edge", "Threshold Book", ProductCategory::Laptop, 1000.0, 2),
        Product::new("mid", "Midrange Book", ProductCategory::Laptop, 999.0, 2),
    ];
    let assistant = assistant_with(catalog);

    assistant.process("recommend").await;
    for answer in ["medium", "1", "2"] {
        assistant.process(answer).await;
    }
    let medium = ask(&assistant, "2").await;
    assert!(medium.contains("Midrange Book"));
    assert!(!medium.contains("Threshold Book"));

    assistant.process("recommend").await;
    for answer in ["high", "1", "2"] {
        assistant.process(answer).await;
    }
    let high = ask(&assistant, "2").await;
    assert!(high.contains("Threshold Book"));
    assert!(!high.contains("Midrange Book"));
}

#[tokio::test]
async fn test_unavailable_catalog_degrades() {
    let assistant = ShopAssistant::new(AssistantConfig::default(), Arc::new(OfflineCatalog));

    assert_eq!(ask(&assistant, "show available").await, formatter::NO_PRODUCTS);
    assert_eq!(ask(&assistant, "how much is the iPad Air").await, formatter::NO_PRODUCTS);
    // Conversation still works
    assert_eq!(ask(&assistant, "hello").await, formatter::GREETING);
    assert!(assistant.categories().await.is_empty());
}

#[tokio::test]
async fn test_turns_are_serialized() {
    let assistant = Arc::new(assistant_with(demo_catalog()));

    let a = Arc::clone(&assistant);
    let b = Arc::clone(&assistant);
    let (first, second) = tokio::join!(
        async move { a.process("how much is the ProBook X5").await },
        async move { b.process("is the iPad Air in stock").await },
    );
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    // Every user message is immediately followed by its own reply
    let transcript = assistant.transcript().await;
    assert_eq!(transcript.len(), 5);
    for pair in transcript[1..].chunks(2) {
        assert_eq!(pair[0].sender, Sender::User);
        assert_eq!(pair[1].sender, Sender::Bot);
    }
    let replies: Vec<&str> = transcript[1..]
        .chunks(2)
        .map(|pair| pair[1].text.as_str())
        .collect();
    assert!(replies.iter().any(|t| t.contains("ProBook X5")));
    assert!(replies.iter().any(|t| t.contains("iPad Air")));
}

#[tokio::test]
async fn test_category_selection_and_start_over() {
    let assistant = assistant_with(demo_catalog());
    let mut rx = assistant.subscribe();
    let first_session = assistant.session_id().await;

    let greeting = assistant.select_category(ProductCategory::Tablet).await;
    assert_eq!(greeting.product_category, Some(ProductCategory::Tablet));
    assert!(matches!(
        rx.recv().await,
        Ok(AssistantEvent::CategorySelected(ProductCategory::Tablet))
    ));

    let text = ask(&assistant, "something for reading").await;
    assert!(text.contains("Kindle Fire HD"));
    assert_eq!(assistant.selected_category().await, Some(ProductCategory::Tablet));

    let greeting = assistant.start_over().await;
    assert_eq!(greeting.text, assistant.config().greeting);
    assert_ne!(assistant.session_id().await, first_session);
    assert!(assistant.selected_category().await.is_none());
    assert_eq!(assistant.transcript().await.len(), 1);
}

#[tokio::test]
async fn test_catalog_file_is_reread_each_turn() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"
products:
  - id: tab-1
    name: Kindle Fire HD
    category: Tablet
    price: 199.99
    stock: 31
"#
    )
    .unwrap();
    file.flush().unwrap();

    let settings = Settings {
        catalog: CatalogSourceConfig {
            path: Some(file.path().display().to_string()),
        },
        ..Settings::default()
    };
    let assistant = ShopAssistant::from_settings(&settings).unwrap();
    assert!(ask(&assistant, "how much is the Kindle Fire HD").await.contains("$199.99"));

    std::fs::write(
        file.path(),
        "products:\n  - id: tab-1\n    name: Kindle Fire HD\n    category: Tablet\n    price: 149.99\n    stock: 30\n",
    )
    .unwrap();
    assert!(ask(&assistant, "how much is the Kindle Fire HD").await.contains("$149.99"));
}
