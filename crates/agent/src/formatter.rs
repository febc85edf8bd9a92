//! Response Formatting
//!
//! Turns resolved products, preferences and recommendation bundles into
//! the text of bot messages. No decisions are made here; callers pick
//! what to show.

use shop_assistant_core::{
    Product, ProductCategory, RecommendationLevel, RecommendationResult, UserPreference,
};

use crate::dialogue::RecommendationStep;
use crate::intent::SmallTalkTopic;

pub const GREETING: &str =
    "Hello! How can I assist you today? You can select a product category to get more specific help.";

pub const HELP: &str = "I'm here to help with product support. Please select a product category to get started. \
     You can also ask me about prices, stock and specs, compare two products, or say \"recommend\" for a personalized suggestion.";

pub const CLARIFICATION: &str = "I'd be happy to help with that. To provide more specific assistance, \
     could you select which product you're inquiring about?";

pub const NO_PRODUCTS: &str = "Sorry, there are no products available right now. Please check back later.";

pub const NO_RECOMMENDATION_MATCH: &str = "I couldn't find an exact match for your preferences. \
     Try again with a different budget, or say \"recommend\" to start over.";

/// Price as shown to customers, e.g. `$899.99`
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Upper-case the first character of a spec key
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn noun(category: ProductCategory) -> String {
    category.as_str().to_lowercase()
}

pub fn stock_sentence(product: &Product) -> String {
    if product.is_in_stock() {
        format!("We currently have {} in stock.", product.stock)
    } else {
        "It is currently out of stock.".to_string()
    }
}

/// Single-product price line
pub fn product_info(product: &Product) -> String {
    format!(
        "The {} is priced at {}. {}",
        product.name,
        format_price(product.price),
        stock_sentence(product)
    )
}

/// Single-product stock answer
pub fn stock_status(product: &Product) -> String {
    if product.is_in_stock() {
        format!(
            "Yes, the {} is available! We have {} in stock at {}.",
            product.name,
            product.stock,
            format_price(product.price)
        )
    } else {
        format!(
            "Sorry, the {} is currently out of stock. It usually sells for {}.",
            product.name,
            format_price(product.price)
        )
    }
}

/// Numbered listing: `1. Name - $price (N in stock)`
pub fn availability_listing(heading: &str, products: &[&Product]) -> String {
    let mut text = heading.to_string();
    for (i, product) in products.iter().enumerate() {
        text.push_str(&format!(
            "\n{}. {} - {} ({} in stock)",
            i + 1,
            product.name,
            format_price(product.price),
            product.stock
        ));
    }
    text
}

pub fn available_heading(category: Option<ProductCategory>) -> String {
    match category {
        Some(category) => format!("Here are the {} we have in stock:", category.plural().to_lowercase()),
        None => "Here are the products we have in stock:".to_string(),
    }
}

pub fn nothing_in_stock(category: Option<ProductCategory>) -> String {
    match category {
        Some(category) => format!(
            "We don't have any {} in stock right now.",
            category.plural().to_lowercase()
        ),
        None => "Nothing is in stock right now.".to_string(),
    }
}

/// Full spec dump, one `Key: Value` line per spec
pub fn spec_sheet(product: &Product) -> String {
    let mut text = format!("Here are the details for the {}:", product.name);
    if !product.description.is_empty() {
        text.push('\n');
        text.push_str(&product.description);
    }
    for (key, value) in product.specs.iter() {
        text.push_str(&format!("\n{}: {}", capitalize(key), value));
    }
    text.push_str(&format!("\nPrice: {}", format_price(product.price)));
    text
}

/// Side-by-side comparison over the union of spec keys
pub fn comparison(products: &[&Product]) -> String {
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    let mut text = format!("Here's how they compare: {}", names.join(" vs "));

    let row = |label: &str, cells: Vec<String>| format!("\n{}: {}", label, cells.join(" | "));

    text.push_str(&row(
        "Price",
        products.iter().map(|p| format_price(p.price)).collect(),
    ));
    text.push_str(&row(
        "Stock",
        products.iter().map(|p| p.stock.to_string()).collect(),
    ));

    let mut keys: Vec<&str> = Vec::new();
    for product in products {
        for key in product.specs.keys() {
            if !keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                keys.push(key);
            }
        }
    }
    for key in keys {
        let cells = products
            .iter()
            .map(|p| p.spec(key).map_or_else(|| "-".to_string(), |v| v.to_string()))
            .collect();
        text.push_str(&row(&capitalize(key), cells));
    }
    text
}

/// Asked when only one comparison target could be identified
pub fn comparison_needs_second(product: &Product) -> String {
    format!(
        "{} Which product would you like to compare it with?",
        product_info(product)
    )
}

pub const COMPARISON_NEEDS_TARGETS: &str =
    "Which products would you like to compare? For example: \"compare Pixel Ultra vs iConnect Pro\".";

fn level_heading(level: RecommendationLevel) -> &'static str {
    match level {
        RecommendationLevel::High => "Highly recommended:",
        RecommendationLevel::Medium => "Good matches:",
        RecommendationLevel::Low => "Other options:",
    }
}

/// Three-tier listing, numbered per tier; the high tier adds descriptions
pub fn recommendation_listing(results: &[RecommendationResult]) -> String {
    let mut sections = Vec::new();
    for level in [
        RecommendationLevel::High,
        RecommendationLevel::Medium,
        RecommendationLevel::Low,
    ] {
        let tier: Vec<&RecommendationResult> = results.iter().filter(|r| r.level == level).collect();
        if tier.is_empty() {
            continue;
        }
        let mut section = level_heading(level).to_string();
        for (i, result) in tier.iter().enumerate() {
            section.push_str(&format!(
                "\n{}. {} - {}",
                i + 1,
                result.product.name,
                format_price(result.product.price)
            ));
            if level == RecommendationLevel::High && !result.product.description.is_empty() {
                section.push_str(&format!("\n   {}", result.product.description));
            }
        }
        sections.push(section);
    }
    format!("Here are my recommendations:\n\n{}", sections.join("\n\n"))
}

/// Acknowledgement sent once the last preference is in
pub fn preference_summary(pref: &UserPreference) -> String {
    format!(
        "Thanks! Looking for options with a {} budget, {} use, {} size and {} performance...",
        pref.budget.as_str(),
        pref.primary_use.as_str(),
        pref.size.as_str(),
        pref.performance_needs.as_str()
    )
}

/// Question asked at a dialogue step
pub fn step_prompt(step: RecommendationStep) -> &'static str {
    match step {
        RecommendationStep::Budget => {
            "What's your budget?\n1. Low (under $500)\n2. Medium ($500 - $1000)\n3. High (over $1000)"
        }
        RecommendationStep::PrimaryUse => {
            "What will you mainly use it for?\n1. Productivity\n2. Creative work\n3. Gaming\n4. Browsing and media"
        }
        RecommendationStep::Size => "What size do you prefer?\n1. Compact\n2. Standard\n3. Large",
        RecommendationStep::PerformanceNeeds => {
            "How much performance do you need?\n1. Basic\n2. Moderate\n3. High"
        }
        RecommendationStep::Complete => "Let me find the best matches for you.",
    }
}

pub fn recommendation_intro() -> String {
    format!(
        "Let's find the perfect product for you! I'll ask a few quick questions.\n\n{}",
        step_prompt(RecommendationStep::Budget)
    )
}

pub fn category_greeting(category: ProductCategory) -> &'static str {
    match category {
        ProductCategory::Laptop => {
            "I can help with your laptop questions. What specific issue are you experiencing?"
        }
        ProductCategory::Smartphone => {
            "I'm here to assist with your smartphone. What would you like to know?"
        }
        ProductCategory::Tablet => {
            "I can help with your tablet questions. Are you shopping for one or need help with a device you own?"
        }
    }
}

/// Clarification that keeps the selected category in view
pub fn category_clarification(category: ProductCategory) -> String {
    format!(
        "I understand you're asking about your {}. Could you provide more details about your specific question or issue?",
        noun(category)
    )
}

fn suggestion_list(intro: &str, products: &[&Product], detail: Option<&str>) -> String {
    let mut text = intro.to_string();
    for (i, product) in products.iter().enumerate() {
        let extra = detail
            .and_then(|key| product.spec_text(key))
            .map(|value| format!(" ({})", value))
            .unwrap_or_default();
        text.push_str(&format!(
            "\n{}. {} - {}{}",
            i + 1,
            product.name,
            format_price(product.price),
            extra
        ));
    }
    text
}

/// Category small talk; `suggestions` are in-stock products picked for the topic
pub fn small_talk(topic: SmallTalkTopic, category: ProductCategory, suggestions: &[&Product]) -> String {
    let c = noun(category);
    match topic {
        SmallTalkTopic::NotWorking => format!(
            "I'm sorry to hear your {} isn't working properly. Could you describe what happens when you try to use it?",
            c
        ),
        SmallTalkTopic::Broken => format!(
            "I understand your {} might be damaged. Can you describe the physical condition and any visible damage?",
            c
        ),
        SmallTalkTopic::HowTo => format!(
            "I'd be happy to guide you through using your {}. What specific feature are you trying to use?",
            c
        ),
        SmallTalkTopic::Setup => format!(
            "Setting up your new {} is easy! First, make sure all components are unpacked. Have you already tried connecting it?",
            c
        ),
        SmallTalkTopic::Warranty => format!(
            "For warranty information on your {}, please provide your purchase date and product model. Our standard warranty is 1 year from purchase.",
            c
        ),
        SmallTalkTopic::LaptopBattery => "Battery issues can be common. Is your laptop not holding a charge, not charging at all, or shutting down unexpectedly?".to_string(),
        SmallTalkTopic::LaptopSlow => "If your laptop is running slowly, it could be due to low storage space, too many background processes, or it might need a restart. Have you tried restarting it recently?".to_string(),
        SmallTalkTopic::PhoneBattery => "Smartphone battery issues are common. Are you experiencing rapid battery drain, or is the phone not charging properly?".to_string(),
        SmallTalkTopic::PhoneScreen => "I understand you're having an issue with your smartphone screen. Is it cracked, not responding to touch, or displaying incorrectly?".to_string(),
        SmallTalkTopic::GamingLaptop if !suggestions.is_empty() => suggestion_list(
            "For gaming, these laptops have the power you need:",
            suggestions,
            Some("gpu"),
        ),
        SmallTalkTopic::GamingLaptop => "We don't have a gaming laptop in stock right now. Say \"recommend\" and I'll find the closest match.".to_string(),
        SmallTalkTopic::BusinessLaptop if !suggestions.is_empty() => suggestion_list(
            "For work and business, take a look at:",
            suggestions,
            Some("battery"),
        ),
        SmallTalkTopic::BusinessLaptop => "We don't have a business laptop in stock right now. Say \"recommend\" and I'll find the closest match.".to_string(),
        SmallTalkTopic::PhoneCamera if !suggestions.is_empty() => suggestion_list(
            "If photography matters to you, check out these cameras:",
            suggestions,
            Some("camera"),
        ),
        SmallTalkTopic::PhoneCamera => "None of our camera phones are in stock right now. Please check back soon.".to_string(),
        SmallTalkTopic::TabletStylus if !suggestions.is_empty() => suggestion_list(
            "These tablets support a stylus:",
            suggestions,
            None,
        ),
        SmallTalkTopic::TabletStylus => "None of the tablets we have in stock advertise stylus support right now.".to_string(),
        SmallTalkTopic::TabletReading if !suggestions.is_empty() => suggestion_list(
            "For reading and streaming, I'd suggest:",
            suggestions,
            Some("display"),
        ),
        SmallTalkTopic::TabletReading => "We don't have a reading tablet in stock right now. Say \"recommend\" and I'll find the closest match.".to_string(),
    }
}
