//! Intent Classification
//!
//! Maps an utterance plus session context to exactly one intent using an
//! ordered list of keyword rules. The first matching rule wins, so rules
//! whose keyword sets overlap must stay in priority order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shop_assistant_core::ProductCategory;
use unicode_segmentation::UnicodeSegmentation;

/// Classified purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Raw answer for the recommendation dialogue in progress
    RecommendationAnswer,
    ListAvailable,
    Recommend,
    Price,
    Stock,
    Specs,
    Compare,
    CategorySmallTalk(SmallTalkTopic),
    Greeting,
    Help,
    /// Nothing matched; ask for clarification
    Fallback,
}

impl Intent {
    /// Whether handling needs a product or category target
    pub fn needs_entity(&self) -> bool {
        matches!(
            self,
            Intent::ListAvailable | Intent::Price | Intent::Stock | Intent::Specs | Intent::Compare
        )
    }

    /// Whether the reply is built from catalog products
    pub fn needs_catalog(&self) -> bool {
        match self {
            Intent::CategorySmallTalk(topic) => topic.suggests_products(),
            other => other.needs_entity(),
        }
    }
}

/// Category-scoped small talk topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmallTalkTopic {
    GamingLaptop,
    BusinessLaptop,
    PhoneCamera,
    PhoneBattery,
    NotWorking,
    Broken,
    HowTo,
    Setup,
    Warranty,
    LaptopBattery,
    LaptopSlow,
    TabletStylus,
    TabletReading,
    PhoneScreen,
}

impl SmallTalkTopic {
    /// Topics answered with in-stock product suggestions
    pub fn suggests_products(&self) -> bool {
        matches!(
            self,
            SmallTalkTopic::GamingLaptop
                | SmallTalkTopic::BusinessLaptop
                | SmallTalkTopic::PhoneCamera
                | SmallTalkTopic::TabletStylus
                | SmallTalkTopic::TabletReading
        )
    }
}

/// Session facts the classifier may look at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierContext {
    pub in_recommendation_flow: bool,
    pub selected_category: Option<ProductCategory>,
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedIntent {
    pub intent: Intent,
    /// Inline numeric choice such as "2" or "option 3"
    pub choice: Option<u8>,
    /// Name of the rule that fired
    pub rule: &'static str,
}

/// Lower-cased utterance with its word segmentation
#[derive(Debug, Clone)]
pub struct Utterance {
    lower: String,
    /// Words joined by single spaces and padded, for whole-word lookups
    padded_words: String,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower.unicode_words().collect();
        let padded_words = format!(" {} ", words.join(" "));
        Self { lower, padded_words }
    }

    pub fn text(&self) -> &str {
        &self.lower
    }

    /// Substring containment of any keyword
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.lower.contains(k))
    }

    /// Whole-word (or whole-phrase) match of any keyword
    pub fn has_any_word(&self, words: &[&str]) -> bool {
        words
            .iter()
            .any(|w| self.padded_words.contains(&format!(" {} ", w)))
    }
}

static CHOICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:option\s*)?([1-4])\b").expect("valid choice regex"));

/// Extract a leading numeric choice ("1", "option 2", "3.")
pub fn extract_choice(text: &str) -> Option<u8> {
    let lower = text.to_lowercase();
    CHOICE_PATTERN
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Rule keywords, matched as substrings of the lower-cased utterance
///
/// The `*_WORDS` lists are the exception: they match whole words only, so
/// "vs" does not fire inside "canvas" and "hi" does not fire inside "this".
pub(crate) mod keywords {
    pub const LIST_AVAILABLE: &[&str] = &[
        "see available",
        "show available",
        "what do you have",
        "what is available",
    ];
    pub const RECOMMEND: &[&str] = &["recommend", "suggestion", "best for me", "what should i"];
    pub const PRICE: &[&str] = &["price", "cost", "how much"];
    pub const STOCK: &[&str] = &["stock", "available", "in store", "can i buy", "do you have"];
    pub const SPECS: &[&str] = &["spec", "detail", "feature", "tell me about", "more about"];
    pub const COMPARE: &[&str] = &["compare", "difference between", "versus"];
    pub const COMPARE_WORDS: &[&str] = &["vs"];
    pub const GREETING_WORDS: &[&str] = &["hello", "hi", "hey"];
    pub const HELP: &[&str] = &["help"];
}

/// Small talk table: `(category or any, whole-word keywords, topic)`, in priority order
const SMALL_TALK_RULES: &[(Option<ProductCategory>, &[&str], SmallTalkTopic)] = &[
    (Some(ProductCategory::Laptop), &["gaming", "games", "game"], SmallTalkTopic::GamingLaptop),
    (Some(ProductCategory::Laptop), &["work", "business"], SmallTalkTopic::BusinessLaptop),
    (Some(ProductCategory::Smartphone), &["camera", "photo", "photos", "pictures"], SmallTalkTopic::PhoneCamera),
    (Some(ProductCategory::Smartphone), &["battery"], SmallTalkTopic::PhoneBattery),
    (None, &["not working"], SmallTalkTopic::NotWorking),
    (None, &["broken"], SmallTalkTopic::Broken),
    (None, &["how to"], SmallTalkTopic::HowTo),
    (None, &["setup", "set up"], SmallTalkTopic::Setup),
    (None, &["warranty"], SmallTalkTopic::Warranty),
    (Some(ProductCategory::Laptop), &["battery"], SmallTalkTopic::LaptopBattery),
    (Some(ProductCategory::Laptop), &["slow"], SmallTalkTopic::LaptopSlow),
    (Some(ProductCategory::Tablet), &["stylus", "pencil"], SmallTalkTopic::TabletStylus),
    (Some(ProductCategory::Tablet), &["reading", "ebooks", "books"], SmallTalkTopic::TabletReading),
    (Some(ProductCategory::Smartphone), &["screen"], SmallTalkTopic::PhoneScreen),
];

type RuleMatcher = fn(&Utterance, &ClassifierContext) -> Option<Intent>;

/// A named, independently testable classification rule
#[derive(Clone, Copy)]
pub struct IntentRule {
    pub name: &'static str,
    matcher: RuleMatcher,
}

impl IntentRule {
    pub const fn new(name: &'static str, matcher: RuleMatcher) -> Self {
        Self { name, matcher }
    }

    pub fn evaluate(&self, utterance: &Utterance, ctx: &ClassifierContext) -> Option<Intent> {
        (self.matcher)(utterance, ctx)
    }
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule").field("name", &self.name).finish()
    }
}

fn match_recommendation_answer(_: &Utterance, ctx: &ClassifierContext) -> Option<Intent> {
    ctx.in_recommendation_flow.then_some(Intent::RecommendationAnswer)
}

fn match_list_available(u: &Utterance, _: &ClassifierContext) -> Option<Intent> {
    u.contains_any(keywords::LIST_AVAILABLE).then_some(Intent::ListAvailable)
}

fn match_recommend(u: &Utterance, _: &ClassifierContext) -> Option<Intent> {
    u.contains_any(keywords::RECOMMEND).then_some(Intent::Recommend)
}

fn match_price(u: &Utterance, _: &ClassifierContext) -> Option<Intent> {
    u.contains_any(keywords::PRICE).then_some(Intent::Price)
}

fn match_stock(u: &Utterance, _: &ClassifierContext) -> Option<Intent> {
    u.contains_any(keywords::STOCK).then_some(Intent::Stock)
}

fn match_specs(u: &Utterance, _: &ClassifierContext) -> Option<Intent> {
    u.contains_any(keywords::SPECS).then_some(Intent::Specs)
}

fn match_compare(u: &Utterance, _: &ClassifierContext) -> Option<Intent> {
    (u.contains_any(keywords::COMPARE) || u.has_any_word(keywords::COMPARE_WORDS))
        .then_some(Intent::Compare)
}

fn match_category_small_talk(u: &Utterance, ctx: &ClassifierContext) -> Option<Intent> {
    let selected = ctx.selected_category?;
    SMALL_TALK_RULES
        .iter()
        .filter(|(category, _, _)| category.map_or(true, |c| c == selected))
        .find(|(_, words, _)| u.has_any_word(words))
        .map(|(_, _, topic)| Intent::CategorySmallTalk(*topic))
}

fn match_greeting(u: &Utterance, ctx: &ClassifierContext) -> Option<Intent> {
    (ctx.selected_category.is_none() && u.has_any_word(keywords::GREETING_WORDS))
        .then_some(Intent::Greeting)
}

fn match_help(u: &Utterance, ctx: &ClassifierContext) -> Option<Intent> {
    (ctx.selected_category.is_none() && u.contains_any(keywords::HELP)).then_some(Intent::Help)
}

/// Ordered rule list, highest priority first
pub const DEFAULT_RULES: &[IntentRule] = &[
    IntentRule::new("recommendation_answer", match_recommendation_answer),
    IntentRule::new("list_available", match_list_available),
    IntentRule::new("recommend", match_recommend),
    IntentRule::new("price", match_price),
    IntentRule::new("stock", match_stock),
    IntentRule::new("specs", match_specs),
    IntentRule::new("compare", match_compare),
    IntentRule::new("category_small_talk", match_category_small_talk),
    IntentRule::new("greeting", match_greeting),
    IntentRule::new("help", match_help),
];

/// Intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Classify an utterance; always yields an intent
    pub fn classify(&self, text: &str, ctx: &ClassifierContext) -> DetectedIntent {
        let utterance = Utterance::new(text);
        let choice = extract_choice(text);

        let detected = self
            .rules
            .iter()
            .find_map(|rule| {
                rule.evaluate(&utterance, ctx).map(|intent| DetectedIntent {
                    intent,
                    choice,
                    rule: rule.name,
                })
            })
            .unwrap_or(DetectedIntent {
                intent: Intent::Fallback,
                choice,
                rule: "fallback",
            });

        tracing::debug!(
            intent = ?detected.intent,
            rule = detected.rule,
            choice = ?detected.choice,
            category = ?ctx.selected_category,
            "Classified utterance"
        );

        detected
    }
}
