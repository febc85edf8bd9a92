//! Recommendation Scoring
//!
//! Budget filter, additive bonuses and tiering. Pure functions over a
//! catalog snapshot: the same preference and catalog always give the same
//! levels in the same order.

use shop_assistant_config::constants::{budget, scoring, size_thresholds};
use shop_assistant_core::{
    Budget, PerformanceNeeds, PrimaryUse, Product, ProductCategory, RecommendationLevel,
    RecommendationResult, SizePreference, UserPreference,
};

/// Half-open price interval `[min, max)` of a budget tier
pub fn budget_range(tier: Budget) -> (f64, f64) {
    match tier {
        Budget::Low => (0.0, budget::LOW_MAX),
        Budget::Medium => (budget::LOW_MAX, budget::MEDIUM_MAX),
        Budget::High => (budget::MEDIUM_MAX, f64::INFINITY),
    }
}

pub fn in_budget(price: f64, tier: Budget) -> bool {
    let (min, max) = budget_range(tier);
    price >= min && price < max
}

/// Level for a total score
pub fn level_for_score(score: u32) -> RecommendationLevel {
    if score >= scoring::HIGH_LEVEL_MIN {
        RecommendationLevel::High
    } else if score >= scoring::MEDIUM_LEVEL_MIN {
        RecommendationLevel::Medium
    } else {
        RecommendationLevel::Low
    }
}

fn spec_contains(product: &Product, key: &str, needles: &[&str]) -> bool {
    product
        .spec_text(key)
        .map_or(false, |text| needles.iter().any(|n| text.contains(n)))
}

fn performance_bonus(pref: &UserPreference, product: &Product) -> u32 {
    if pref.performance_needs != PerformanceNeeds::High {
        return 0;
    }
    let flagship = match product.category {
        ProductCategory::Laptop => {
            spec_contains(product, "processor", scoring::LAPTOP_FLAGSHIP_CPUS)
        }
        ProductCategory::Smartphone => {
            spec_contains(product, "processor", scoring::SMARTPHONE_FLAGSHIP_CPUS)
        }
        ProductCategory::Tablet => false,
    };
    if flagship {
        scoring::PERFORMANCE_BONUS
    } else {
        0
    }
}

/// Gaming evidence: "game" in the name or an RTX GPU
pub fn is_gaming_product(product: &Product) -> bool {
    product.name.to_lowercase().contains("game") || spec_contains(product, "gpu", &["RTX"])
}

fn use_case_bonus(pref: &UserPreference, product: &Product) -> u32 {
    let matched = match pref.primary_use {
        PrimaryUse::Gaming => is_gaming_product(product),
        PrimaryUse::Creative => {
            let name = product.name.to_lowercase();
            name.contains("creative") || name.contains("pro")
        }
        PrimaryUse::Productivity | PrimaryUse::Browsing => false,
    };
    if matched {
        scoring::USE_CASE_BONUS
    } else {
        0
    }
}

fn size_threshold(category: ProductCategory) -> f64 {
    match category {
        ProductCategory::Laptop => size_thresholds::LAPTOP,
        ProductCategory::Tablet => size_thresholds::TABLET,
        ProductCategory::Smartphone => size_thresholds::SMARTPHONE,
    }
}

fn size_bonus(pref: &UserPreference, product: &Product) -> u32 {
    let Some(inches) = product.spec("display").and_then(|v| v.leading_number()) else {
        return 0;
    };
    let threshold = size_threshold(product.category);
    let matched = match pref.size {
        SizePreference::Compact => inches < threshold,
        SizePreference::Large => inches > threshold,
        SizePreference::Standard => false,
    };
    if matched {
        scoring::SIZE_BONUS
    } else {
        0
    }
}

/// Additive score of one product; missing specs simply earn nothing
pub fn score_product(pref: &UserPreference, product: &Product) -> u32 {
    performance_bonus(pref, product) + use_case_bonus(pref, product) + size_bonus(pref, product)
}

/// Rank the in-stock, in-budget products for a preference
///
/// Sorted by level, high first. Within a level products keep catalog
/// order; that order is stable but not part of the contract.
pub fn get_recommendations(pref: &UserPreference, products: &[Product]) -> Vec<RecommendationResult> {
    let mut results: Vec<RecommendationResult> = products
        .iter()
        .filter(|p| p.is_in_stock() && in_budget(p.price, pref.budget))
        .map(|product| {
            let score = score_product(pref, product);
            RecommendationResult {
                product: product.clone(),
                level: level_for_score(score),
                score,
            }
        })
        .collect();

    // Vec::sort_by_key is stable
    results.sort_by_key(|r| std::cmp::Reverse(r.level.rank()));

    tracing::debug!(
        budget = pref.budget.as_str(),
        primary_use = pref.primary_use.as_str(),
        size = pref.size.as_str(),
        performance = pref.performance_needs.as_str(),
        candidates = results.len(),
        "Scored recommendations"
    );

    results
}
