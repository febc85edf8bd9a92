//! Recommendation preference and result types

use serde::{Deserialize, Serialize};

use crate::Product;

/// Budget tier chosen during the recommendation dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    /// Under 500
    Low,
    /// 500 up to (not including) 1000
    #[default]
    Medium,
    /// 1000 and above
    High,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Low => "low",
            Budget::Medium => "medium",
            Budget::High => "high",
        }
    }
}

/// What the customer mainly uses the device for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryUse {
    #[default]
    Productivity,
    Creative,
    Gaming,
    Browsing,
}

impl PrimaryUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryUse::Productivity => "productivity",
            PrimaryUse::Creative => "creative",
            PrimaryUse::Gaming => "gaming",
            PrimaryUse::Browsing => "browsing",
        }
    }
}

/// Preferred form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SizePreference {
    Compact,
    #[default]
    Standard,
    Large,
}

impl SizePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizePreference::Compact => "compact",
            SizePreference::Standard => "standard",
            SizePreference::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceNeeds {
    Basic,
    #[default]
    Moderate,
    High,
}

impl PerformanceNeeds {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceNeeds::Basic => "basic",
            PerformanceNeeds::Moderate => "moderate",
            PerformanceNeeds::High => "high",
        }
    }
}

/// Preferences collected by the recommendation dialogue
///
/// Every slot always holds a value; a fresh preference carries the
/// per-slot defaults until the customer answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserPreference {
    pub budget: Budget,
    pub primary_use: PrimaryUse,
    pub size: SizePreference,
    pub performance_needs: PerformanceNeeds,
}

impl UserPreference {
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_primary_use(mut self, primary_use: PrimaryUse) -> Self {
        self.primary_use = primary_use;
        self
    }

    pub fn with_size(mut self, size: SizePreference) -> Self {
        self.size = size;
        self
    }

    pub fn with_performance_needs(mut self, performance_needs: PerformanceNeeds) -> Self {
        self.performance_needs = performance_needs;
        self
    }
}

/// Recommendation tier of a scored product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLevel {
    /// Score 5 or more
    High,
    /// Score 3-4
    Medium,
    /// Score below 3
    Low,
}

impl RecommendationLevel {
    /// Ordering rank used for sorting (high = 3)
    pub fn rank(&self) -> u8 {
        match self {
            RecommendationLevel::High => 3,
            RecommendationLevel::Medium => 2,
            RecommendationLevel::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationLevel::High => "high",
            RecommendationLevel::Medium => "medium",
            RecommendationLevel::Low => "low",
        }
    }
}

/// A scored product, produced per request and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub product: Product,
    pub level: RecommendationLevel,
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_defaults() {
        let pref = UserPreference::default();
        assert_eq!(pref.budget, Budget::Medium);
        assert_eq!(pref.primary_use, PrimaryUse::Productivity);
        assert_eq!(pref.size, SizePreference::Standard);
        assert_eq!(pref.performance_needs, PerformanceNeeds::Moderate);
    }

    #[test]
    fn test_preference_builder() {
        let pref = UserPreference::default()
            .with_budget(Budget::Low)
            .with_primary_use(PrimaryUse::Gaming)
            .with_size(SizePreference::Compact)
            .with_performance_needs(PerformanceNeeds::High);

        assert_eq!(pref.budget.as_str(), "low");
        assert_eq!(pref.primary_use.as_str(), "gaming");
        assert_eq!(pref.size.as_str(), "compact");
        assert_eq!(pref.performance_needs.as_str(), "high");
    }

    #[test]
    fn test_level_rank_order() {
        assert!(RecommendationLevel::High.rank() > RecommendationLevel::Medium.rank());
        assert!(RecommendationLevel::Medium.rank() > RecommendationLevel::Low.rank());
    }

    #[test]
    fn test_preference_serde() {
        let pref = UserPreference::default().with_budget(Budget::High);
        let json = serde_json::to_string(&pref).unwrap();
        assert!(json.contains("\"budget\":\"high\""));
        assert!(json.contains("\"performance_needs\":\"moderate\""));
    }
}
