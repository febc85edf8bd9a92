//! Recommendation Dialogue
//!
//! Four linear steps collect a [`UserPreference`]:
//! budget → primary use → size → performance needs → complete.
//!
//! The flow is a plain value: [`RecommendationFlow::advance`] consumes one
//! answer, plus the numeric choice the classifier pulled out of it, and
//! returns the next flow or the finished preference. Answers are never
//! rejected; anything unrecognized takes the slot default.

use serde::{Deserialize, Serialize};
use shop_assistant_core::{Budget, PerformanceNeeds, PrimaryUse, SizePreference, UserPreference};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStep {
    Budget,
    PrimaryUse,
    Size,
    PerformanceNeeds,
    Complete,
}

impl RecommendationStep {
    /// The step after this one; `Complete` is terminal
    pub fn next(&self) -> RecommendationStep {
        match self {
            RecommendationStep::Budget => RecommendationStep::PrimaryUse,
            RecommendationStep::PrimaryUse => RecommendationStep::Size,
            RecommendationStep::Size => RecommendationStep::PerformanceNeeds,
            RecommendationStep::PerformanceNeeds | RecommendationStep::Complete => {
                RecommendationStep::Complete
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RecommendationStep::Complete)
    }
}

/// In-progress recommendation dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationFlow {
    step: RecommendationStep,
    preference: UserPreference,
}

/// Outcome of feeding one answer to the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTransition {
    /// More questions to ask; prompt for `flow.step()`
    Continue(RecommendationFlow),
    /// All four slots filled
    Complete(UserPreference),
}

impl RecommendationFlow {
    /// Start at the budget question with default slots
    pub fn start() -> Self {
        Self {
            step: RecommendationStep::Budget,
            preference: UserPreference::default(),
        }
    }

    pub fn step(&self) -> RecommendationStep {
        self.step
    }

    pub fn preference(&self) -> &UserPreference {
        &self.preference
    }

    /// Consume one answer for the current step
    ///
    /// `choice` is the inline option number ("2", "option 3") and wins
    /// over keywords.
    pub fn advance(self, answer: &str, choice: Option<u8>) -> FlowTransition {
        let mut preference = self.preference;
        match self.step {
            RecommendationStep::Budget => preference.budget = parse_budget(answer, choice),
            RecommendationStep::PrimaryUse => {
                preference.primary_use = parse_primary_use(answer, choice)
            }
            RecommendationStep::Size => preference.size = parse_size(answer, choice),
            RecommendationStep::PerformanceNeeds => {
                preference.performance_needs = parse_performance(answer, choice)
            }
            RecommendationStep::Complete => return FlowTransition::Complete(preference),
        }

        let step = self.step.next();
        tracing::debug!(from = ?self.step, to = ?step, ?preference, "Recommendation step answered");

        if step.is_terminal() {
            FlowTransition::Complete(preference)
        } else {
            FlowTransition::Continue(Self { step, preference })
        }
    }
}

fn mentions(answer: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| answer.contains(k))
}

/// "1"/"low"/"under 500" → low, "3"/"high"/"over 1000" → high, else medium
pub fn parse_budget(answer: &str, choice: Option<u8>) -> Budget {
    let lower = answer.to_lowercase();
    match choice {
        Some(1) => return Budget::Low,
        Some(2) => return Budget::Medium,
        Some(3) => return Budget::High,
        _ => {}
    }
    if mentions(&lower, &["low", "under 500", "cheap", "affordable"]) {
        Budget::Low
    } else if mentions(&lower, &["high", "over 1000", "premium", "expensive"]) {
        Budget::High
    } else {
        Budget::default()
    }
}

/// Gaming is checked before creative so "video games" reads as gaming
pub fn parse_primary_use(answer: &str, choice: Option<u8>) -> PrimaryUse {
    let lower = answer.to_lowercase();
    match choice {
        Some(1) => return PrimaryUse::Productivity,
        Some(2) => return PrimaryUse::Creative,
        Some(3) => return PrimaryUse::Gaming,
        Some(4) => return PrimaryUse::Browsing,
        _ => {}
    }
    if mentions(&lower, &["gaming", "game"]) {
        PrimaryUse::Gaming
    } else if mentions(&lower, &["creative", "design", "editing", "video", "photo"]) {
        PrimaryUse::Creative
    } else if mentions(&lower, &["browsing", "browse", "web", "media", "stream"]) {
        PrimaryUse::Browsing
    } else {
        PrimaryUse::default()
    }
}

pub fn parse_size(answer: &str, choice: Option<u8>) -> SizePreference {
    let lower = answer.to_lowercase();
    match choice {
        Some(1) => return SizePreference::Compact,
        Some(2) => return SizePreference::Standard,
        Some(3) => return SizePreference::Large,
        _ => {}
    }
    if mentions(&lower, &["compact", "small", "portable"]) {
        SizePreference::Compact
    } else if mentions(&lower, &["large", "big"]) {
        SizePreference::Large
    } else {
        SizePreference::default()
    }
}

pub fn parse_performance(answer: &str, choice: Option<u8>) -> PerformanceNeeds {
    let lower = answer.to_lowercase();
    match choice {
        Some(1) => return PerformanceNeeds::Basic,
        Some(2) => return PerformanceNeeds::Moderate,
        Some(3) => return PerformanceNeeds::High,
        _ => {}
    }
    if mentions(&lower, &["high", "powerful", "demanding", "fast"]) {
        PerformanceNeeds::High
    } else if mentions(&lower, &["basic", "light", "simple"]) {
        PerformanceNeeds::Basic
    } else {
        PerformanceNeeds::default()
    }
}
