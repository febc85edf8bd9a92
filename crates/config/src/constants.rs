//! Centralized constants for the shop assistant
//!
//! Scoring bonuses and thresholds are fixed business values. They are
//! reproduced exactly and are not exposed as settings.

/// Budget tier boundaries (canonical currency)
///
/// Tiers are half-open: low `[0, LOW_MAX)`, medium `[LOW_MAX, MEDIUM_MAX)`,
/// high `[MEDIUM_MAX, ∞)`.
pub mod budget {
    pub const LOW_MAX: f64 = 500.0;
    pub const MEDIUM_MAX: f64 = 1000.0;
}

/// Recommendation scoring
pub mod scoring {
    /// High performance need met by a flagship processor
    pub const PERFORMANCE_BONUS: u32 = 3;

    /// Gaming or creative use met by name/GPU evidence
    pub const USE_CASE_BONUS: u32 = 3;

    /// Display size on the requested side of the category threshold
    pub const SIZE_BONUS: u32 = 2;

    /// Minimum score for the high tier
    pub const HIGH_LEVEL_MIN: u32 = 5;

    /// Minimum score for the medium tier
    pub const MEDIUM_LEVEL_MIN: u32 = 3;

    /// Laptop processors that count as high performance
    pub const LAPTOP_FLAGSHIP_CPUS: &[&str] = &["i9", "Ryzen 9"];

    /// Smartphone processors that count as high performance
    pub const SMARTPHONE_FLAGSHIP_CPUS: &[&str] = &["8 Gen 2", "A16"];
}

/// Display size thresholds in inches
///
/// Strictly below is compact, strictly above is large.
pub mod size_thresholds {
    pub const LAPTOP: f64 = 15.0;
    pub const TABLET: f64 = 11.0;
    pub const SMARTPHONE: f64 = 6.5;
}

/// Entity matching
pub mod matching {
    /// Window width of the fuzzy product-name pass
    pub const FUZZY_WINDOW_CHARS: usize = 4;
}

/// Assistant defaults
pub mod assistant {
    pub const DEFAULT_NAME: &str = "Shop Assistant";

    pub const INITIAL_GREETING: &str =
        "Hello! I'm your product support assistant. How can I help you today?";

    /// Simulated typing delay; 0 disables it
    pub const DEFAULT_TYPING_DELAY_MS: u64 = 0;

    pub const MAX_TYPING_DELAY_MS: u64 = 10_000;

    /// Capacity of the assistant event broadcast channel
    pub const EVENT_CHANNEL_CAPACITY: usize = 100;
}

/// Catalog file handling
pub mod catalog {
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
}
