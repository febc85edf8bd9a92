//! Core traits and types for the shop assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Product catalog types (products, categories, heterogeneous specs)
//! - Recommendation preference and result types
//! - Conversation message types
//! - The catalog provider trait
//! - Error types

pub mod error;
pub mod message;
pub mod preference;
pub mod product;
pub mod traits;

pub use error::{Error, Error as CatalogError, Result};
pub use message::{
    ConversationMessage, MessageAttachment, ProductCard, RecommendationCard, Sender,
};
pub use preference::{
    Budget, PerformanceNeeds, PrimaryUse, RecommendationLevel, RecommendationResult,
    SizePreference, UserPreference,
};
pub use product::{Category, Product, ProductCategory, SpecValue, Specs};
pub use traits::{derive_categories, CatalogProvider};
