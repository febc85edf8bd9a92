//! Core traits for the shop assistant
//!
//! ```text
//! Catalog:
//!   - CatalogProvider: read-only source of products and categories
//! ```

mod catalog;

pub use catalog::{derive_categories, CatalogProvider};
