//! Catalog provider trait

use async_trait::async_trait;

use crate::{Category, Product, ProductCategory, Result};

/// Read-only source of the product catalog
///
/// Implementations:
/// - `StaticCatalog` - in-memory product list
/// - `FileCatalog` - YAML/JSON file re-read on every fetch
///
/// # Example
///
/// ```ignore
/// let provider: Arc<dyn CatalogProvider> = Arc::new(StaticCatalog::new(products));
/// let products = provider.fetch_products().await?;
/// ```
#[async_trait]
pub trait CatalogProvider: Send + Sync + 'static {
    /// Fetch every product in catalog order
    async fn fetch_products(&self) -> Result<Vec<Product>>;

    /// Fetch the category listing
    ///
    /// Providers without a category endpoint get the categories present
    /// in the product list, in first-seen order.
    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let products = self.fetch_products().await?;
        Ok(derive_categories(&products))
    }

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Distinct categories of `products`, first-seen order
pub fn derive_categories(products: &[Product]) -> Vec<Category> {
    let mut seen: Vec<ProductCategory> = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category);
        }
    }
    seen.into_iter().map(Category::from).collect()
}
