//! Catalog Repository
//!
//! Wraps a [`CatalogProvider`] behind an explicit load state and hands
//! out immutable snapshots, so resolution and scoring stay synchronous.
//! A failed fetch never reaches the customer: it is logged, recorded as
//! [`CatalogState::Failed`] and served as an empty snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shop_assistant_config::{load_catalog_str, CatalogFormat, ConfigError};
use shop_assistant_core::{
    derive_categories, CatalogError, CatalogProvider, Category, Product, ProductCategory,
};

/// Immutable view of the catalog for one decision
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn by_category(&self, category: ProductCategory) -> Vec<&Product> {
        self.products.iter().filter(|p| p.category == category).collect()
    }

    /// Products with stock, catalog order
    pub fn available(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_in_stock()).collect()
    }

    /// Products priced within `[min, max]`, both ends inclusive
    pub fn price_range(&self, min: f64, max: f64) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.price >= min && p.price <= max)
            .collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        derive_categories(&self.products)
    }
}

/// Load state of the repository
#[derive(Debug, Clone)]
pub enum CatalogState {
    NotLoaded,
    Loaded(Arc<CatalogSnapshot>),
    /// Last fetch failed; the message is kept for diagnostics
    Failed(String),
}

/// Catalog access with explicit load state
pub struct CatalogRepository {
    provider: Arc<dyn CatalogProvider>,
    state: RwLock<CatalogState>,
}

impl CatalogRepository {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(CatalogState::NotLoaded),
        }
    }

    pub fn state(&self) -> CatalogState {
        self.state.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.read(), CatalogState::Loaded(_))
    }

    /// Current snapshot; empty unless a fetch has succeeded
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        match &*self.state.read() {
            CatalogState::Loaded(snapshot) => Arc::clone(snapshot),
            CatalogState::NotLoaded | CatalogState::Failed(_) => Arc::new(CatalogSnapshot::empty()),
        }
    }

    /// Fetch from the provider and replace the snapshot
    ///
    /// Always yields a snapshot; failures degrade to an empty one.
    pub async fn refresh(&self) -> Arc<CatalogSnapshot> {
        match self.provider.fetch_products().await {
            Ok(products) => {
                tracing::info!(
                    provider = self.provider.name(),
                    products = products.len(),
                    "Catalog loaded"
                );
                let snapshot = Arc::new(CatalogSnapshot::new(products));
                *self.state.write() = CatalogState::Loaded(Arc::clone(&snapshot));
                snapshot
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Catalog fetch failed, serving empty catalog"
                );
                *self.state.write() = CatalogState::Failed(e.to_string());
                Arc::new(CatalogSnapshot::empty())
            }
        }
    }

    /// Load once, then keep serving the loaded snapshot
    pub async fn ensure_loaded(&self) -> Arc<CatalogSnapshot> {
        if self.is_loaded() {
            self.snapshot()
        } else {
            self.refresh().await
        }
    }

    /// Category listing from the provider, or derived from the snapshot
    pub async fn categories(&self) -> Vec<Category> {
        match self.provider.fetch_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Category fetch failed");
                self.snapshot().categories()
            }
        }
    }
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_products(&self) -> shop_assistant_core::Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// YAML/JSON catalog file, re-read on every fetch
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
    format: CatalogFormat,
    strict: bool,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>, strict: bool) -> Result<Self, ConfigError> {
        let path = path.into();
        let format = CatalogFormat::from_path(&path).ok_or_else(|| ConfigError::InvalidValue {
            field: "catalog.path".to_string(),
            message: format!("Unsupported catalog file: {}", path.display()),
        })?;
        Ok(Self {
            path,
            format,
            strict,
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl CatalogProvider for FileCatalog {
    async fn fetch_products(&self) -> shop_assistant_core::Result<Vec<Product>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        load_catalog_str(&content, self.format, self.strict)
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_assistant_config::demo_catalog;
    use std::io::Write;

    struct UnavailableCatalog;

    #[async_trait]
    impl CatalogProvider for UnavailableCatalog {
        async fn fetch_products(&self) -> shop_assistant_core::Result<Vec<Product>> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "unavailable"
        }
    }

    #[test]
    fn test_snapshot_helpers() {
        let snapshot = CatalogSnapshot::new(demo_catalog());
        assert_eq!(snapshot.len(), 15);
        assert_eq!(snapshot.by_id("laptop-2").map(|p| p.name.as_str()), Some("UltraSlim 7"));
        assert!(snapshot.by_id("missing").is_none());
        assert_eq!(snapshot.by_category(ProductCategory::Smartphone).len(), 5);
        assert_eq!(snapshot.available().len(), 12);
        assert_eq!(snapshot.categories().len(), 3);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let snapshot = CatalogSnapshot::new(vec![
            Product::new("a", "A", ProductCategory::Tablet, 500.0, 1),
            Product::new("b", "B", ProductCategory::Tablet, 1000.0, 1),
            Product::new("c", "C", ProductCategory::Tablet, 1000.01, 1),
        ]);
        let ids: Vec<&str> = snapshot
            .price_range(500.0, 1000.0)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_repository_load_states() {
        let repo = CatalogRepository::new(Arc::new(StaticCatalog::new(demo_catalog())));
        assert!(matches!(repo.state(), CatalogState::NotLoaded));
        assert!(repo.snapshot().is_empty());

        let snapshot = repo.refresh().await;
        assert_eq!(snapshot.len(), 15);
        assert!(repo.is_loaded());
        assert_eq!(repo.snapshot().len(), 15);
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_to_empty() {
        let repo = CatalogRepository::new(Arc::new(UnavailableCatalog));
        let snapshot = repo.refresh().await;

        assert!(snapshot.is_empty());
        match repo.state() {
            CatalogState::Failed(message) => assert!(message.contains("connection refused")),
            other => panic!("expected failed state, got {:?}", other),
        }
        assert!(repo.categories().await.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_loaded_fetches_once() {
        let repo = CatalogRepository::new(Arc::new(StaticCatalog::new(demo_catalog())));
        let first = repo.ensure_loaded().await;
        let second = repo.ensure_loaded().await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_file_catalog_rereads_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id": "t1", "name": "Kindle Fire HD", "category": "Tablet", "price": 199.99, "stock": 31}}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let provider = FileCatalog::new(file.path(), true).unwrap();
        let products = provider.fetch_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Kindle Fire HD");

        std::fs::write(
            file.path(),
            r#"{"products": [{"id": "t1", "name": "A", "category": "Tablet", "price": 1.0, "stock": 1},
                             {"id": "t2", "name": "B", "category": "Tablet", "price": 2.0, "stock": 0}]}"#,
        )
        .unwrap();
        assert_eq!(provider.fetch_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_file_catalog_errors() {
        assert!(FileCatalog::new("catalog.csv", false).is_err());

        let provider = FileCatalog::new("/nonexistent/catalog.yaml", false).unwrap();
        assert!(matches!(provider.fetch_products().await, Err(CatalogError::Io(_))));

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "products: [").unwrap();
        file.flush().unwrap();
        let provider = FileCatalog::new(file.path(), false).unwrap();
        assert!(matches!(provider.fetch_products().await, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_file_catalog_strictness() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id": "t1", "name": "A", "category": "Tablet", "price": 1.0, "stock": 1}},
                {{"id": "t1", "name": "B", "category": "Tablet", "price": 2.0, "stock": 1}}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let relaxed = FileCatalog::new(file.path(), false).unwrap();
        let products = relaxed.fetch_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "A");

        let strict = FileCatalog::new(file.path(), true).unwrap();
        assert!(matches!(strict.fetch_products().await, Err(CatalogError::Parse(_))));
    }
}
