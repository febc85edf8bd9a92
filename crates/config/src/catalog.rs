//! Catalog sources: the built-in demo catalog and YAML/JSON catalog files

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use shop_assistant_core::{Product, ProductCategory};

use crate::ConfigError;

/// On-disk catalog encoding, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(CatalogFormat::Yaml),
            "json" => Some(CatalogFormat::Json),
            _ => None,
        }
    }
}

/// A catalog file is either a bare product list or `{ products: [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl CatalogDocument {
    fn into_products(self) -> Vec<Product> {
        match self {
            CatalogDocument::List(products) => products,
            CatalogDocument::Wrapped { products } => products,
        }
    }
}

/// Parse catalog text without validating it
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<Vec<Product>, ConfigError> {
    let document: CatalogDocument = match format {
        CatalogFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("YAML catalog: {}", e)))?,
        CatalogFormat::Json => serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON catalog: {}", e)))?,
    };
    Ok(document.into_products())
}

/// Enforce catalog invariants
///
/// Strict mode rejects the catalog on the first duplicate id or invalid
/// record. Otherwise offending records are logged and dropped, keeping
/// the first occurrence of a duplicated id.
pub fn validate_products(products: Vec<Product>, strict: bool) -> Result<Vec<Product>, ConfigError> {
    let mut seen = HashSet::new();
    let mut valid = Vec::with_capacity(products.len());

    for product in products {
        if let Err(e) = product.validate() {
            if strict {
                return Err(ConfigError::InvalidCatalog(e.to_string()));
            }
            tracing::warn!(product_id = %product.id, error = %e, "Dropping invalid product");
            continue;
        }

        if !seen.insert(product.id.clone()) {
            if strict {
                return Err(ConfigError::InvalidCatalog(format!(
                    "Duplicate product id: {}",
                    product.id
                )));
            }
            tracing::warn!(product_id = %product.id, "Dropping duplicate product id");
            continue;
        }

        valid.push(product);
    }

    Ok(valid)
}

/// Parse and validate catalog text in one step
pub fn load_catalog_str(
    content: &str,
    format: CatalogFormat,
    strict: bool,
) -> Result<Vec<Product>, ConfigError> {
    let products = validate_products(parse_catalog(content, format)?, strict)?;
    tracing::debug!(?format, products = products.len(), strict, "Loaded catalog");
    Ok(products)
}

/// The storefront's demo catalog: five laptops, five smartphones and
/// five tablets, some of them out of stock
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new("laptop-1", "ProBook X5", ProductCategory::Laptop, 1299.99, 23)
            .with_description("High-performance laptop for professionals with a sleek design")
            .with_spec("processor", "Intel Core i7-12700H")
            .with_spec("ram", "16GB DDR5")
            .with_spec("storage", "512GB SSD")
            .with_spec("display", "15.6-inch 4K")
            .with_spec("battery", "10 hours")
            .with_spec("weight", "1.8kg"),
        Product::new("laptop-2", "UltraSlim 7", ProductCategory::Laptop, 899.99, 15)
            .with_description("Ultra-thin and lightweight laptop for on-the-go productivity")
            .with_spec("processor", "AMD Ryzen 7 5800U")
            .with_spec("ram", "8GB DDR4")
            .with_spec("storage", "256GB SSD")
            .with_spec("display", "14-inch Full HD")
            .with_spec("battery", "12 hours")
            .with_spec("weight", "1.3kg"),
        Product::new("laptop-3", "GameMaster Pro", ProductCategory::Laptop, 1799.99, 7)
            .with_description("Ultimate gaming laptop with RGB lighting and powerful cooling")
            .with_spec("processor", "Intel Core i9-12900HK")
            .with_spec("ram", "32GB DDR5")
            .with_spec("storage", "1TB NVMe SSD")
            .with_spec("display", "17.3-inch 165Hz")
            .with_spec("gpu", "NVIDIA RTX 4080 Mobile")
            .with_spec("battery", "6 hours")
            .with_spec("weight", "2.5kg"),
        Product::new("laptop-4", "BusinessBook Air", ProductCategory::Laptop, 1099.99, 0)
            .with_description("Slim business laptop with enterprise-grade security features")
            .with_spec("processor", "Intel Core i5-1240P")
            .with_spec("ram", "16GB DDR4")
            .with_spec("storage", "512GB SSD")
            .with_spec("display", "13.3-inch QHD")
            .with_spec("battery", "14 hours")
            .with_spec("weight", "1.2kg"),
        Product::new("laptop-5", "CreativePro Studio", ProductCategory::Laptop, 2199.99, 3)
            .with_description("Designed for creative professionals with color-accurate display")
            .with_spec("processor", "AMD Ryzen 9 7950X")
            .with_spec("ram", "64GB DDR5")
            .with_spec("storage", "2TB SSD")
            .with_spec("display", "16-inch 4K OLED")
            .with_spec("gpu", "AMD Radeon Pro")
            .with_spec("battery", "8 hours")
            .with_spec("weight", "2.1kg"),
        Product::new("smartphone-1", "Pixel Ultra", ProductCategory::Smartphone, 899.99, 42)
            .with_description("Premium smartphone with the best camera on the market")
            .with_spec("processor", "Snapdragon 8 Gen 2")
            .with_spec("ram", "12GB")
            .with_spec("storage", "256GB")
            .with_spec("display", "6.7-inch AMOLED")
            .with_spec("battery", "5000mAh")
            .with_spec("camera", "108MP main + 48MP ultrawide"),
        Product::new("smartphone-2", "iConnect Pro", ProductCategory::Smartphone, 1099.99, 18)
            .with_description("Flagship smartphone with the latest features and premium design")
            .with_spec("processor", "A16 Bionic")
            .with_spec("ram", "8GB")
            .with_spec("storage", "512GB")
            .with_spec("display", "6.5-inch Super Retina XDR")
            .with_spec("battery", "4500mAh")
            .with_spec("camera", "48MP triple camera system"),
        Product::new("smartphone-3", "Galaxy Edge", ProductCategory::Smartphone, 799.99, 0)
            .with_description("Feature-packed smartphone with curved edge display")
            .with_spec("processor", "Exynos 2200")
            .with_spec("ram", "16GB")
            .with_spec("storage", "256GB")
            .with_spec("display", "6.8-inch Dynamic AMOLED")
            .with_spec("battery", "5500mAh")
            .with_spec("camera", "108MP quad camera"),
        Product::new("smartphone-4", "Essential Lite", ProductCategory::Smartphone, 399.99, 56)
            .with_description("Affordable smartphone with all essential features")
            .with_spec("processor", "MediaTek Dimensity 900")
            .with_spec("ram", "6GB")
            .with_spec("storage", "128GB")
            .with_spec("display", "6.4-inch LCD")
            .with_spec("battery", "4800mAh")
            .with_spec("camera", "64MP main + 8MP wide"),
        Product::new("smartphone-5", "Note Master", ProductCategory::Smartphone, 849.99, 11)
            .with_description("Large smartphone with stylus support for productivity")
            .with_spec("processor", "Snapdragon 8+ Gen 1")
            .with_spec("ram", "12GB")
            .with_spec("storage", "512GB")
            .with_spec("display", "6.9-inch LTPO AMOLED")
            .with_spec("battery", "5200mAh")
            .with_spec("camera", "50MP triple camera"),
        Product::new("tablet-1", "SlateTab Pro", ProductCategory::Tablet, 649.99, 19)
            .with_description("Professional-grade tablet with stylus support")
            .with_spec("processor", "M2 chip")
            .with_spec("ram", "8GB")
            .with_spec("storage", "256GB")
            .with_spec("display", "11-inch Liquid Retina")
            .with_spec("battery", "10 hours")
            .with_spec("weight", "466g"),
        Product::new("tablet-2", "Galaxy Tab Ultra", ProductCategory::Tablet, 899.99, 7)
            .with_description("Premium Android tablet with desktop-like productivity")
            .with_spec("processor", "Snapdragon 8 Gen 2")
            .with_spec("ram", "16GB")
            .with_spec("storage", "512GB")
            .with_spec("display", "12.4-inch Super AMOLED")
            .with_spec("battery", "12 hours")
            .with_spec("weight", "575g"),
        Product::new("tablet-3", "Surface Go", ProductCategory::Tablet, 499.99, 0)
            .with_description("Versatile 2-in-1 tablet that transforms into a laptop")
            .with_spec("processor", "Intel Core i3-1115G4")
            .with_spec("ram", "8GB")
            .with_spec("storage", "128GB")
            .with_spec("display", "10.5-inch PixelSense")
            .with_spec("battery", "11 hours")
            .with_spec("weight", "544g"),
        Product::new("tablet-4", "Kindle Fire HD", ProductCategory::Tablet, 199.99, 31)
            .with_description("Affordable entertainment tablet for reading and streaming")
            .with_spec("processor", "MediaTek MT8183")
            .with_spec("ram", "4GB")
            .with_spec("storage", "64GB")
            .with_spec("display", "10.1-inch Full HD")
            .with_spec("battery", "12 hours")
            .with_spec("weight", "465g"),
        Product::new("tablet-5", "iPad Air", ProductCategory::Tablet, 599.99, 13)
            .with_description("Thin and powerful tablet for creative work and entertainment")
            .with_spec("processor", "A16 Bionic")
            .with_spec("ram", "8GB")
            .with_spec("storage", "256GB")
            .with_spec("display", "10.9-inch Liquid Retina")
            .with_spec("battery", "10 hours")
            .with_spec("weight", "461g"),
    ]
}
