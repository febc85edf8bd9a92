//! Product catalog types

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Closed set of product categories sold by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(alias = "laptop", alias = "Laptops", alias = "laptops")]
    Laptop,
    #[serde(alias = "smartphone", alias = "Smartphones", alias = "smartphones")]
    Smartphone,
    #[serde(alias = "tablet", alias = "Tablets", alias = "tablets")]
    Tablet,
}

impl ProductCategory {
    /// All categories in display order
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::Laptop,
        ProductCategory::Smartphone,
        ProductCategory::Tablet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Laptop => "Laptop",
            ProductCategory::Smartphone => "Smartphone",
            ProductCategory::Tablet => "Tablet",
        }
    }

    /// Plural display name ("Laptops")
    pub fn plural(&self) -> &'static str {
        match self {
            ProductCategory::Laptop => "Laptops",
            ProductCategory::Smartphone => "Smartphones",
            ProductCategory::Tablet => "Tablets",
        }
    }

    /// Stable identifier used for category listings
    pub fn id(&self) -> &'static str {
        match self {
            ProductCategory::Laptop => "laptop",
            ProductCategory::Smartphone => "smartphone",
            ProductCategory::Tablet => "tablet",
        }
    }

    /// Parse a singular or plural category name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|category| {
            name.eq_ignore_ascii_case(category.as_str())
                || name.eq_ignore_ascii_case(category.plural())
        })
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category listing entry as returned by a catalog provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl From<ProductCategory> for Category {
    fn from(category: ProductCategory) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.plural().to_string(),
        }
    }
}

/// A single specification value
///
/// Catalog specs are heterogeneous: most are free text ("16GB DDR5"),
/// some are numbers or flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl SpecValue {
    /// Text view of the value, borrowing when it already is text
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            SpecValue::Text(text) => Cow::Borrowed(text),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Number at the start of the text, read before the first `-`
    ///
    /// `"15.6-inch 4K"`, `"13.3 inch Retina"` and `6.1" OLED` all yield
    /// their size; text that does not start with a digit yields `None`.
    pub fn leading_number(&self) -> Option<f64> {
        match self {
            SpecValue::Number(n) => Some(*n),
            SpecValue::Text(text) => {
                let head = text.split('-').next().unwrap_or_default().trim_start();
                let end = head
                    .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                    .unwrap_or(head.len());
                head[..end].parse::<f64>().ok().filter(|n| n.is_finite())
            }
            SpecValue::Flag(_) => None,
        }
    }
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Flag(true) => f.write_str("Yes"),
            SpecValue::Flag(false) => f.write_str("No"),
            SpecValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            SpecValue::Number(n) => write!(f, "{}", n),
            SpecValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::Text(value.to_string())
    }
}

impl From<String> for SpecValue {
    fn from(value: String) -> Self {
        SpecValue::Text(value)
    }
}

impl From<f64> for SpecValue {
    fn from(value: f64) -> Self {
        SpecValue::Number(value)
    }
}

impl From<bool> for SpecValue {
    fn from(value: bool) -> Self {
        SpecValue::Flag(value)
    }
}

/// Ordered attribute map of a product
///
/// Keeps insertion (document) order so spec listings read the way the
/// catalog was written. Lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specs(Vec<(String, SpecValue)>);

impl Specs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a spec, keeping the original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SpecValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SpecValue> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Specs
where
    K: Into<String>,
    V: Into<SpecValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut specs = Specs::new();
        for (key, value) in iter {
            specs.insert(key, value);
        }
        specs
    }
}

impl Serialize for Specs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Specs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SpecsVisitor;

        impl<'de> Visitor<'de> for SpecsVisitor {
            type Value = Specs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of spec names to string, number or boolean values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Specs, A::Error> {
                let mut specs = Specs::new();
                while let Some((key, raw)) = access.next_entry::<String, serde_json::Value>()? {
                    let value = match raw {
                        serde_json::Value::Bool(flag) => SpecValue::Flag(flag),
                        serde_json::Value::Number(n) => match n.as_f64() {
                            Some(n) => SpecValue::Number(n),
                            None => continue,
                        },
                        serde_json::Value::String(text) => SpecValue::Text(text),
                        other => {
                            // Nested or null spec values carry no usable evidence
                            tracing::debug!(spec = %key, value = %other, "Skipping unsupported spec value");
                            continue;
                        }
                    };
                    specs.insert(key, value);
                }
                Ok(specs)
            }
        }

        deserializer.deserialize_map(SpecsVisitor)
    }
}

/// A product record as supplied by the catalog provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier within a catalog snapshot
    pub id: String,
    /// Display name, also used as the fuzzy-match key
    pub name: String,
    #[serde(alias = "type")]
    pub category: ProductCategory,
    /// Price in the canonical comparison currency
    pub price: f64,
    /// Units on hand; `0` means listed but unavailable
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specs: Specs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Display-only prices in other currencies (code -> amount)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alt_prices: BTreeMap<String, f64>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ProductCategory,
        price: f64,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            price,
            stock,
            description: String::new(),
            specs: Specs::new(),
            company: None,
            rating: None,
            image_url: None,
            alt_prices: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<SpecValue>) -> Self {
        self.specs.insert(key, value);
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_alt_price(mut self, currency: impl Into<String>, amount: f64) -> Self {
        self.alt_prices.insert(currency.into(), amount);
        self
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn spec(&self, key: &str) -> Option<&SpecValue> {
        self.specs.get(key)
    }

    /// Text view of a spec, `None` when the product lacks it
    pub fn spec_text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.specs.get(key).map(SpecValue::as_text)
    }

    /// Check record-level invariants
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidProduct {
                id: self.id.clone(),
                message: "id must not be empty".to_string(),
            });
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidProduct {
                id: self.id.clone(),
                message: format!("price must be a non-negative amount, got {}", self.price),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_name() {
        assert_eq!(ProductCategory::from_name("laptops"), Some(ProductCategory::Laptop));
        assert_eq!(ProductCategory::from_name("Smartphone"), Some(ProductCategory::Smartphone));
        assert_eq!(ProductCategory::from_name(" TABLET "), Some(ProductCategory::Tablet));
        assert_eq!(ProductCategory::from_name("cameras"), None);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(SpecValue::from("15.6-inch 4K").leading_number(), Some(15.6));
        assert_eq!(SpecValue::from("6.7-inch AMOLED").leading_number(), Some(6.7));
        assert_eq!(SpecValue::from("Full HD").leading_number(), None);
        assert_eq!(SpecValue::from("13.3 inch Retina").leading_number(), Some(13.3));
        assert_eq!(SpecValue::from("6.1\" OLED").leading_number(), Some(6.1));
        assert_eq!(SpecValue::from("  17 inches").leading_number(), Some(17.0));
        assert_eq!(SpecValue::from("1.2.3-inch").leading_number(), None);
        assert_eq!(SpecValue::from(11.0).leading_number(), Some(11.0));
        assert_eq!(SpecValue::from(true).leading_number(), None);
    }

    #[test]
    fn test_spec_value_display() {
        assert_eq!(SpecValue::from(16.0).to_string(), "16");
        assert_eq!(SpecValue::from(6.5).to_string(), "6.5");
        assert_eq!(SpecValue::from(true).to_string(), "Yes");
        assert_eq!(SpecValue::from("M2 chip").to_string(), "M2 chip");
    }

    #[test]
    fn test_specs_keep_document_order() {
        let json = r#"{"processor": "A16 Bionic", "ram": "8GB", "display": "6.5-inch", "weight": 172}"#;
        let specs: Specs = serde_json::from_str(json).unwrap();

        let keys: Vec<&str> = specs.keys().collect();
        assert_eq!(keys, vec!["processor", "ram", "display", "weight"]);
        assert_eq!(specs.get("WEIGHT"), Some(&SpecValue::Number(172.0)));
    }

    #[test]
    fn test_specs_skip_unsupported_values() {
        let json = r#"{"ports": ["usb-c", "hdmi"], "ram": "16GB", "extra": null, "stylus": true}"#;
        let specs: Specs = serde_json::from_str(json).unwrap();

        assert_eq!(specs.len(), 2);
        assert!(specs.get("ports").is_none());
        assert_eq!(specs.get("stylus"), Some(&SpecValue::Flag(true)));
    }

    #[test]
    fn test_product_from_yaml_with_type_alias() {
        let yaml = r#"
id: tablet-1
name: SlateTab Pro
type: Tablet
price: 649.99
stock: 19
specs:
  processor: M2 chip
  display: 11-inch Liquid Retina
"#;
        let product: Product = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(product.category, ProductCategory::Tablet);
        assert_eq!(product.spec_text("processor").as_deref(), Some("M2 chip"));
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_product_validation() {
        let product = Product::new("p-1", "Thing", ProductCategory::Laptop, 10.0, 0);
        assert!(product.validate().is_ok());
        assert!(!product.is_in_stock());

        let negative = Product::new("p-2", "Thing", ProductCategory::Laptop, -1.0, 3);
        assert!(negative.validate().is_err());

        let unnamed = Product::new(" ", "Thing", ProductCategory::Laptop, 1.0, 3);
        assert!(unnamed.validate().is_err());
    }
}
