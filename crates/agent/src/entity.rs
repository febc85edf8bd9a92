//! Entity Resolution
//!
//! Finds the product or category an utterance refers to. Product lookup
//! tries exact name containment first and then a crude 4-character
//! window pass over every product name. The window pass false-positives
//! on short overlapping names; callers that also accept a category should
//! prefer the category over a fuzzy hit.

use once_cell::sync::Lazy;
use regex::Regex;
use shop_assistant_config::constants::matching::FUZZY_WINDOW_CHARS;
use shop_assistant_core::{Product, ProductCategory};

/// Filler phrases removed before matching, longest first
const FILLER_PHRASES: &[&str] = &[
    "price of",
    "specs of",
    "tell me about",
    "info on",
    "details on",
    "about the",
    "the",
    "is",
    "are",
    "have",
    "has",
];

static FILLER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = FILLER_PHRASES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("valid filler regex")
});

/// Category keyword map, iteration order decides ties
const CATEGORY_KEYWORDS: &[(&str, ProductCategory)] = &[
    ("laptop", ProductCategory::Laptop),
    ("computer", ProductCategory::Laptop),
    ("notebook", ProductCategory::Laptop),
    ("smartphone", ProductCategory::Smartphone),
    ("phone", ProductCategory::Smartphone),
    ("mobile", ProductCategory::Smartphone),
    ("cellphone", ProductCategory::Smartphone),
    ("tablet", ProductCategory::Tablet),
    ("ipad", ProductCategory::Tablet),
    ("slate", ProductCategory::Tablet),
];

/// Separators between comparison targets
const COMPARISON_SEPARATORS: &[&str] = &["vs", "versus", "and", "with", "or", "between", "compare"];

/// How a product was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Full name contained in the query
    Exact,
    /// A 4-character chunk of the name contained in the query
    Fuzzy,
}

#[derive(Debug, Clone, Copy)]
pub struct ProductMatch<'a> {
    pub product: &'a Product,
    pub kind: MatchKind,
}

impl<'a> ProductMatch<'a> {
    pub fn is_exact(&self) -> bool {
        self.kind == MatchKind::Exact
    }
}

/// Lower-case the query, strip filler phrases and collapse whitespace
pub fn clean_query(query: &str) -> String {
    let stripped = FILLER_PATTERN.replace_all(query, " ");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve the product a query refers to
///
/// First catalog-order hit wins in both passes; no match is a normal
/// outcome.
pub fn resolve_product<'a>(query: &str, products: &'a [Product]) -> Option<ProductMatch<'a>> {
    let cleaned = clean_query(query);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(product) = products.iter().find(|p| names_product(&cleaned, p)) {
        tracing::debug!(product = %product.name, "Resolved product by exact name");
        return Some(ProductMatch {
            product,
            kind: MatchKind::Exact,
        });
    }

    let product = products
        .iter()
        .find(|p| shares_name_window(&cleaned, &p.name))?;
    tracing::debug!(product = %product.name, query = %cleaned, "Resolved product by name fragment");
    Some(ProductMatch {
        product,
        kind: MatchKind::Fuzzy,
    })
}

/// Whether the cleaned query contains the product's full name
///
/// The name goes through the same filler stripping as the query, so
/// "The Frame" is found by "the frame".
fn names_product(cleaned: &str, product: &Product) -> bool {
    let name = clean_query(&product.name);
    !name.is_empty() && cleaned.contains(&name)
}

/// Whether any window of the lower-cased name occurs verbatim in `cleaned`
fn shares_name_window(cleaned: &str, name: &str) -> bool {
    let chars: Vec<char> = name.to_lowercase().chars().collect();
    chars
        .windows(FUZZY_WINDOW_CHARS)
        .any(|window| cleaned.contains(&window.iter().collect::<String>()))
}

/// Resolve the category a query mentions
pub fn resolve_category(query: &str) -> Option<ProductCategory> {
    let lower = query.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
}

/// All products of a category in catalog order (possibly empty)
pub fn products_in_category(products: &[Product], category: ProductCategory) -> Vec<&Product> {
    products.iter().filter(|p| p.category == category).collect()
}

/// Resolve every product a comparison request names
///
/// Exact names anywhere in the query come first; otherwise the query is
/// split on separators ("vs", "and", ...) and each part resolved on its
/// own. Duplicates are dropped by id.
pub fn resolve_comparison<'a>(query: &str, products: &'a [Product]) -> Vec<&'a Product> {
    let cleaned = clean_query(query);
    let exact: Vec<&Product> = products
        .iter()
        .filter(|p| names_product(&cleaned, p))
        .collect();
    if exact.len() >= 2 {
        return exact;
    }

    let mut found: Vec<&Product> = Vec::new();
    for part in split_targets(&cleaned) {
        if let Some(m) = resolve_product(&part, products) {
            if !found.iter().any(|p| p.id == m.product.id) {
                found.push(m.product);
            }
        }
    }

    if found.len() < exact.len() {
        return exact;
    }
    found
}

fn split_targets(cleaned: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in cleaned.split_whitespace() {
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
        if COMPARISON_SEPARATORS.contains(&bare) {
            if !current.is_empty() {
                parts.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        parts.push(current.join(" "));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_assistant_config::demo_catalog;

    #[test]
    fn test_clean_query() {
        assert_eq!(clean_query("How much is the UltraSlim 7"), "how much ultraslim 7");
        assert_eq!(clean_query("Tell me about the Pixel Ultra"), "pixel ultra");
        assert_eq!(clean_query("price of   iPad Air?"), "ipad air?");
        // Filler words inside other words survive
        assert_eq!(clean_query("this theme"), "this theme");
    }

    #[test]
    fn test_every_product_resolves_by_full_name() {
        let catalog = demo_catalog();
        for product in &catalog {
            let query = format!("tell me about the {}", product.name.to_uppercase());
            let m = resolve_product(&query, &catalog).unwrap();
            assert_eq!(m.product.id, product.id, "query: {}", query);
            assert!(m.is_exact());
        }

        let filler_names = vec![
            Product::new("a", "Frame Lite", ProductCategory::Tablet, 300.0, 1),
            Product::new("b", "The Frame", ProductCategory::Tablet, 400.0, 1),
            Product::new("c", "What Is It", ProductCategory::Smartphone, 500.0, 1),
        ];
        for product in &filler_names {
            for query in [product.name.clone(), format!("how much is the {}", product.name)] {
                let m = resolve_product(&query, &filler_names).unwrap();
                assert_eq!(m.product.id, product.id, "query: {}", query);
                assert!(m.is_exact());
            }
        }

        let found = resolve_comparison("compare The Frame vs What Is It", &filler_names);
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_fuzzy_window_match() {
        let catalog = demo_catalog();
        let m = resolve_product("how much is the ultraslim", &catalog).unwrap();
        assert_eq!(m.product.name, "UltraSlim 7");
        assert_eq!(m.kind, MatchKind::Fuzzy);
    }

    #[test]
    fn test_fuzzy_false_positive_is_kept() {
        // " tab" inside "tablets" hits "Galaxy Tab Ultra"
        let catalog = demo_catalog();
        let m = resolve_product("any tablets", &catalog).unwrap();
        assert_eq!(m.product.name, "Galaxy Tab Ultra");
        assert_eq!(m.kind, MatchKind::Fuzzy);
    }

    #[test]
    fn test_no_match() {
        let catalog = demo_catalog();
        assert!(resolve_product("How much is the Quantum Widget?", &catalog).is_none());
        assert!(resolve_product("the", &catalog).is_none());
        assert!(resolve_product("iPad Air", &[]).is_none());
    }

    #[test]
    fn test_catalog_order_wins() {
        let products = vec![
            Product::new("a", "Nova", ProductCategory::Tablet, 100.0, 1),
            Product::new("b", "Nova Max", ProductCategory::Tablet, 200.0, 1),
        ];
        let m = resolve_product("nova max", &products).unwrap();
        assert_eq!(m.product.id, "a");
    }

    #[test]
    fn test_short_names_never_fuzzy_match() {
        let products = vec![Product::new("a", "Zen", ProductCategory::Tablet, 100.0, 1)];
        assert!(resolve_product("zero", &products).is_none());
        assert!(resolve_product("a zen garden", &products).is_some());
    }

    #[test]
    fn test_resolve_category() {
        assert_eq!(resolve_category("What laptops do you have?"), Some(ProductCategory::Laptop));
        assert_eq!(resolve_category("a new notebook"), Some(ProductCategory::Laptop));
        assert_eq!(resolve_category("cheap mobile"), Some(ProductCategory::Smartphone));
        assert_eq!(resolve_category("iPad or similar"), Some(ProductCategory::Tablet));
        assert_eq!(resolve_category("headphones"), Some(ProductCategory::Smartphone));
        assert_eq!(resolve_category("cameras"), None);
    }

    #[test]
    fn test_products_in_category() {
        let catalog = demo_catalog();
        let tablets = products_in_category(&catalog, ProductCategory::Tablet);
        assert_eq!(tablets.len(), 5);
        assert!(products_in_category(&[], ProductCategory::Tablet).is_empty());
    }

    #[test]
    fn test_resolve_comparison() {
        let catalog = demo_catalog();

        let found = resolve_comparison("compare Pixel Ultra vs iConnect Pro", &catalog);
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pixel Ultra", "iConnect Pro"]);

        let found = resolve_comparison("difference between ultraslim and probook", &catalog);
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["UltraSlim 7", "ProBook X5"]);

        assert!(resolve_comparison("compare nothing", &catalog).is_empty());
    }
}
