use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductColor {
    pub name: String,
    pub hex: String,
}

impl ProductColor {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self { name: name.into(), hex: hex.into() }
    }
}

/// Catalog entry. Immutable for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
    pub price: Decimal,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_best_seller: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    pub fn has_color(&self, name: &str) -> bool {
        self.colors.iter().any(|color| color.name == name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Product, ProductId};

    #[test]
    fn catalog_json_uses_camel_case_flags_and_defaults() {
        let raw = r##"{
            "id": "7",
            "name": "Graphic Oversized Tee",
            "category": "T-Shirts",
            "tags": ["streetwear"],
            "colors": [{"name": "Black", "hex": "#000000"}],
            "price": 1299,
            "isBestSeller": true
        }"##;

        let product: Product = serde_json::from_str(raw).expect("product should decode");

        assert_eq!(product.id, ProductId::from("7"));
        assert_eq!(product.price, Decimal::new(1299, 0));
        assert!(product.in_stock, "missing inStock defaults to true");
        assert!(product.is_best_seller);
        assert!(!product.is_new);
        assert!(product.has_color("Black"));
        assert!(product.has_tag("streetwear"));
        assert_eq!(product.rating, None);
    }
}
