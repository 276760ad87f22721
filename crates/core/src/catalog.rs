use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::product::{Product, ProductColor, ProductId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog lists product `{0}` more than once")]
    DuplicateProduct(String),
    #[error("product `{0}` has a negative price")]
    NegativePrice(String),
}

/// Ordered product list. Order is meaningful: ranking ties fall back to it.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.id.0.clone()));
            }
            if product.price.is_sign_negative() && !product.price.is_zero() {
                return Err(CatalogError::NegativePrice(product.id.0.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The storefront's built-in catalog.
    pub fn seeded() -> Self {
        Self { products: PRODUCT_SEEDS.iter().map(ProductSeed::to_product).collect() }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        Self::new(products)
    }

    pub fn load_json(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Looks up each id in order, silently skipping ids the catalog does not know.
    pub fn resolve<'a>(&'a self, product_ids: &[ProductId]) -> Vec<&'a Product> {
        product_ids.iter().filter_map(|id| self.find(id)).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    price: i64,
    tags: &'static [&'static str],
    colors: &'static [&'static str],
    in_stock: bool,
    is_new: bool,
    is_best_seller: bool,
    rating: f64,
    reviews: u32,
}

impl ProductSeed {
    fn to_product(&self) -> Product {
        Product {
            id: ProductId::from(self.id),
            name: self.name.to_owned(),
            category: self.category.to_owned(),
            collection: Some(self.category.to_ascii_lowercase().replace(' ', "-")),
            tags: self.tags.iter().map(|tag| (*tag).to_owned()).collect(),
            colors: self
                .colors
                .iter()
                .map(|name| ProductColor::new(*name, color_hex(name)))
                .collect(),
            price: Decimal::new(self.price, 0),
            in_stock: self.in_stock,
            is_new: self.is_new,
            is_best_seller: self.is_best_seller,
            rating: Some(self.rating),
            reviews: Some(self.reviews),
        }
    }
}

fn color_hex(name: &str) -> &'static str {
    match name {
        "Black" => "#000000",
        "White" => "#FFFFFF",
        "Navy" => "#1A1A2E",
        "Charcoal" => "#36454F",
        "Dark Blue" => "#00008B",
        "Light Blue" => "#ADD8E6",
        "Sky Blue" => "#87CEEB",
        "Beige" => "#F5F5DC",
        "Olive" => "#556B2F",
        "Khaki" => "#C3B091",
        "Brown" => "#8B4513",
        "Sand" => "#C2B280",
        "Grey" => "#808080",
        "Red" => "#B22222",
        "Maroon" => "#800000",
        "Burgundy" => "#800020",
        "Tan" => "#D2B48C",
        "Silver" => "#C0C0C0",
        "Amber" => "#FFBF00",
        _ => "#DDDDDD",
    }
}

macro_rules! seed {
    (
        $id:literal, $name:literal, $category:literal, $price:literal,
        [$($tag:literal),*], [$($color:literal),*],
        stock: $in_stock:literal, new: $is_new:literal, best: $is_best:literal,
        rating: $rating:literal, reviews: $reviews:literal
    ) => {
        ProductSeed {
            id: $id,
            name: $name,
            category: $category,
            price: $price,
            tags: &[$($tag),*],
            colors: &[$($color),*],
            in_stock: $in_stock,
            is_new: $is_new,
            is_best_seller: $is_best,
            rating: $rating,
            reviews: $reviews,
        }
    };
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    seed!("1", "Classic Oxford Shirt", "Shirts", 2499, ["casual", "office", "bestseller"], ["White", "Light Blue"], stock: true, new: false, best: true, rating: 4.6, reviews: 312),
    seed!("2", "Formal White Shirt", "Shirts", 2999, ["formal", "office", "classic"], ["White"], stock: true, new: false, best: false, rating: 4.5, reviews: 198),
    seed!("3", "Printed Floral Shirt", "Shirts", 1899, ["summer", "casual", "trendy"], ["Navy", "Red"], stock: true, new: true, best: false, rating: 4.2, reviews: 87),
    seed!("4", "Denim Casual Shirt", "Shirts", 2299, ["casual", "denim", "versatile"], ["Dark Blue", "Light Blue"], stock: true, new: false, best: false, rating: 4.4, reviews: 143),
    seed!("5", "Linen Relaxed Shirt", "Shirts", 2199, ["summer", "linen", "breathable"], ["Beige", "White", "Olive"], stock: true, new: true, best: false, rating: 4.3, reviews: 64),
    seed!("6", "Essential Plain Tee", "T-Shirts", 799, ["basic", "essential", "casual"], ["Black", "White", "Grey"], stock: true, new: false, best: true, rating: 4.5, reviews: 520),
    seed!("7", "Graphic Oversized Tee", "T-Shirts", 1299, ["streetwear", "graphic", "oversized"], ["Black"], stock: true, new: true, best: false, rating: 4.1, reviews: 95),
    seed!("8", "Classic Polo T-Shirt", "T-Shirts", 1799, ["polo", "casual", "classic"], ["Navy", "White"], stock: true, new: false, best: false, rating: 4.4, reviews: 210),
    seed!("9", "Oversized Drop Shoulder Tee", "T-Shirts", 1499, ["streetwear", "oversized", "trendy"], ["Sand", "Olive"], stock: true, new: true, best: false, rating: 4.0, reviews: 58),
    seed!("10", "Classic Pullover Hoodie", "Hoodies", 2499, ["winter", "cozy", "casual"], ["Grey", "Black"], stock: true, new: false, best: true, rating: 4.6, reviews: 340),
    seed!("11", "Graphic Street Hoodie", "Hoodies", 2999, ["streetwear", "graphic", "urban"], ["Black", "Maroon"], stock: true, new: false, best: false, rating: 4.2, reviews: 77),
    seed!("12", "Crewneck Sweatshirt", "Sweatshirts", 1999, ["casual", "winter", "comfortable"], ["Charcoal", "Navy"], stock: true, new: false, best: false, rating: 4.3, reviews: 121),
    seed!("13", "Classic Bomber Jacket", "Jackets", 4999, ["jacket", "winter", "classic"], ["Olive", "Black"], stock: true, new: false, best: true, rating: 4.7, reviews: 265),
    seed!("14", "Classic Denim Jacket", "Jackets", 3999, ["denim", "casual", "versatile"], ["Dark Blue"], stock: true, new: false, best: false, rating: 4.4, reviews: 150),
    seed!("15", "Premium Leather Jacket", "Jackets", 12999, ["leather", "premium", "statement"], ["Black", "Brown"], stock: true, new: true, best: false, rating: 4.8, reviews: 89),
    seed!("16", "Down Puffer Jacket", "Jackets", 5999, ["winter", "warm", "puffer"], ["Black", "Navy"], stock: false, new: false, best: false, rating: 4.5, reviews: 72),
    seed!("17", "Wool Blend Blazer", "Blazers", 7999, ["formal", "office", "classic"], ["Charcoal", "Navy"], stock: true, new: false, best: true, rating: 4.6, reviews: 134),
    seed!("18", "Velvet Dinner Jacket", "Blazers", 12999, ["party", "luxury", "evening"], ["Burgundy", "Black"], stock: true, new: true, best: false, rating: 4.7, reviews: 41),
    seed!("19", "Skinny Fit Jeans", "Jeans", 2499, ["denim", "skinny", "casual"], ["Black", "Dark Blue"], stock: true, new: false, best: false, rating: 4.2, reviews: 188),
    seed!("20", "Slim Fit Jeans", "Jeans", 2299, ["denim", "slim", "versatile"], ["Dark Blue", "Light Blue"], stock: true, new: false, best: true, rating: 4.5, reviews: 402),
    seed!("21", "Baggy Street Jeans", "Jeans", 2799, ["streetwear", "baggy", "trendy"], ["Light Blue"], stock: true, new: true, best: false, rating: 4.1, reviews: 66),
    seed!("22", "Ripped Distressed Jeans", "Jeans", 2599, ["streetwear", "ripped", "edgy"], ["Light Blue", "Black"], stock: false, new: false, best: false, rating: 3.9, reviews: 54),
    seed!("23", "Slim Fit Chinos", "Trousers", 1999, ["casual", "office", "versatile"], ["Khaki", "Navy", "Olive"], stock: true, new: false, best: true, rating: 4.5, reviews: 287),
    seed!("24", "Formal Dress Trousers", "Trousers", 2799, ["formal", "office", "classic"], ["Charcoal", "Black"], stock: true, new: false, best: false, rating: 4.4, reviews: 119),
    seed!("25", "Cargo Utility Pants", "Trousers", 2399, ["utility", "streetwear", "functional"], ["Olive", "Khaki"], stock: true, new: true, best: false, rating: 4.2, reviews: 73),
    seed!("26", "Tech Fleece Joggers", "Joggers", 2299, ["athleisure", "comfort", "casual"], ["Grey", "Black"], stock: true, new: false, best: false, rating: 4.3, reviews: 98),
    seed!("27", "Classic Track Pants", "Track Pants", 1799, ["sporty", "casual", "comfortable"], ["Navy", "Black"], stock: true, new: false, best: false, rating: 4.1, reviews: 85),
    seed!("28", "Chino Shorts", "Shorts", 1499, ["summer", "casual", "comfortable"], ["Beige", "Navy"], stock: true, new: false, best: false, rating: 4.0, reviews: 61),
    seed!("29", "Embroidered Kurta Set", "Traditional", 4999, ["festive", "traditional", "wedding"], ["Maroon", "Beige"], stock: true, new: false, best: true, rating: 4.7, reviews: 156),
    seed!("30", "Short Cotton Kurta", "Traditional", 1999, ["casual", "traditional", "comfortable"], ["White", "Sky Blue"], stock: true, new: false, best: false, rating: 4.3, reviews: 92),
    seed!("31", "Designer Nehru Jacket", "Traditional", 5999, ["formal", "traditional", "elegant"], ["Navy", "Charcoal"], stock: true, new: true, best: false, rating: 4.6, reviews: 48),
    seed!("32", "Royal Sherwani", "Traditional", 24999, ["wedding", "luxury", "traditional"], ["Beige", "Maroon"], stock: true, new: false, best: false, rating: 4.9, reviews: 23),
    seed!("33", "Classic White Sneakers", "Footwear", 3999, ["casual", "sneakers", "everyday"], ["White"], stock: true, new: false, best: true, rating: 4.6, reviews: 389),
    seed!("34", "Running Performance Shoes", "Footwear", 4499, ["sports", "running", "performance"], ["Black", "Grey"], stock: true, new: false, best: false, rating: 4.4, reviews: 142),
    seed!("35", "Oxford Formal Shoes", "Footwear", 5999, ["formal", "office", "classic"], ["Black", "Brown"], stock: true, new: false, best: false, rating: 4.5, reviews: 97),
    seed!("36", "Leather Loafers", "Footwear", 4499, ["casual", "loafers", "comfortable"], ["Brown", "Tan"], stock: true, new: true, best: false, rating: 4.3, reviews: 58),
    seed!("37", "Chelsea Boots", "Footwear", 6999, ["boots", "classic", "versatile"], ["Brown", "Black"], stock: true, new: false, best: false, rating: 4.6, reviews: 84),
    seed!("38", "Premium Leather Belt", "Accessories", 1499, ["leather", "essential", "classic"], ["Black", "Brown"], stock: true, new: false, best: true, rating: 4.5, reviews: 233),
    seed!("39", "Classic Aviator Sunglasses", "Accessories", 2999, ["sunglasses", "classic", "summer"], ["Black"], stock: true, new: false, best: false, rating: 4.4, reviews: 112),
    seed!("40", "Leather Bifold Wallet", "Accessories", 1999, ["leather", "wallet", "essential"], ["Brown", "Black"], stock: true, new: false, best: false, rating: 4.5, reviews: 176),
    seed!("41", "Chronograph Watch", "Accessories", 7999, ["watch", "luxury", "classic"], ["Black", "Silver"], stock: true, new: true, best: false, rating: 4.8, reviews: 64),
    seed!("42", "Snapback Cap", "Accessories", 899, ["streetwear", "cap", "casual"], ["Black", "Navy"], stock: true, new: false, best: false, rating: 4.0, reviews: 88),
    seed!("43", "Leather Backpack", "Accessories", 5999, ["bag", "leather", "travel"], ["Brown"], stock: true, new: false, best: false, rating: 4.6, reviews: 51),
    seed!("44", "Premium Eau De Parfum", "Grooming", 3999, ["fragrance", "luxury", "grooming"], ["Amber"], stock: true, new: true, best: false, rating: 4.5, reviews: 77),
    seed!("45", "Beard Grooming Kit", "Grooming", 1499, ["beard", "grooming", "kit"], ["Black"], stock: false, new: false, best: false, rating: 4.2, reviews: 45),
    seed!("46", "Basic Cotton Tee", "T-Shirts", 599, ["budget", "basic", "essential"], ["White", "Black", "Grey"], stock: true, new: false, best: false, rating: 4.0, reviews: 301),
    seed!("47", "Casual Socks Pack", "Accessories", 399, ["socks", "basic", "essential"], ["Grey", "Black", "White"], stock: true, new: false, best: false, rating: 3.9, reviews: 144),
    seed!("48", "Premium Co-ord Set", "Co-ord Sets", 3999, ["summer", "matching", "trendy"], ["Beige", "Olive"], stock: true, new: true, best: false, rating: 4.4, reviews: 39),
    seed!("49", "Urban Street Co-ord", "Co-ord Sets", 4499, ["streetwear", "urban", "matching"], ["Black", "Grey"], stock: true, new: false, best: false, rating: 4.3, reviews: 42),
    seed!("50", "Thermal Inner Wear", "Innerwear", 999, ["winter", "thermal", "warm"], ["Grey"], stock: true, new: false, best: false, rating: 4.1, reviews: 57),
];

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Catalog, CatalogError};
    use crate::domain::product::ProductId;

    #[test]
    fn seeded_catalog_is_ordered_and_unique() {
        let catalog = Catalog::seeded();

        assert_eq!(catalog.len(), 50);
        assert_eq!(catalog.products()[0].id, ProductId::from("1"));
        assert_eq!(catalog.products()[49].id, ProductId::from("50"));
        assert!(Catalog::new(catalog.products().to_vec()).is_ok());
    }

    #[test]
    fn seeded_product_carries_colors_and_flags() {
        let catalog = Catalog::seeded();
        let oxford = catalog.find(&ProductId::from("1")).expect("product 1 is seeded");

        assert_eq!(oxford.category, "Shirts");
        assert_eq!(oxford.price, Decimal::new(2499, 0));
        assert!(oxford.is_best_seller);
        assert_eq!(oxford.colors[0].hex, "#FFFFFF");
        assert_eq!(oxford.collection.as_deref(), Some("shirts"));
    }

    #[test]
    fn resolve_skips_unknown_ids_and_keeps_request_order() {
        let catalog = Catalog::seeded();
        let resolved = catalog.resolve(&[
            ProductId::from("20"),
            ProductId::from("999"),
            ProductId::from("2"),
        ]);

        let ids: Vec<&str> = resolved.iter().map(|product| product.id.as_str()).collect();
        assert_eq!(ids, vec!["20", "2"]);
    }

    #[test]
    fn json_catalog_rejects_duplicate_ids() {
        let raw = r#"[
            {"id": "1", "name": "A", "category": "Shirts", "price": 10},
            {"id": "1", "name": "B", "category": "Shirts", "price": 12}
        ]"#;

        let error = Catalog::from_json_str(raw).expect_err("duplicate ids must be rejected");
        assert!(matches!(error, CatalogError::DuplicateProduct(ref id) if id == "1"));
    }

    #[test]
    fn json_catalog_rejects_negative_prices() {
        let raw = r#"[{"id": "1", "name": "A", "category": "Shirts", "price": -5}]"#;

        let error = Catalog::from_json_str(raw).expect_err("negative price must be rejected");
        assert!(matches!(error, CatalogError::NegativePrice(_)));
    }
}
