use crate::domain::profile::PreferenceProfile;

pub const TOP_PREFERENCES: usize = 3;
pub const RECENT_PURCHASES_FOR_TAGS: usize = 5;
pub const MAX_STYLE_TAGS: usize = 5;

impl PreferenceProfile {
    /// Compact style profile handed to the stylist chat as context.
    ///
    /// An empty string means there is no signal yet.
    pub fn summarize(&self) -> String {
        let top_categories = self.preferred_categories.top(TOP_PREFERENCES);
        if top_categories.is_empty() {
            return String::new();
        }

        let mut profile = format!("Preferred categories: {}.", top_categories.join(", "));

        let top_colors = self.preferred_colors.top(TOP_PREFERENCES);
        if !top_colors.is_empty() {
            profile.push_str(&format!(" Preferred colors: {}.", top_colors.join(", ")));
        }

        let style_tags = self.recent_style_tags();
        if !style_tags.is_empty() {
            profile.push_str(&format!(" Style tags: {}.", style_tags.join(", ")));
        }

        profile
    }

    /// Distinct tags from the most recent purchases, oldest purchase first.
    pub fn recent_style_tags(&self) -> Vec<&str> {
        let start = self.purchased_items.len().saturating_sub(RECENT_PURCHASES_FOR_TAGS);
        let mut tags: Vec<&str> = Vec::new();

        for item in &self.purchased_items[start..] {
            for tag in &item.tags {
                if tags.len() == MAX_STYLE_TAGS {
                    return tags;
                }
                if !tags.contains(&tag.as_str()) {
                    tags.push(tag.as_str());
                }
            }
        }

        tags
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductColor, ProductId};
    use crate::domain::profile::{PreferenceProfile, WeightMap};

    fn product(id: &str, category: &str, tags: &[&str]) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            category: category.to_string(),
            collection: None,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            colors: vec![ProductColor::new("Navy", "#1a1a2e")],
            price: Decimal::new(2499, 0),
            in_stock: true,
            is_new: false,
            is_best_seller: false,
            rating: None,
            reviews: None,
        }
    }

    #[test]
    fn empty_profile_has_no_summary() {
        assert_eq!(PreferenceProfile::default().summarize(), "");
    }

    #[test]
    fn colors_without_categories_still_yield_no_summary() {
        let profile = PreferenceProfile {
            preferred_colors: WeightMap::from([("Black", 4)]),
            ..PreferenceProfile::default()
        };

        assert_eq!(profile.summarize(), "");
    }

    #[test]
    fn summary_lists_top_categories_and_colors() {
        let profile = PreferenceProfile {
            preferred_categories: WeightMap::from([
                ("Jeans", 2),
                ("Shirts", 5),
                ("Footwear", 2),
                ("Blazers", 1),
            ]),
            preferred_colors: WeightMap::from([("Black", 3), ("White", 3)]),
            ..PreferenceProfile::default()
        };

        assert_eq!(
            profile.summarize(),
            "Preferred categories: Shirts, Jeans, Footwear. Preferred colors: Black, White."
        );
    }

    #[test]
    fn style_tags_come_from_recent_purchases_only() {
        let mut profile = PreferenceProfile::default();
        profile.record_view(&product("99", "Hoodies", &["viewed-only"]));
        profile.record_purchase(&product("1", "Shirts", &["old", "stale"]));
        for (id, tags) in [
            ("2", ["office", "formal"]),
            ("3", ["formal", "classic"]),
            ("4", ["denim", "casual"]),
            ("5", ["casual", "summer"]),
            ("6", ["linen", "breathable"]),
        ] {
            profile.record_purchase(&product(id, "Shirts", &tags));
        }

        let summary = profile.summarize();

        assert!(summary.ends_with(" Style tags: office, formal, classic, denim, casual."));
        assert!(!summary.contains("old"));
        assert!(!summary.contains("viewed-only"));
    }
}
