use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

pub const VIEW_HISTORY_CAP: usize = 50;
pub const PURCHASE_HISTORY_CAP: usize = 30;

/// Snapshot of a product taken when the event happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub product_id: ProductId,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl TrackedItem {
    pub fn capture(product: &Product, at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id.clone(),
            category: product.category.clone(),
            tags: product.tags.clone(),
            timestamp: at,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BehaviorEvent<'a> {
    Viewed(&'a Product),
    Purchased(&'a Product),
    WishlistToggled(&'a ProductId),
}

/// Integer weights keyed by name, kept in first-insertion order.
///
/// Key order is significant: it breaks ties when ranking the heaviest
/// entries, so it is preserved through serialization as well.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMap {
    entries: IndexMap<String, u32>,
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str, by: u32) {
        match self.entries.get_mut(key) {
            Some(weight) => *weight = weight.saturating_add(by),
            None => {
                self.entries.insert(key.to_owned(), by);
            }
        }
    }

    pub fn get(&self, key: &str) -> u32 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    /// Heaviest `n` keys; equal weights keep insertion order.
    pub fn top(&self, n: usize) -> Vec<&str> {
        let mut ranked: Vec<(&str, u32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(name, _)| name).collect()
    }
}

impl<const N: usize> From<[(&str, u32); N]> for WeightMap {
    fn from(entries: [(&str, u32); N]) -> Self {
        let mut map = Self::new();
        for (key, weight) in entries {
            map.increment(key, weight);
        }
        map
    }
}

/// Per-device behavioral profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceProfile {
    pub viewed_items: Vec<TrackedItem>,
    pub purchased_items: Vec<TrackedItem>,
    pub wishlisted_items: Vec<ProductId>,
    pub preferred_colors: WeightMap,
    pub preferred_categories: WeightMap,
    pub opted_out: bool,
}
