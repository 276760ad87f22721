//! Types for the suggestion engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};
use crate::lookbook::LookSlot;

/// Which ranking policy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Whole-catalog ranking against the preference profile
    Personalized,
    /// Ranking seeded by anchor products
    Related,
    /// Hard-filtered pick for one outfit slot
    SlotConstrained,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Personalized => "personalized",
            Strategy::Related => "related",
            Strategy::SlotConstrained => "slot_constrained",
        }
    }
}

/// A scoring rule that contributed to a product's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    PreferredCategory,
    PreferredColor,
    PurchasedStyle,
    NotYetViewed,
    BestSeller,
    NewArrival,
    SameCategory,
    SharedTags,
    OccasionMatch,
    ThemeColor,
    HighlyRated,
}

impl ScoreReason {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ScoreReason::PreferredCategory => "From a category you browse often",
            ScoreReason::PreferredColor => "In colors you keep coming back to",
            ScoreReason::PurchasedStyle => "Matches the style of your purchases",
            ScoreReason::NotYetViewed => "Something you have not seen yet",
            ScoreReason::BestSeller => "A best seller",
            ScoreReason::NewArrival => "New arrival",
            ScoreReason::SameCategory => "Same category as what you are looking at",
            ScoreReason::SharedTags => "Shares style tags with your pick",
            ScoreReason::OccasionMatch => "Fits the occasion",
            ScoreReason::ThemeColor => "Fits the color theme",
            ScoreReason::HighlyRated => "Highly rated",
        }
    }
}

/// Score accumulated for one candidate, with the rules that fired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreCard {
    pub score: f64,
    pub reasons: Vec<ScoreReason>,
}

impl ScoreCard {
    pub fn add(&mut self, weight: f64, reason: ScoreReason) {
        self.score += weight;
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
    }

    /// Adds weight without attributing it to a rule (tie-break noise).
    pub fn add_jitter(&mut self, amount: f64) {
        self.score += amount;
    }
}

/// A ranked catalog product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProduct {
    pub product: Product,
    pub score: f64,
    pub reasons: Vec<ScoreReason>,
    pub strategy: Strategy,
}

/// Request for an outfit, naming lookbook entries by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitRequest {
    pub occasion: String,
    pub color_theme: String,
    pub budget: String,
}

impl OutfitRequest {
    pub fn new(
        occasion: impl Into<String>,
        color_theme: impl Into<String>,
        budget: impl Into<String>,
    ) -> Self {
        Self { occasion: occasion.into(), color_theme: color_theme.into(), budget: budget.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutfitItem {
    pub slot: LookSlot,
    pub product: Product,
    pub score: f64,
}

/// One pick per slot; slots with no eligible product are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outfit {
    pub occasion: String,
    pub color_theme: String,
    pub budget: String,
    pub items: Vec<OutfitItem>,
}

impl Outfit {
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(|item| item.product.price).sum()
    }

    pub fn item(&self, slot: LookSlot) -> Option<&OutfitItem> {
        self.items.iter().find(|item| item.slot == slot)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.product.id == product_id)
    }

    pub fn product_ids(&self) -> Vec<&ProductId> {
        self.items.iter().map(|item| &item.product.id).collect()
    }

    /// Puts `item` in its slot, keeping slot order. Returns the product it displaced.
    pub(crate) fn put(&mut self, item: OutfitItem) -> Option<Product> {
        if let Some(existing) = self.items.iter_mut().find(|current| current.slot == item.slot) {
            let previous = std::mem::replace(existing, item);
            return Some(previous.product);
        }
        let position =
            self.items.iter().position(|current| current.slot > item.slot).unwrap_or(self.items.len());
        self.items.insert(position, item);
        None
    }
}

/// Result of swapping a single outfit slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReplaceOutcome {
    Replaced { slot: LookSlot, previous: Option<ProductId>, product_id: ProductId },
    NoAlternatives { slot: LookSlot },
}
