//! Ranking pipeline shared by every recommendation surface.
//!
//! A [`RankingPolicy`] decides which products are admissible, how each one
//! scores, and whether a score floor applies. [`rank`] does the rest:
//! filter, score, stable sort descending, cap.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;

use super::types::{RankedProduct, ScoreCard, ScoreReason, Strategy};
use crate::domain::product::{Product, ProductId};
use crate::domain::profile::PreferenceProfile;
use crate::lookbook::{BudgetTier, ColorTheme, Occasion};
use crate::memory::TOP_PREFERENCES;
use crate::suggestions::{MAX_ITEM_SHARE, MIN_ITEM_SHARE};

/// Weights for profile-driven ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalizedWeights {
    /// Category among the profile's top categories (default: 3)
    pub preferred_category: f64,
    /// Any color among the profile's top colors (default: 2)
    pub preferred_color: f64,
    /// Any tag seen on a purchased item (default: 2)
    pub purchased_tag: f64,
    /// Product not in the view log (default: 1)
    pub not_viewed: f64,
    pub best_seller: f64,
    pub new_arrival: f64,
}

impl Default for PersonalizedWeights {
    fn default() -> Self {
        super::DEFAULT_PERSONALIZED_WEIGHTS
    }
}

/// Weights for anchor-seeded ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelatedWeights {
    pub same_category: f64,
    /// Applied once per shared tag
    pub per_shared_tag: f64,
    pub best_seller: f64,
}

impl Default for RelatedWeights {
    fn default() -> Self {
        super::DEFAULT_RELATED_WEIGHTS
    }
}

/// Weights for outfit slot selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotWeights {
    pub occasion_tag: f64,
    pub theme_color: f64,
    pub best_seller: f64,
    pub high_rating: f64,
    /// Ratings at or above this earn `high_rating`
    pub high_rating_threshold: f64,
    /// Jitter is drawn from `[0, max_jitter)`
    pub max_jitter: f64,
}

impl Default for SlotWeights {
    fn default() -> Self {
        super::DEFAULT_SLOT_WEIGHTS
    }
}

pub trait RankingPolicy {
    fn strategy(&self) -> Strategy;

    /// Hard constraints; inadmissible products are never scored.
    fn admits(&self, _product: &Product) -> bool {
        true
    }

    fn score(&mut self, product: &Product) -> ScoreCard;

    /// Scores at or below the floor are dropped.
    fn floor(&self) -> Option<f64> {
        None
    }
}

/// Filters, scores and orders `catalog`, keeping at most `limit` products.
///
/// Sorting is stable, so equal scores keep catalog order.
pub fn rank<P>(policy: &mut P, catalog: &[Product], limit: usize) -> Vec<RankedProduct>
where
    P: RankingPolicy + ?Sized,
{
    let strategy = policy.strategy();
    let floor = policy.floor();
    let mut ranked = Vec::new();

    for product in catalog {
        if !policy.admits(product) {
            continue;
        }
        let card = policy.score(product);
        if floor.is_some_and(|floor| card.score <= floor) {
            continue;
        }
        ranked.push(RankedProduct {
            product: product.clone(),
            score: card.score,
            reasons: card.reasons,
            strategy,
        });
    }

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    ranked
}

/// Ranks the catalog against what the shopper has browsed and bought.
#[derive(Debug, Clone)]
pub struct PersonalizedPolicy<'a> {
    weights: PersonalizedWeights,
    top_categories: Vec<&'a str>,
    top_colors: Vec<&'a str>,
    purchased_tags: HashSet<&'a str>,
    viewed: HashSet<&'a ProductId>,
}

impl<'a> PersonalizedPolicy<'a> {
    pub fn new(profile: &'a PreferenceProfile, weights: PersonalizedWeights) -> Self {
        Self {
            weights,
            top_categories: profile.preferred_categories.top(TOP_PREFERENCES),
            top_colors: profile.preferred_colors.top(TOP_PREFERENCES),
            purchased_tags: profile
                .purchased_items
                .iter()
                .flat_map(|item| item.tags.iter().map(String::as_str))
                .collect(),
            viewed: profile.viewed_items.iter().map(|item| &item.product_id).collect(),
        }
    }
}

impl RankingPolicy for PersonalizedPolicy<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::Personalized
    }

    fn score(&mut self, product: &Product) -> ScoreCard {
        let mut card = ScoreCard::default();

        if self.top_categories.contains(&product.category.as_str()) {
            card.add(self.weights.preferred_category, ScoreReason::PreferredCategory);
        }
        if product.colors.iter().any(|color| self.top_colors.contains(&color.name.as_str())) {
            card.add(self.weights.preferred_color, ScoreReason::PreferredColor);
        }
        if product.tags.iter().any(|tag| self.purchased_tags.contains(tag.as_str())) {
            card.add(self.weights.purchased_tag, ScoreReason::PurchasedStyle);
        }
        if !self.viewed.contains(&product.id) {
            card.add(self.weights.not_viewed, ScoreReason::NotYetViewed);
        }
        if product.is_best_seller {
            card.add(self.weights.best_seller, ScoreReason::BestSeller);
        }
        if product.is_new {
            card.add(self.weights.new_arrival, ScoreReason::NewArrival);
        }

        card
    }
}

/// Ranks products that complement a set of anchor products.
#[derive(Debug, Clone)]
pub struct RelatedPolicy<'a> {
    weights: RelatedWeights,
    anchor_ids: HashSet<&'a ProductId>,
    anchor_categories: HashSet<&'a str>,
    anchor_tags: HashSet<&'a str>,
}

impl<'a> RelatedPolicy<'a> {
    pub fn new(anchors: &[&'a Product], weights: RelatedWeights) -> Self {
        Self {
            weights,
            anchor_ids: anchors.iter().map(|anchor| &anchor.id).collect(),
            anchor_categories: anchors.iter().map(|anchor| anchor.category.as_str()).collect(),
            anchor_tags: anchors
                .iter()
                .flat_map(|anchor| anchor.tags.iter().map(String::as_str))
                .collect(),
        }
    }
}

impl RankingPolicy for RelatedPolicy<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::Related
    }

    fn admits(&self, product: &Product) -> bool {
        product.in_stock && !self.anchor_ids.contains(&product.id)
    }

    fn score(&mut self, product: &Product) -> ScoreCard {
        let mut card = ScoreCard::default();

        if self.anchor_categories.contains(product.category.as_str()) {
            card.add(self.weights.same_category, ScoreReason::SameCategory);
        }
        // Counted per distinct tag, not capped.
        let tags: HashSet<&str> = product.tags.iter().map(String::as_str).collect();
        let shared = tags.intersection(&self.anchor_tags).count();
        if shared > 0 {
            card.add(self.weights.per_shared_tag * shared as f64, ScoreReason::SharedTags);
        }
        if product.is_best_seller {
            card.add(self.weights.best_seller, ScoreReason::BestSeller);
        }

        card
    }

    fn floor(&self) -> Option<f64> {
        Some(0.0)
    }
}

/// Picks candidates for one outfit slot under occasion, theme and budget.
#[derive(Debug)]
pub struct SlotPolicy<'a, R: Rng> {
    weights: SlotWeights,
    categories: &'a [String],
    occasion: &'a Occasion,
    theme: &'a ColorTheme,
    budget: &'a BudgetTier,
    rng: &'a mut R,
}

impl<'a, R: Rng> SlotPolicy<'a, R> {
    pub fn new(
        categories: &'a [String],
        occasion: &'a Occasion,
        theme: &'a ColorTheme,
        budget: &'a BudgetTier,
        weights: SlotWeights,
        rng: &'a mut R,
    ) -> Self {
        Self { weights, categories, occasion, theme, budget, rng }
    }
}

/// Slot hard constraints: category, stock, and the per-item budget share.
pub fn fits_slot(product: &Product, categories: &[String], budget: &BudgetTier) -> bool {
    if !product.in_stock || !categories.iter().any(|category| category == &product.category) {
        return false;
    }
    if let Some(max) = budget.max {
        if product.price > max * MAX_ITEM_SHARE {
            return false;
        }
    }
    if let Some(min) = budget.min {
        if product.price < min * MIN_ITEM_SHARE {
            return false;
        }
    }
    true
}

impl<R: Rng> RankingPolicy for SlotPolicy<'_, R> {
    fn strategy(&self) -> Strategy {
        Strategy::SlotConstrained
    }

    fn admits(&self, product: &Product) -> bool {
        fits_slot(product, self.categories, self.budget)
    }

    fn score(&mut self, product: &Product) -> ScoreCard {
        let mut card = ScoreCard::default();

        if product.tags.iter().any(|tag| self.occasion.tags.contains(tag)) {
            card.add(self.weights.occasion_tag, ScoreReason::OccasionMatch);
        }
        if product.colors.iter().any(|color| self.theme.colors.contains(&color.name)) {
            card.add(self.weights.theme_color, ScoreReason::ThemeColor);
        }
        if product.is_best_seller {
            card.add(self.weights.best_seller, ScoreReason::BestSeller);
        }
        if product.rating.is_some_and(|rating| rating >= self.weights.high_rating_threshold) {
            card.add(self.weights.high_rating, ScoreReason::HighlyRated);
        }
        if self.weights.max_jitter > 0.0 {
            card.add_jitter(self.rng.gen::<f64>() * self.weights.max_jitter);
        }

        card
    }
}
