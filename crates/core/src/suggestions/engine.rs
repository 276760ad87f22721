//! Suggestion engine implementation

use rand::Rng;
use tracing::{debug, info};

use super::scoring::{
    fits_slot, rank, PersonalizedPolicy, PersonalizedWeights, RankingPolicy, RelatedPolicy,
    RelatedWeights, SlotPolicy, SlotWeights,
};
use super::types::*;
use super::{SuggestionResult, DEFAULT_PERSONALIZED_LIMIT, DEFAULT_RELATED_LIMIT};
use crate::domain::product::Product;
use crate::domain::profile::PreferenceProfile;
use crate::lookbook::{BudgetTier, ColorTheme, LookSlot, Lookbook, Occasion};
use crate::memory::DEFAULT_ENGAGEMENT_THRESHOLD;

/// The main suggestion engine
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    lookbook: Lookbook,
    personalized_weights: PersonalizedWeights,
    related_weights: RelatedWeights,
    slot_weights: SlotWeights,
    personalized_limit: usize,
    related_limit: usize,
    engagement_threshold: usize,
}

impl SuggestionEngine {
    /// Create a new suggestion engine with the built-in lookbook and default weights
    pub fn new() -> Self {
        Self::with_lookbook(Lookbook::default())
    }

    pub fn with_lookbook(lookbook: Lookbook) -> Self {
        Self {
            lookbook,
            personalized_weights: PersonalizedWeights::default(),
            related_weights: RelatedWeights::default(),
            slot_weights: SlotWeights::default(),
            personalized_limit: DEFAULT_PERSONALIZED_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
            engagement_threshold: DEFAULT_ENGAGEMENT_THRESHOLD,
        }
    }

    pub fn with_personalized_weights(mut self, weights: PersonalizedWeights) -> Self {
        self.personalized_weights = weights;
        self
    }

    pub fn with_related_weights(mut self, weights: RelatedWeights) -> Self {
        self.related_weights = weights;
        self
    }

    pub fn with_slot_weights(mut self, weights: SlotWeights) -> Self {
        self.slot_weights = weights;
        self
    }

    pub fn with_limits(mut self, personalized: usize, related: usize) -> Self {
        self.personalized_limit = personalized;
        self.related_limit = related;
        self
    }

    pub fn with_engagement_threshold(mut self, threshold: usize) -> Self {
        self.engagement_threshold = threshold;
        self
    }

    pub fn lookbook(&self) -> &Lookbook {
        &self.lookbook
    }

    pub fn engagement_threshold(&self) -> usize {
        self.engagement_threshold
    }

    /// Ranks the whole catalog against the profile.
    ///
    /// Always returns `min(limit, catalog.len())` products; there is no score floor.
    pub fn personalized(
        &self,
        profile: &PreferenceProfile,
        catalog: &[Product],
    ) -> Vec<RankedProduct> {
        let mut policy = PersonalizedPolicy::new(profile, self.personalized_weights);
        let ranked = rank(&mut policy, catalog, self.personalized_limit);
        debug!(
            event_name = "wardrobe.suggestions.personalized",
            candidates = catalog.len(),
            returned = ranked.len(),
            "personalized ranking complete"
        );
        ranked
    }

    /// Personalized ranking, or `None` while the profile has too few views to trust.
    pub fn recommended_for_you(
        &self,
        profile: &PreferenceProfile,
        catalog: &[Product],
    ) -> Option<Vec<RankedProduct>> {
        if !profile.is_engaged(self.engagement_threshold) {
            debug!(
                event_name = "wardrobe.suggestions.personalized_suppressed",
                viewed = profile.viewed_items.len(),
                threshold = self.engagement_threshold,
                "not enough views for personalized suggestions"
            );
            return None;
        }
        Some(self.personalized(profile, catalog))
    }

    /// Products related to `anchors`, using the configured limit.
    pub fn related(&self, anchors: &[&Product], catalog: &[Product]) -> Vec<RankedProduct> {
        self.related_limited(anchors, catalog, self.related_limit)
    }

    pub fn related_limited(
        &self,
        anchors: &[&Product],
        catalog: &[Product],
        limit: usize,
    ) -> Vec<RankedProduct> {
        if anchors.is_empty() {
            return Vec::new();
        }
        let mut policy = RelatedPolicy::new(anchors, self.related_weights);
        let ranked = rank(&mut policy, catalog, limit);
        debug!(
            event_name = "wardrobe.suggestions.related",
            anchors = anchors.len(),
            returned = ranked.len(),
            "related ranking complete"
        );
        ranked
    }

    /// Picks the best candidate for every slot. Slots with no eligible product are left out.
    pub fn build_outfit<R: Rng>(
        &self,
        catalog: &[Product],
        request: &OutfitRequest,
        rng: &mut R,
    ) -> SuggestionResult<Outfit> {
        let brief = self.brief(&request.occasion, &request.color_theme, &request.budget)?;
        let mut outfit = Outfit {
            occasion: brief.occasion.id.clone(),
            color_theme: brief.theme.id.clone(),
            budget: brief.budget.id.clone(),
            items: Vec::new(),
        };

        for slot in LookSlot::ALL {
            let categories = self.lookbook.slot_categories(slot);
            let mut policy = SlotPolicy::new(
                categories,
                brief.occasion,
                brief.theme,
                brief.budget,
                self.slot_weights,
                &mut *rng,
            );
            match rank(&mut policy, catalog, 1).into_iter().next() {
                Some(best) => {
                    outfit.items.push(OutfitItem { slot, product: best.product, score: best.score })
                }
                None => debug!(
                    event_name = "wardrobe.suggestions.slot_empty",
                    slot = %slot,
                    "no eligible product for slot"
                ),
            }
        }

        info!(
            event_name = "wardrobe.suggestions.outfit_built",
            occasion = %outfit.occasion,
            color_theme = %outfit.color_theme,
            budget = %outfit.budget,
            items = outfit.items.len(),
            "outfit built"
        );
        Ok(outfit)
    }

    /// Rebuilds an outfit from the same brief; jitter from `rng` varies the picks.
    pub fn regenerate<R: Rng>(
        &self,
        catalog: &[Product],
        outfit: &Outfit,
        rng: &mut R,
    ) -> SuggestionResult<Outfit> {
        let request =
            OutfitRequest::new(&outfit.occasion, &outfit.color_theme, &outfit.budget);
        self.build_outfit(catalog, &request, rng)
    }

    /// Swaps one slot for a uniformly drawn eligible product not already in the outfit.
    ///
    /// An absent slot is filled when a candidate exists.
    pub fn replace_slot<R: Rng>(
        &self,
        catalog: &[Product],
        outfit: &mut Outfit,
        slot: LookSlot,
        rng: &mut R,
    ) -> SuggestionResult<ReplaceOutcome> {
        let brief = self.brief(&outfit.occasion, &outfit.color_theme, &outfit.budget)?;
        let categories = self.lookbook.slot_categories(slot);

        let alternatives: Vec<&Product> = catalog
            .iter()
            .filter(|product| fits_slot(product, categories, brief.budget))
            .filter(|product| !outfit.contains(&product.id))
            .collect();

        if alternatives.is_empty() {
            info!(
                event_name = "wardrobe.suggestions.slot_no_alternatives",
                slot = %slot,
                "no alternative product for slot"
            );
            return Ok(ReplaceOutcome::NoAlternatives { slot });
        }

        let chosen = alternatives[rng.gen_range(0..alternatives.len())];
        let unjittered = SlotWeights { max_jitter: 0.0, ..self.slot_weights };
        let score = SlotPolicy::new(
            categories,
            brief.occasion,
            brief.theme,
            brief.budget,
            unjittered,
            &mut *rng,
        )
        .score(chosen)
        .score;

        let previous = outfit
            .put(OutfitItem { slot, product: chosen.clone(), score })
            .map(|product| product.id);

        info!(
            event_name = "wardrobe.suggestions.slot_replaced",
            slot = %slot,
            product_id = %chosen.id,
            candidates = alternatives.len(),
            "outfit slot replaced"
        );
        Ok(ReplaceOutcome::Replaced { slot, previous, product_id: chosen.id.clone() })
    }

    fn brief(&self, occasion: &str, theme: &str, budget: &str) -> SuggestionResult<Brief<'_>> {
        Ok(Brief {
            occasion: self.lookbook.occasion(occasion)?,
            theme: self.lookbook.color_theme(theme)?,
            budget: self.lookbook.budget_tier(budget)?,
        })
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

struct Brief<'a> {
    occasion: &'a Occasion,
    theme: &'a ColorTheme,
    budget: &'a BudgetTier,
}
