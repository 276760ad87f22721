//! Product suggestions for the storefront.
//!
//! Three surfaces share one ranking pipeline: personalized picks from the
//! preference profile, products related to a set of anchors, and a best
//! pick per outfit slot under occasion, color theme and budget.

mod engine;
mod scoring;
mod types;

use rust_decimal::Decimal;

pub use engine::SuggestionEngine;
pub use scoring::{
    fits_slot, rank, PersonalizedPolicy, PersonalizedWeights, RankingPolicy, RelatedPolicy,
    RelatedWeights, SlotPolicy, SlotWeights,
};
pub use types::*;

use crate::errors::DomainError;

/// Result type for suggestion operations
pub type SuggestionResult<T> = Result<T, DomainError>;

pub const DEFAULT_PERSONALIZED_WEIGHTS: PersonalizedWeights = PersonalizedWeights {
    preferred_category: 3.0,
    preferred_color: 2.0,
    purchased_tag: 2.0,
    not_viewed: 1.0,
    best_seller: 1.0,
    new_arrival: 1.0,
};

pub const DEFAULT_RELATED_WEIGHTS: RelatedWeights =
    RelatedWeights { same_category: 2.0, per_shared_tag: 1.0, best_seller: 1.0 };

pub const DEFAULT_SLOT_WEIGHTS: SlotWeights = SlotWeights {
    occasion_tag: 3.0,
    theme_color: 2.0,
    best_seller: 1.0,
    high_rating: 1.0,
    high_rating_threshold: 4.5,
    max_jitter: 0.5,
};

/// Size of the personalized list
pub const DEFAULT_PERSONALIZED_LIMIT: usize = 8;

/// Size of the related-products list
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// No single outfit item may take more than this share of the budget ceiling.
pub const MAX_ITEM_SHARE: Decimal = Decimal::from_parts(4, 0, 0, false, 1);

/// No single outfit item may cost less than this share of the budget floor.
pub const MIN_ITEM_SHARE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
