//! Wardrobe memory: folds behavioral events into a [`PreferenceProfile`].

mod summary;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::product::{Product, ProductId};
use crate::domain::profile::{
    BehaviorEvent, PreferenceProfile, TrackedItem, PURCHASE_HISTORY_CAP, VIEW_HISTORY_CAP,
};

pub use summary::{MAX_STYLE_TAGS, RECENT_PURCHASES_FOR_TAGS, TOP_PREFERENCES};

/// Category weight added by a single view.
pub const VIEW_CATEGORY_WEIGHT: u32 = 1;
/// Category weight added by a single purchase.
pub const PURCHASE_CATEGORY_WEIGHT: u32 = 3;
/// Views needed before personalized suggestions are worth surfacing.
pub const DEFAULT_ENGAGEMENT_THRESHOLD: usize = 3;

impl PreferenceProfile {
    /// Returns `false` when the event was suppressed by the opt-out flag.
    pub fn apply(&mut self, event: BehaviorEvent<'_>) -> bool {
        self.apply_at(event, Utc::now())
    }

    pub fn apply_at(&mut self, event: BehaviorEvent<'_>, at: DateTime<Utc>) -> bool {
        match event {
            BehaviorEvent::Viewed(product) => self.record_view_at(product, at),
            BehaviorEvent::Purchased(product) => self.record_purchase_at(product, at),
            BehaviorEvent::WishlistToggled(product_id) => {
                self.toggle_wishlist(product_id);
                true
            }
        }
    }

    pub fn record_view(&mut self, product: &Product) -> bool {
        self.record_view_at(product, Utc::now())
    }

    pub fn record_view_at(&mut self, product: &Product, at: DateTime<Utc>) -> bool {
        if self.opted_out {
            debug!(
                event_name = "wardrobe.profile.view_suppressed",
                product_id = %product.id,
                "view ignored for opted-out profile"
            );
            return false;
        }

        self.viewed_items.push(TrackedItem::capture(product, at));
        truncate_front(&mut self.viewed_items, VIEW_HISTORY_CAP);

        for color in &product.colors {
            self.preferred_colors.increment(&color.name, 1);
        }
        self.preferred_categories.increment(&product.category, VIEW_CATEGORY_WEIGHT);

        debug!(
            event_name = "wardrobe.profile.view_recorded",
            product_id = %product.id,
            viewed = self.viewed_items.len(),
            "view recorded"
        );
        true
    }

    pub fn record_purchase(&mut self, product: &Product) -> bool {
        self.record_purchase_at(product, Utc::now())
    }

    pub fn record_purchase_at(&mut self, product: &Product, at: DateTime<Utc>) -> bool {
        if self.opted_out {
            debug!(
                event_name = "wardrobe.profile.purchase_suppressed",
                product_id = %product.id,
                "purchase ignored for opted-out profile"
            );
            return false;
        }

        self.purchased_items.push(TrackedItem::capture(product, at));
        truncate_front(&mut self.purchased_items, PURCHASE_HISTORY_CAP);
        self.preferred_categories.increment(&product.category, PURCHASE_CATEGORY_WEIGHT);

        debug!(
            event_name = "wardrobe.profile.purchase_recorded",
            product_id = %product.id,
            purchased = self.purchased_items.len(),
            "purchase recorded"
        );
        true
    }

    /// Flips wishlist membership. Not subject to the opt-out flag.
    pub fn toggle_wishlist(&mut self, product_id: &ProductId) -> bool {
        if let Some(position) = self.wishlisted_items.iter().position(|id| id == product_id) {
            self.wishlisted_items.remove(position);
            false
        } else {
            self.wishlisted_items.push(product_id.clone());
            true
        }
    }

    pub fn is_wishlisted(&self, product_id: &ProductId) -> bool {
        self.wishlisted_items.contains(product_id)
    }

    pub fn set_opt_out(&mut self, opted_out: bool) {
        self.opted_out = opted_out;
    }

    pub fn is_engaged(&self, threshold: usize) -> bool {
        self.viewed_items.len() >= threshold
    }

    pub fn has_viewed(&self, product_id: &ProductId) -> bool {
        self.viewed_items.iter().any(|item| &item.product_id == product_id)
    }
}

fn truncate_front<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let overflow = items.len() - cap;
        items.drain(..overflow);
    }
}
