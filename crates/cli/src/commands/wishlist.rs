use serde::Serialize;
use wardrobe_core::config::LoadOptions;

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult};

#[derive(Debug, Serialize)]
struct WishlistSummary {
    product_id: String,
    wishlisted: bool,
    wishlist: Vec<String>,
}

pub fn run(options: LoadOptions, product_id: &str) -> CommandResult {
    match execute(options, product_id) {
        Ok(summary) => {
            let verb = if summary.wishlisted { "added to" } else { "removed from" };
            let message = format!("product {} {verb} the wishlist", summary.product_id);
            CommandResult::success_with("wishlist", message, summary)
        }
        Err(failure) => CommandResult::from_failure("wishlist", failure),
    }
}

fn execute(options: LoadOptions, product_id: &str) -> Result<WishlistSummary, CommandFailure> {
    let context = CommandContext::load(options)?;
    let product = context.product(product_id)?;
    let mut profile = context.load_profile();

    // Wishlist edits are explicit shopper actions and apply even while tracking is paused.
    let wishlisted = profile.toggle_wishlist(&product.id);
    context.save_profile(&profile)?;

    Ok(WishlistSummary {
        product_id: product.id.to_string(),
        wishlisted,
        wishlist: profile.wishlisted_items.iter().map(ToString::to_string).collect(),
    })
}
