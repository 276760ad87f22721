use serde::Serialize;
use wardrobe_core::config::LoadOptions;

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult};
use crate::TrackKind;

#[derive(Debug, Serialize)]
struct TrackSummary {
    product_id: String,
    event: &'static str,
    recorded: bool,
    viewed: usize,
    purchased: usize,
}

pub fn run(options: LoadOptions, kind: TrackKind, product_id: &str) -> CommandResult {
    match execute(options, kind, product_id) {
        Ok(summary) => {
            let message = if summary.recorded {
                format!("recorded {} of product {}", summary.event, summary.product_id)
            } else {
                "tracking is paused for this profile; nothing recorded".to_string()
            };
            CommandResult::success_with("track", message, summary)
        }
        Err(failure) => CommandResult::from_failure("track", failure),
    }
}

fn execute(
    options: LoadOptions,
    kind: TrackKind,
    product_id: &str,
) -> Result<TrackSummary, CommandFailure> {
    let context = CommandContext::load(options)?;
    let product = context.product(product_id)?;
    let mut profile = context.load_profile();

    let (event, recorded) = match kind {
        TrackKind::View => ("view", profile.record_view(product)),
        TrackKind::Purchase => ("purchase", profile.record_purchase(product)),
    };
    if recorded {
        context.save_profile(&profile)?;
    }

    Ok(TrackSummary {
        product_id: product.id.to_string(),
        event,
        recorded,
        viewed: profile.viewed_items.len(),
        purchased: profile.purchased_items.len(),
    })
}
