use serde::Serialize;
use wardrobe_core::config::LoadOptions;

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult, RankedEntry};

#[derive(Debug, Serialize)]
struct RecommendReport {
    engaged: bool,
    viewed: usize,
    threshold: usize,
    products: Vec<RankedEntry>,
}

pub fn run(options: LoadOptions) -> CommandResult {
    match execute(options) {
        Ok(report) if report.engaged => {
            let message = format!("{} personalized picks", report.products.len());
            CommandResult::success_with("recommend", message, report)
        }
        Ok(report) => {
            let message = format!(
                "view at least {} products to unlock personalized picks ({} so far)",
                report.threshold, report.viewed
            );
            CommandResult::success_with("recommend", message, report)
        }
        Err(failure) => CommandResult::from_failure("recommend", failure),
    }
}

fn execute(options: LoadOptions) -> Result<RecommendReport, CommandFailure> {
    let context = CommandContext::load(options)?;
    let profile = context.load_profile();
    let ranked = context.engine.recommended_for_you(&profile, context.catalog.products());

    Ok(RecommendReport {
        engaged: ranked.is_some(),
        viewed: profile.viewed_items.len(),
        threshold: context.engine.engagement_threshold(),
        products: ranked.unwrap_or_default().into_iter().map(RankedEntry::from).collect(),
    })
}
