use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde::Serialize;
use wardrobe_core::config::LoadOptions;
use wardrobe_core::lookbook::LookSlot;
use wardrobe_core::suggestions::{Outfit, OutfitRequest, ReplaceOutcome};

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct OutfitArgs {
    #[arg(long, help = "Occasion id, e.g. office, casual, party")]
    pub occasion: String,
    #[arg(long, help = "Color theme id, e.g. dark, light, earth, neutral")]
    pub theme: String,
    #[arg(long, help = "Budget tier id, e.g. budget, mid, premium, luxury")]
    pub budget: String,
    #[arg(long, help = "Seed for reproducible picks")]
    pub seed: Option<u64>,
    #[arg(long, help = "Swap this slot for another eligible product after building")]
    pub swap: Option<LookSlot>,
}

#[derive(Debug, Serialize)]
struct OutfitReport {
    outfit: Outfit,
    total_price: Decimal,
    missing_slots: Vec<LookSlot>,
    swap: Option<ReplaceOutcome>,
}

pub fn run(options: LoadOptions, args: &OutfitArgs) -> CommandResult {
    match execute(options, args) {
        Ok(report) => {
            let message = format!(
                "{} of {} slots filled, total {}",
                report.outfit.items.len(),
                LookSlot::ALL.len(),
                report.total_price.normalize()
            );
            CommandResult::success_with("outfit", message, report)
        }
        Err(failure) => CommandResult::from_failure("outfit", failure),
    }
}

fn execute(options: LoadOptions, args: &OutfitArgs) -> Result<OutfitReport, CommandFailure> {
    let context = CommandContext::load(options)?;
    let seed = args.seed.or(context.config.recommendations.outfit_seed);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let request = OutfitRequest::new(&args.occasion, &args.theme, &args.budget);
    let catalog = context.catalog.products();
    let mut outfit = context
        .engine
        .build_outfit(catalog, &request, &mut rng)
        .map_err(CommandFailure::input)?;

    let swap = match args.swap {
        Some(slot) => Some(
            context
                .engine
                .replace_slot(catalog, &mut outfit, slot, &mut rng)
                .map_err(CommandFailure::input)?,
        ),
        None => None,
    };

    let missing_slots =
        LookSlot::ALL.into_iter().filter(|slot| outfit.item(*slot).is_none()).collect();
    Ok(OutfitReport { total_price: outfit.total_price(), missing_slots, swap, outfit })
}
