use clap::Args;
use serde::Serialize;
use wardrobe_core::config::LoadOptions;
use wardrobe_core::domain::product::{Product, ProductId};
use wardrobe_core::stylist::extract_product_mentions;

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult, RankedEntry};

#[derive(Debug, Clone, Default, Args)]
pub struct RelatedArgs {
    #[arg(help = "Anchor product ids")]
    pub product_ids: Vec<String>,
    #[arg(long, help = "Stylist reply whose [[product:ID]] markers become anchors")]
    pub message: Option<String>,
    #[arg(long, help = "Maximum number of related products")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RelatedReport {
    anchors: Vec<ProductId>,
    reply_text: Option<String>,
    products: Vec<RankedEntry>,
}

pub fn run(options: LoadOptions, args: &RelatedArgs) -> CommandResult {
    match execute(options, args) {
        Ok(report) => {
            let message = if report.anchors.is_empty() {
                "no anchor products given; nothing to relate".to_string()
            } else {
                format!(
                    "{} products related to {} anchors",
                    report.products.len(),
                    report.anchors.len()
                )
            };
            CommandResult::success_with("related", message, report)
        }
        Err(failure) => CommandResult::from_failure("related", failure),
    }
}

fn execute(options: LoadOptions, args: &RelatedArgs) -> Result<RelatedReport, CommandFailure> {
    if args.limit == Some(0) {
        return Err(CommandFailure::input("--limit must be greater than zero"));
    }
    let context = CommandContext::load(options)?;

    let mut anchors: Vec<&Product> = Vec::new();
    for product_id in &args.product_ids {
        let product = context.product(product_id)?;
        if !anchors.iter().any(|anchor| anchor.id == product.id) {
            anchors.push(product);
        }
    }

    let mentions = args.message.as_deref().map(extract_product_mentions);
    if let Some(mentions) = &mentions {
        for product in mentions.resolve(context.catalog.products()) {
            if !anchors.iter().any(|anchor| anchor.id == product.id) {
                anchors.push(product);
            }
        }
    }

    let catalog = context.catalog.products();
    let products = match args.limit {
        Some(limit) => context.engine.related_limited(&anchors, catalog, limit),
        None => context.engine.related(&anchors, catalog),
    };

    Ok(RelatedReport {
        anchors: anchors.iter().map(|anchor| anchor.id.clone()).collect(),
        reply_text: mentions.map(|mentions| mentions.text),
        products: products.into_iter().map(RankedEntry::from).collect(),
    })
}
