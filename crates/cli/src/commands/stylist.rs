use serde::Serialize;
use wardrobe_core::config::LoadOptions;
use wardrobe_core::stylist::{
    ChatMessage, CompletionPayload, StylistRequest, DEFAULT_STYLIST_PROMPT,
};

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult};

#[derive(Debug, Serialize)]
struct StylistReport {
    endpoint: Option<String>,
    request: StylistRequest,
    payload: CompletionPayload,
}

pub fn run(options: LoadOptions, message: &str) -> CommandResult {
    match execute(options, message) {
        Ok(report) => {
            let target = report.endpoint.as_deref().unwrap_or("<no endpoint configured>");
            let message = format!("stylist request prepared for {target}");
            CommandResult::success_with("stylist-request", message, report)
        }
        Err(failure) => CommandResult::from_failure("stylist-request", failure),
    }
}

fn execute(options: LoadOptions, message: &str) -> Result<StylistReport, CommandFailure> {
    if message.trim().is_empty() {
        return Err(CommandFailure::input("--message must not be empty"));
    }
    let context = CommandContext::load(options)?;
    let profile = context.load_profile();

    let request = StylistRequest::new(vec![ChatMessage::user(message.trim())], &profile);
    let payload = CompletionPayload::from_request(
        context.config.stylist.model.clone(),
        DEFAULT_STYLIST_PROMPT,
        context.catalog.products(),
        &request,
    );

    Ok(StylistReport { endpoint: context.config.stylist.endpoint.clone(), request, payload })
}
