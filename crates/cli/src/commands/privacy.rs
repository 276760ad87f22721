use serde::Serialize;
use wardrobe_core::config::LoadOptions;

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult};
use crate::PrivacyMode;

#[derive(Debug, Serialize)]
struct PrivacySummary {
    opted_out: bool,
}

pub fn run(options: LoadOptions, mode: PrivacyMode) -> CommandResult {
    match execute(options, mode) {
        Ok(summary) => {
            let message = if summary.opted_out {
                "behavior tracking paused"
            } else {
                "behavior tracking resumed"
            };
            CommandResult::success_with("privacy", message, summary)
        }
        Err(failure) => CommandResult::from_failure("privacy", failure),
    }
}

fn execute(options: LoadOptions, mode: PrivacyMode) -> Result<PrivacySummary, CommandFailure> {
    let context = CommandContext::load(options)?;
    let mut profile = context.load_profile();
    profile.set_opt_out(mode == PrivacyMode::OptOut);
    context.save_profile(&profile)?;
    Ok(PrivacySummary { opted_out: profile.opted_out })
}
