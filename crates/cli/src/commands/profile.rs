use serde::Serialize;
use wardrobe_core::config::LoadOptions;
use wardrobe_core::domain::profile::PreferenceProfile;
use wardrobe_core::memory::TOP_PREFERENCES;

use crate::commands::context::CommandContext;
use crate::commands::{CommandFailure, CommandResult};

#[derive(Debug, Serialize)]
struct ProfileReport {
    profile_key: String,
    engaged: bool,
    summary: String,
    top_categories: Vec<String>,
    top_colors: Vec<String>,
    wishlist_names: Vec<String>,
    profile: PreferenceProfile,
}

pub fn run(options: LoadOptions) -> CommandResult {
    match execute(options) {
        Ok(report) => {
            let message = if report.summary.is_empty() {
                "no style signal recorded yet".to_string()
            } else {
                report.summary.clone()
            };
            CommandResult::success_with("profile", message, report)
        }
        Err(failure) => CommandResult::from_failure("profile", failure),
    }
}

fn execute(options: LoadOptions) -> Result<ProfileReport, CommandFailure> {
    let context = CommandContext::load(options)?;
    let profile = context.load_profile();

    let owned = |values: Vec<&str>| values.into_iter().map(str::to_string).collect::<Vec<_>>();
    Ok(ProfileReport {
        profile_key: context.profile_key().to_string(),
        engaged: profile.is_engaged(context.engine.engagement_threshold()),
        summary: profile.summarize(),
        top_categories: owned(profile.preferred_categories.top(TOP_PREFERENCES)),
        top_colors: owned(profile.preferred_colors.top(TOP_PREFERENCES)),
        wishlist_names: context
            .catalog
            .resolve(&profile.wishlisted_items)
            .into_iter()
            .map(|product| product.name.clone())
            .collect(),
        profile,
    })
}
