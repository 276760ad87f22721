pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use wardrobe_core::config::{AppConfig, ConfigOverrides, LoadOptions, StorageBackend};

use crate::commands::outfit::OutfitArgs;
use crate::commands::related::RelatedArgs;

#[derive(Debug, Parser)]
#[command(
    name = "wardrobe",
    about = "Wardrobe personalization CLI",
    long_about = "Track shopper behavior, inspect the preference profile, and query personalized, \
related, and outfit recommendations.",
    after_help = "Examples:\n  wardrobe track view 7\n  wardrobe recommend\n  \
wardrobe outfit --occasion office --theme dark --budget mid --seed 42\n  wardrobe doctor --json"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every subcommand; they win over file and environment config.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    #[arg(long, global = true, help = "Path to a wardrobe.toml config file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override database.url")]
    pub database_url: Option<String>,
    #[arg(long, global = true, help = "Override storage.backend (sqlite|file|memory)")]
    pub storage: Option<StorageBackend>,
    #[arg(long, global = true, help = "Override storage.file_path")]
    pub profile_file: Option<PathBuf>,
    #[arg(long, global = true, help = "Override storage.profile_key")]
    pub profile_key: Option<String>,
    #[arg(long, global = true, help = "Load the catalog from a JSON file")]
    pub catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level")]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                database_url: self.database_url.clone(),
                log_level: self.log_level.clone(),
                storage_backend: self.storage,
                profile_file: self.profile_file.clone(),
                profile_key: self.profile_key.clone(),
                catalog_path: self.catalog.clone(),
                outfit_seed: None,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Record a product view or purchase in the preference profile")]
    Track {
        #[command(subcommand)]
        event: TrackEvent,
    },
    #[command(about = "Add a product to the wishlist, or remove it when already present")]
    Wishlist {
        #[arg(help = "Catalog product id")]
        product_id: String,
    },
    #[command(about = "Stop or resume behavior tracking")]
    Privacy {
        #[arg(value_enum)]
        mode: PrivacyMode,
    },
    #[command(about = "Show the stored preference profile and its style summary")]
    Profile,
    #[command(about = "Rank the catalog against the preference profile")]
    Recommend,
    #[command(about = "List products related to catalog items or to a stylist reply")]
    Related(RelatedArgs),
    #[command(about = "Assemble a look for an occasion, color theme, and budget")]
    Outfit(OutfitArgs),
    #[command(about = "Build the stylist backend request for a shopper message")]
    StylistRequest {
        #[arg(long, help = "Shopper message sent to the stylist")]
        message: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog, lookbook, and profile storage readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
}

#[derive(Debug, Subcommand)]
enum TrackEvent {
    #[command(about = "Record that the shopper viewed a product")]
    View { product_id: String },
    #[command(about = "Record that the shopper bought a product")]
    Purchase { product_id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrivacyMode {
    OptOut,
    OptIn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    View,
    Purchase,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.global.load_options();

    let logging = AppConfig::load(options.clone())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    logging::init(&logging);

    let result = match cli.command {
        Command::Track { event: TrackEvent::View { product_id } } => {
            commands::track::run(options, TrackKind::View, &product_id)
        }
        Command::Track { event: TrackEvent::Purchase { product_id } } => {
            commands::track::run(options, TrackKind::Purchase, &product_id)
        }
        Command::Wishlist { product_id } => commands::wishlist::run(options, &product_id),
        Command::Privacy { mode } => commands::privacy::run(options, mode),
        Command::Profile => commands::profile::run(options),
        Command::Recommend => commands::recommend::run(options),
        Command::Related(args) => commands::related::run(options, &args),
        Command::Outfit(args) => commands::outfit::run(options, &args),
        Command::StylistRequest { message } => commands::stylist::run(options, &message),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(options) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(options, json) }
        }
        Command::Migrate => commands::migrate::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
