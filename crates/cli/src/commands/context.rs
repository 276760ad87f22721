use anyhow::Context;
use tokio::runtime::Runtime;
use tracing::info;

use wardrobe_core::catalog::Catalog;
use wardrobe_core::config::{AppConfig, LoadOptions, StorageBackend};
use wardrobe_core::domain::product::{Product, ProductId};
use wardrobe_core::domain::profile::PreferenceProfile;
use wardrobe_core::errors::DomainError;
use wardrobe_core::lookbook::Lookbook;
use wardrobe_core::suggestions::SuggestionEngine;
use wardrobe_db::{
    connect_with_config, load_or_default, migrations, InMemoryProfileStore,
    JsonFileProfileStore, ProfileStore, SqlProfileStore,
};

use crate::commands::CommandFailure;

/// Everything a shopper-facing command needs: config, catalog, engine, and the profile store.
pub struct CommandContext {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub engine: SuggestionEngine,
    store: Box<dyn ProfileStore>,
    runtime: Runtime,
}

impl CommandContext {
    pub fn load(options: LoadOptions) -> Result<Self, CommandFailure> {
        let config = AppConfig::load(options).map_err(CommandFailure::config)?;
        let catalog =
            load_catalog(&config).map_err(|error| CommandFailure::input(format!("{error:#}")))?;
        let lookbook =
            load_lookbook(&config).map_err(|error| CommandFailure::input(format!("{error:#}")))?;
        let engine = SuggestionEngine::with_lookbook(lookbook)
            .with_limits(
                config.recommendations.personalized_limit,
                config.recommendations.related_limit,
            )
            .with_engagement_threshold(config.recommendations.engagement_threshold);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CommandFailure::runtime)?;
        let store = runtime.block_on(open_store(&config))?;

        Ok(Self { config, catalog, engine, store, runtime })
    }

    pub fn profile_key(&self) -> &str {
        &self.config.storage.profile_key
    }

    pub fn load_profile(&self) -> PreferenceProfile {
        self.runtime.block_on(load_or_default(self.store.as_ref(), self.profile_key()))
    }

    pub fn save_profile(&self, profile: &PreferenceProfile) -> Result<(), CommandFailure> {
        self.runtime
            .block_on(self.store.save(self.profile_key(), profile))
            .map_err(CommandFailure::storage)
    }

    pub fn product(&self, product_id: &str) -> Result<&Product, CommandFailure> {
        self.catalog
            .find(&ProductId::new(product_id.trim()))
            .ok_or_else(|| {
                CommandFailure::input(DomainError::UnknownProduct(product_id.to_string()))
            })
    }
}

fn load_catalog(config: &AppConfig) -> anyhow::Result<Catalog> {
    match &config.catalog.path {
        Some(path) => Catalog::load_json(path)
            .with_context(|| format!("catalog `{}` could not be loaded", path.display())),
        None => Ok(Catalog::seeded()),
    }
}

fn load_lookbook(config: &AppConfig) -> anyhow::Result<Lookbook> {
    match &config.catalog.lookbook_path {
        Some(path) => Lookbook::load_toml(path)
            .with_context(|| format!("lookbook `{}` could not be loaded", path.display())),
        None => Ok(Lookbook::default()),
    }
}

/// Opens the configured backend. SQLite stores are migrated on open.
pub async fn open_store(config: &AppConfig) -> Result<Box<dyn ProfileStore>, CommandFailure> {
    let store: Box<dyn ProfileStore> = match config.storage.backend {
        StorageBackend::Sqlite => {
            let pool = connect_with_config(&config.database).await.map_err(|error| {
                CommandFailure::storage(format!("failed to connect to database: {error}"))
            })?;
            migrations::run_pending(&pool).await.map_err(CommandFailure::migration)?;
            Box::new(SqlProfileStore::new(pool))
        }
        StorageBackend::File => Box::new(JsonFileProfileStore::new(&config.storage.file_path)),
        StorageBackend::Memory => Box::new(InMemoryProfileStore::new()),
    };

    info!(
        event_name = "wardrobe.store.opened",
        backend = config.storage.backend.as_str(),
        profile_key = %config.storage.profile_key,
        "profile store ready"
    );
    Ok(store)
}
