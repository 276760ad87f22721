use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use wardrobe_core::domain::profile::PreferenceProfile;

pub mod file;
pub mod memory;
pub mod profile;

pub use file::JsonFileProfileStore;
pub use memory::InMemoryProfileStore;
pub use profile::SqlProfileStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Persistence port for the shopper's preference profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved under `key` yet.
    async fn load(&self, key: &str) -> Result<Option<PreferenceProfile>, RepositoryError>;
    async fn save(&self, key: &str, profile: &PreferenceProfile) -> Result<(), RepositoryError>;
}

/// Loads the stored profile, falling back to a fresh one when the stored
/// state is missing or unreadable.
pub async fn load_or_default(store: &dyn ProfileStore, key: &str) -> PreferenceProfile {
    match store.load(key).await {
        Ok(Some(profile)) => profile,
        Ok(None) => PreferenceProfile::default(),
        Err(error) => {
            warn!(
                event_name = "wardrobe.store.load_fallback",
                profile_key = key,
                error = %error,
                "stored profile unreadable, starting from a fresh profile"
            );
            PreferenceProfile::default()
        }
    }
}

pub(crate) fn decode_profile(payload: &str) -> Result<PreferenceProfile, RepositoryError> {
    serde_json::from_str(payload).map_err(RepositoryError::from)
}

pub(crate) fn encode_profile(profile: &PreferenceProfile) -> Result<String, RepositoryError> {
    serde_json::to_string(profile).map_err(RepositoryError::from)
}
