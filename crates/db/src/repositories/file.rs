use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use wardrobe_core::domain::profile::PreferenceProfile;

use super::{ProfileStore, RepositoryError};

type ProfileDocument = BTreeMap<String, PreferenceProfile>;

/// Stores profiles in one JSON document keyed by profile key.
pub struct JsonFileProfileStore {
    path: PathBuf,
}

impl JsonFileProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<ProfileDocument, RepositoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(ProfileDocument::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(ProfileDocument::new()),
            Err(error) => Err(error.into()),
        }
    }
}

#[async_trait::async_trait]
impl ProfileStore for JsonFileProfileStore {
    async fn load(&self, key: &str) -> Result<Option<PreferenceProfile>, RepositoryError> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    /// Rewrites the whole document. An unreadable document is replaced.
    async fn save(&self, key: &str, profile: &PreferenceProfile) -> Result<(), RepositoryError> {
        let mut document = match self.read_document().await {
            Ok(document) => document,
            Err(error) => {
                warn!(
                    event_name = "wardrobe.store.file_replaced",
                    path = %self.path.display(),
                    error = %error,
                    "profile file unreadable, rewriting it"
                );
                ProfileDocument::new()
            }
        };
        document.insert(key.to_string(), profile.clone());

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let rendered = serde_json::to_string_pretty(&document)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, rendered).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}
