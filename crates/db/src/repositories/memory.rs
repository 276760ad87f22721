use std::collections::HashMap;

use tokio::sync::RwLock;

use wardrobe_core::domain::profile::PreferenceProfile;

use super::{decode_profile, encode_profile, ProfileStore, RepositoryError};

/// Keeps serialized profiles in process memory.
///
/// Profiles are held as JSON so that reads exercise the same decode path as
/// the durable stores.
#[derive(Default)]
pub struct InMemoryProfileStore {
    payloads: RwLock<HashMap<String, String>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw payload, e.g. one written by an older client.
    pub fn with_raw(key: impl Into<String>, payload: impl Into<String>) -> Self {
        let mut payloads = HashMap::new();
        payloads.insert(key.into(), payload.into());
        Self { payloads: RwLock::new(payloads) }
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, key: &str) -> Result<Option<PreferenceProfile>, RepositoryError> {
        let payloads = self.payloads.read().await;
        payloads.get(key).map(|payload| decode_profile(payload)).transpose()
    }

    async fn save(&self, key: &str, profile: &PreferenceProfile) -> Result<(), RepositoryError> {
        let payload = encode_profile(profile)?;
        let mut payloads = self.payloads.write().await;
        payloads.insert(key.to_string(), payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wardrobe_core::domain::profile::{PreferenceProfile, WeightMap};

    use crate::repositories::{load_or_default, InMemoryProfileStore, ProfileStore};

    #[tokio::test]
    async fn in_memory_store_round_trip() {
        let store = InMemoryProfileStore::new();
        let profile = PreferenceProfile {
            preferred_categories: WeightMap::from([("Jeans", 4), ("Shirts", 4)]),
            opted_out: true,
            ..PreferenceProfile::default()
        };

        store.save("shopper", &profile).await.expect("save profile");
        let found = store.load("shopper").await.expect("load profile");

        assert_eq!(found, Some(profile));
        assert_eq!(store.load("someone-else").await.expect("load"), None);
    }

    #[tokio::test]
    async fn malformed_payload_falls_back_to_default() {
        let store = InMemoryProfileStore::with_raw("shopper", "{not json");

        assert!(store.load("shopper").await.is_err());
        assert_eq!(load_or_default(&store, "shopper").await, PreferenceProfile::default());
    }
}
