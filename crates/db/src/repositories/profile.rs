use chrono::Utc;
use sqlx::Row;

use wardrobe_core::domain::profile::PreferenceProfile;

use super::{decode_profile, encode_profile, ProfileStore, RepositoryError};
use crate::DbPool;

/// Stores each profile as a JSON payload in `wardrobe_profile`.
pub struct SqlProfileStore {
    pool: DbPool,
}

impl SqlProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for SqlProfileStore {
    async fn load(&self, key: &str) -> Result<Option<PreferenceProfile>, RepositoryError> {
        let row = sqlx::query("SELECT payload FROM wardrobe_profile WHERE profile_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| decode_profile(&row.try_get::<String, _>("payload")?)).transpose()
    }

    async fn save(&self, key: &str, profile: &PreferenceProfile) -> Result<(), RepositoryError> {
        let payload = encode_profile(profile)?;

        sqlx::query(
            r#"
            INSERT INTO wardrobe_profile (profile_key, payload, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(profile_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
