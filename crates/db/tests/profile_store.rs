use std::fs;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;

use wardrobe_core::domain::product::{Product, ProductColor, ProductId};
use wardrobe_core::domain::profile::PreferenceProfile;
use wardrobe_db::migrations::run_pending;
use wardrobe_db::{
    connect_with_settings, load_or_default, JsonFileProfileStore, ProfileStore, SqlProfileStore,
};

fn product(id: &str, category: &str, colors: &[&str]) -> Product {
    Product {
        id: ProductId::from(id),
        name: format!("{category} {id}"),
        category: category.to_string(),
        collection: None,
        tags: vec!["casual".to_string(), "office".to_string()],
        colors: colors.iter().map(|name| ProductColor::new(*name, "#000000")).collect(),
        price: Decimal::new(2499, 0),
        in_stock: true,
        is_new: false,
        is_best_seller: false,
        rating: None,
        reviews: None,
    }
}

/// Profile whose weight maps are deliberately not in alphabetical order.
fn browsed_profile() -> PreferenceProfile {
    let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).single().expect("valid timestamp");
    let mut profile = PreferenceProfile::default();
    profile.record_view_at(&product("7", "T-Shirts", &["White", "Black"]), at);
    profile.record_view_at(&product("1", "Shirts", &["Navy"]), at);
    profile.record_purchase_at(&product("19", "Jeans", &["Black"]), at);
    profile.toggle_wishlist(&ProductId::from("33"));
    profile
}

async fn sql_store() -> SqlProfileStore {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    run_pending(&pool).await.expect("run migrations");
    SqlProfileStore::new(pool)
}

#[tokio::test]
async fn sql_store_round_trips_and_keeps_weight_order() {
    let store = sql_store().await;
    let profile = browsed_profile();

    store.save("shopper", &profile).await.expect("save");
    let loaded = store.load("shopper").await.expect("load").expect("profile present");

    assert_eq!(loaded, profile);
    let colors: Vec<&str> = loaded.preferred_colors.iter().map(|(name, _)| name).collect();
    assert_eq!(colors, vec!["White", "Black", "Navy"]);
    let categories: Vec<&str> = loaded.preferred_categories.iter().map(|(name, _)| name).collect();
    assert_eq!(categories, vec!["T-Shirts", "Shirts", "Jeans"]);
}

#[tokio::test]
async fn sql_store_overwrites_on_save() {
    let store = sql_store().await;
    let mut profile = browsed_profile();
    store.save("shopper", &profile).await.expect("first save");

    profile.set_opt_out(true);
    store.save("shopper", &profile).await.expect("second save");

    let loaded = store.load("shopper").await.expect("load").expect("profile present");
    assert!(loaded.opted_out);
    assert_eq!(store.load("nobody").await.expect("load missing"), None);
}

#[tokio::test]
async fn sql_store_malformed_payload_loads_default() {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    run_pending(&pool).await.expect("run migrations");
    sqlx::query(
        "INSERT INTO wardrobe_profile (profile_key, payload, updated_at) VALUES (?, ?, ?)",
    )
    .bind("shopper")
    .bind("[1, 2, 3]")
    .bind("2026-01-01T00:00:00Z")
    .execute(&pool)
    .await
    .expect("insert malformed row");
    let store = SqlProfileStore::new(pool);

    assert!(store.load("shopper").await.is_err());
    assert_eq!(load_or_default(&store, "shopper").await, PreferenceProfile::default());
}

#[tokio::test]
async fn file_store_keeps_profiles_per_key() {
    let dir = TempDir::new().expect("temp dir");
    let store = JsonFileProfileStore::new(dir.path().join("nested").join("profiles.json"));
    let profile = browsed_profile();

    assert_eq!(store.load("shopper").await.expect("load before save"), None);
    store.save("shopper", &profile).await.expect("save shopper");
    store.save("guest", &PreferenceProfile::default()).await.expect("save guest");

    assert_eq!(store.load("shopper").await.expect("load"), Some(profile));
    assert_eq!(store.load("guest").await.expect("load"), Some(PreferenceProfile::default()));
}

#[tokio::test]
async fn file_store_recovers_from_corrupt_document() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("profiles.json");
    fs::write(&path, "{\"shopper\": {\"viewed_items\": 12").expect("write corrupt file");
    let store = JsonFileProfileStore::new(&path);

    assert!(store.load("shopper").await.is_err());
    assert_eq!(load_or_default(&store, "shopper").await, PreferenceProfile::default());

    let profile = browsed_profile();
    store.save("shopper", &profile).await.expect("save over corrupt file");
    assert_eq!(store.load("shopper").await.expect("load"), Some(profile));
}
