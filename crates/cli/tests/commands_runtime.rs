use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use tempfile::TempDir;
use wardrobe_cli::commands::outfit::OutfitArgs;
use wardrobe_cli::commands::related::RelatedArgs;
use wardrobe_cli::commands::{
    doctor, migrate, outfit, privacy, recommend, related, stylist, track, wishlist,
};
use wardrobe_cli::{PrivacyMode, TrackKind};
use wardrobe_core::config::{ConfigOverrides, LoadOptions, StorageBackend};
use wardrobe_core::lookbook::LookSlot;

#[test]
fn track_view_accumulates_across_invocations() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");

        for expected in 1..=3 {
            let result = track::run(file_options(&dir), TrackKind::View, "7");
            assert_eq!(result.exit_code, 0, "expected successful track");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "track");
            assert_eq!(payload["status"], "ok");
            assert_eq!(payload["data"]["recorded"], true);
            assert_eq!(payload["data"]["viewed"], expected);
        }
    });
}

#[test]
fn track_persists_through_sqlite_backend() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let database_url = format!("sqlite://{}", dir.path().join("wardrobe.db").display());
        let options = || LoadOptions {
            config_path: Some(dir.path().join("wardrobe.toml")),
            require_file: false,
            overrides: ConfigOverrides {
                database_url: Some(database_url.clone()),
                storage_backend: Some(StorageBackend::Sqlite),
                ..ConfigOverrides::default()
            },
        };

        let first = track::run(options(), TrackKind::Purchase, "19");
        assert_eq!(first.exit_code, 0, "expected first purchase to be stored");
        let second = track::run(options(), TrackKind::Purchase, "1");
        assert_eq!(second.exit_code, 0, "expected second purchase to be stored");

        let payload = parse_payload(&second.output);
        assert_eq!(payload["data"]["purchased"], 2);
    });
}

#[test]
fn track_unknown_product_is_an_input_error() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");

        let result = track::run(file_options(&dir), TrackKind::View, "9999");
        assert_eq!(result.exit_code, 6, "expected input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input");
        assert!(payload["data"].is_null());
    });
}

#[test]
fn invalid_env_override_is_a_config_error() {
    with_env(&[("WARDROBE_DATABASE_MAX_CONNECTIONS", "lots")], || {
        let dir = TempDir::new().expect("temp dir");

        let result = track::run(file_options(&dir), TrackKind::View, "7");
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_waits_for_enough_views() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");

        let cold = parse_payload(&recommend::run(file_options(&dir)).output);
        assert_eq!(cold["status"], "ok");
        assert_eq!(cold["data"]["engaged"], false);
        assert_eq!(cold["data"]["products"].as_array().map(Vec::len), Some(0));

        for product_id in ["7", "1", "19"] {
            assert_eq!(track::run(file_options(&dir), TrackKind::View, product_id).exit_code, 0);
        }

        let warm = parse_payload(&recommend::run(file_options(&dir)).output);
        assert_eq!(warm["data"]["engaged"], true);
        let products = warm["data"]["products"].as_array().cloned().unwrap_or_default();
        assert_eq!(products.len(), 8);
        assert!(products.iter().all(|ranked| ranked["strategy"] == "personalized"));
    });
}

#[test]
fn opt_out_pauses_tracking_but_not_the_wishlist() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");

        let paused = parse_payload(&privacy::run(file_options(&dir), PrivacyMode::OptOut).output);
        assert_eq!(paused["data"]["opted_out"], true);

        let tracked = parse_payload(&track::run(file_options(&dir), TrackKind::View, "7").output);
        assert_eq!(tracked["status"], "ok");
        assert_eq!(tracked["data"]["recorded"], false);
        assert_eq!(tracked["data"]["viewed"], 0);

        let wished = parse_payload(&wishlist::run(file_options(&dir), "33").output);
        assert_eq!(wished["data"]["wishlisted"], true);
        let unwished = parse_payload(&wishlist::run(file_options(&dir), "33").output);
        assert_eq!(unwished["data"]["wishlisted"], false);

        let resumed = parse_payload(&privacy::run(file_options(&dir), PrivacyMode::OptIn).output);
        assert_eq!(resumed["data"]["opted_out"], false);
    });
}

#[test]
fn outfit_is_reproducible_with_a_seed() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let args = outfit_args("casual", Some(42), None);

        let first = outfit::run(file_options(&dir), &args);
        let second = outfit::run(file_options(&dir), &args);
        assert_eq!(first.exit_code, 0, "expected outfit to build");
        assert_eq!(first.output, second.output);

        let payload = parse_payload(&first.output);
        assert_eq!(payload["data"]["outfit"]["items"].as_array().map(Vec::len), Some(4));
        assert_eq!(payload["data"]["missing_slots"].as_array().map(Vec::len), Some(0));
        assert!(payload["data"]["swap"].is_null());
    });
}

#[test]
fn outfit_swap_reports_the_slot() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let args = outfit_args("casual", Some(7), Some(LookSlot::Footwear));

        let payload = parse_payload(&outfit::run(file_options(&dir), &args).output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["swap"]["slot"], "footwear");
    });
}

#[test]
fn outfit_with_unknown_occasion_is_an_input_error() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");

        let result = outfit::run(file_options(&dir), &outfit_args("gala", Some(1), None));
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "input");
        assert_eq!(payload["message"], "unknown occasion `gala`");
    });
}

#[test]
fn related_uses_markers_from_a_stylist_reply() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let args = RelatedArgs {
            message: Some("Pair it with [[product:1]] for the office".to_string()),
            ..RelatedArgs::default()
        };

        let payload = parse_payload(&related::run(file_options(&dir), &args).output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["anchors"], serde_json::json!(["1"]));
        assert_eq!(payload["data"]["reply_text"], "Pair it with  for the office");

        let products = payload["data"]["products"].as_array().cloned().unwrap_or_default();
        assert!(!products.is_empty() && products.len() <= 3);
        assert!(products.iter().all(|ranked| ranked["product"]["id"] != "1"));
        for ranked in &products {
            let why = ranked["why"].as_array().cloned().unwrap_or_default();
            let reasons = ranked["reasons"].as_array().map_or(0, Vec::len);
            assert!(!why.is_empty(), "expected a description for every related pick");
            assert_eq!(why.len(), reasons);
        }
    });
}

#[test]
fn related_without_anchors_is_empty() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");

        let result = related::run(file_options(&dir), &RelatedArgs::default());
        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["products"].as_array().map(Vec::len), Some(0));
    });
}

#[test]
fn stylist_request_carries_the_style_profile() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        assert_eq!(track::run(file_options(&dir), TrackKind::View, "7").exit_code, 0);

        let result = stylist::run(file_options(&dir), "what goes with jeans?");
        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "stylist-request");

        let request = &payload["data"]["request"];
        assert_eq!(request["messages"][0]["role"], "user");
        let context = request["wardrobeContext"].as_str().unwrap_or_default();
        assert!(context.starts_with("Preferred categories:"));

        let messages =
            payload["data"]["payload"]["messages"].as_array().cloned().unwrap_or_default();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(payload["data"]["payload"]["stream"], true);
    });
}

#[test]
fn migrate_returns_success_for_in_memory_database() {
    with_env(&[("WARDROBE_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run(LoadOptions::default());
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn doctor_passes_with_file_backend() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");

        let report: Value = serde_json::from_str(&doctor::run(file_options(&dir), true))
            .expect("doctor output should be valid JSON");
        assert_eq!(report["overall_status"], "pass");
        assert_eq!(report["checks"].as_array().map(Vec::len), Some(4));
    });
}

#[test]
fn doctor_skips_dependent_checks_when_config_fails() {
    with_env(&[("WARDROBE_LOGGING_LEVEL", "loud")], || {
        let dir = TempDir::new().expect("temp dir");

        let report: Value = serde_json::from_str(&doctor::run(file_options(&dir), true))
            .expect("doctor output should be valid JSON");
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][0]["status"], "fail");
        assert_eq!(report["checks"][3]["status"], "skipped");
    });
}

fn file_options(dir: &TempDir) -> LoadOptions {
    LoadOptions {
        config_path: Some(dir.path().join("wardrobe.toml")),
        require_file: false,
        overrides: ConfigOverrides {
            storage_backend: Some(StorageBackend::File),
            profile_file: Some(dir.path().join("profiles.json")),
            ..ConfigOverrides::default()
        },
    }
}

fn outfit_args(occasion: &str, seed: Option<u64>, swap: Option<LookSlot>) -> OutfitArgs {
    OutfitArgs {
        occasion: occasion.to_string(),
        theme: "neutral".to_string(),
        budget: "premium".to_string(),
        seed,
        swap,
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "WARDROBE_DATABASE_URL",
        "WARDROBE_DATABASE_MAX_CONNECTIONS",
        "WARDROBE_DATABASE_TIMEOUT_SECS",
        "WARDROBE_STORAGE_BACKEND",
        "WARDROBE_STORAGE_FILE_PATH",
        "WARDROBE_STORAGE_PROFILE_KEY",
        "WARDROBE_CATALOG_PATH",
        "WARDROBE_CATALOG_LOOKBOOK_PATH",
        "WARDROBE_RECOMMENDATIONS_ENGAGEMENT_THRESHOLD",
        "WARDROBE_RECOMMENDATIONS_PERSONALIZED_LIMIT",
        "WARDROBE_RECOMMENDATIONS_RELATED_LIMIT",
        "WARDROBE_RECOMMENDATIONS_OUTFIT_SEED",
        "WARDROBE_STYLIST_ENDPOINT",
        "WARDROBE_STYLIST_API_KEY",
        "WARDROBE_STYLIST_MODEL",
        "WARDROBE_LOGGING_LEVEL",
        "WARDROBE_LOGGING_FORMAT",
        "WARDROBE_LOG_LEVEL",
        "WARDROBE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
