use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use toml::Value;
use wardrobe_core::config::{AppConfig, ConfigOverrides, LoadOptions, DEFAULT_CONFIG_FILE};

pub fn run(options: LoadOptions) -> String {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let flagged = flagged_keys(&options.overrides);
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let display_path = |path: &Option<PathBuf>| {
        path.as_ref().map(|path| path.display().to_string()).unwrap_or_else(|| "<unset>".into())
    };
    let stylist_api_key = config
        .stylist
        .api_key
        .as_ref()
        .map(|key| redact_token(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    let fields: Vec<(&str, String, &str)> = vec![
        ("database.url", config.database.url.clone(), "WARDROBE_DATABASE_URL"),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            "WARDROBE_DATABASE_MAX_CONNECTIONS",
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            "WARDROBE_DATABASE_TIMEOUT_SECS",
        ),
        (
            "storage.backend",
            config.storage.backend.as_str().to_string(),
            "WARDROBE_STORAGE_BACKEND",
        ),
        (
            "storage.file_path",
            config.storage.file_path.display().to_string(),
            "WARDROBE_STORAGE_FILE_PATH",
        ),
        (
            "storage.profile_key",
            config.storage.profile_key.clone(),
            "WARDROBE_STORAGE_PROFILE_KEY",
        ),
        ("catalog.path", display_path(&config.catalog.path), "WARDROBE_CATALOG_PATH"),
        (
            "catalog.lookbook_path",
            display_path(&config.catalog.lookbook_path),
            "WARDROBE_CATALOG_LOOKBOOK_PATH",
        ),
        (
            "recommendations.engagement_threshold",
            config.recommendations.engagement_threshold.to_string(),
            "WARDROBE_RECOMMENDATIONS_ENGAGEMENT_THRESHOLD",
        ),
        (
            "recommendations.personalized_limit",
            config.recommendations.personalized_limit.to_string(),
            "WARDROBE_RECOMMENDATIONS_PERSONALIZED_LIMIT",
        ),
        (
            "recommendations.related_limit",
            config.recommendations.related_limit.to_string(),
            "WARDROBE_RECOMMENDATIONS_RELATED_LIMIT",
        ),
        (
            "recommendations.outfit_seed",
            config
                .recommendations
                .outfit_seed
                .map(|seed| seed.to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
            "WARDROBE_RECOMMENDATIONS_OUTFIT_SEED",
        ),
        (
            "stylist.endpoint",
            config.stylist.endpoint.clone().unwrap_or_else(|| "<unset>".to_string()),
            "WARDROBE_STYLIST_ENDPOINT",
        ),
        ("stylist.api_key", stylist_api_key, "WARDROBE_STYLIST_API_KEY"),
        ("stylist.model", config.stylist.model.clone(), "WARDROBE_STYLIST_MODEL"),
        ("logging.level", config.logging.level.clone(), "WARDROBE_LOGGING_LEVEL"),
        ("logging.format", format!("{:?}", config.logging.format), "WARDROBE_LOGGING_FORMAT"),
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for (key, value, env_key) in fields {
        let source = if flagged.iter().any(|flag| *flag == key) {
            "flag".to_string()
        } else {
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
        };
        lines.push(render_line(key, &value, source));
    }
    lines.join("\n")
}

fn flagged_keys(overrides: &ConfigOverrides) -> Vec<&'static str> {
    [
        ("database.url", overrides.database_url.is_some()),
        ("logging.level", overrides.log_level.is_some()),
        ("storage.backend", overrides.storage_backend.is_some()),
        ("storage.file_path", overrides.profile_file.is_some()),
        ("storage.profile_key", overrides.profile_key.is_some()),
        ("catalog.path", overrides.catalog_path.is_some()),
        ("recommendations.outfit_seed", overrides.outfit_seed.is_some()),
    ]
    .into_iter()
    .filter_map(|(key, set)| set.then_some(key))
    .collect()
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}

#[cfg(test)]
mod tests {
    use super::{contains_path, redact_token};

    #[test]
    fn api_keys_keep_only_their_prefix() {
        assert_eq!(redact_token("sk-or-v1-abcdef"), "sk-***");
        assert_eq!(redact_token("plainsecret"), "<redacted>");
        assert_eq!(redact_token("  "), "<empty>");
    }

    #[test]
    fn nested_keys_are_found_in_file_doc() {
        let doc: toml::Value =
            "[storage]\nbackend = \"file\"\n".parse().expect("parse toml fixture");

        assert!(contains_path(&doc, "storage.backend"));
        assert!(!contains_path(&doc, "storage.profile_key"));
        assert!(!contains_path(&doc, "stylist.model"));
    }
}
