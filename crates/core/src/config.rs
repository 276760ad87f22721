use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::memory::DEFAULT_ENGAGEMENT_THRESHOLD;
use crate::suggestions::{DEFAULT_PERSONALIZED_LIMIT, DEFAULT_RELATED_LIMIT};

pub const DEFAULT_CONFIG_FILE: &str = "wardrobe.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub recommendations: RecommendationConfig,
    pub stylist: StylistConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub file_path: PathBuf,
    /// Key the shopper's profile is stored under.
    pub profile_key: String,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    /// JSON catalog; the built-in catalog is used when unset.
    pub path: Option<PathBuf>,
    /// TOML lookbook tables; the built-in tables are used when unset.
    pub lookbook_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct RecommendationConfig {
    pub engagement_threshold: usize,
    pub personalized_limit: usize,
    pub related_limit: usize,
    /// Fixed seed for outfit jitter; entropy-seeded when unset.
    pub outfit_seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct StylistConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<SecretString>,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Sqlite,
    File,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub storage_backend: Option<StorageBackend>,
    pub profile_file: Option<PathBuf>,
    pub profile_key: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub outfit_seed: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://wardrobe.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                file_path: PathBuf::from("wardrobe-profile.json"),
                profile_key: "default".to_string(),
            },
            catalog: CatalogConfig::default(),
            recommendations: RecommendationConfig {
                engagement_threshold: DEFAULT_ENGAGEMENT_THRESHOLD,
                personalized_limit: DEFAULT_PERSONALIZED_LIMIT,
                related_limit: DEFAULT_RELATED_LIMIT,
                outfit_seed: None,
            },
            stylist: StylistConfig {
                endpoint: None,
                api_key: None,
                model: "google/gemini-3-flash-preview".to_string(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected sqlite|file|memory)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(storage) = patch.storage {
            if let Some(backend) = storage.backend {
                self.storage.backend = backend;
            }
            if let Some(file_path) = storage.file_path {
                self.storage.file_path = file_path;
            }
            if let Some(profile_key) = storage.profile_key {
                self.storage.profile_key = profile_key;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
            if let Some(lookbook_path) = catalog.lookbook_path {
                self.catalog.lookbook_path = Some(lookbook_path);
            }
        }

        if let Some(recommendations) = patch.recommendations {
            if let Some(threshold) = recommendations.engagement_threshold {
                self.recommendations.engagement_threshold = threshold;
            }
            if let Some(limit) = recommendations.personalized_limit {
                self.recommendations.personalized_limit = limit;
            }
            if let Some(limit) = recommendations.related_limit {
                self.recommendations.related_limit = limit;
            }
            if let Some(seed) = recommendations.outfit_seed {
                self.recommendations.outfit_seed = Some(seed);
            }
        }

        if let Some(stylist) = patch.stylist {
            if let Some(endpoint) = stylist.endpoint {
                self.stylist.endpoint = Some(endpoint);
            }
            if let Some(api_key) = stylist.api_key {
                self.stylist.api_key = Some(SecretString::from(api_key));
            }
            if let Some(model) = stylist.model {
                self.stylist.model = model;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("WARDROBE_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("WARDROBE_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_env("WARDROBE_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("WARDROBE_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_env("WARDROBE_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("WARDROBE_STORAGE_BACKEND") {
            self.storage.backend = value.parse()?;
        }
        if let Some(value) = read_env("WARDROBE_STORAGE_FILE_PATH") {
            self.storage.file_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("WARDROBE_STORAGE_PROFILE_KEY") {
            self.storage.profile_key = value;
        }

        if let Some(value) = read_env("WARDROBE_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("WARDROBE_CATALOG_LOOKBOOK_PATH") {
            self.catalog.lookbook_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("WARDROBE_RECOMMENDATIONS_ENGAGEMENT_THRESHOLD") {
            self.recommendations.engagement_threshold =
                parse_env("WARDROBE_RECOMMENDATIONS_ENGAGEMENT_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("WARDROBE_RECOMMENDATIONS_PERSONALIZED_LIMIT") {
            self.recommendations.personalized_limit =
                parse_env("WARDROBE_RECOMMENDATIONS_PERSONALIZED_LIMIT", &value)?;
        }
        if let Some(value) = read_env("WARDROBE_RECOMMENDATIONS_RELATED_LIMIT") {
            self.recommendations.related_limit =
                parse_env("WARDROBE_RECOMMENDATIONS_RELATED_LIMIT", &value)?;
        }
        if let Some(value) = read_env("WARDROBE_RECOMMENDATIONS_OUTFIT_SEED") {
            self.recommendations.outfit_seed =
                Some(parse_env("WARDROBE_RECOMMENDATIONS_OUTFIT_SEED", &value)?);
        }

        if let Some(value) = read_env("WARDROBE_STYLIST_ENDPOINT") {
            self.stylist.endpoint = Some(value);
        }
        if let Some(value) = read_env("WARDROBE_STYLIST_API_KEY") {
            self.stylist.api_key = Some(SecretString::from(value));
        }
        if let Some(value) = read_env("WARDROBE_STYLIST_MODEL") {
            self.stylist.model = value;
        }

        let log_level =
            read_env("WARDROBE_LOGGING_LEVEL").or_else(|| read_env("WARDROBE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("WARDROBE_LOGGING_FORMAT").or_else(|| read_env("WARDROBE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(backend) = overrides.storage_backend {
            self.storage.backend = backend;
        }
        if let Some(profile_file) = overrides.profile_file {
            self.storage.file_path = profile_file;
        }
        if let Some(profile_key) = overrides.profile_key {
            self.storage.profile_key = profile_key;
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(seed) = overrides.outfit_seed {
            self.recommendations.outfit_seed = Some(seed);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_storage(&self.storage)?;
        validate_recommendations(&self.recommendations)?;
        validate_stylist(&self.stylist)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.profile_key.trim().is_empty() {
        return Err(ConfigError::Validation("storage.profile_key must not be empty".to_string()));
    }

    if storage.backend == StorageBackend::File && storage.file_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "storage.file_path is required for the file backend".to_string(),
        ));
    }

    Ok(())
}

fn validate_recommendations(recommendations: &RecommendationConfig) -> Result<(), ConfigError> {
    if recommendations.personalized_limit == 0 {
        return Err(ConfigError::Validation(
            "recommendations.personalized_limit must be greater than zero".to_string(),
        ));
    }

    if recommendations.related_limit == 0 {
        return Err(ConfigError::Validation(
            "recommendations.related_limit must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_stylist(stylist: &StylistConfig) -> Result<(), ConfigError> {
    if let Some(endpoint) = &stylist.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Validation(
                "stylist.endpoint must start with http:// or https://".to_string(),
            ));
        }
        let missing_key = stylist
            .api_key
            .as_ref()
            .map(|value| value.expose_secret().trim().is_empty())
            .unwrap_or(true);
        if missing_key {
            return Err(ConfigError::Validation(
                "stylist.api_key is required when stylist.endpoint is set".to_string(),
            ));
        }
    }

    if stylist.model.trim().is_empty() {
        return Err(ConfigError::Validation("stylist.model must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    storage: Option<StoragePatch>,
    catalog: Option<CatalogPatch>,
    recommendations: Option<RecommendationPatch>,
    stylist: Option<StylistPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    backend: Option<StorageBackend>,
    file_path: Option<PathBuf>,
    profile_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
    lookbook_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    engagement_threshold: Option<usize>,
    personalized_limit: Option<usize>,
    related_limit: Option<usize>,
    outfit_seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct StylistPatch {
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, StorageBackend};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_are_valid_without_any_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.storage.backend == StorageBackend::Sqlite, "sqlite is the default backend")?;
        ensure(config.recommendations.engagement_threshold == 3, "threshold defaults to 3")?;
        ensure(config.recommendations.personalized_limit == 8, "personalized limit is 8")?;
        ensure(config.recommendations.related_limit == 3, "related limit is 3")?;
        ensure(config.recommendations.outfit_seed.is_none(), "outfit seed is unset")?;
        ensure(config.stylist.endpoint.is_none(), "stylist endpoint is unset")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_STYLIST_KEY", "key-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("wardrobe.toml");
            fs::write(
                &path,
                r#"
[stylist]
endpoint = "https://stylist.example.test/v1/chat"
api_key = "${TEST_STYLIST_KEY}"

[catalog]
lookbook_path = "config/lookbook.toml"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.stylist.api_key.as_ref().map(|key| key.expose_secret() == "key-from-env")
                    == Some(true),
                "api key should be interpolated from environment",
            )?;
            ensure(
                config.catalog.lookbook_path == Some(PathBuf::from("config/lookbook.toml")),
                "lookbook path should come from the file",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_STYLIST_KEY"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["TEST_WARDROBE_UNSET"]);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("wardrobe.toml");
        fs::write(&path, "[database]\nurl = \"${TEST_WARDROBE_UNSET}\"\n")
            .map_err(|err| err.to_string())?;

        let error =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });
        ensure(
            matches!(error, Err(ConfigError::MissingEnvInterpolation { ref var }) if var == "TEST_WARDROBE_UNSET"),
            "missing variable should be named in the error",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("WARDROBE_LOG_LEVEL", "warn");
        env::set_var("WARDROBE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["WARDROBE_LOG_LEVEL", "WARDROBE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("WARDROBE_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("WARDROBE_STORAGE_BACKEND", "file");
        env::set_var("WARDROBE_RECOMMENDATIONS_RELATED_LIMIT", "5");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("wardrobe.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[storage]
backend = "memory"
profile_key = "from-file"

[recommendations]
related_limit = 4
outfit_seed = 11

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    outfit_seed: Some(99),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.storage.backend == StorageBackend::File, "env backend should win")?;
            ensure(config.storage.profile_key == "from-file", "file profile key should apply")?;
            ensure(config.recommendations.related_limit == 5, "env limit should win over file")?;
            ensure(config.recommendations.outfit_seed == Some(99), "override seed should win")?;
            Ok(())
        })();

        clear_vars(&[
            "WARDROBE_DATABASE_URL",
            "WARDROBE_STORAGE_BACKEND",
            "WARDROBE_RECOMMENDATIONS_RELATED_LIMIT",
        ]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("WARDROBE_RECOMMENDATIONS_OUTFIT_SEED", "not-a-number");
        let result = AppConfig::load(LoadOptions::default());
        clear_vars(&["WARDROBE_RECOMMENDATIONS_OUTFIT_SEED"]);

        ensure(
            matches!(result, Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "WARDROBE_RECOMMENDATIONS_OUTFIT_SEED"),
            "non-numeric seed should be rejected",
        )
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("WARDROBE_STYLIST_ENDPOINT", "ftp://stylist.example.test");
        env::set_var("WARDROBE_STYLIST_API_KEY", "key");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("stylist.endpoint")
            );
            ensure(has_message, "validation failure should mention stylist.endpoint")
        })();

        clear_vars(&["WARDROBE_STYLIST_ENDPOINT", "WARDROBE_STYLIST_API_KEY"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("WARDROBE_STYLIST_ENDPOINT", "https://stylist.example.test");
        env::set_var("WARDROBE_STYLIST_API_KEY", "sk-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("sk-secret-value"), "debug output should not contain api key")?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&["WARDROBE_STYLIST_ENDPOINT", "WARDROBE_STYLIST_API_KEY"]);
        result
    }
}
