pub mod config;
pub mod context;
pub mod doctor;
pub mod migrate;
pub mod outfit;
pub mod privacy;
pub mod profile;
pub mod recommend;
pub mod related;
pub mod stylist;
pub mod track;
pub mod wishlist;

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;
use wardrobe_core::suggestions::RankedProduct;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with(command, message, Value::Null)
    }

    pub fn success_with(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), EXIT_RUNTIME)
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_failure(command: &str, failure: CommandFailure) -> Self {
        Self::failure(command, failure.error_class, failure.message, failure.exit_code)
    }
}

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_STORAGE: u8 = 4;
pub const EXIT_MIGRATION: u8 = 5;
pub const EXIT_INPUT: u8 = 6;

/// Classified failure carried out of a command body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub error_class: &'static str,
    pub message: String,
    pub exit_code: u8,
}

impl CommandFailure {
    pub fn config(error: impl Display) -> Self {
        Self {
            error_class: "config_validation",
            message: format!("configuration issue: {error}"),
            exit_code: EXIT_CONFIG,
        }
    }

    pub fn runtime(error: impl Display) -> Self {
        Self {
            error_class: "runtime_init",
            message: format!("failed to initialize async runtime: {error}"),
            exit_code: EXIT_RUNTIME,
        }
    }

    pub fn storage(error: impl Display) -> Self {
        Self { error_class: "storage", message: error.to_string(), exit_code: EXIT_STORAGE }
    }

    pub fn migration(error: impl Display) -> Self {
        Self { error_class: "migration", message: error.to_string(), exit_code: EXIT_MIGRATION }
    }

    pub fn input(error: impl Display) -> Self {
        Self { error_class: "input", message: error.to_string(), exit_code: EXIT_INPUT }
    }
}

/// Ranked product as printed, with a shopper-facing line per score reason.
#[derive(Debug, Serialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub ranked: RankedProduct,
    pub why: Vec<&'static str>,
}

impl From<RankedProduct> for RankedEntry {
    fn from(ranked: RankedProduct) -> Self {
        let why = ranked.reasons.iter().map(|reason| reason.description()).collect();
        Self { ranked, why }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\",\"data\":null}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
