use serde::Serialize;
use wardrobe_core::catalog::Catalog;
use wardrobe_core::config::{AppConfig, LoadOptions};
use wardrobe_core::lookbook::Lookbook;

use crate::commands::context::open_store;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DEPENDENT_CHECKS: [&str; 3] = ["catalog", "lookbook", "profile_store"];

pub fn run(options: LoadOptions, json_output: bool) -> String {
    let report = build_report(options);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
            checks.push(check_lookbook(&config));
            checks.push(check_profile_store(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(DEPENDENT_CHECKS.into_iter().map(|name| DoctorCheck {
                name,
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            }));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    let loaded = match &config.catalog.path {
        Some(path) => Catalog::load_json(path),
        None => Ok(Catalog::seeded()),
    };

    match loaded {
        Ok(catalog) if catalog.is_empty() => DoctorCheck {
            name: "catalog",
            status: CheckStatus::Fail,
            details: "catalog has no products".to_string(),
        },
        Ok(catalog) => {
            let in_stock = catalog.products().iter().filter(|product| product.in_stock).count();
            DoctorCheck {
                name: "catalog",
                status: CheckStatus::Pass,
                details: format!("{} products, {in_stock} in stock", catalog.len()),
            }
        }
        Err(error) => {
            DoctorCheck { name: "catalog", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn check_lookbook(config: &AppConfig) -> DoctorCheck {
    let loaded = match &config.catalog.lookbook_path {
        Some(path) => Lookbook::load_toml(path),
        None => Ok(Lookbook::default()),
    };

    match loaded {
        Ok(lookbook) => DoctorCheck {
            name: "lookbook",
            status: CheckStatus::Pass,
            details: format!(
                "{} occasions, {} color themes, {} budget tiers",
                lookbook.occasions.len(),
                lookbook.color_themes.len(),
                lookbook.budget_tiers.len()
            ),
        },
        Err(error) => {
            DoctorCheck { name: "lookbook", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn check_profile_store(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "profile_store",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let store = open_store(config).await.map_err(|failure| failure.message)?;
        store
            .load(&config.storage.profile_key)
            .await
            .map(|profile| profile.is_some())
            .map_err(|error| format!("stored profile is unreadable: {error}"))
    });

    match result {
        Ok(found) => DoctorCheck {
            name: "profile_store",
            status: CheckStatus::Pass,
            details: format!(
                "{} backend ready, profile `{}` {}",
                config.storage.backend.as_str(),
                config.storage.profile_key,
                if found { "found" } else { "not saved yet" }
            ),
        },
        Err(error) => {
            DoctorCheck { name: "profile_store", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
