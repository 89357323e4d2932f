use serde::Serialize;

use borong_core::config::{AppConfig, ConfigGroupReport, LoadOptions};
use borong_db::{connect_with_settings, ping};

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
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
    config_groups: Vec<ConfigGroupReport>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();
    let mut config_groups = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_capability_gaps(&config));
            checks.push(check_database_connectivity(&config));
            config_groups = config.report();
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "capability_configuration",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let failed = checks.iter().any(|check| {
        matches!(check.status, CheckStatus::Fail | CheckStatus::Skipped)
    });
    let overall_status = if failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: readiness checks passed (warnings are degraded-mode gaps)".to_string()
    };

    DoctorReport { overall_status, summary, checks, config_groups }
}

/// Unset capability table ids are gaps, not failures: the pipeline still
/// answers through the deterministic fallbacks.
fn check_capability_gaps(config: &AppConfig) -> DoctorCheck {
    let unsatisfied: Vec<&str> = config
        .report()
        .iter()
        .filter(|group| !group.satisfied)
        .map(|group| group.group)
        .collect();

    if unsatisfied.is_empty() {
        DoctorCheck {
            name: "capability_configuration",
            status: CheckStatus::Pass,
            details: "all capability groups configured".to_string(),
        }
    } else {
        DoctorCheck {
            name: "capability_configuration",
            status: CheckStatus::Warn,
            details: format!(
                "groups running on fallbacks: {} (see `doctor --json` for keys)",
                unsatisfied.join(", ")
            ),
        }
    }
}

fn check_database_connectivity(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await?;
        ping(&pool).await?;
        pool.close().await;
        Ok::<(), borong_db::Error>(())
    });

    match result {
        Ok(()) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: "database reachable".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        lines.push(format!("  [{:?}] {} - {}", check.status, check.name, check.details));
    }
    for group in &report.config_groups {
        if group.satisfied {
            lines.push(format!("  group {}: satisfied", group.group));
        } else {
            lines.push(format!("  group {}: missing {}", group.group, group.missing.join(", ")));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{build_report, CheckStatus};

    #[test]
    fn default_environment_reports_capability_gaps_as_warnings() {
        let report = build_report();
        let capability = report
            .checks
            .iter()
            .find(|check| check.name == "capability_configuration")
            .expect("capability check present");
        assert!(matches!(capability.status, CheckStatus::Warn | CheckStatus::Skipped));
    }
}
