//! System status: configuration presence report plus optional deep probes of
//! each external collaborator. Probes run concurrently and degrade
//! independently; none of them can fail the endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use borong_core::config::ConfigGroupReport;
use borong_store::dashboard_metrics;

use crate::bootstrap::AppState;
use crate::health::database_check;

#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    #[serde(default)]
    pub deep: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub config: Vec<ConfigGroupReport>,
    #[serde(rename = "deepChecks")]
    pub deep_checks: Option<DeepChecks>,
}

#[derive(Debug, Serialize)]
pub struct DeepChecks {
    pub database: ProbeResult,
    pub remote: ProbeResult,
    pub sheets: ProbeResult,
}

#[derive(Debug, Serialize)]
pub struct ProbeResult {
    pub healthy: bool,
    pub detail: String,
}

pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> Json<StatusResponse> {
    let config = state.config.report();

    if !params.deep {
        return Json(StatusResponse { config, deep_checks: None });
    }

    let (database, remote, sheets) = tokio::join!(
        probe_database(&state),
        probe_remote(&state),
        probe_sheets(&state),
    );

    Json(StatusResponse {
        config,
        deep_checks: Some(DeepChecks { database, remote, sheets }),
    })
}

async fn probe_database(state: &AppState) -> ProbeResult {
    let check = database_check(&state.db_pool).await;
    ProbeResult { healthy: check.status == "ready", detail: check.detail }
}

/// Samples the intent capability. Fallback classification still answers, so
/// the probe reports unhealthy only when no remote table is configured or
/// the remote path did not actually serve the sample.
async fn probe_remote(state: &AppState) -> ProbeResult {
    if state.config.remote.tables.intent.is_none() {
        return ProbeResult {
            healthy: false,
            detail: "remote intent table id unset, fallback classifier in use".to_string(),
        };
    }

    let resolved = state.remote.detect_intent("health check message").await;
    ProbeResult {
        healthy: resolved.is_remote(),
        detail: format!("sample intent `{}` served by {}", resolved.as_inner(), resolved.source()),
    }
}

async fn probe_sheets(state: &AppState) -> ProbeResult {
    let catalog = state.catalog.fetch_catalog().await;
    let metrics = dashboard_metrics(state.orders.as_ref()).await;

    match catalog {
        Ok(items) => ProbeResult {
            healthy: true,
            detail: format!(
                "catalog rows: {}, recorded orders: {}",
                items.len(),
                metrics.total_orders
            ),
        },
        Err(error) => ProbeResult { healthy: false, detail: error.to_string() },
    }
}
