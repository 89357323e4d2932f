use axum::extract::State;
use axum::Json;
use serde::Serialize;

use borong_store::{dashboard_metrics, DashboardMetrics};

use crate::bootstrap::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub metrics: DashboardMetrics,
    pub insights: String,
    #[serde(rename = "insightsSource")]
    pub insights_source: &'static str,
}

/// Dashboard metrics plus trend insights. Metrics degrade to zeroes on store
/// outage and insights degrade to the deterministic summary, so this
/// endpoint always answers.
pub async fn summary(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    let metrics = dashboard_metrics(state.orders.as_ref()).await;
    let resolved = state.remote.analyze_trends(&metrics.trend_dataset()).await;
    let insights_source = resolved.source();

    Json(AnalyticsSummary { metrics, insights: resolved.into_inner(), insights_source })
}

#[cfg(test)]
mod tests {
    use axum::extract::State;

    use crate::testsupport::{state_with, StoreSetup};

    use super::summary;

    #[tokio::test]
    async fn summary_reports_metrics_and_fallback_insights() {
        let state = state_with(StoreSetup::default()).await;
        let response = summary(State(state)).await;

        assert_eq!(response.0.insights_source, "fallback");
        assert!(response.0.insights.contains("Jumlah pesanan mingguan"));
    }

    #[tokio::test]
    async fn summary_survives_an_order_store_outage() {
        let state = state_with(StoreSetup { failing_orders: true, ..StoreSetup::default() }).await;
        let response = summary(State(state)).await;

        assert_eq!(response.0.metrics.total_orders, 0);
        assert!(!response.0.insights.is_empty());
    }
}
