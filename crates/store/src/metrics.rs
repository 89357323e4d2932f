use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use borong_core::fallback::TrendDataset;

use crate::{OrderRow, OrderStore};

/// Aggregated order figures for the dashboard collaborator and the trends
/// capability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    #[serde(rename = "totalOrders")]
    pub total_orders: u64,
    #[serde(rename = "topProduct")]
    pub top_product: Option<String>,
    #[serde(rename = "topProductShare")]
    pub top_product_share: u32,
    #[serde(rename = "lastOrders")]
    pub last_orders: Vec<OrderRow>,
}

impl DashboardMetrics {
    pub fn trend_dataset(&self) -> TrendDataset {
        TrendDataset {
            total_orders: self.total_orders,
            top_product: self.top_product.clone(),
            top_product_share: self.top_product_share,
        }
    }
}

/// Computes dashboard metrics from the order store. A read failure degrades
/// to the empty metrics value so dashboard callers never see a hard error.
pub async fn dashboard_metrics(store: &dyn OrderStore) -> DashboardMetrics {
    let orders = match store.read_orders().await {
        Ok(orders) => orders,
        Err(error) => {
            warn!(
                event_name = "store.metrics.degraded",
                error = %error,
                "order store read failed, returning empty metrics"
            );
            return DashboardMetrics::default();
        }
    };

    let total_orders = orders.len() as u64;
    let mut item_counts: HashMap<&str, u64> = HashMap::new();
    for order in &orders {
        *item_counts.entry(order.item.as_str()).or_default() += u64::from(order.quantity);
    }

    let top = item_counts.into_iter().max_by_key(|(_, count)| *count);
    let top_product = top.map(|(item, _)| item.to_string());
    let top_product_share = top
        .map(|(_, count)| {
            let share = (count as f64 / total_orders.max(1) as f64) * 100.0;
            share.round() as u32
        })
        .unwrap_or(0);

    let last_orders = orders.iter().rev().take(5).rev().cloned().collect();

    DashboardMetrics { total_orders, top_product, top_product_share, last_orders }
}
