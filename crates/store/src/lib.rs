pub mod memory;
pub mod metrics;
pub mod oracle;
pub mod sheets;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use borong_core::domain::inventory::InventoryItem;
use borong_core::domain::order::Order;
use borong_core::errors::StoreError;

pub use memory::{InMemoryCatalog, InMemoryOrderStore};
pub use metrics::{dashboard_metrics, DashboardMetrics};
pub use oracle::InventoryOracle;
pub use sheets::SheetsClient;

/// Read access to the external catalog. The full snapshot is re-fetched on
/// every call; there is no caching layer in front of it.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<InventoryItem>, StoreError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub recorded_at: DateTime<Utc>,
}

/// One persisted order row as read back for dashboard metrics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub timestamp: String,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub phone: String,
    pub item: String,
    pub quantity: u32,
    pub address: String,
}

/// Append-only order persistence. `append_order` writes the fixed 7-column
/// projection covering only the order's first line item — a preserved
/// limitation of the source system, so multi-item orders lose their tail
/// lines. Appends are not idempotent and are never retried here.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn append_order(&self, order: &Order) -> Result<OrderReceipt, StoreError>;
    async fn read_orders(&self) -> Result<Vec<OrderRow>, StoreError>;
}
