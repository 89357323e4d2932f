//! In-memory store doubles for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use borong_core::domain::inventory::InventoryItem;
use borong_core::domain::order::Order;
use borong_core::errors::StoreError;

use crate::{CatalogStore, OrderReceipt, OrderRow, OrderStore};

/// Fixed catalog snapshot, optionally configured to fail every read.
#[derive(Default)]
pub struct InMemoryCatalog {
    items: Vec<InventoryItem>,
    failing: bool,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items, failing: false }
    }

    pub fn failing() -> Self {
        Self { items: Vec::new(), failing: true }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<InventoryItem>, StoreError> {
        if self.failing {
            return Err(StoreError::Transport("simulated catalog outage".to_string()));
        }
        Ok(self.items.clone())
    }
}

/// Recording order store. Appends build the same first-line-only row
/// projection as the sheets client so pipeline tests observe realistic rows.
#[derive(Default)]
pub struct InMemoryOrderStore {
    rows: RwLock<Vec<OrderRow>>,
    failing: bool,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { rows: RwLock::new(Vec::new()), failing: true }
    }

    pub async fn recorded(&self) -> Vec<OrderRow> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn append_order(&self, order: &Order) -> Result<OrderReceipt, StoreError> {
        if self.failing {
            return Err(StoreError::Api {
                status: 503,
                body: "simulated order store outage".to_string(),
            });
        }

        let recorded_at = Utc::now();
        let (item, quantity) = order
            .first_line()
            .map(|line| (line.item_name.clone(), line.quantity))
            .unwrap_or_default();

        self.rows.write().await.push(OrderRow {
            timestamp: recorded_at.to_rfc3339(),
            customer_name: order.customer_name.clone(),
            phone: order.phone_number.clone(),
            item,
            quantity,
            address: order.delivery_address.clone(),
        });

        Ok(OrderReceipt { recorded_at })
    }

    async fn read_orders(&self) -> Result<Vec<OrderRow>, StoreError> {
        if self.failing {
            return Err(StoreError::Api {
                status: 503,
                body: "simulated order store outage".to_string(),
            });
        }
        Ok(self.rows.read().await.clone())
    }
}
