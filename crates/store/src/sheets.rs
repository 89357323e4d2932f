//! Spreadsheet-backed catalog and order stores.
//!
//! The external tabular source is a values-style spreadsheet API: catalog
//! reads `GET .../values/{range}`, order appends
//! `POST .../values/{range}:append`. Rows decode leniently — a missing or
//! non-numeric stock/price cell becomes zero rather than failing the whole
//! snapshot.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use borong_core::config::SheetsConfig;
use borong_core::domain::inventory::InventoryItem;
use borong_core::domain::order::Order;
use borong_core::errors::StoreError;

use crate::{CatalogStore, OrderReceipt, OrderRow, OrderStore};

pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|error| StoreError::Transport(error.to_string()))?;
        Ok(Self { http, config })
    }

    fn spreadsheet_id(&self) -> Result<&str, StoreError> {
        self.config
            .spreadsheet_id
            .as_deref()
            .ok_or_else(|| StoreError::MissingConfig("sheets.spreadsheet_id unset".to_string()))
    }

    fn access_token(&self) -> Result<&str, StoreError> {
        self.config
            .access_token
            .as_ref()
            .map(|token| token.expose_secret())
            .ok_or_else(|| StoreError::MissingConfig("sheets.access_token unset".to_string()))
    }

    fn values_url(&self, range: &str) -> Result<String, StoreError> {
        Ok(format!(
            "{}/spreadsheets/{}/values/{}",
            self.config.base_url.trim_end_matches('/'),
            self.spreadsheet_id()?,
            range
        ))
    }

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let response = self
            .http
            .get(self.values_url(range)?)
            .bearer_auth(self.access_token()?)
            .send()
            .await
            .map_err(|error| StoreError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status: status.as_u16(), body });
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|error| StoreError::Decode(error.to_string()))?;
        Ok(range.values)
    }

    async fn append_row(&self, range: &str, row: Vec<String>) -> Result<(), StoreError> {
        let url = format!("{}:append?valueInputOption=USER_ENTERED", self.values_url(range)?);

        let response = self
            .http
            .post(url)
            .bearer_auth(self.access_token()?)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|error| StoreError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status: status.as_u16(), body });
        }

        Ok(())
    }
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

fn numeric_cell<T: std::str::FromStr + Default>(row: &[String], index: usize) -> T {
    row.get(index).and_then(|value| value.trim().parse().ok()).unwrap_or_default()
}

#[async_trait]
impl CatalogStore for SheetsClient {
    async fn fetch_catalog(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = self.read_range(&self.config.inventory_range).await?;

        Ok(rows
            .iter()
            .map(|row| InventoryItem {
                sku: cell(row, 0),
                name: cell(row, 1),
                color: cell(row, 2),
                size: cell(row, 3),
                stock: numeric_cell(row, 4),
                price: numeric_cell::<Decimal>(row, 5),
            })
            .collect())
    }
}

#[async_trait]
impl OrderStore for SheetsClient {
    async fn append_order(&self, order: &Order) -> Result<OrderReceipt, StoreError> {
        let recorded_at = Utc::now();
        let (item_name, quantity) = order
            .first_line()
            .map(|line| (line.item_name.clone(), line.quantity.to_string()))
            .unwrap_or_default();

        let row = vec![
            recorded_at.to_rfc3339(),
            order.customer_name.clone(),
            order.phone_number.clone(),
            item_name,
            quantity,
            order.delivery_address.clone(),
            order.notes.clone().unwrap_or_default(),
        ];

        self.append_row(&self.config.order_range, row).await?;

        info!(
            event_name = "store.order.appended",
            customer = %order.customer_name,
            "order row appended to spreadsheet"
        );
        Ok(OrderReceipt { recorded_at })
    }

    async fn read_orders(&self) -> Result<Vec<OrderRow>, StoreError> {
        let rows = self.read_range(&self.config.order_range).await?;

        Ok(rows
            .iter()
            .map(|row| OrderRow {
                timestamp: cell(row, 0),
                customer_name: cell(row, 1),
                phone: cell(row, 2),
                item: cell(row, 3),
                quantity: numeric_cell(row, 4),
                address: cell(row, 5),
            })
            .collect())
    }
}
