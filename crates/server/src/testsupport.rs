//! Shared fixtures for handler tests: in-memory stores, an unconfigured
//! remote client (pure fallback), and a migrated in-memory database.

use std::sync::Arc;

use rust_decimal::Decimal;

use borong_core::config::AppConfig;
use borong_core::domain::inventory::InventoryItem;
use borong_db::{
    connect_with_settings, migrations, ConversationLog, InMemoryLeadRepository, LeadRepository,
    SqlConversationLog, SqlLeadRepository,
};
use borong_pipeline::MessagePipeline;
use borong_remote::RemoteIntentClient;
use borong_store::{CatalogStore, InMemoryCatalog, InMemoryOrderStore, OrderStore};

use crate::bootstrap::AppState;

#[derive(Debug, Default)]
pub struct StoreSetup {
    pub failing_catalog: bool,
    pub failing_orders: bool,
    pub failing_leads: bool,
}

fn seeded_catalog() -> Vec<InventoryItem> {
    vec![InventoryItem {
        sku: "TS-001".to_string(),
        name: "Blue T-Shirt".to_string(),
        color: "Blue".to_string(),
        size: "S".to_string(),
        stock: 5,
        price: Decimal::new(2500, 2),
    }]
}

pub async fn state_with(setup: StoreSetup) -> AppState {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:?cache=shared".to_string();

    let db_pool = connect_with_settings(&config.database.url, 1, 5)
        .await
        .expect("test pool connects");
    migrations::run_pending(&db_pool).await.expect("migrations apply");

    let remote = Arc::new(
        RemoteIntentClient::new(config.remote.clone()).expect("remote client builds"),
    );

    let catalog: Arc<dyn CatalogStore> = if setup.failing_catalog {
        Arc::new(InMemoryCatalog::failing())
    } else {
        Arc::new(InMemoryCatalog::new(seeded_catalog()))
    };
    let orders: Arc<dyn OrderStore> = if setup.failing_orders {
        Arc::new(InMemoryOrderStore::failing())
    } else {
        Arc::new(InMemoryOrderStore::new())
    };
    let log: Arc<dyn ConversationLog> = Arc::new(SqlConversationLog::new(db_pool.clone()));
    let leads: Arc<dyn LeadRepository> = if setup.failing_leads {
        Arc::new(InMemoryLeadRepository::failing())
    } else {
        Arc::new(SqlLeadRepository::new(db_pool.clone()))
    };

    let pipeline = Arc::new(MessagePipeline::new(
        remote.clone(),
        catalog.clone(),
        orders.clone(),
        log.clone(),
    ));

    AppState { config: Arc::new(config), db_pool, pipeline, remote, catalog, orders, log, leads }
}
