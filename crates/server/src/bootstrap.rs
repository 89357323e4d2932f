use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use borong_core::config::{AppConfig, ConfigError, LoadOptions};
use borong_core::errors::{RemoteError, StoreError};
use borong_db::{
    connect_with_settings, migrations, ConversationLog, DbPool, LeadRepository,
    SqlConversationLog, SqlLeadRepository,
};
use borong_pipeline::MessagePipeline;
use borong_remote::RemoteIntentClient;
use borong_store::{CatalogStore, OrderStore, SheetsClient};

/// Shared handler state: the pipeline plus the individual collaborators the
/// status and analytics endpoints probe directly.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db_pool: DbPool,
    pub pipeline: Arc<MessagePipeline>,
    pub remote: Arc<RemoteIntentClient>,
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    pub log: Arc<dyn ConversationLog>,
    pub leads: Arc<dyn LeadRepository>,
}

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("remote client initialization failed: {0}")]
    Remote(#[source] RemoteError),
    #[error("sheets client initialization failed: {0}")]
    Sheets(#[source] StoreError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let remote = Arc::new(
        RemoteIntentClient::new(config.remote.clone()).map_err(BootstrapError::Remote)?,
    );
    let sheets =
        Arc::new(SheetsClient::new(config.sheets.clone()).map_err(BootstrapError::Sheets)?);
    let catalog: Arc<dyn CatalogStore> = sheets.clone();
    let orders: Arc<dyn OrderStore> = sheets;
    let log: Arc<dyn ConversationLog> = Arc::new(SqlConversationLog::new(db_pool.clone()));
    let leads: Arc<dyn LeadRepository> = Arc::new(SqlLeadRepository::new(db_pool.clone()));

    let pipeline = Arc::new(MessagePipeline::new(
        remote.clone(),
        catalog.clone(),
        orders.clone(),
        log.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        pipeline,
        remote,
        catalog,
        orders,
        log,
        leads,
    };

    Ok(Application { config, db_pool, state })
}
