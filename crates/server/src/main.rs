mod analytics;
mod bootstrap;
mod health;
mod leads;
mod messages;
mod status;
#[cfg(test)]
mod testsupport;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use borong_core::config::{AppConfig, LoadOptions};

use crate::bootstrap::AppState;

fn init_logging(config: &AppConfig) {
    use borong_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/messages", post(messages::process_message))
        .route("/api/leads", get(leads::list_leads).post(leads::create_lead))
        .route("/api/status", get(status::status))
        .route("/api/analytics/summary", get(analytics::summary))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        bind_address = %address,
        "borong-server listening"
    );

    axum::serve(listener, router(app.state))
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!(event_name = "system.server.stopped", "borong-server stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
