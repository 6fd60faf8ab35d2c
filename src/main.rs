// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::freshness::FreshnessGate;
use crate::infrastructure::config::{load_dashboard_config, load_server_config};
use crate::infrastructure::fs_store::FsArtifactStore;
use crate::presentation::app_state::{local_today, AppState};
use crate::presentation::router::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let server_config = load_server_config().context("failed to load config/server")?;
    let dashboard_config = load_dashboard_config().context("failed to load config/dashboard")?;
    let settings = server_config.server;

    if !settings.uploads_dir.is_dir() {
        tracing::warn!(
            uploads_dir = %settings.uploads_dir.display(),
            "uploads directory does not exist; every section will render as not found"
        );
    }

    // Create store (infrastructure layer)
    let store = Arc::new(FsArtifactStore::new(settings.uploads_dir.clone()));

    // Create services (application layer)
    let dashboard_service = DashboardService::new(
        store,
        Arc::new(dashboard_config),
        FreshnessGate::new(settings.freshness_lag_days),
    );

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        title: settings.title,
        today: local_today,
    });

    let addr: SocketAddr = settings
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind))?;
    tracing::info!(%addr, uploads_dir = %settings.uploads_dir.display(), "starting market-dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
