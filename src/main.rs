//! Parking booking service entry point.
//!
//! Reads configuration from TOML file (~/.config/parking-service/config.toml),
//! builds the storage and services, starts the expiry sweeper and serves the
//! REST API until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use parkhub::application::services::{BookingService, ParkingSpaceService, SpaceLocks};
use parkhub::domain::RepositoryProvider;
use parkhub::shared::shutdown::ShutdownCoordinator;
use parkhub::{create_api_router, default_config_path, AppConfig, AppState, InMemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting parking booking service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // ── Storage ────────────────────────────────────────────────
    let store = match &app_cfg.storage.snapshot_path {
        Some(path) => {
            info!("Snapshot persistence at {}", path.display());
            Arc::new(InMemoryStore::with_snapshot(path.clone())?)
        }
        None => {
            info!("No snapshot path configured, state is in-memory only");
            Arc::new(InMemoryStore::new())
        }
    };
    let repos: Arc<dyn RepositoryProvider> = store.clone();

    // ── Services ───────────────────────────────────────────────
    let locks = Arc::new(SpaceLocks::new());
    let booking_service = Arc::new(BookingService::new(repos.clone(), locks.clone()));
    let parking_service = Arc::new(ParkingSpaceService::new(repos.clone(), locks));

    // ── Graceful shutdown ──────────────────────────────────────
    let coordinator = ShutdownCoordinator::new();
    coordinator.start_signal_listener();
    let shutdown_signal = coordinator.signal();

    // ── Expiry sweeper ─────────────────────────────────────────
    parkhub::application::start_expiry_sweeper(
        booking_service.clone(),
        shutdown_signal.clone(),
        app_cfg.sweeper.check_interval_secs,
    );

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(AppState {
        store,
        repos,
        booking_service,
        parking_service,
        metrics_handle: prometheus_handle,
        started_at: Arc::new(Instant::now()),
    });

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    info!("Parking booking service shutdown complete");
    Ok(())
}
