//! # powerhubd, the powerhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing`
//! - Construct the in-memory repositories and the application services
//! - Start the consumption sampler and the notice listener
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT): stop the sampler and
//!   cancel every pending auto-off
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use powerhub_adapter_http_axum::notices::RecentNotices;
use powerhub_adapter_http_axum::state::{AppState, DashboardSettings};
use powerhub_adapter_storage_memory::{MemoryDeviceRepository, MemorySettingsRepository};
use powerhub_app::event_bus::InProcessEventBus;
use powerhub_app::sampler::ConsumptionSampler;
use powerhub_app::services::device_service::DeviceService;
use powerhub_app::services::settings_service::SettingsService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.logging.filter);

    // Repositories
    let device_repo = Arc::new(MemoryDeviceRepository::new());
    let settings_repo = Arc::new(MemorySettingsRepository::new(config.initial_settings()));

    // Event bus
    let event_bus = InProcessEventBus::new(256);

    // Services
    let device_service = Arc::new(DeviceService::new(
        Arc::clone(&device_repo),
        Arc::clone(&settings_repo),
        event_bus.clone(),
    ));
    let settings_service = Arc::new(SettingsService::new(settings_repo, event_bus.clone()));
    let sampler = Arc::new(ConsumptionSampler::new(
        device_repo,
        event_bus.clone(),
        config.sampler_interval(),
        config.sampler.history,
    ));

    // Background tasks
    let shutdown = CancellationToken::new();
    let sampler_task = tokio::spawn({
        let sampler = Arc::clone(&sampler);
        let shutdown = shutdown.clone();
        async move { sampler.run(shutdown).await }
    });
    let notices = Arc::new(RecentNotices::default());
    let notice_task = notices.follow(event_bus.subscribe());

    // HTTP
    let state = AppState::from_arcs(
        Arc::clone(&device_service),
        settings_service,
        sampler,
        event_bus,
        notices,
    )
    .with_dashboard(DashboardSettings {
        refresh_seconds: config.dashboard.refresh_seconds,
    })
    .with_shutdown(shutdown.clone());
    let app = powerhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, max_energy = config.energy.max_energy, "powerhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                shutdown_signal().await;
                tracing::info!("shutting down");
                // Open SSE streams end on this, letting serve return.
                shutdown.cancel();
            }
        })
        .await?;

    shutdown.cancel();
    device_service.shutdown().await;
    sampler_task.await?;
    notice_task.abort();

    Ok(())
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        tokio::select! {
            () = ctrl_c() => {},
            () = terminate() => {},
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::warn!(?err, "failed to install Ctrl+C handler");
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(err) => tracing::warn!(?err, "failed to install SIGTERM handler"),
    }
}
