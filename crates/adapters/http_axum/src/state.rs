//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use powerhub_app::event_bus::InProcessEventBus;
use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};
use powerhub_app::sampler::ConsumptionSampler;
use powerhub_app::services::device_service::DeviceService;
use powerhub_app::services::settings_service::SettingsService;

use crate::notices::RecentNotices;

/// Default live fragment reload interval, in seconds.
pub const DEFAULT_REFRESH_SECONDS: u32 = 1;

/// Presentation settings for the HTML dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Reload interval of the live fragment.
    pub refresh_seconds: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_seconds: DEFAULT_REFRESH_SECONDS,
        }
    }
}

/// Application state shared across all axum handlers.
///
/// Generic over the repository types and the event publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying
/// types themselves do not need to be `Clone`.
pub struct AppState<DR, SR, EP> {
    pub device_service: Arc<DeviceService<DR, SR, EP>>,
    pub settings_service: Arc<SettingsService<SR, EP>>,
    /// Source of the consumption chart.
    pub sampler: Arc<ConsumptionSampler<DR, EP>>,
    /// Bus the SSE endpoint subscribes to.
    pub event_bus: InProcessEventBus,
    /// Auto-off messages waiting to be shown on the dashboard.
    pub notices: Arc<RecentNotices>,
    pub dashboard: DashboardSettings,
    /// Cancelled when the server shuts down; ends open SSE streams.
    pub shutdown: CancellationToken,
}

impl<DR, SR, EP> Clone for AppState<DR, SR, EP> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
            settings_service: Arc::clone(&self.settings_service),
            sampler: Arc::clone(&self.sampler),
            event_bus: self.event_bus.clone(),
            notices: Arc::clone(&self.notices),
            dashboard: self.dashboard,
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<DR, SR, EP> AppState<DR, SR, EP>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The services are shared with background tasks (auto-off timers,
    /// the sampler loop) before the HTTP state is built.
    pub fn from_arcs(
        device_service: Arc<DeviceService<DR, SR, EP>>,
        settings_service: Arc<SettingsService<SR, EP>>,
        sampler: Arc<ConsumptionSampler<DR, EP>>,
        event_bus: InProcessEventBus,
        notices: Arc<RecentNotices>,
    ) -> Self {
        Self {
            device_service,
            settings_service,
            sampler,
            event_bus,
            notices,
            dashboard: DashboardSettings::default(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Override the dashboard presentation settings.
    #[must_use]
    pub fn with_dashboard(mut self, dashboard: DashboardSettings) -> Self {
        self.dashboard = dashboard;
        self
    }

    /// Tie long-lived responses to the server's shutdown token.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}
