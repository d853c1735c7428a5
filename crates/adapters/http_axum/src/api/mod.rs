//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod consumption;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod settings;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<DR, SR, EP>() -> Router<AppState<DR, SR, EP>>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        // Devices
        .route(
            "/devices",
            get(devices::list::<DR, SR, EP>).post(devices::create::<DR, SR, EP>),
        )
        .route("/devices/{id}", get(devices::get::<DR, SR, EP>))
        .route("/devices/{id}/toggle", post(devices::toggle::<DR, SR, EP>))
        // Settings
        .route(
            "/settings",
            get(settings::get::<DR, SR, EP>).put(settings::update::<DR, SR, EP>),
        )
        // Consumption
        .route("/consumption", get(consumption::series::<DR, SR, EP>))
        .route("/usage", get(consumption::usage::<DR, SR, EP>))
        // Events
        .route("/events/stream", get(sse::stream::<DR, SR, EP>))
}
