//! Form handlers for the dashboard (PRG).
//!
//! Every handler redirects back to `/`; failures become notices instead of
//! error pages.

use axum::extract::{Form, Path, State};
use axum::response::Redirect;
use serde::Deserialize;

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};
use powerhub_domain::error::PowerHubError;
use powerhub_domain::id::DeviceId;
use powerhub_domain::settings::{SettingsUpdate, leading_integer};

use super::Notice;
use crate::state::AppState;

/// Fields of the add-device form, as typed by the user.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddDeviceForm {
    pub name: String,
    pub power: String,
    /// Auto-off delay in minutes, may be left empty.
    pub duration: String,
}

/// Fields of the settings form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub max_energy: String,
    pub peak_hours: String,
}

/// `POST /devices`: register a device.
pub async fn add_device<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Form(form): Form<AddDeviceForm>,
) -> Redirect
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let power = leading_integer(&form.power).unwrap_or(0);
    let duration = leading_integer(&form.duration);
    match state
        .device_service
        .add_device(&form.name, power, duration)
        .await
    {
        Ok(_) => Notice::Added.redirect(),
        Err(err) => Notice::for_error(&err).redirect(),
    }
}

/// `POST /devices/{id}/toggle`: switch a device on or off.
pub async fn toggle<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Path(id): Path<String>,
) -> Redirect
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let result = match DeviceId::parse_input(&id) {
        Ok(device_id) => state.device_service.toggle_device(device_id).await,
        Err(err) => Err(PowerHubError::from(err)),
    };
    match result {
        Ok(_) => Redirect::to("/"),
        Err(PowerHubError::Validation(_)) => Notice::NotFound.redirect(),
        Err(err) => Notice::for_error(&err).redirect(),
    }
}

/// `POST /settings`: save the energy cap and peak hours.
pub async fn save_settings<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Form(form): Form<SettingsForm>,
) -> Redirect
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let update = SettingsUpdate::from_raw(&form.max_energy, &form.peak_hours);
    match state.settings_service.save_settings(update).await {
        Ok(_) => Notice::SettingsSaved.redirect(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to save settings");
            Notice::for_error(&err).redirect()
        }
    }
}
