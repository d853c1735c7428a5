//! Live fragment of the dashboard: device table, total power, usage list
//! and the consumption chart.
//!
//! Rendered inside a frame of the home page and reloaded through
//! `<meta http-equiv="refresh">`. Toggle buttons submit to the top window
//! so the redirect lands on the home page with its notice.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};
use powerhub_domain::device::Device;
use powerhub_domain::time::now;

use super::DashboardError;
use super::chart::ChartView;
use crate::state::AppState;

/// One row of the device table.
pub struct DeviceRow {
    pub id: String,
    pub name: String,
    pub on: bool,
    pub rated_power: u32,
    pub drawn_power: u32,
    /// Auto-off delay in minutes, empty when disabled.
    pub auto_off: String,
}

impl From<&Device> for DeviceRow {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.to_string(),
            name: device.name.clone(),
            on: device.is_on(),
            rated_power: device.rated_power,
            drawn_power: device.drawn_power(),
            auto_off: device
                .auto_off
                .map(|auto_off| format!("{} min", auto_off.minutes()))
                .unwrap_or_default(),
        }
    }
}

/// One line of the usage list.
pub struct UsageRow {
    pub name: String,
    pub seconds: u64,
}

#[derive(Template)]
#[template(path = "live.html")]
pub struct LiveTemplate {
    refresh_seconds: u32,
    alerts: Vec<String>,
    devices: Vec<DeviceRow>,
    total_watts: u64,
    max_energy: u32,
    usage: Vec<UsageRow>,
    chart: ChartView,
}

impl IntoResponse for LiveTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// `GET /live`
pub async fn fragment<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
) -> Result<LiveTemplate, DashboardError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let at = now();
    let devices = state.device_service.list_devices().await?;
    let settings = state.settings_service.get_settings().await?;
    let usage = state.device_service.usage_report(at).await?;
    let total_watts: u64 = devices.iter().map(|d| u64::from(d.drawn_power())).sum();

    Ok(LiveTemplate {
        refresh_seconds: state.dashboard.refresh_seconds,
        alerts: state.notices.active(at),
        devices: devices.iter().map(DeviceRow::from).collect(),
        total_watts,
        max_energy: settings.max_energy,
        usage: usage
            .into_iter()
            .map(|line| UsageRow {
                name: line.name,
                seconds: line.seconds,
            })
            .collect(),
        chart: ChartView::from_series(&state.sampler.snapshot(), settings.max_energy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_html, test_state};

    #[tokio::test]
    async fn should_render_devices_totals_and_refresh() {
        let state = test_state();
        let kettle = state.device_service.add_device("Kettle", 1500, None).await.unwrap();
        state.device_service.add_device("Fan", 60, Some(15)).await.unwrap();
        state.device_service.toggle_device(kettle.id).await.unwrap();

        let (_, html) = get_html(&state, "/live", None).await;
        assert!(html.contains("Kettle"));
        assert!(html.contains("15 min"));
        assert!(html.contains("Turn Off"));
        assert!(html.contains("Turn On"));
        assert!(html.contains("target=\"_top\""));
        assert!(html.contains("id=\"total-energy\">1500<"));
        assert!(html.contains("Kettle: 0 seconds"));
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"1; url=/live\">"));
        assert!(html.contains("<polyline"));
        assert!(!html.contains("action=\"/settings\""));
    }

    #[tokio::test]
    async fn should_show_recent_auto_off_messages() {
        let state = test_state();
        state.notices.record(now(), "Time is up for Heater.");

        let (_, html) = get_html(&state, "/live", None).await;
        assert!(html.contains("Time is up for Heater."));
    }

    #[tokio::test]
    async fn should_escape_device_names() {
        let state = test_state();
        state.device_service.add_device("<b>Oven</b>", 900, None).await.unwrap();

        let (_, html) = get_html(&state, "/live", None).await;
        assert!(!html.contains("<b>Oven</b>"));
        assert!(html.contains("&lt;b&gt;Oven"));
    }

    #[test]
    fn should_leave_auto_off_blank_when_disabled() {
        let device = Device::builder().name("Lamp").power(40).build().unwrap();
        let row = DeviceRow::from(&device);
        assert_eq!(row.auto_off, "");
        assert!(!row.on);
    }
}
