//! JSON handlers for the consumption chart and the usage list.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};
use powerhub_domain::consumption::ConsumptionSample;
use powerhub_domain::device::DeviceUsage;
use powerhub_domain::time::now;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /api/consumption`.
#[derive(Debug, Serialize)]
pub struct ConsumptionBody {
    /// Power drawn right now, in watts.
    pub total_watts: u64,
    pub max_energy: u32,
    /// Rolling window, oldest first.
    pub samples: Vec<ConsumptionSample>,
}

/// Possible responses from the consumption endpoint.
pub enum ConsumptionResponse {
    Ok(Json<ConsumptionBody>),
}

impl IntoResponse for ConsumptionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the usage endpoint.
pub enum UsageResponse {
    Ok(Json<Vec<DeviceUsage>>),
}

impl IntoResponse for UsageResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/consumption`
pub async fn series<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
) -> Result<ConsumptionResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let total_watts = state.device_service.total_power().await?;
    let settings = state.settings_service.get_settings().await?;
    Ok(ConsumptionResponse::Ok(Json(ConsumptionBody {
        total_watts,
        max_energy: settings.max_energy,
        samples: state.sampler.snapshot().to_vec(),
    })))
}

/// `GET /api/usage`
pub async fn usage<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
) -> Result<UsageResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let report = state.device_service.usage_report(now()).await?;
    Ok(UsageResponse::Ok(Json(report)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::router::build;
    use crate::test_support::test_state;

    async fn get_json(app: axum::Router, uri: &str) -> serde_json::Value {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_report_total_cap_and_samples() {
        let state = test_state();
        let kettle = state.device_service.add_device("Kettle", 1200, None).await.unwrap();
        state.device_service.toggle_device(kettle.id).await.unwrap();
        state.sampler.sample_now().await.unwrap();

        let json = get_json(build(state), "/api/consumption").await;
        assert_eq!(json["total_watts"], 1200);
        assert_eq!(json["max_energy"], 2000);
        let samples = json["samples"].as_array().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0]["watts"], 0);
        assert_eq!(samples[1]["watts"], 1200);
    }

    #[tokio::test]
    async fn should_list_usage_for_running_devices_only() {
        let state = test_state();
        let on = state.device_service.add_device("Fan", 60, None).await.unwrap();
        state.device_service.add_device("Lamp", 40, None).await.unwrap();
        state.device_service.toggle_device(on.id).await.unwrap();

        let json = get_json(build(state), "/api/usage").await;
        let lines = json.as_array().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["name"], "Fan");
        assert!(lines[0]["seconds"].as_u64().is_some());
    }
}
