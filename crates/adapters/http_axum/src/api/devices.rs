//! JSON handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};
use powerhub_domain::device::Device;
use powerhub_domain::error::PowerHubError;
use powerhub_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a device.
#[derive(Debug, Deserialize)]
pub struct CreateDeviceRequest {
    pub name: String,
    /// Rated power in watts.
    pub power: i64,
    /// Auto-off delay; absent or non-positive disables it.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and toggle endpoints.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<DeviceId, ApiError> {
    DeviceId::parse_input(raw).map_err(|err| ApiError::from(PowerHubError::from(err)))
}

/// `GET /api/devices`
pub async fn list<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/devices/{id}`
pub async fn get<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let device = state.device_service.get_device(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices`
pub async fn create<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let created = state
        .device_service
        .add_device(&req.name, req.power, req.duration_minutes)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `POST /api/devices/{id}/toggle`
///
/// Answers `409 Conflict` when powering on would exceed the energy cap.
pub async fn toggle<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let device = state.device_service.toggle_device(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(device)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::router::build;
    use crate::test_support::test_state;

    async fn send(
        app: axum::Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn should_create_device_and_return_201() {
        let app = build(test_state());
        let (status, json) = send(
            app,
            "POST",
            "/api/devices",
            Some(serde_json::json!({ "name": "Kettle", "power": 1500, "duration_minutes": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["name"], "Kettle");
        assert_eq!(json["rated_power"], 1500);
        assert_eq!(json["state"], "off");
        assert_eq!(json["auto_off"], 3);
    }

    #[tokio::test]
    async fn should_reject_blank_name_with_400() {
        let state = test_state();
        let app = build(state.clone());
        let (status, json) = send(
            app,
            "POST",
            "/api/devices",
            Some(serde_json::json!({ "name": "  ", "power": 100 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "device name must not be empty");
        assert!(state.device_service.list_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_device() {
        let app = build(test_state());
        let uri = format!("/api/devices/{}", powerhub_domain::id::DeviceId::new());
        let (status, _) = send(app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_400_for_malformed_id() {
        let app = build(test_state());
        let (status, _) = send(app, "POST", "/api/devices/not-a-uuid/toggle", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_409_when_toggle_exceeds_cap() {
        let state = test_state();
        let big = state.device_service.add_device("A", 1500, None).await.unwrap();
        let other = state.device_service.add_device("B", 600, None).await.unwrap();

        let (status, json) = send(
            build(state.clone()),
            "POST",
            &format!("/api/devices/{}/toggle", big.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"], "on");

        let (status, json) = send(
            build(state.clone()),
            "POST",
            &format!("/api/devices/{}/toggle", other.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json["error"].as_str().unwrap().contains("2000"));

        let b = state.device_service.get_device(other.id).await.unwrap();
        assert!(!b.is_on());
    }

    #[tokio::test]
    async fn should_list_devices_in_registration_order() {
        let state = test_state();
        state.device_service.add_device("First", 10, None).await.unwrap();
        state.device_service.add_device("Second", 20, None).await.unwrap();

        let (status, json) = send(build(state), "GET", "/api/devices", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
