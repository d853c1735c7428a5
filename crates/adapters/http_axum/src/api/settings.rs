//! JSON handlers for the energy settings.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};
use powerhub_domain::settings::{Settings, SettingsUpdate};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `PUT /api/settings`.
///
/// Both fields are optional. A cap that is not a positive integer and a
/// blank peak-hours label are ignored and the current value is kept.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSettingsRequest {
    pub max_energy: Option<i64>,
    pub peak_hours: Option<String>,
}

/// Possible responses from the settings endpoints.
pub enum SettingsResponse {
    Ok(Json<Settings>),
}

impl IntoResponse for SettingsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/settings`
pub async fn get<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
) -> Result<SettingsResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let settings = state.settings_service.get_settings().await?;
    Ok(SettingsResponse::Ok(Json(settings)))
}

/// `PUT /api/settings`
pub async fn update<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<SettingsResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let update = SettingsUpdate::coerce(req.max_energy, req.peak_hours);
    let saved = state.settings_service.save_settings(update).await?;
    Ok(SettingsResponse::Ok(Json(saved)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::router::build;
    use crate::test_support::test_state;

    async fn put_settings(app: axum::Router, body: serde_json::Value) -> serde_json::Value {
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_default_settings() {
        let app = build(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/settings").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["max_energy"], 2000);
        assert_eq!(json["peak_hours"], "18:00-22:00");
    }

    #[tokio::test]
    async fn should_save_new_cap() {
        let state = test_state();
        let json = put_settings(
            build(state.clone()),
            serde_json::json!({ "max_energy": 3000, "peak_hours": "17:00-20:00" }),
        )
        .await;
        assert_eq!(json["max_energy"], 3000);
        assert_eq!(json["peak_hours"], "17:00-20:00");
        assert_eq!(state.settings_service.get_settings().await.unwrap().max_energy, 3000);
    }

    #[tokio::test]
    async fn should_keep_cap_when_value_is_not_positive() {
        let json = put_settings(build(test_state()), serde_json::json!({ "max_energy": 0 })).await;
        assert_eq!(json["max_energy"], 2000);
        assert_eq!(json["peak_hours"], "18:00-22:00");
    }
}
