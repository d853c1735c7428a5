//! Application state wired on the in-memory adapters, for router tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use powerhub_adapter_storage_memory::{MemoryDeviceRepository, MemorySettingsRepository};
use powerhub_app::event_bus::InProcessEventBus;
use powerhub_app::sampler::ConsumptionSampler;
use powerhub_app::services::device_service::DeviceService;
use powerhub_app::services::settings_service::SettingsService;

use crate::notices::RecentNotices;
use crate::router::build;
use crate::state::AppState;

pub(crate) type TestState =
    AppState<Arc<MemoryDeviceRepository>, Arc<MemorySettingsRepository>, InProcessEventBus>;

pub(crate) fn test_state() -> TestState {
    let bus = InProcessEventBus::new(64);
    let devices = Arc::new(MemoryDeviceRepository::new());
    let settings = Arc::new(MemorySettingsRepository::default());

    AppState::from_arcs(
        Arc::new(DeviceService::new(
            Arc::clone(&devices),
            Arc::clone(&settings),
            bus.clone(),
        )),
        Arc::new(SettingsService::new(settings, bus.clone())),
        Arc::new(ConsumptionSampler::new(
            devices,
            bus.clone(),
            Duration::from_secs(1),
            10,
        )),
        bus,
        Arc::new(RecentNotices::default()),
    )
}

/// GET an HTML page, asserting 200, and return its headers and body.
pub(crate) async fn get_html(
    state: &TestState,
    uri: &str,
    cookie: Option<&str>,
) -> (HeaderMap, String) {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let response = build(state.clone())
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (headers, String::from_utf8(bytes.to_vec()).unwrap())
}
