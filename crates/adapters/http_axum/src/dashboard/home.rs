//! Dashboard home page: banners, the add-device and settings forms, and the
//! frame holding the live view.
//!
//! This page never reloads on its own, so half-typed form input and the
//! notice of the last submission stay put. The parts that move are served
//! by [`super::live`].

use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};

use super::{DashboardError, Notice};
use crate::state::AppState;

/// Cookie remembering that the welcome banner was already shown.
pub const WELCOME_COOKIE: &str = "powerhub_welcomed";

/// Query string of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub notice: Option<String>,
}

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    welcome: bool,
    notice: Option<Notice>,
    max_energy: u32,
    peak_hours: String,
}

impl IntoResponse for HomeTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// `GET /`: the dashboard.
///
/// Shows the welcome banner when the browser has no [`WELCOME_COOKIE`] yet
/// and sets it on the way out.
pub async fn index<DR, SR, EP>(
    State(state): State<AppState<DR, SR, EP>>,
    Query(query): Query<HomeQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, HomeTemplate), DashboardError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let settings = state.settings_service.get_settings().await?;

    let welcome = jar.get(WELCOME_COOKIE).is_none();
    let jar = if welcome {
        jar.add(Cookie::build((WELCOME_COOKIE, "1")).path("/").permanent())
    } else {
        jar
    };

    let page = HomeTemplate {
        welcome,
        notice: query.notice.as_deref().and_then(Notice::from_slug),
        max_energy: settings.max_energy,
        peak_hours: settings.peak_hours,
    };
    Ok((jar, page))
}
