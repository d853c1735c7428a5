//! Server-side rendered HTML dashboard (no JavaScript).
//!
//! The home page holds the forms and never reloads. Forms POST to small
//! handlers that redirect back to `/` with a `notice` query parameter (PRG
//! pattern). The live view is a fragment embedded in a frame that reloads
//! itself.

pub mod chart;
pub mod forms;
pub mod home;
pub mod live;

use askama::Template;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};

use powerhub_app::ports::{DeviceRepository, EventPublisher, SettingsRepository};
use powerhub_domain::error::PowerHubError;

use crate::error::status_of;
use crate::state::AppState;

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes<DR, SR, EP>() -> Router<AppState<DR, SR, EP>>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home::index::<DR, SR, EP>))
        .route("/live", get(live::fragment::<DR, SR, EP>))
        .route("/devices", post(forms::add_device::<DR, SR, EP>))
        .route("/devices/{id}/toggle", post(forms::toggle::<DR, SR, EP>))
        .route("/settings", post(forms::save_settings::<DR, SR, EP>))
}

/// Outcome of a form submission, carried in the redirect URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    InvalidDevice,
    Limit,
    NotFound,
    SettingsSaved,
}

impl Notice {
    const ALL: [Self; 5] = [
        Self::Added,
        Self::InvalidDevice,
        Self::Limit,
        Self::NotFound,
        Self::SettingsSaved,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::InvalidDevice => "invalid-device",
            Self::Limit => "limit",
            Self::NotFound => "not-found",
            Self::SettingsSaved => "settings-saved",
        }
    }

    /// Unknown slugs are ignored.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notice| notice.slug() == slug)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Added => "Device added.",
            Self::InvalidDevice => "Please enter all details.",
            Self::Limit => "You hit the limit!",
            Self::NotFound => "Unknown device.",
            Self::SettingsSaved => "Success!",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Added => "The device is registered and switched off.",
            Self::InvalidDevice => "A device needs a name and a positive power usage.",
            Self::Limit => {
                "The total energy consumption would exceed the limit. The device stays off."
            }
            Self::NotFound => "The device you tried to switch does not exist.",
            Self::SettingsSaved => "Settings saved successfully.",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::InvalidDevice | Self::Limit | Self::NotFound)
    }

    /// Notice matching a rejected form submission.
    #[must_use]
    pub fn for_error(err: &PowerHubError) -> Self {
        match err {
            PowerHubError::Validation(_) => Self::InvalidDevice,
            PowerHubError::NotFound(_) => Self::NotFound,
            PowerHubError::Admission(_) => Self::Limit,
        }
    }

    /// Redirect back to the dashboard showing this notice.
    #[must_use]
    pub fn redirect(self) -> Redirect {
        Redirect::to(&format!("/?notice={}", self.slug()))
    }
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    message: String,
}

/// Error returned by dashboard page handlers, rendered as HTML.
#[derive(Debug)]
pub struct DashboardError(PowerHubError);

impl From<PowerHubError> for DashboardError {
    fn from(err: PowerHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        let page = ErrorTemplate {
            status: status.as_u16(),
            message: self.0.to_string(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error page");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
