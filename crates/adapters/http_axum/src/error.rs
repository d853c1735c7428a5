//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use powerhub_domain::error::PowerHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`PowerHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(PowerHubError);

impl From<PowerHubError> for ApiError {
    fn from(err: PowerHubError) -> Self {
        Self(err)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        status_of(&self.0)
    }
}

/// HTTP status matching a domain error.
#[must_use]
pub fn status_of(err: &PowerHubError) -> StatusCode {
    match err {
        PowerHubError::Validation(_) => StatusCode::BAD_REQUEST,
        PowerHubError::NotFound(_) => StatusCode::NOT_FOUND,
        PowerHubError::Admission(_) => StatusCode::CONFLICT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            PowerHubError::Validation(err) => err.to_string(),
            PowerHubError::NotFound(err) => err.to_string(),
            PowerHubError::Admission(err) => err.to_string(),
        };
        tracing::debug!(%status, error = %message, "request rejected");
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
