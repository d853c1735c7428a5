//! # powerhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a JSON API for programmatic access (`/api/devices`,
//!   `/api/settings`, `/api/consumption`, …) and an SSE stream of domain
//!   events at `/api/events/stream`
//! - Serve a server-side-rendered HTML dashboard that works with zero
//!   JavaScript: HTML forms that POST and redirect (PRG pattern), and a
//!   framed live view reloaded by `<meta http-equiv="refresh">` so the
//!   chart and usage list stay current
//! - Map application errors into HTTP status codes and user-facing notices
//!
//! ## Dependency rule
//! Depends on `powerhub-app` (for port traits and services) and
//! `powerhub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod notices;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
