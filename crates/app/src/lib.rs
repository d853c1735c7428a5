//! # powerhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository`: device registry storage
//!   - `SettingsRepository`: the settings singleton
//!   - `EventPublisher`: state-change notifications
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceService`: add, toggle (admission-checked), list, usage report
//!   - `SettingsService`: read and save the energy budget
//!   - `ConsumptionSampler`: periodic sampling of aggregate power
//! - Provide **in-process infrastructure** (event bus, auto-off timers)
//!
//! ## Dependency rule
//! Depends on `powerhub-domain` only (plus `tokio` for sync/time and
//! `tokio-util` for cancellation). Never imports adapter crates.

pub mod auto_off;
pub mod event_bus;
pub mod ports;
pub mod sampler;
pub mod services;
