//! # powerhub-domain
//!
//! Pure domain model for the powerhub energy dashboard.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (appliances with a rated power draw and an on/off state)
//! - Define **Settings** (the total-power cap and the peak-hours label)
//! - Define the **admission rule** gating power-on requests against the cap
//! - Define the **consumption series** (rolling buffer backing the chart)
//! - Define **Events** (state-change notifications)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod admission;
pub mod consumption;
pub mod device;
pub mod event;
pub mod settings;
