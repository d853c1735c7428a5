//! Device: an appliance registered by the user.
//!
//! A device has a rated power draw and is either on or off. Devices are
//! created from user input, mutated in place by toggles, and never removed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PowerHubError, ValidationError};
use crate::id::DeviceId;
use crate::time::{Timestamp, elapsed_seconds};

/// Whether a device is currently drawing power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    #[default]
    Off,
    On,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::On => f.write_str("on"),
        }
    }
}

/// Duration after which a powered-on device is switched off automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoOff {
    minutes: u32,
}

impl AutoOff {
    /// Interpret a user-provided number of minutes.
    ///
    /// Zero, negative or out-of-range values mean "no auto-off".
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Option<Self> {
        u32::try_from(minutes)
            .ok()
            .filter(|m| *m > 0)
            .map(|minutes| Self { minutes })
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        self.minutes
    }

    /// Delay between power-on and the forced power-off.
    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::from_secs(u64::from(self.minutes) * 60)
    }
}

/// A registered appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// Rated power draw in watts.
    pub rated_power: u32,
    pub state: PowerState,
    pub auto_off: Option<AutoOff>,
    /// Set when the device is turned on, cleared when turned off.
    pub started_at: Option<Timestamp>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::Validation`] when:
    /// - `name` is blank ([`ValidationError::EmptyName`])
    /// - `rated_power` is zero ([`ValidationError::NonPositivePower`])
    pub fn validate(&self) -> Result<(), PowerHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.rated_power == 0 {
            return Err(ValidationError::NonPositivePower.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state == PowerState::On
    }

    /// Power currently drawn: the rated power when on, zero otherwise.
    #[must_use]
    pub fn drawn_power(&self) -> u32 {
        if self.is_on() { self.rated_power } else { 0 }
    }

    /// Mark the device on and remember when it started.
    pub fn turn_on(&mut self, at: Timestamp) {
        self.state = PowerState::On;
        self.started_at = Some(at);
    }

    pub fn turn_off(&mut self) {
        self.state = PowerState::Off;
        self.started_at = None;
    }

    /// Seconds the device has been on, or `None` when it is off.
    #[must_use]
    pub fn elapsed_on(&self, now: Timestamp) -> Option<u64> {
        if !self.is_on() {
            return None;
        }
        self.started_at.map(|since| elapsed_seconds(since, now))
    }
}

/// How long a powered-on device has been running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUsage {
    pub device_id: DeviceId,
    pub name: String,
    pub seconds: u64,
}

impl DeviceUsage {
    /// Usage line for `device`, or `None` when it is off.
    #[must_use]
    pub fn of(device: &Device, now: Timestamp) -> Option<Self> {
        device.elapsed_on(now).map(|seconds| Self {
            device_id: device.id,
            name: device.name.clone(),
            seconds,
        })
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    power: Option<i64>,
    auto_off: Option<AutoOff>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    /// Display name; surrounding whitespace is trimmed.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into().trim().to_string());
        self
    }

    /// Rated power in watts, as entered by the user.
    #[must_use]
    pub fn power(mut self, watts: i64) -> Self {
        self.power = Some(watts);
        self
    }

    /// Auto-off delay in minutes; non-positive values disable it.
    #[must_use]
    pub fn auto_off_minutes(mut self, minutes: i64) -> Self {
        self.auto_off = AutoOff::from_minutes(minutes);
        self
    }

    /// Consume the builder, validate, and return a [`Device`] that is off.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::Validation`] if the name is missing or blank,
    /// or if the power is missing, non-positive or does not fit in 32 bits.
    pub fn build(self) -> Result<Device, PowerHubError> {
        let rated_power = self
            .power
            .and_then(|watts| u32::try_from(watts).ok())
            .unwrap_or(0);
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            rated_power,
            state: PowerState::Off,
            auto_off: self.auto_off,
            started_at: None,
        };
        device.validate()?;
        Ok(device)
    }
}
