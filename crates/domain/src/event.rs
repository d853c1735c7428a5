//! Event: an immutable record of a state change.
//!
//! Events are the explicit notifications that drive dashboard redraws and
//! the messages shown to the user.

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, EventId};
use crate::time::{Timestamp, now};

/// Kind of state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DeviceAdded,
    DevicePoweredOn,
    DevicePoweredOff,
    /// A device reached its auto-off deadline and was switched off.
    AutoOffFired,
    /// A power-on request was refused because of the cap.
    AdmissionRejected,
    SettingsSaved,
    ConsumptionSampled,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DeviceAdded => "device_added",
            Self::DevicePoweredOn => "device_powered_on",
            Self::DevicePoweredOff => "device_powered_off",
            Self::AutoOffFired => "auto_off_fired",
            Self::AdmissionRejected => "admission_rejected",
            Self::SettingsSaved => "settings_saved",
            Self::ConsumptionSampled => "consumption_sampled",
        };
        f.write_str(name)
    }
}

/// A state-change notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub device_id: Option<DeviceId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, device_id: Option<DeviceId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            device_id,
            data,
            timestamp: now(),
        }
    }

    /// Whether the event should be surfaced to the user as a notice.
    #[must_use]
    pub fn is_notice(&self) -> bool {
        matches!(
            self.event_type,
            EventType::AutoOffFired | EventType::AdmissionRejected | EventType::SettingsSaved
        )
    }
}
