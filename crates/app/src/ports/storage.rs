//! Storage port: repository traits for the in-memory state.

use std::future::Future;
use std::sync::Arc;

use powerhub_domain::device::Device;
use powerhub_domain::error::PowerHubError;
use powerhub_domain::id::DeviceId;
use powerhub_domain::settings::Settings;

/// Registry of devices. Devices are never deleted.
pub trait DeviceRepository {
    /// Append a new device.
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, PowerHubError>> + Send;

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, PowerHubError>> + Send;

    /// All devices, in registration order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, PowerHubError>> + Send;

    /// Replace a stored device.
    ///
    /// Returns [`PowerHubError::NotFound`] if `device.id` is unknown.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, PowerHubError>> + Send;
}

/// Holder of the [`Settings`] singleton.
pub trait SettingsRepository {
    fn get(&self) -> impl Future<Output = Result<Settings, PowerHubError>> + Send;

    fn save(&self, settings: Settings)
    -> impl Future<Output = Result<Settings, PowerHubError>> + Send;
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for Arc<T> {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, PowerHubError>> + Send {
        (**self).create(device)
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, PowerHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, PowerHubError>> + Send {
        (**self).get_all()
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, PowerHubError>> + Send {
        (**self).update(device)
    }
}

impl<T: SettingsRepository + Send + Sync> SettingsRepository for Arc<T> {
    fn get(&self) -> impl Future<Output = Result<Settings, PowerHubError>> + Send {
        (**self).get()
    }

    fn save(
        &self,
        settings: Settings,
    ) -> impl Future<Output = Result<Settings, PowerHubError>> + Send {
        (**self).save(settings)
    }
}
