//! Device service: the device registry and its admission control.

use std::sync::Arc;

use tokio::sync::Mutex;

use powerhub_domain::admission;
use powerhub_domain::device::{AutoOff, Device, DeviceUsage};
use powerhub_domain::error::{NotFoundError, PowerHubError};
use powerhub_domain::event::{Event, EventType};
use powerhub_domain::id::DeviceId;
use powerhub_domain::time::{Timestamp, now};

use crate::auto_off::{AutoOffTimers, Schedule};
use crate::ports::{DeviceRepository, EventPublisher, SettingsRepository};

/// Application service owning the device registry.
///
/// Every state change goes through one async lock, which also guards the
/// pending auto-off schedules. The admission check and the write it allows
/// therefore happen atomically with respect to other toggles and timers.
pub struct DeviceService<DR, SR, EP> {
    devices: DR,
    settings: SR,
    publisher: EP,
    timers: Mutex<AutoOffTimers>,
}

impl<DR, SR, EP> DeviceService<DR, SR, EP>
where
    DR: DeviceRepository + Send + Sync + 'static,
    SR: SettingsRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    /// Create a new service backed by the given repositories and publisher.
    pub fn new(devices: DR, settings: SR, publisher: EP) -> Self {
        Self {
            devices,
            settings,
            publisher,
            timers: Mutex::new(AutoOffTimers::default()),
        }
    }

    /// Register a new device, initially off.
    ///
    /// `auto_off_minutes` that are absent or not positive disable auto-off.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::Validation`] when the name is blank or the
    /// power is not positive; nothing is stored in that case.
    #[tracing::instrument(skip(self))]
    pub async fn add_device(
        &self,
        name: &str,
        power: i64,
        auto_off_minutes: Option<i64>,
    ) -> Result<Device, PowerHubError> {
        let mut builder = Device::builder().name(name).power(power);
        if let Some(minutes) = auto_off_minutes {
            builder = builder.auto_off_minutes(minutes);
        }
        let device = builder.build()?;

        let _guard = self.timers.lock().await;
        let device = self.devices.create(device).await?;
        tracing::info!(device_id = %device.id, watts = device.rated_power, "device added");
        self.notify(Event::new(
            EventType::DeviceAdded,
            Some(device.id),
            serde_json::json!({ "name": device.name, "rated_power": device.rated_power }),
        ))
        .await;
        Ok(device)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::NotFound`] when no device with `id` exists.
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, PowerHubError> {
        self.devices.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all devices in registration order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, PowerHubError> {
        self.devices.get_all().await
    }

    /// Total power drawn by the devices that are currently on.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn total_power(&self) -> Result<u64, PowerHubError> {
        let devices = self.devices.get_all().await?;
        Ok(admission::total_drawn(&devices))
    }

    /// Elapsed on-time for every powered-on device, in registration order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn usage_report(&self, at: Timestamp) -> Result<Vec<DeviceUsage>, PowerHubError> {
        let devices = self.devices.get_all().await?;
        Ok(devices
            .iter()
            .filter_map(|device| DeviceUsage::of(device, at))
            .collect())
    }

    /// Flip a device between off and on.
    ///
    /// Turning on is refused when the projected total would exceed the cap;
    /// the device is left untouched and an
    /// [`AdmissionRejected`](EventType::AdmissionRejected) event is published.
    /// Turning off cancels any pending auto-off.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::NotFound`] for an unknown id and
    /// [`PowerHubError::Admission`] when the cap would be exceeded.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_device(self: &Arc<Self>, id: DeviceId) -> Result<Device, PowerHubError> {
        let mut timers = self.timers.lock().await;
        let device = self.get_device(id).await?;
        if device.is_on() {
            self.switch_off(&mut timers, device).await
        } else {
            self.switch_on(&mut timers, device).await
        }
    }

    /// Toggle the device at `index` in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`PowerHubError::NotFound`] when `index` is out of range, plus
    /// everything [`toggle_device`](Self::toggle_device) can return.
    pub async fn toggle_device_at(self: &Arc<Self>, index: usize) -> Result<Device, PowerHubError> {
        let devices = self.devices.get_all().await?;
        let device = devices.get(index).ok_or_else(|| NotFoundError {
            entity: "Device",
            id: format!("#{index}"),
        })?;
        self.toggle_device(device.id).await
    }

    /// Number of auto-off schedules still waiting to fire.
    pub async fn pending_auto_offs(&self) -> usize {
        self.timers.lock().await.len()
    }

    /// Cancel every pending auto-off. Devices keep their current state.
    pub async fn shutdown(&self) {
        let mut timers = self.timers.lock().await;
        let pending = timers.len();
        timers.cancel_all();
        tracing::debug!(pending, "auto-off schedules cancelled");
    }

    async fn switch_on(
        self: &Arc<Self>,
        timers: &mut AutoOffTimers,
        mut device: Device,
    ) -> Result<Device, PowerHubError> {
        let settings = self.settings.get().await?;
        let devices = self.devices.get_all().await?;

        let projected = match admission::check(&devices, &device, settings.max_energy) {
            Ok(projected) => projected,
            Err(err) => {
                tracing::info!(device_id = %device.id, error = %err, "power-on refused");
                self.notify(Event::new(
                    EventType::AdmissionRejected,
                    Some(device.id),
                    serde_json::json!({ "name": device.name, "reason": err.to_string() }),
                ))
                .await;
                return Err(err.into());
            }
        };

        device.turn_on(now());
        let device = self.devices.update(device).await?;

        if let Some(auto_off) = device.auto_off {
            let schedule = timers.arm(device.id);
            self.spawn_auto_off(device.id, auto_off, schedule);
        }

        tracing::info!(device_id = %device.id, total_watts = projected, "device powered on");
        self.notify(Event::new(
            EventType::DevicePoweredOn,
            Some(device.id),
            serde_json::json!({ "name": device.name, "total_watts": projected }),
        ))
        .await;
        Ok(device)
    }

    async fn switch_off(
        &self,
        timers: &mut AutoOffTimers,
        mut device: Device,
    ) -> Result<Device, PowerHubError> {
        if timers.disarm(device.id) {
            tracing::debug!(device_id = %device.id, "pending auto-off cancelled");
        }
        device.turn_off();
        let device = self.devices.update(device).await?;

        tracing::info!(device_id = %device.id, "device powered off");
        self.notify(Event::new(
            EventType::DevicePoweredOff,
            Some(device.id),
            serde_json::json!({ "name": device.name, "reason": "manual" }),
        ))
        .await;
        Ok(device)
    }

    fn spawn_auto_off(self: &Arc<Self>, device_id: DeviceId, auto_off: AutoOff, schedule: Schedule) {
        let service = Arc::downgrade(self);
        let delay = auto_off.duration();
        tracing::debug!(%device_id, minutes = auto_off.minutes(), "auto-off armed");

        tokio::spawn(async move {
            tokio::select! {
                () = schedule.token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let Some(service) = service.upgrade() else {
                        return;
                    };
                    if let Err(err) = service.expire_auto_off(device_id, schedule.ticket).await {
                        tracing::warn!(%device_id, error = %err, "auto-off failed");
                    }
                }
            }
        });
    }

    /// Force a device off once its auto-off delay elapsed.
    ///
    /// Stale tickets (cancelled or superseded schedules) are ignored.
    async fn expire_auto_off(
        &self,
        device_id: DeviceId,
        ticket: u64,
    ) -> Result<Option<Device>, PowerHubError> {
        let mut timers = self.timers.lock().await;
        if !timers.claim(device_id, ticket) {
            return Ok(None);
        }
        let mut device = self.get_device(device_id).await?;
        if !device.is_on() {
            return Ok(None);
        }
        device.turn_off();
        let device = self.devices.update(device).await?;

        tracing::info!(%device_id, "auto-off fired");
        self.notify(Event::new(
            EventType::AutoOffFired,
            Some(device_id),
            serde_json::json!({
                "name": device.name,
                "message": format!("Time is up for {}.", device.name),
            }),
        ))
        .await;
        Ok(Some(device))
    }

    async fn notify(&self, event: Event) {
        let event_type = event.event_type;
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(%event_type, error = %err, "failed to publish event");
        }
    }
}
