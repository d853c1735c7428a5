//! In-memory implementation of [`DeviceRepository`].

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use powerhub_app::ports::DeviceRepository;
use powerhub_domain::device::Device;
use powerhub_domain::error::{NotFoundError, PowerHubError};
use powerhub_domain::id::DeviceId;

/// Device registry backed by a `Vec`, preserving registration order.
#[derive(Debug, Default)]
pub struct MemoryDeviceRepository {
    devices: RwLock<Vec<Device>>,
}

impl MemoryDeviceRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&[Device]) -> T) -> T {
        f(&self.devices.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Vec<Device>) -> T) -> T {
        f(&mut self.devices.write().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DeviceRepository for MemoryDeviceRepository {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, PowerHubError>> + Send {
        self.write(|devices| devices.push(device.clone()));
        tracing::trace!(device_id = %device.id, "device stored");
        async { Ok(device) }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, PowerHubError>> + Send {
        let found = self.read(|devices| devices.iter().find(|d| d.id == id).cloned());
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, PowerHubError>> + Send {
        let all = self.read(<[Device]>::to_vec);
        async { Ok(all) }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, PowerHubError>> + Send {
        let result = self.write(|devices| match devices.iter_mut().find(|d| d.id == device.id) {
            Some(slot) => {
                *slot = device.clone();
                Ok(device)
            }
            None => Err(PowerHubError::from(NotFoundError {
                entity: "Device",
                id: device.id.to_string(),
            })),
        });
        async { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerhub_domain::time::now;

    fn device(name: &str) -> Device {
        Device::builder().name(name).power(100).build().unwrap()
    }

    #[tokio::test]
    async fn should_return_devices_in_insertion_order() {
        let repo = MemoryDeviceRepository::new();
        for name in ["Fridge", "Oven", "Lamp"] {
            repo.create(device(name)).await.unwrap();
        }

        let names: Vec<_> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Fridge", "Oven", "Lamp"]);
    }

    #[tokio::test]
    async fn should_find_device_by_id() {
        let repo = MemoryDeviceRepository::new();
        let stored = repo.create(device("Fridge")).await.unwrap();

        let found = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Fridge");
        assert!(repo.get_by_id(DeviceId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_replace_device_in_place() {
        let repo = MemoryDeviceRepository::new();
        repo.create(device("A")).await.unwrap();
        let mut b = repo.create(device("B")).await.unwrap();
        repo.create(device("C")).await.unwrap();

        b.turn_on(now());
        repo.update(b.clone()).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all[1].id, b.id);
        assert!(all[1].is_on());
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_unknown_device() {
        let repo = MemoryDeviceRepository::new();
        let result = repo.update(device("Ghost")).await;
        assert!(matches!(result, Err(PowerHubError::NotFound(_))));
    }
}
